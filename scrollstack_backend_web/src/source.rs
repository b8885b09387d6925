// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM scroll sources.
//!
//! - [`NativeScrollSource`] follows the window's own scroll. Offsets are
//!   document-relative: `getBoundingClientRect().top + scrollY`.
//! - [`WrappedScrollSource`] owns a scroll container whose scrolling is
//!   driven by a [`SmoothScroller`]. Offsets are container-relative
//!   (`offsetTop`). It intercepts wheel and touch input, runs a persistent
//!   [`RafLoop`] that advances the smoothing, writes the smoothed position to
//!   the container, and wakes the stack after every move.
//!
//! [`DomScrollSource`] picks one at construction time.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use scrollstack_core::config::{ScrollMode, SmoothScrollConfig};
use scrollstack_core::scheduler::WakeReason;
use scrollstack_core::scroll::{ScrollSource, ScrollState};
use scrollstack_core::smooth::SmoothScroller;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Event, HtmlElement, TouchEvent, WheelEvent, Window};

use crate::listener::Listener;
use crate::raf::RafLoop;

/// Callback used by sources to wake the stack.
pub type Notify = Rc<dyn Fn(WakeReason)>;

/// Line height used to convert line-based wheel deltas to pixels.
const WHEEL_LINE_HEIGHT: f64 = 100.0 / 6.0;

const DOM_DELTA_LINE: u32 = 1;
const DOM_DELTA_PAGE: u32 = 2;

/// Converts a wheel delta to pixels according to its `deltaMode`.
#[must_use]
pub fn wheel_delta_px(delta: f64, delta_mode: u32, page_height: f64) -> f64 {
    match delta_mode {
        DOM_DELTA_LINE => delta * WHEEL_LINE_HEIGHT,
        DOM_DELTA_PAGE => delta * page_height,
        _ => delta,
    }
}

/// Window scrolling.
#[derive(Debug, Clone)]
pub struct NativeScrollSource {
    window: Window,
}

impl NativeScrollSource {
    /// Creates a source over `window`.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    /// Scrolls the window to `y`.
    pub fn scroll_to(&self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }
}

impl ScrollSource<HtmlElement> for NativeScrollSource {
    fn scroll_state(&self) -> ScrollState {
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        ScrollState::new(self.scroll_y(), height)
    }

    fn element_offset(&self, element: &HtmlElement) -> f64 {
        if !element.is_connected() {
            return f64::NAN;
        }
        element.get_bounding_client_rect().top() + self.scroll_y()
    }
}

/// A scroll container driven by momentum smoothing.
pub struct WrappedScrollSource {
    container: HtmlElement,
    scroller: Rc<RefCell<SmoothScroller>>,
    raf: RafLoop,
    _listeners: Vec<Listener>,
}

impl core::fmt::Debug for WrappedScrollSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WrappedScrollSource")
            .field("container", &"HtmlElement")
            .field("raf", &self.raf)
            .finish_non_exhaustive()
    }
}

impl WrappedScrollSource {
    /// Takes over scrolling of `container` and starts the smoothing loop.
    ///
    /// `notify` is called with [`WakeReason::SmoothScroll`] whenever the
    /// smoothed position moves and with [`WakeReason::Scroll`] on native
    /// container scroll.
    pub fn new(
        container: HtmlElement,
        config: SmoothScrollConfig,
        notify: Notify,
    ) -> Result<Self, JsValue> {
        let scroller = Rc::new(RefCell::new(SmoothScroller::new(
            config,
            scroll_top(&container),
            max_scroll(&container),
        )));

        let listeners = attach_input_listeners(&container, &scroller, &notify)?;

        let loop_container = container.clone();
        let loop_scroller = Rc::clone(&scroller);
        let mut last_timestamp: Option<f64> = None;
        let raf = RafLoop::new(move |timestamp_ms| {
            let dt = last_timestamp.map_or(0.0, |prev| (timestamp_ms - prev) / 1000.0);
            last_timestamp = Some(timestamp_ms);
            let moved = loop_scroller.borrow_mut().advance(dt);
            if let Some(position) = moved {
                set_scroll_top(&loop_container, position);
                notify(WakeReason::SmoothScroll);
            }
        });
        raf.start();

        Ok(Self {
            container,
            scroller,
            raf,
            _listeners: listeners,
        })
    }

    /// Scrolls to `y`, with timed easing unless `immediate`.
    pub fn scroll_to(&self, y: f64, immediate: bool) {
        let mut scroller = self.scroller.borrow_mut();
        scroller.set_limit(max_scroll(&self.container));
        scroller.scroll_to(y, immediate);
    }

    /// Re-reads the scrollable range, e.g. after a resize.
    pub fn refresh_limit(&self) {
        self.scroller
            .borrow_mut()
            .set_limit(max_scroll(&self.container));
    }

    /// Current smoothed position.
    #[must_use]
    pub fn smoothed_position(&self) -> f64 {
        self.scroller.borrow().position()
    }

    /// The scroll container.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }
}

impl Drop for WrappedScrollSource {
    fn drop(&mut self) {
        self.raf.stop();
    }
}

impl ScrollSource<HtmlElement> for WrappedScrollSource {
    fn scroll_state(&self) -> ScrollState {
        ScrollState::new(
            scroll_top(&self.container),
            f64::from(self.container.client_height()),
        )
    }

    fn element_offset(&self, element: &HtmlElement) -> f64 {
        if !element.is_connected() {
            return f64::NAN;
        }
        f64::from(element.offset_top())
    }
}

fn attach_input_listeners(
    container: &HtmlElement,
    scroller: &Rc<RefCell<SmoothScroller>>,
    notify: &Notify,
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::with_capacity(5);

    let wheel_container = container.clone();
    let wheel_scroller = Rc::clone(scroller);
    listeners.push(Listener::new(
        container,
        "wheel",
        false,
        move |event: Event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            // Pinch-zoom gestures arrive as ctrl+wheel.
            if wheel.ctrl_key() {
                return;
            }
            let page = f64::from(wheel_container.client_height());
            let delta = wheel_delta_px(wheel.delta_y(), wheel.delta_mode(), page);
            event.prevent_default();
            let mut scroller = wheel_scroller.borrow_mut();
            scroller.set_limit(max_scroll(&wheel_container));
            scroller.on_wheel(delta);
        },
    )?);

    let last_touch_y: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));

    let start_y = Rc::clone(&last_touch_y);
    let start_container = container.clone();
    let start_scroller = Rc::clone(scroller);
    listeners.push(Listener::new(
        container,
        "touchstart",
        true,
        move |event: Event| {
            start_y.set(first_touch_y(&event));
            start_scroller
                .borrow_mut()
                .set_limit(max_scroll(&start_container));
        },
    )?);

    let move_y = Rc::clone(&last_touch_y);
    let move_scroller = Rc::clone(scroller);
    listeners.push(Listener::new(
        container,
        "touchmove",
        false,
        move |event: Event| {
            let (Some(previous), Some(y)) = (move_y.get(), first_touch_y(&event)) else {
                return;
            };
            move_y.set(Some(y));
            if move_scroller.borrow_mut().on_touch(previous - y) {
                event.prevent_default();
            }
        },
    )?);

    let end_y = Rc::clone(&last_touch_y);
    listeners.push(Listener::new(
        container,
        "touchend",
        true,
        move |_event: Event| end_y.set(None),
    )?);

    let scroll_container = container.clone();
    let scroll_scroller = Rc::clone(scroller);
    let scroll_notify = Rc::clone(notify);
    listeners.push(Listener::new(
        container,
        "scroll",
        true,
        move |_event: Event| {
            // Scrollbar drags and keyboard scrolling bypass the smoother.
            if let Ok(mut scroller) = scroll_scroller.try_borrow_mut() {
                scroller.sync(scroll_top(&scroll_container));
            }
            scroll_notify(WakeReason::Scroll);
        },
    )?);

    Ok(listeners)
}

fn first_touch_y(event: &Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(f64::from(touch.client_y()))
}

fn scroll_top(element: &HtmlElement) -> f64 {
    f64::from(element.scroll_top())
}

fn set_scroll_top(element: &HtmlElement, position: f64) {
    let _ = js_sys::Reflect::set(
        element,
        &JsValue::from_str("scrollTop"),
        &JsValue::from_f64(position),
    );
}

fn max_scroll(element: &HtmlElement) -> f64 {
    f64::from(element.scroll_height() - element.client_height()).max(0.0)
}

/// The scroll source selected by [`ScrollMode`].
#[derive(Debug)]
pub enum DomScrollSource {
    /// Window scrolling.
    Native(NativeScrollSource),
    /// Smoothed container scrolling.
    Wrapped(WrappedScrollSource),
}

impl DomScrollSource {
    /// Builds the source for `mode`.
    pub fn new(
        mode: ScrollMode,
        window: Window,
        container: HtmlElement,
        smooth: SmoothScrollConfig,
        notify: Notify,
    ) -> Result<Self, JsValue> {
        Ok(match mode {
            ScrollMode::Window => Self::Native(NativeScrollSource::new(window)),
            ScrollMode::Wrapped => {
                Self::Wrapped(WrappedScrollSource::new(container, smooth, notify)?)
            }
        })
    }

    /// The mode this source implements.
    #[must_use]
    pub fn mode(&self) -> ScrollMode {
        match self {
            Self::Native(_) => ScrollMode::Window,
            Self::Wrapped(_) => ScrollMode::Wrapped,
        }
    }

    /// Scrolls to `y`.
    pub fn scroll_to(&self, y: f64, immediate: bool) {
        match self {
            Self::Native(source) => source.scroll_to(y),
            Self::Wrapped(source) => source.scroll_to(y, immediate),
        }
    }

    /// Re-reads layout-dependent state after a resize.
    pub fn on_resize(&self) {
        if let Self::Wrapped(source) = self {
            source.refresh_limit();
        }
    }
}

impl ScrollSource<HtmlElement> for DomScrollSource {
    fn scroll_state(&self) -> ScrollState {
        match self {
            Self::Native(source) => source.scroll_state(),
            Self::Wrapped(source) => source.scroll_state(),
        }
    }

    fn element_offset(&self, element: &HtmlElement) -> f64 {
        match self {
            Self::Native(source) => source.element_offset(element),
            Self::Wrapped(source) => source.element_offset(element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_deltas_pass_through() {
        assert_eq!(wheel_delta_px(53.0, 0, 800.0), 53.0);
    }

    #[test]
    fn line_and_page_deltas_are_scaled() {
        assert!((wheel_delta_px(3.0, 1, 800.0) - 50.0).abs() < 1e-9, "3 lines");
        assert_eq!(wheel_delta_px(1.0, 2, 800.0), 800.0);
        assert_eq!(wheel_delta_px(-0.5, 2, 600.0), -300.0);
    }
}
