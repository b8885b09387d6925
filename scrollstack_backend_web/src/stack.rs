// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A mounted stack bound to the DOM.
//!
//! [`ScrollStack`] discovers cards, builds the scroll source selected by the
//! configuration, and wires window events and frame callbacks into a
//! [`StackController`]. Event handlers hold only weak references, so dropping
//! the `ScrollStack` tears everything down.
//!
//! Event handlers that find the controller busy (a completion callback that
//! calls back into the stack, for instance) record a deferred action that is
//! replayed as soon as the running pass returns.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use scrollstack_core::completion::CompletionState;
use scrollstack_core::config::{ScrollMode, SmoothScrollConfig, StackConfig};
use scrollstack_core::lifecycle::{PassOutcome, SkipReason, StackController};
use scrollstack_core::scheduler::WakeReason;
use scrollstack_core::trace::{TraceSink, Tracer};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Element, Event, HtmlElement, NodeList, Window};

use crate::listener::Listener;
use crate::presenter::DomPresenter;
use crate::raf::RafHost;
use crate::source::{DomScrollSource, Notify};

/// Class of stackable cards.
pub const CARD_SELECTOR: &str = ".scroll-stack-card";
/// Class of the trailing spacer that marks where pinned cards release.
pub const END_SELECTOR: &str = ".scroll-stack-end";

type WebController = StackController<HtmlElement, DomScrollSource, DomPresenter, RafHost>;
type CompletionCallback = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

#[derive(Clone, Copy, Debug, Default)]
struct Deferred {
    wake: Option<WakeReason>,
    unmount: bool,
    remount: Option<StackConfig>,
}

/// What a flushed [`Deferred`] does, after any pending config is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Replay {
    Nothing,
    Unmount,
    Remount,
    Wake(WakeReason),
}

impl Deferred {
    /// An unmount wins over a remount, which subsumes a wake.
    fn replay(&self) -> Replay {
        if self.unmount {
            Replay::Unmount
        } else if self.remount.is_some() {
            Replay::Remount
        } else if let Some(reason) = self.wake {
            Replay::Wake(reason)
        } else {
            Replay::Nothing
        }
    }
}

struct Shared {
    window: Window,
    container: HtmlElement,
    config: Cell<StackConfig>,
    smooth: Cell<SmoothScrollConfig>,
    host: RafHost,
    controller: RefCell<Option<WebController>>,
    listeners: RefCell<Vec<Listener>>,
    deferred: Cell<Deferred>,
    on_complete: CompletionCallback,
    sink: RefCell<Option<Box<dyn TraceSink>>>,
}

/// A scroll stack over the cards of one container.
pub struct ScrollStack {
    shared: Rc<Shared>,
}

impl core::fmt::Debug for ScrollStack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollStack")
            .field("config", &self.shared.config.get())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl ScrollStack {
    /// Creates an unmounted stack for `container`.
    ///
    /// In [`ScrollMode::Wrapped`] the container is the scroll viewport; in
    /// [`ScrollMode::Window`] it only anchors the stack and cards are looked
    /// up in the whole document.
    pub fn new(container: HtmlElement, config: StackConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let shared = Rc::new(Shared {
            window,
            container,
            config: Cell::new(config),
            smooth: Cell::new(SmoothScrollConfig::DEFAULT),
            host: RafHost::new(),
            controller: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            deferred: Cell::new(Deferred::default()),
            on_complete: Rc::new(RefCell::new(None)),
            sink: RefCell::new(None),
        });
        let weak = Rc::downgrade(&shared);
        shared.host.set_callback(move |_timestamp_ms| {
            if let Some(shared) = weak.upgrade() {
                on_frame(&shared);
            }
        });
        Ok(Self { shared })
    }

    /// Sets the smoothing options used by the next mount in wrapped mode.
    pub fn set_smooth_scroll_config(&self, smooth: SmoothScrollConfig) {
        self.shared.smooth.set(smooth);
    }

    /// Sets the callback fired each time the stack completes.
    pub fn set_on_stack_complete(&self, callback: impl FnMut() + 'static) {
        *self.shared.on_complete.borrow_mut() = Some(Box::new(callback));
    }

    /// Routes trace events to `sink`.
    ///
    /// Ignored when called from inside a pass.
    pub fn set_trace_sink(&self, sink: Box<dyn TraceSink>) {
        if let Ok(mut slot) = self.shared.sink.try_borrow_mut() {
            *slot = Some(sink);
        }
    }

    /// Discovers the cards, applies baseline styling, and runs the first pass.
    ///
    /// Mounting a mounted stack remounts it.
    pub fn mount(&self) -> Result<PassOutcome, JsValue> {
        mount(&self.shared)
    }

    /// Tears the stack down. Idempotent.
    pub fn unmount(&self) {
        request_unmount(&self.shared);
    }

    /// Replaces the configuration, remounting if mounted.
    pub fn reconfigure(&self, config: StackConfig) -> Result<(), JsValue> {
        if self.shared.controller.try_borrow().is_err() {
            let mut deferred = self.shared.deferred.get();
            deferred.remount = Some(config);
            self.shared.deferred.set(deferred);
            return Ok(());
        }
        self.shared.config.set(config);
        if self.is_mounted() {
            mount(&self.shared)?;
        }
        Ok(())
    }

    /// Scrolls the stack's scroll source to `y`.
    pub fn scroll_to(&self, y: f64, immediate: bool) {
        if let Ok(controller) = self.shared.controller.try_borrow()
            && let Some(controller) = controller.as_ref()
        {
            controller.source().scroll_to(y, immediate);
        }
    }

    /// Returns `true` while mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        match self.shared.controller.try_borrow() {
            Ok(c) => c.as_ref().is_some_and(WebController::is_mounted),
            // Borrowed means a pass is running.
            Err(_) => true,
        }
    }

    /// Current completion state, or `Idle` when unmounted.
    #[must_use]
    pub fn completion_state(&self) -> CompletionState {
        self.shared
            .controller
            .try_borrow()
            .ok()
            .and_then(|c| c.as_ref().map(WebController::completion_state))
            .unwrap_or_default()
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> StackConfig {
        self.shared.config.get()
    }
}

impl Drop for ScrollStack {
    fn drop(&mut self) {
        unmount_now(&self.shared);
    }
}

fn mount(shared: &Rc<Shared>) -> Result<PassOutcome, JsValue> {
    if shared.controller.try_borrow_mut().is_err() {
        let mut deferred = shared.deferred.get();
        deferred.remount = Some(shared.config.get());
        shared.deferred.set(deferred);
        return Ok(PassOutcome::Skipped(SkipReason::Reentrant));
    }
    unmount_now(shared);
    let config = shared.config.get();

    let root: Element = match config.scroll_mode {
        ScrollMode::Window => shared
            .window
            .document()
            .and_then(|doc| doc.document_element())
            .ok_or_else(|| JsValue::from_str("no document element"))?,
        ScrollMode::Wrapped => Element::from(shared.container.clone()),
    };
    let cards = html_elements(&root.query_selector_all(CARD_SELECTOR)?);
    let end_marker = root
        .query_selector(END_SELECTOR)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());

    let weak = Rc::downgrade(shared);
    let notify: Notify = Rc::new(move |reason: WakeReason| {
        if let Some(shared) = weak.upgrade() {
            wake(&shared, reason);
        }
    });
    let source = DomScrollSource::new(
        config.scroll_mode,
        shared.window.clone(),
        shared.container.clone(),
        shared.smooth.get(),
        Rc::clone(&notify),
    )?;

    let mut controller = StackController::new(config, source, DomPresenter::new(), shared.host.clone());
    let callback = Rc::clone(&shared.on_complete);
    controller.set_on_stack_complete(move || {
        // Taken out for the call so the callback may replace itself.
        let taken = callback.borrow_mut().take();
        if let Some(mut f) = taken {
            f();
            let mut slot = callback.borrow_mut();
            if slot.is_none() {
                *slot = Some(f);
            }
        }
    });

    let outcome = {
        let mut slot = shared.controller.borrow_mut();
        let controller = slot.insert(controller);
        with_tracer(shared, |tracer| {
            controller.mount_traced(cards, end_marker, tracer)
        })
    };

    let mut listeners = Vec::with_capacity(2);
    if config.uses_window_scroll() {
        let scroll_notify = Rc::clone(&notify);
        listeners.push(Listener::new(&shared.window, "scroll", true, move |_: Event| {
            scroll_notify(WakeReason::Scroll);
        })?);
    }
    let resize_notify = Rc::clone(&notify);
    listeners.push(Listener::new(&shared.window, "resize", true, move |_: Event| {
        resize_notify(WakeReason::Resize);
    })?);
    *shared.listeners.borrow_mut() = listeners;

    flush_deferred(shared);
    Ok(outcome)
}

fn html_elements(list: &NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn with_tracer<R>(shared: &Shared, f: impl FnOnce(&mut Tracer<'_>) -> R) -> R {
    match shared.sink.try_borrow_mut() {
        Ok(mut sink) => match sink.as_deref_mut() {
            Some(sink) => f(&mut Tracer::new(sink)),
            None => f(&mut Tracer::none()),
        },
        Err(_) => f(&mut Tracer::none()),
    }
}

fn wake(shared: &Rc<Shared>, reason: WakeReason) {
    let Ok(mut slot) = shared.controller.try_borrow_mut() else {
        let mut deferred = shared.deferred.get();
        deferred.wake = Some(reason);
        shared.deferred.set(deferred);
        return;
    };
    if let Some(controller) = slot.as_mut() {
        if reason == WakeReason::Resize {
            controller.source().on_resize();
        }
        with_tracer(shared, |tracer| controller.notify_traced(reason, tracer));
    }
}

fn on_frame(shared: &Rc<Shared>) {
    if let Ok(mut slot) = shared.controller.try_borrow_mut()
        && let Some(controller) = slot.as_mut()
    {
        let _ = with_tracer(shared, |tracer| controller.on_frame_traced(tracer));
    }
    flush_deferred(shared);
}

fn request_unmount(shared: &Rc<Shared>) {
    if shared.controller.try_borrow_mut().is_err() {
        let mut deferred = shared.deferred.get();
        deferred.unmount = true;
        shared.deferred.set(deferred);
        return;
    }
    unmount_now(shared);
}

fn unmount_now(shared: &Shared) {
    shared.listeners.borrow_mut().clear();
    let controller = shared
        .controller
        .try_borrow_mut()
        .ok()
        .and_then(|mut slot| slot.take());
    if let Some(mut controller) = controller {
        controller.unmount();
    }
}

fn flush_deferred(shared: &Rc<Shared>) {
    let deferred = shared.deferred.take();
    if let Some(config) = deferred.remount {
        shared.config.set(config);
    }
    match deferred.replay() {
        Replay::Nothing => {}
        Replay::Unmount => unmount_now(shared),
        Replay::Remount => {
            if let Err(err) = mount(shared) {
                web_sys::console::warn_2(
                    &JsValue::from_str("[scrollstack] deferred remount failed:"),
                    &err,
                );
            }
        }
        Replay::Wake(reason) => wake(shared, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmount_wins_over_remount() {
        let deferred = Deferred {
            wake: Some(WakeReason::Scroll),
            unmount: true,
            remount: Some(StackConfig::DEFAULT),
        };
        assert_eq!(deferred.replay(), Replay::Unmount);
    }

    #[test]
    fn remount_subsumes_wake() {
        let deferred = Deferred {
            wake: Some(WakeReason::Resize),
            remount: Some(StackConfig::DEFAULT),
            ..Deferred::default()
        };
        assert_eq!(
            deferred.replay(),
            Replay::Remount,
            "a remount runs its own pass, so the wake is dropped"
        );
    }

    #[test]
    fn lone_wake_is_replayed() {
        let deferred = Deferred {
            wake: Some(WakeReason::SmoothScroll),
            ..Deferred::default()
        };
        assert_eq!(deferred.replay(), Replay::Wake(WakeReason::SmoothScroll));
        assert_eq!(Deferred::default().replay(), Replay::Nothing);
    }
}
