// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` plumbing.
//!
//! Two frame sources live here:
//!
//! - [`RafLoop`]: a persistent loop that re-registers itself every frame
//!   until stopped. The wrapped scroll source drives its smoothing with one.
//! - [`RafHost`]: a one-shot [`FrameHost`] for the stack's frame scheduler.
//!   Each [`request_frame`](FrameHost::request_frame) registers the host's
//!   callback for exactly one frame.
//!
//! Both hand the callback the rAF [`DOMHighResTimeStamp`][mdn] in
//! milliseconds.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use scrollstack_core::scheduler::{FrameHost, FrameRequestId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// object has to be fetched on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// A self-re-registering `requestAnimationFrame` loop.
///
/// Create with [`RafLoop::new`], then call [`start`](Self::start). The loop
/// runs until [`stop`](Self::stop) is called or the `RafLoop` is dropped.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Kept apart from `callback` so the closure can reference itself while
    /// the callback is borrowed.
    closure: RefCell<Option<RafClosure>>,
    callback: RefCell<Box<dyn FnMut(f64)>>,
    frames: Cell<u64>,
    running: Cell<bool>,
    raf_id: Cell<i32>,
}

impl RafLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(f64) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frames: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Starts the loop. No-op if already running.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        if self.inner.closure.borrow().is_none() {
            let inner = Rc::downgrade(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if !inner.running.get() {
                    return;
                }
                inner.frames.set(inner.frames.get() + 1);
                inner.callback.borrow_mut()(timestamp_ms);

                if inner.running.get()
                    && let Some(ref closure) = *inner.closure.borrow()
                {
                    let id = request_animation_frame(closure.as_ref().unchecked_ref());
                    inner.raf_id.set(id);
                }
            }) as Box<dyn FnMut(f64)>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(id);
        }
    }

    /// Stops the loop and cancels the pending frame. Can be restarted.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` while the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Number of frames delivered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.frames.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frames", &self.inner.frames.get())
            .finish_non_exhaustive()
    }
}

/// One-shot `requestAnimationFrame` host for the frame scheduler.
///
/// Clones share the same callback slot. Until a callback is installed with
/// [`set_callback`](Self::set_callback), requests are accepted but never
/// fire.
#[derive(Clone, Default)]
pub struct RafHost {
    callback: Rc<RefCell<Option<RafClosure>>>,
}

impl RafHost {
    /// Creates a host with no callback installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the function invoked when a requested frame fires.
    pub fn set_callback(&self, callback: impl FnMut(f64) + 'static) {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(f64)>);
        *self.callback.borrow_mut() = Some(closure);
    }

    /// Returns `true` once a callback is installed.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.borrow().is_some()
    }
}

impl FrameHost for RafHost {
    fn request_frame(&mut self) -> FrameRequestId {
        match *self.callback.borrow() {
            Some(ref closure) => {
                FrameRequestId(request_animation_frame(closure.as_ref().unchecked_ref()))
            }
            None => FrameRequestId(0),
        }
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        if id.0 != 0 {
            cancel_animation_frame(id.0);
        }
    }
}

impl core::fmt::Debug for RafHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafHost")
            .field("has_callback", &self.has_callback())
            .finish()
    }
}
