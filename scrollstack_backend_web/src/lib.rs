// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scrollstack.
//!
//! This crate binds the core engine to browser APIs:
//!
//! - [`RafLoop`] and [`RafHost`]: `requestAnimationFrame` frame sources
//! - [`DomScrollSource`]: window scrolling or a smoothed scroll container
//! - [`DomPresenter`]: inline `transform` and `filter` writes
//! - [`ScrollStack`]: discovery, event wiring, and mount lifecycle
//! - [`ConsoleSink`]: trace output to the browser console
//!
//! JavaScript callers use the exported `ScrollStack` class, which takes a
//! container element and an options object (see [`options`]).

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

mod console;
mod js;
mod listener;
pub mod options;
mod presenter;
mod raf;
mod source;
mod stack;

pub use console::ConsoleSink;
pub use js::JsScrollStack;
pub use presenter::DomPresenter;
pub use raf::{RafHost, RafLoop};
pub use scrollstack_core::backend::Presenter;
pub use source::{
    DomScrollSource, NativeScrollSource, Notify, WrappedScrollSource, wheel_delta_px,
};
pub use stack::{CARD_SELECTOR, END_SELECTOR, ScrollStack};

/// Returns `performance.now()` in milliseconds.
#[must_use]
pub fn now_ms() -> f64 {
    raf::performance_now()
}
