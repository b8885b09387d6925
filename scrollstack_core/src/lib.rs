// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-linked card stacking.
//!
//! `scrollstack_core` maps a vertical scroll position onto per-card visual
//! transforms so that cards pin, shrink, rotate, and blur into a stack as the
//! user scrolls, then release together. It is `no_std` compatible (with
//! `alloc`) and knows nothing about the DOM; backends supply the scroll
//! signal, the frame callback, and the rendering writes.
//!
//! # Architecture
//!
//! ```text
//!   Backend events (scroll, resize, smooth-scroll tick)
//!       │
//!       ▼
//!   FrameScheduler::notify() ──► FrameHost::request_frame()
//!                                       │
//!                 ┌─────────────────────┘
//!                 ▼
//!   ScrollSource ──► StackFrame::compute() ──► ItemArena::stage()
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   FrameChanges ──► Presenter::apply()
//!                 │
//!                 ▼
//!   CompletionDetector ──► on_stack_complete
//! ```
//!
//! **[`config`]**: [`StackConfig`](config::StackConfig) tunables, pixel or
//! percentage [`Length`](config::Length)s, and smooth-scroll options.
//!
//! **[`scroll`]**: the [`ScrollSource`](scroll::ScrollSource) contract.
//!
//! **[`calculator`]**: pure scroll-to-transform mapping.
//!
//! **[`transform`]**: the per-card [`CardTransform`](transform::CardTransform)
//! and its quantization.
//!
//! **[`cache`]**: the item arena with last-written change detection, marking
//! dirty channels from **[`dirty`]**.
//!
//! **[`scheduler`]**: frame coalescing and the re-entrancy guard.
//!
//! **[`completion`]**: edge-triggered completion detection.
//!
//! **[`smooth`]**: momentum smoothing for wrapped scroll containers.
//!
//! **[`backend`]**: the [`Presenter`](backend::Presenter) trait.
//!
//! **[`lifecycle`]**: [`StackController`](lifecycle::StackController), which
//! owns one stack from mount to unmount.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-item
//!   change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod cache;
pub mod calculator;
pub mod completion;
pub mod config;
pub mod dirty;
pub mod lifecycle;
pub mod scheduler;
pub mod scroll;
pub mod smooth;
pub mod trace;
pub mod transform;
