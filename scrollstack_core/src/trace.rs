// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the update pass.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! lifecycle calls at each stage of a pass. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`ItemChange`] events and the
//!   corresponding `TraceSink` method.

use crate::completion::{CompletionEdge, CompletionState};
use crate::lifecycle::SkipReason;
use crate::scheduler::WakeReason;
#[cfg(feature = "trace-rich")]
use crate::transform::CardTransform;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the stack is woken.
#[derive(Clone, Copy, Debug)]
pub struct WakeEvent {
    /// Why the stack was woken.
    pub reason: WakeReason,
    /// Whether the wake replaced an outstanding frame request.
    pub coalesced: bool,
    /// Whether the wake arrived during a pass and was deferred.
    pub deferred: bool,
}

/// Emitted when a pass starts computing.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Scroll offset sampled for this pass.
    pub scroll_top: f64,
    /// Container height sampled for this pass.
    pub container_height: f64,
}

/// Emitted when a pass is requested but does no work.
#[derive(Clone, Copy, Debug)]
pub struct PassSkippedEvent {
    /// Pass counter at the time of the skip.
    pub pass_index: u64,
    /// Why nothing was computed.
    pub reason: SkipReason,
}

/// Emitted when the completion state changes.
#[derive(Clone, Copy, Debug)]
pub struct CompletionEvent {
    /// Pass that caused the transition.
    pub pass_index: u64,
    /// The transition.
    pub edge: CompletionEdge,
    /// Scroll offset at the transition.
    pub scroll_top: f64,
}

/// Per-pass summary.
#[derive(Clone, Copy, Debug)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Scroll offset sampled for this pass.
    pub scroll_top: f64,
    /// Container height sampled for this pass.
    pub container_height: f64,
    /// Number of items in the stack.
    pub item_count: usize,
    /// Index of the item on top of the stack.
    pub top_card_index: usize,
    /// Items whose transform was written.
    pub transforms_written: usize,
    /// Items whose filter was written.
    pub filters_written: usize,
    /// Completion state after the pass.
    pub completion: CompletionState,
}

/// Which output of an item changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemField {
    /// Translation, scale, or rotation.
    Transform,
    /// Blur.
    Filter,
}

/// A per-pass item write record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct ItemChange {
    /// Index of the item that was written.
    pub item_index: usize,
    /// Which output was written.
    pub field: ItemField,
    /// The quantized value that was written.
    pub value: CardTransform,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the update pass.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the stack is woken.
    fn on_wake(&mut self, e: &WakeEvent) {
        _ = e;
    }

    /// Called when a pass starts computing.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when a pass does no work.
    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        _ = e;
    }

    /// Called when the completion state changes.
    fn on_completion(&mut self, e: &CompletionEvent) {
        _ = e;
    }

    /// Called with a per-pass summary.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called with per-pass item writes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        _ = (pass_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`WakeEvent`].
    #[inline]
    pub fn wake(&mut self, e: &WakeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_wake(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSkippedEvent`].
    #[inline]
    pub fn pass_skipped(&mut self, e: &PassSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CompletionEvent`].
    #[inline]
    pub fn completion(&mut self, e: &CompletionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_completion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits item writes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        if let Some(s) = &mut self.sink {
            s.on_item_changes(pass_index, changes);
        }
    }

    /// Returns `true` if events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }
}
