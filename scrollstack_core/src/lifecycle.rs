// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount, update, and teardown of one stack instance.
//!
//! [`StackController`] wires the pieces together:
//!
//! ```text
//!   notify(reason) ──► FrameScheduler ──► FrameHost::request_frame()
//!                                               │
//!                 ┌─────────────────────────────┘
//!                 ▼
//!   on_frame() ──► ScrollSource ──► StackFrame::compute()
//!                                        │
//!                 ┌──────────────────────┘
//!                 ▼
//!   ItemArena::stage() ──► FrameChanges ──► Presenter::apply()
//!                 │
//!                 ▼
//!   CompletionDetector::update() ──► on_stack_complete()
//! ```
//!
//! All state is per instance and rebuilt on every mount. Teardown is
//! idempotent.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::backend::Presenter;
use crate::cache::ItemArena;
use crate::calculator::StackFrame;
use crate::completion::{CompletionDetector, CompletionEdge, CompletionState};
use crate::config::StackConfig;
use crate::scheduler::{FrameHost, FrameScheduler, SchedulerStats, WakeReason};
use crate::scroll::ScrollSource;
#[cfg(feature = "trace-rich")]
use crate::trace::{ItemChange, ItemField};
use crate::trace::{
    CompletionEvent, PassBeginEvent, PassSkippedEvent, PassSummary, Tracer, WakeEvent,
};

/// Why a pass did no work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The stack is not mounted.
    NotMounted,
    /// No frame was pending when the frame callback fired.
    NotScheduled,
    /// Another pass is in flight.
    Reentrant,
    /// The container has no height yet.
    AwaitingLayout,
    /// Fewer than two items; only baseline styling applies.
    Static,
}

/// What a completed pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassReport {
    /// Pass counter.
    pub pass_index: u64,
    /// Index of the item on top of the stack.
    pub top_card_index: usize,
    /// Items whose transform was written.
    pub transforms_written: usize,
    /// Items whose filter was written.
    pub filters_written: usize,
    /// Completion transition caused by this pass, if any.
    pub completion: Option<CompletionEdge>,
}

/// Result of one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass computed and presented.
    Ran(PassReport),
    /// The pass did nothing.
    Skipped(SkipReason),
}

impl PassOutcome {
    /// Returns the report if the pass ran.
    #[must_use]
    pub fn report(&self) -> Option<&PassReport> {
        match self {
            Self::Ran(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }

    /// Returns the skip reason if the pass did nothing.
    #[must_use]
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Ran(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }
}

/// Drives one stack from mount to unmount.
///
/// `H` is the rendering-layer handle, `S` the scroll source, `P` the
/// presenter, and `F` the frame host.
pub struct StackController<H, S, P, F> {
    config: StackConfig,
    arena: ItemArena<H>,
    end_marker: Option<H>,
    source: S,
    presenter: P,
    host: F,
    scheduler: FrameScheduler,
    completion: CompletionDetector,
    on_complete: Option<Box<dyn FnMut()>>,
    mounted: bool,
    awaiting_layout: bool,
    pass_index: u64,
    offsets: Vec<f64>,
}

impl<H, S, P, F> fmt::Debug for StackController<H, S, P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackController")
            .field("config", &self.config)
            .field("items", &self.arena.len())
            .field("mounted", &self.mounted)
            .field("pass_index", &self.pass_index)
            .field("completion", &self.completion.state())
            .finish_non_exhaustive()
    }
}

impl<H, S, P, F> StackController<H, S, P, F>
where
    S: ScrollSource<H>,
    P: Presenter<H>,
    F: FrameHost,
{
    /// Creates an unmounted controller.
    pub fn new(config: StackConfig, source: S, presenter: P, host: F) -> Self {
        Self {
            config,
            arena: ItemArena::new(core::iter::empty()),
            end_marker: None,
            source,
            presenter,
            host,
            scheduler: FrameScheduler::new(),
            completion: CompletionDetector::new(),
            on_complete: None,
            mounted: false,
            awaiting_layout: false,
            pass_index: 0,
            offsets: Vec::new(),
        }
    }

    /// Sets the callback fired each time the stack becomes complete.
    pub fn set_on_stack_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Removes the completion callback.
    pub fn clear_on_stack_complete(&mut self) {
        self.on_complete = None;
    }

    /// Mounts the stack over `items` (in document order) with an optional
    /// trailing spacer, applies baseline styling, and runs one synchronous
    /// pass.
    ///
    /// If the container has not been laid out yet the pass is deferred to
    /// the next frame. Mounting an already mounted stack remounts it.
    pub fn mount(&mut self, items: impl IntoIterator<Item = H>, end_marker: Option<H>) -> PassOutcome {
        self.mount_traced(items, end_marker, &mut Tracer::none())
    }

    /// [`mount`](Self::mount) with tracing.
    pub fn mount_traced(
        &mut self,
        items: impl IntoIterator<Item = H>,
        end_marker: Option<H>,
        tracer: &mut Tracer<'_>,
    ) -> PassOutcome {
        self.unmount();
        self.arena = ItemArena::new(items);
        self.end_marker = end_marker;
        self.presenter.prepare(&self.arena, &self.config);
        self.mounted = true;
        self.awaiting_layout = true;
        let outcome = self.run_pass_traced(tracer);
        self.retry_layout(outcome, tracer);
        outcome
    }

    /// Keeps a frame pending until the container has been laid out.
    ///
    /// Only a mount starts retrying; the first pass that runs, or an unmount,
    /// stops it.
    fn retry_layout(&mut self, outcome: PassOutcome, tracer: &mut Tracer<'_>) {
        match outcome {
            PassOutcome::Skipped(SkipReason::AwaitingLayout) => {
                if self.awaiting_layout {
                    self.notify_traced(WakeReason::Mount, tracer);
                }
            }
            PassOutcome::Ran(_) => self.awaiting_layout = false,
            PassOutcome::Skipped(_) => {}
        }
    }

    /// Records a wake. At most one frame is ever pending.
    pub fn notify(&mut self, reason: WakeReason) {
        self.notify_traced(reason, &mut Tracer::none());
    }

    /// [`notify`](Self::notify) with tracing.
    pub fn notify_traced(&mut self, reason: WakeReason, tracer: &mut Tracer<'_>) {
        if !self.mounted {
            return;
        }
        let event = WakeEvent {
            reason,
            coalesced: self.scheduler.is_pending() && !self.scheduler.in_pass(),
            deferred: self.scheduler.in_pass(),
        };
        self.scheduler.notify(&mut self.host, reason);
        tracer.wake(&event);
    }

    /// Frame callback. Runs a pass if one was scheduled.
    pub fn on_frame(&mut self) -> PassOutcome {
        self.on_frame_traced(&mut Tracer::none())
    }

    /// [`on_frame`](Self::on_frame) with tracing.
    pub fn on_frame_traced(&mut self, tracer: &mut Tracer<'_>) -> PassOutcome {
        if !self.scheduler.on_frame() {
            let reason = if self.mounted {
                SkipReason::NotScheduled
            } else {
                SkipReason::NotMounted
            };
            return self.skip(reason, tracer);
        }
        let outcome = self.run_pass_traced(tracer);
        self.retry_layout(outcome, tracer);
        outcome
    }

    /// Runs one pass immediately.
    pub fn run_pass(&mut self) -> PassOutcome {
        self.run_pass_traced(&mut Tracer::none())
    }

    /// [`run_pass`](Self::run_pass) with tracing.
    pub fn run_pass_traced(&mut self, tracer: &mut Tracer<'_>) -> PassOutcome {
        if !self.mounted {
            return self.skip(SkipReason::NotMounted, tracer);
        }
        if !self.scheduler.begin_pass() {
            return self.skip(SkipReason::Reentrant, tracer);
        }
        let outcome = self.pass(tracer);
        self.scheduler.end_pass(&mut self.host);
        outcome
    }

    fn pass(&mut self, tracer: &mut Tracer<'_>) -> PassOutcome {
        if self.arena.len() < 2 {
            return self.skip(SkipReason::Static, tracer);
        }
        let scroll = self.source.scroll_state();
        if !scroll.is_laid_out() {
            return self.skip(SkipReason::AwaitingLayout, tracer);
        }

        self.offsets.clear();
        let source = &self.source;
        self.offsets
            .extend(self.arena.handles().map(|h| source.element_offset(h)));
        let end_offset = self
            .end_marker
            .as_ref()
            .map(|h| self.source.element_offset(h))
            .filter(|offset| offset.is_finite());

        let Some(frame) = StackFrame::compute(&self.config, scroll, &self.offsets, end_offset)
        else {
            return self.skip(SkipReason::AwaitingLayout, tracer);
        };

        self.pass_index += 1;
        tracer.pass_begin(&PassBeginEvent {
            pass_index: self.pass_index,
            scroll_top: scroll.scroll_top,
            container_height: scroll.container_height,
        });

        for (i, item) in frame.items.iter().enumerate() {
            self.arena.stage(i, item.transform);
        }
        let changes = self.arena.take_changes();
        if !changes.is_empty() {
            self.presenter.apply(&self.arena, &changes);
        }

        #[cfg(feature = "trace-rich")]
        if tracer.is_active() && !changes.is_empty() {
            let records = changes
                .transforms
                .iter()
                .map(|&i| (i, ItemField::Transform))
                .chain(changes.filters.iter().map(|&i| (i, ItemField::Filter)));
            let item_changes: Vec<ItemChange> = records
                .filter_map(|(item_index, field)| {
                    let value = self.arena.get(item_index)?.last_written()?;
                    Some(ItemChange {
                        item_index,
                        field,
                        value,
                    })
                })
                .collect();
            tracer.item_changes(self.pass_index, &item_changes);
        }

        let edge = self.completion.update(frame.last_item_pinned());
        if let Some(edge) = edge {
            tracer.completion(&CompletionEvent {
                pass_index: self.pass_index,
                edge,
                scroll_top: scroll.scroll_top,
            });
            if edge == CompletionEdge::Completed
                && let Some(callback) = self.on_complete.as_mut()
            {
                callback();
            }
        }

        let report = PassReport {
            pass_index: self.pass_index,
            top_card_index: frame.top_card_index,
            transforms_written: changes.transforms.len(),
            filters_written: changes.filters.len(),
            completion: edge,
        };
        tracer.pass_summary(&PassSummary {
            pass_index: self.pass_index,
            scroll_top: scroll.scroll_top,
            container_height: scroll.container_height,
            item_count: self.arena.len(),
            top_card_index: frame.top_card_index,
            transforms_written: report.transforms_written,
            filters_written: report.filters_written,
            completion: self.completion.state(),
        });
        PassOutcome::Ran(report)
    }

    fn skip(&self, reason: SkipReason, tracer: &mut Tracer<'_>) -> PassOutcome {
        tracer.pass_skipped(&PassSkippedEvent {
            pass_index: self.pass_index,
            reason,
        });
        PassOutcome::Skipped(reason)
    }

    /// Tears the stack down: cancels the pending frame, releases the items,
    /// and resets completion. Safe to call any number of times.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scheduler.cancel(&mut self.host);
        self.arena.release();
        self.end_marker = None;
        self.completion.reset();
        self.offsets.clear();
        self.mounted = false;
        self.awaiting_layout = false;
    }

    /// Tears down and mounts again with a new configuration.
    pub fn remount(
        &mut self,
        config: StackConfig,
        items: impl IntoIterator<Item = H>,
        end_marker: Option<H>,
    ) -> PassOutcome {
        self.unmount();
        self.config = config;
        self.mount(items, end_marker)
    }

    /// The configuration of the current mount.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Returns `true` between [`mount`](Self::mount) and
    /// [`unmount`](Self::unmount).
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The item arena.
    #[inline]
    #[must_use]
    pub fn arena(&self) -> &ItemArena<H> {
        &self.arena
    }

    /// Current completion state.
    #[inline]
    #[must_use]
    pub fn completion_state(&self) -> CompletionState {
        self.completion.state()
    }

    /// Returns `true` while a frame request is outstanding.
    #[inline]
    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Scheduler counters.
    #[inline]
    #[must_use]
    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Number of passes that computed a frame.
    #[inline]
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.pass_index
    }

    /// The scroll source.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The scroll source, mutably.
    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The presenter.
    #[inline]
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    #[inline]
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The frame host, mutably.
    #[inline]
    pub fn host_mut(&mut self) -> &mut F {
        &mut self.host
    }
}
