// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scroll session that exercises the tracing pipeline.
//!
//! Five cards are scrolled top to bottom and back with wheel input smoothed
//! by a [`SmoothScroller`], at a simulated 60 Hz. Every pass is traced to a
//! [`PrettyPrintSink`] on stdout and a [`JsonTraceSink`], which is written
//! to `stack_trace.json` at the end.

use std::fs::File;
use std::io::BufWriter;

use scrollstack_core::backend::Presenter;
use scrollstack_core::cache::{FrameChanges, ItemArena};
use scrollstack_core::config::{SmoothScrollConfig, StackConfig};
use scrollstack_core::lifecycle::StackController;
use scrollstack_core::scheduler::{FrameHost, FrameRequestId, WakeReason};
use scrollstack_core::scroll::{ScrollSource, ScrollState};
use scrollstack_core::smooth::SmoothScroller;
use scrollstack_core::trace::{
    CompletionEvent, ItemChange, PassBeginEvent, PassSkippedEvent, PassSummary, TraceSink, Tracer,
    WakeEvent,
};

use scrollstack_debug::json::JsonTraceSink;
use scrollstack_debug::pretty::PrettyPrintSink;

const CARD_COUNT: usize = 5;
const CARD_HEIGHT: f64 = 360.0;
const VIEWPORT: f64 = 800.0;
/// Content above the first card.
const LEAD_IN: f64 = 300.0;
/// Space between the last card and the spacer.
const TAIL: f64 = 400.0;
const FRAME_DT: f64 = 1.0 / 60.0;
/// One wheel notch every this many frames.
const WHEEL_INTERVAL: u64 = 6;
const WHEEL_NOTCH: f64 = 120.0;

/// Card `i` is handle `i`; the spacer is handle `CARD_COUNT`.
struct Layout {
    offsets: Vec<f64>,
    end: f64,
    scroll_top: f64,
}

impl Layout {
    fn new(config: &StackConfig) -> Self {
        let offsets: Vec<f64> = (0..CARD_COUNT)
            .map(|i| LEAD_IN + i as f64 * (CARD_HEIGHT + config.item_distance))
            .collect();
        let last = offsets.last().copied().unwrap_or(LEAD_IN);
        Self {
            end: last + CARD_HEIGHT + TAIL,
            offsets,
            scroll_top: 0.0,
        }
    }

    fn max_scroll(&self) -> f64 {
        (self.end - VIEWPORT).max(0.0)
    }
}

impl ScrollSource<usize> for Layout {
    fn scroll_state(&self) -> ScrollState {
        ScrollState::new(self.scroll_top, VIEWPORT)
    }

    fn element_offset(&self, element: &usize) -> f64 {
        self.offsets.get(*element).copied().unwrap_or(self.end)
    }
}

/// Counts writes instead of drawing.
#[derive(Default)]
struct CountingPresenter {
    transforms: usize,
    filters: usize,
}

impl Presenter<usize> for CountingPresenter {
    fn prepare(&mut self, _arena: &ItemArena<usize>, _config: &StackConfig) {}

    fn apply(&mut self, _arena: &ItemArena<usize>, changes: &FrameChanges) {
        self.transforms += changes.transforms.len();
        self.filters += changes.filters.len();
    }
}

/// Frame requests become a flag checked once per simulated frame.
#[derive(Default)]
struct SimHost {
    next: i32,
    pending: bool,
}

impl FrameHost for SimHost {
    fn request_frame(&mut self) -> FrameRequestId {
        self.next += 1;
        self.pending = true;
        FrameRequestId(self.next)
    }

    fn cancel_frame(&mut self, _id: FrameRequestId) {
        self.pending = false;
    }
}

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_wake(&mut self, e: &WakeEvent) {
        self.a.on_wake(e);
        self.b.on_wake(e);
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.a.on_pass_begin(e);
        self.b.on_pass_begin(e);
    }

    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        self.a.on_pass_skipped(e);
        self.b.on_pass_skipped(e);
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        self.a.on_completion(e);
        self.b.on_completion(e);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.a.on_pass_summary(s);
        self.b.on_pass_summary(s);
    }

    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        self.a.on_item_changes(pass_index, changes);
        self.b.on_item_changes(pass_index, changes);
    }
}

fn main() {
    let config = StackConfig::DEFAULT
        .with_rotation_amount(0.5)
        .with_blur_amount(1.5);

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut json = JsonTraceSink::new();

    // -- stack -------------------------------------------------------------
    let layout = Layout::new(&config);
    let mut scroller = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 0.0, layout.max_scroll());
    let mut stack = StackController::new(
        config,
        layout,
        CountingPresenter::default(),
        SimHost::default(),
    );
    stack.set_on_stack_complete(|| println!("-- stack complete --"));

    {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut json,
        };
        let mut tracer = Tracer::new(&mut tee);
        stack.mount_traced(0..CARD_COUNT, Some(CARD_COUNT), &mut tracer);
    }

    // -- simulated session: wheel down to the bottom, then back up ---------
    let mut frame: u64 = 0;
    let mut direction = 1.0;
    loop {
        if frame.is_multiple_of(WHEEL_INTERVAL) {
            if direction > 0.0 && scroller.target() >= scroller.limit() {
                direction = -1.0;
            } else if direction < 0.0 && scroller.target() <= 0.0 && !scroller.is_scrolling() {
                break;
            }
            scroller.on_wheel(direction * WHEEL_NOTCH);
        }

        let mut tee = Tee {
            a: &mut pretty,
            b: &mut json,
        };
        let mut tracer = Tracer::new(&mut tee);
        if let Some(position) = scroller.advance(FRAME_DT) {
            stack.source_mut().scroll_top = position;
            stack.notify_traced(WakeReason::SmoothScroll, &mut tracer);
        }
        if std::mem::take(&mut stack.host_mut().pending) {
            stack.on_frame_traced(&mut tracer);
        }
        frame += 1;
    }

    let stats = stack.scheduler_stats();
    let presenter = stack.presenter();
    println!(
        "{frame} frames, {} passes, {} wakes ({} coalesced), {} transform and {} filter writes",
        stats.passes, stats.wakes, stats.coalesced, presenter.transforms, presenter.filters,
    );
    stack.unmount();

    // -- export JSON trace -------------------------------------------------
    let path = "stack_trace.json";
    let file = File::create(path).expect("failed to create stack_trace.json");
    let mut writer = BufWriter::new(file);
    json.write_to(&mut writer)
        .expect("failed to write JSON trace");

    println!("Wrote {path} ({} events)", json.len());
}
