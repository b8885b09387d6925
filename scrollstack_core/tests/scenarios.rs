// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end stacking scenarios driven through [`StackController`] with a
//! simulated scroll source, frame host, and presenter.

use std::cell::Cell;
use std::rc::Rc;

use scrollstack_core::backend::Presenter;
use scrollstack_core::cache::{FrameChanges, ItemArena};
use scrollstack_core::calculator::{ItemBounds, StackFrame, StackGeometry};
use scrollstack_core::completion::{CompletionEdge, CompletionState};
use scrollstack_core::config::StackConfig;
use scrollstack_core::lifecycle::{SkipReason, StackController};
use scrollstack_core::scheduler::{FrameHost, FrameRequestId, WakeReason};
use scrollstack_core::scroll::{ScrollSource, ScrollState};
use scrollstack_core::transform::{CardTransform, Granularity};

const HEIGHT: f64 = 800.0;
/// Three 320px cards separated by 100px, starting 400px into the content.
const OFFSETS: [f64; 3] = [400.0, 820.0, 1240.0];
/// Trailing spacer, 400px below the last card's bottom edge.
const END: f64 = 1960.0;
/// Handle of the spacer in [`SimSource`].
const SPACER: usize = 3;

struct SimSource {
    scroll: ScrollState,
}

impl ScrollSource<usize> for SimSource {
    fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    fn element_offset(&self, element: &usize) -> f64 {
        match *element {
            SPACER => END,
            i => OFFSETS.get(i).copied().unwrap_or(f64::NAN),
        }
    }
}

/// Records every write as `(item, transform)`, one batch per `apply`.
#[derive(Default)]
struct RecordingPresenter {
    batches: Vec<Vec<(usize, CardTransform)>>,
}

impl RecordingPresenter {
    fn last_batch(&self) -> &[(usize, CardTransform)] {
        self.batches.last().map(Vec::as_slice).unwrap_or_default()
    }
}

impl Presenter<usize> for RecordingPresenter {
    fn prepare(&mut self, _arena: &ItemArena<usize>, _config: &StackConfig) {}

    fn apply(&mut self, arena: &ItemArena<usize>, changes: &FrameChanges) {
        let mut batch: Vec<(usize, CardTransform)> = changes
            .transforms
            .iter()
            .chain(&changes.filters)
            .filter_map(|&i| Some((i, arena.get(i)?.last_written()?)))
            .collect();
        batch.sort_by_key(|(i, _)| *i);
        batch.dedup_by_key(|(i, _)| *i);
        self.batches.push(batch);
    }
}

#[derive(Default)]
struct SimHost {
    next: i32,
    requested: usize,
}

impl FrameHost for SimHost {
    fn request_frame(&mut self) -> FrameRequestId {
        self.next += 1;
        self.requested += 1;
        FrameRequestId(self.next)
    }

    fn cancel_frame(&mut self, _id: FrameRequestId) {}
}

type Stack = StackController<usize, SimSource, RecordingPresenter, SimHost>;

fn mounted(config: StackConfig, scroll_top: f64) -> (Stack, Rc<Cell<u32>>) {
    let fired = Rc::new(Cell::new(0));
    let mut stack = StackController::new(
        config,
        SimSource {
            scroll: ScrollState::new(scroll_top, HEIGHT),
        },
        RecordingPresenter::default(),
        SimHost::default(),
    );
    let counter = Rc::clone(&fired);
    stack.set_on_stack_complete(move || counter.set(counter.get() + 1));
    stack.mount(0..OFFSETS.len(), Some(SPACER));
    (stack, fired)
}

/// Moves the simulated scroll position and runs the resulting frame.
fn scroll_to(stack: &mut Stack, scroll_top: f64) {
    stack.source_mut().scroll.scroll_top = scroll_top;
    stack.notify(WakeReason::Scroll);
    let _ = stack.on_frame();
}

fn geometry(config: &StackConfig) -> StackGeometry {
    StackGeometry::resolve(config, HEIGHT, OFFSETS[2], Some(END))
}

fn bounds(config: &StackConfig, index: usize) -> ItemBounds {
    ItemBounds::new(config, &geometry(config), OFFSETS[index], index)
}

fn written(stack: &Stack, index: usize) -> CardTransform {
    stack
        .arena()
        .get(index)
        .and_then(|r| r.last_written())
        .expect("item was written at mount")
}

#[test]
fn scenario_a_identity_before_first_trigger() {
    let config = StackConfig::DEFAULT;
    let start = bounds(&config, 0).trigger_start;
    assert!(start > 0.0, "fixture must leave room before the first trigger");

    let (mut stack, fired) = mounted(config, 0.0);
    let mut s = 0.0;
    while s <= start - 1.0 {
        scroll_to(&mut stack, s);
        for i in 0..OFFSETS.len() {
            assert_eq!(written(&stack, i), CardTransform::IDENTITY, "item {i} at {s}");
        }
        s += 10.0;
    }
    scroll_to(&mut stack, start - 1.0);
    for i in 0..OFFSETS.len() {
        assert_eq!(written(&stack, i), CardTransform::IDENTITY, "item {i} at edge");
    }
    assert_eq!(fired.get(), 0);
}

#[test]
fn scenario_b_first_item_reaches_base_scale_at_trigger_end() {
    let config = StackConfig::DEFAULT;
    let end = bounds(&config, 0).trigger_end;
    let (mut stack, _) = mounted(config, 0.0);
    scroll_to(&mut stack, end);

    let scale = written(&stack, 0).scale;
    assert!(
        (scale - config.base_scale).abs() < 1e-12,
        "item 0 scale was {scale}"
    );
    assert_eq!(written(&stack, 1), CardTransform::IDENTITY);
    assert_eq!(written(&stack, 2), CardTransform::IDENTITY);
}

#[test]
fn scenario_c_completion_fires_once_through_the_pinned_region() {
    let config = StackConfig::DEFAULT;
    let last = bounds(&config, 2);
    let (mut stack, fired) = mounted(config, 0.0);

    let mut s = 0.0;
    let mut completed_seen = false;
    while s <= last.pin_end {
        scroll_to(&mut stack, s);
        completed_seen |= stack.completion_state() == CompletionState::Completed;
        s += 5.0;
    }
    scroll_to(&mut stack, last.pin_end);
    assert_eq!(stack.completion_state(), CompletionState::Completed);
    assert!(completed_seen, "entered the completed state while scrolling");
    assert_eq!(fired.get(), 1, "one dwell, one callback");

    // Past the release point the stack scrolls away and stays quiet.
    for extra in [1.0, 50.0, 400.0] {
        scroll_to(&mut stack, last.pin_end + extra);
    }
    assert_eq!(fired.get(), 1);
}

#[test]
fn scenario_d_scrolling_back_above_pin_start_resets() {
    let config = StackConfig::DEFAULT;
    let last = bounds(&config, 2);
    let dwell = (last.pin_start + last.pin_end) / 2.0;
    let (mut stack, fired) = mounted(config, dwell);
    assert_eq!(stack.completion_state(), CompletionState::Completed);
    assert_eq!(fired.get(), 1);

    stack.source_mut().scroll.scroll_top = last.pin_start - 1.0;
    stack.notify(WakeReason::Scroll);
    let outcome = stack.on_frame();
    assert_eq!(
        outcome.report().and_then(|r| r.completion),
        Some(CompletionEdge::Reset)
    );
    assert_eq!(stack.completion_state(), CompletionState::Idle);
    assert_eq!(fired.get(), 1, "leaving does not fire");

    scroll_to(&mut stack, dwell);
    assert_eq!(fired.get(), 2, "re-entering fires again");
}

#[test]
fn scenario_e_resize_mid_scroll_runs_one_pass_with_new_height() {
    let config = StackConfig::DEFAULT;
    let (mut stack, _) = mounted(config, 700.0);
    let passes_before = stack.pass_count();
    let requests_before = stack.host_mut().requested;

    // A scroll event and a resize land in the same frame.
    stack.notify(WakeReason::Scroll);
    stack.source_mut().scroll.container_height = 600.0;
    stack.notify(WakeReason::Resize);
    assert_eq!(stack.scheduler_stats().coalesced, 1);
    assert_eq!(stack.host_mut().requested, requests_before + 2);

    assert!(stack.on_frame().report().is_some());
    assert_eq!(
        stack.on_frame().skip_reason(),
        Some(SkipReason::NotScheduled),
        "the coalesced wake must not run twice"
    );
    assert_eq!(stack.pass_count(), passes_before + 1);

    let expected = StackFrame::compute(
        &config,
        ScrollState::new(700.0, 600.0),
        &OFFSETS,
        Some(END),
    )
    .expect("laid out");
    for (i, item) in expected.items.iter().enumerate() {
        assert_eq!(
            written(&stack, i),
            item.transform.quantize(&Granularity::PERCEPTUAL),
            "item {i} reflects the resized container"
        );
    }
}

#[test]
fn dwelling_many_frames_writes_nothing_new() {
    let config = StackConfig::DEFAULT;
    let last = bounds(&config, 2);
    let (mut stack, fired) = mounted(config, last.pin_start + 10.0);
    let batches = stack.presenter().batches.len();
    for _ in 0..100 {
        stack.notify(WakeReason::SmoothScroll);
        let _ = stack.on_frame();
    }
    assert_eq!(stack.presenter().batches.len(), batches);
    assert_eq!(fired.get(), 1);
}

#[test]
fn small_scroll_jitter_is_not_written() {
    let (mut stack, _) = mounted(StackConfig::DEFAULT, 500.0);
    let batches = stack.presenter().batches.len();
    // Pinned items move 1:1 with scroll; 0.2px stays within one step.
    scroll_to(&mut stack, 500.2);
    assert_eq!(stack.presenter().batches.len(), batches);
    scroll_to(&mut stack, 501.0);
    assert_eq!(stack.presenter().batches.len(), batches + 1);
    assert!(!stack.presenter().last_batch().is_empty());
}

#[test]
fn blur_is_written_by_depth() {
    let config = StackConfig::DEFAULT.with_blur_amount(2.0);
    let (stack, _) = mounted(config, 1_300.0);
    assert_eq!(written(&stack, 0).blur, 4.0);
    assert_eq!(written(&stack, 1).blur, 2.0);
    assert_eq!(written(&stack, 2).blur, 0.0);
}

#[test]
fn released_cards_keep_their_final_offset() {
    let config = StackConfig::DEFAULT;
    let last = bounds(&config, 2);
    let (mut stack, _) = mounted(config, last.pin_end);
    let at_release: Vec<CardTransform> = (0..3).map(|i| written(&stack, i)).collect();
    scroll_to(&mut stack, last.pin_end + 250.0);
    for (i, before) in at_release.iter().enumerate() {
        assert_eq!(written(&stack, i), *before, "item {i} froze at release");
    }
}

#[test]
fn missing_spacer_uses_container_fallback() {
    let config = StackConfig::DEFAULT;
    let mut stack = StackController::new(
        config,
        SimSource {
            scroll: ScrollState::new(0.0, HEIGHT),
        },
        RecordingPresenter::default(),
        SimHost::default(),
    );
    stack.mount(0..OFFSETS.len(), None);
    let fallback_pin_end = OFFSETS[2] + HEIGHT / 2.0;
    scroll_to(&mut stack, fallback_pin_end);
    assert_eq!(stack.completion_state(), CompletionState::Completed);
    scroll_to(&mut stack, fallback_pin_end + 1.0);
    assert_eq!(stack.completion_state(), CompletionState::Idle);
}

#[test]
fn properties_hold_across_a_sweep() {
    let config = StackConfig::DEFAULT
        .with_blur_amount(1.0)
        .with_rotation_amount(2.0);
    let mut s = -200.0;
    while s < 2_500.0 {
        let state = ScrollState::new(s, HEIGHT);
        let frame = StackFrame::compute(&config, state, &OFFSETS, Some(END)).expect("laid out");
        let again = StackFrame::compute(&config, state, &OFFSETS, Some(END)).expect("laid out");
        assert_eq!(frame, again, "idempotent at {s}");

        for (i, item) in frame.items.iter().enumerate() {
            if s < item.bounds.trigger_start {
                assert_eq!(item.transform, CardTransform::IDENTITY, "item {i} at {s}");
            }
            if s >= item.bounds.trigger_end {
                assert_eq!(item.transform.scale, config.target_scale(i), "item {i} at {s}");
            }
        }
        let blur_by_depth: Vec<f64> = frame.items.iter().rev().map(|i| i.transform.blur).collect();
        assert!(
            blur_by_depth.windows(2).all(|w| w[0] <= w[1]),
            "blur grows with depth at {s}"
        );
        s += 13.0;
    }
}
