// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-to-transform mapping.
//!
//! Everything in this module is a pure function of the scroll state, the item
//! offsets, the item index, and the [`StackConfig`]. Calling any of them twice
//! with the same inputs yields the same output.
//!
//! # Boundaries
//!
//! For item `i` at document offset `top`:
//!
//! ```text
//!   trigger_start = top - stack_position_px - item_stack_distance * i
//!   trigger_end   = top - scale_end_position_px
//!   pin_start     = trigger_start
//!   pin_end       = end_offset - container_height / 2      (shared by all items)
//! ```
//!
//! Scale progress runs linearly from 0 at `trigger_start` to 1 at
//! `trigger_end`. Between `pin_start` and `pin_end` the item translates 1:1
//! with scroll so it appears fixed at its stacked offset; past `pin_end` the
//! translation freezes at its `pin_end` value and the item scrolls away with
//! the page.
//!
//! `end_offset` is the offset of the trailing spacer element. Without one it
//! falls back to `last_item_offset + container_height`.

use alloc::vec::Vec;

use crate::config::StackConfig;
use crate::scroll::ScrollState;
use crate::transform::CardTransform;

/// Per-pass resolved pixel boundaries shared by all items.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackGeometry {
    /// Container height the geometry was resolved against.
    pub container_height: f64,
    /// [`StackConfig::stack_position`] in pixels.
    pub stack_position_px: f64,
    /// [`StackConfig::scale_end_position`] in pixels.
    pub scale_end_position_px: f64,
    /// Scroll offset at which every pinned item is released.
    pub pin_end: f64,
}

impl StackGeometry {
    /// Resolves the geometry for one pass.
    ///
    /// `end_offset` is the spacer offset, if a spacer exists.
    #[must_use]
    pub fn resolve(
        config: &StackConfig,
        container_height: f64,
        last_item_offset: f64,
        end_offset: Option<f64>,
    ) -> Self {
        let end = end_offset.unwrap_or(last_item_offset + container_height);
        Self {
            container_height,
            stack_position_px: config.stack_position.resolve(container_height),
            scale_end_position_px: config.scale_end_position.resolve(container_height),
            pin_end: end - container_height / 2.0,
        }
    }
}

/// Scroll boundaries of one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemBounds {
    /// Scroll offset at which scale progress starts.
    pub trigger_start: f64,
    /// Scroll offset at which scale progress reaches 1.
    pub trigger_end: f64,
    /// Scroll offset at which the item becomes pinned.
    pub pin_start: f64,
    /// Scroll offset at which the item is released.
    pub pin_end: f64,
}

impl ItemBounds {
    /// Computes the boundaries of the item at `index` whose top is at `card_top`.
    #[must_use]
    pub fn new(config: &StackConfig, geometry: &StackGeometry, card_top: f64, index: usize) -> Self {
        let trigger_start = card_top
            - geometry.stack_position_px
            - config.item_stack_distance * index as f64;
        Self {
            trigger_start,
            trigger_end: card_top - geometry.scale_end_position_px,
            pin_start: trigger_start,
            pin_end: geometry.pin_end,
        }
    }

    /// Returns `true` if `scroll_top` lies in the closed pinned interval.
    #[inline]
    #[must_use]
    pub fn is_pinned(&self, scroll_top: f64) -> bool {
        scroll_top >= self.pin_start && scroll_top <= self.pin_end
    }
}

/// Calculator output for one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemFrame {
    /// Transform to present.
    pub transform: CardTransform,
    /// Whether the item is currently pinned.
    pub pinned: bool,
    /// Scale progress in `[0, 1]`.
    pub progress: f64,
    /// Boundaries the frame was computed from.
    pub bounds: ItemBounds,
}

impl ItemFrame {
    fn resting(bounds: ItemBounds) -> Self {
        Self {
            transform: CardTransform::IDENTITY,
            pinned: false,
            progress: 0.0,
            bounds,
        }
    }
}

/// Linear progress of `scroll_top` from `start` to `end`, clamped to `[0, 1]`.
///
/// A degenerate or inverted range behaves as a step at `start`.
#[inline]
#[must_use]
pub fn scale_progress(scroll_top: f64, start: f64, end: f64) -> f64 {
    if scroll_top < start {
        0.0
    } else if scroll_top >= end {
        1.0
    } else {
        ((scroll_top - start) / (end - start)).clamp(0.0, 1.0)
    }
}

/// Index of the item currently on top of the visual stack: the highest index
/// whose trigger start has been reached, or 0 if none has.
#[must_use]
pub fn top_card_index(
    config: &StackConfig,
    geometry: &StackGeometry,
    scroll_top: f64,
    offsets: &[f64],
) -> usize {
    let mut top = 0;
    for (j, &card_top) in offsets.iter().enumerate() {
        if ItemBounds::new(config, geometry, card_top, j).trigger_start <= scroll_top {
            top = j;
        }
    }
    top
}

/// Computes the frame of the item at `index`.
///
/// `top_card_index` must come from [`top_card_index`] for the same inputs.
#[must_use]
pub fn compute_item(
    config: &StackConfig,
    geometry: &StackGeometry,
    scroll_top: f64,
    card_top: f64,
    index: usize,
    top_card_index: usize,
) -> ItemFrame {
    let bounds = ItemBounds::new(config, geometry, card_top, index);
    if !card_top.is_finite() {
        return ItemFrame::resting(bounds);
    }

    let progress = scale_progress(scroll_top, bounds.trigger_start, bounds.trigger_end);
    let target_scale = config.target_scale(index);
    let scale = if progress >= 1.0 {
        target_scale
    } else if progress <= 0.0 {
        1.0
    } else {
        1.0 - progress * (1.0 - target_scale)
    };

    let rotation = if config.rotation_amount != 0.0 {
        index as f64 * config.rotation_amount * progress
    } else {
        0.0
    };

    let blur = if config.blur_amount != 0.0 && index < top_card_index {
        ((top_card_index - index) as f64 * config.blur_amount).max(0.0)
    } else {
        0.0
    };

    let stacked_offset =
        geometry.stack_position_px + config.item_stack_distance * index as f64 - card_top;
    let pinned = bounds.is_pinned(scroll_top);
    let translate_y = if pinned {
        scroll_top + stacked_offset
    } else if scroll_top > bounds.pin_end && scroll_top >= bounds.pin_start {
        bounds.pin_end + stacked_offset
    } else {
        0.0
    };

    ItemFrame {
        transform: CardTransform {
            translate_y,
            scale,
            rotation,
            blur,
        },
        pinned,
        progress,
        bounds,
    }
}

/// All item frames for one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct StackFrame {
    /// Scroll state the frame was computed from.
    pub scroll: ScrollState,
    /// Resolved boundaries.
    pub geometry: StackGeometry,
    /// Index of the item on top of the stack.
    pub top_card_index: usize,
    /// Per-item frames in index order.
    pub items: Vec<ItemFrame>,
}

impl StackFrame {
    /// Computes every item frame.
    ///
    /// Returns `None` when there is nothing to compute: no items, or a
    /// viewport that has not been laid out yet.
    #[must_use]
    pub fn compute(
        config: &StackConfig,
        scroll: ScrollState,
        offsets: &[f64],
        end_offset: Option<f64>,
    ) -> Option<Self> {
        if !scroll.is_laid_out() {
            return None;
        }
        let &last_offset = offsets.last()?;
        let geometry =
            StackGeometry::resolve(config, scroll.container_height, last_offset, end_offset);
        let top = top_card_index(config, &geometry, scroll.scroll_top, offsets);
        let items = offsets
            .iter()
            .enumerate()
            .map(|(i, &card_top)| {
                compute_item(config, &geometry, scroll.scroll_top, card_top, i, top)
            })
            .collect();
        Some(Self {
            scroll,
            geometry,
            top_card_index: top,
            items,
        })
    }

    /// Returns `true` if the last item is inside its pinned interval.
    #[must_use]
    pub fn last_item_pinned(&self) -> bool {
        self.items.last().is_some_and(|item| item.pinned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Length;

    const HEIGHT: f64 = 800.0;
    // Three 320px cards separated by 100px, spacer 400px below the last.
    const OFFSETS: [f64; 3] = [160.0, 580.0, 1000.0];
    const END: f64 = 1720.0;

    fn config() -> StackConfig {
        StackConfig::DEFAULT
    }

    fn frame_at(config: &StackConfig, scroll_top: f64) -> StackFrame {
        StackFrame::compute(
            config,
            ScrollState::new(scroll_top, HEIGHT),
            &OFFSETS,
            Some(END),
        )
        .expect("laid out")
    }

    #[test]
    fn progress_is_clamped_and_linear() {
        assert_eq!(scale_progress(-10.0, 0.0, 100.0), 0.0);
        assert_eq!(scale_progress(0.0, 0.0, 100.0), 0.0);
        assert_eq!(scale_progress(25.0, 0.0, 100.0), 0.25);
        assert_eq!(scale_progress(100.0, 0.0, 100.0), 1.0);
        assert_eq!(scale_progress(500.0, 0.0, 100.0), 1.0);
    }

    #[test]
    fn degenerate_progress_range_is_a_step() {
        assert_eq!(scale_progress(9.0, 10.0, 10.0), 0.0);
        assert_eq!(scale_progress(10.0, 10.0, 10.0), 1.0);
        assert_eq!(scale_progress(15.0, 10.0, 5.0), 1.0);
        assert!(!scale_progress(10.0, 10.0, 10.0).is_nan());
    }

    #[test]
    fn geometry_resolves_percentages_and_pin_end() {
        let g = StackGeometry::resolve(&config(), HEIGHT, 1000.0, Some(END));
        assert_eq!(g.stack_position_px, 160.0);
        assert_eq!(g.scale_end_position_px, 80.0);
        assert_eq!(g.pin_end, END - 400.0);
    }

    #[test]
    fn missing_spacer_falls_back_to_container_height() {
        let g = StackGeometry::resolve(&config(), HEIGHT, 1000.0, None);
        assert_eq!(g.pin_end, 1000.0 + HEIGHT - HEIGHT / 2.0);
    }

    #[test]
    fn pixel_boundaries_are_used_verbatim() {
        let c = config()
            .with_stack_position(Length::Px(100.0))
            .with_scale_end_position(Length::Px(40.0));
        let g = StackGeometry::resolve(&c, HEIGHT, 0.0, Some(0.0));
        assert_eq!(g.stack_position_px, 100.0);
        assert_eq!(g.scale_end_position_px, 40.0);
    }

    #[test]
    fn identity_before_trigger_start() {
        let c = config();
        // Item 0 starts at 160 - 160 = 0, the others later.
        let f = frame_at(&c, -1.0);
        for item in &f.items {
            assert_eq!(item.transform, CardTransform::IDENTITY);
            assert!(!item.pinned);
        }
    }

    #[test]
    fn target_scale_is_exact_past_trigger_end() {
        let c = config();
        let f = frame_at(&c, 5_000.0);
        for (i, item) in f.items.iter().enumerate() {
            assert_eq!(item.transform.scale, c.base_scale + i as f64 * c.item_scale);
            assert_eq!(item.progress, 1.0);
        }
    }

    #[test]
    fn scale_shrinks_monotonically() {
        let c = config();
        let b = ItemBounds::new(&c, &frame_at(&c, 0.0).geometry, OFFSETS[1], 1);
        let mut last = 1.0;
        let mut s = b.trigger_start - 10.0;
        while s <= b.trigger_end + 10.0 {
            let scale = frame_at(&c, s).items[1].transform.scale;
            assert!(scale <= last, "scale grew at {s}: {scale} > {last}");
            assert!(scale >= c.target_scale(1), "overshoot at {s}");
            last = scale;
            s += 7.0;
        }
    }

    #[test]
    fn pinned_items_track_scroll() {
        let c = config();
        // Item 0 pins at 0; at 200 it should have moved down by 200.
        let f = frame_at(&c, 200.0);
        let item = &f.items[0];
        assert!(item.pinned);
        assert_eq!(item.transform.translate_y, 200.0 - OFFSETS[0] + 160.0);
    }

    #[test]
    fn translation_freezes_after_release() {
        let c = config();
        let pin_end = END - HEIGHT / 2.0;
        let at_end = frame_at(&c, pin_end).items[2].transform.translate_y;
        let past = frame_at(&c, pin_end + 300.0).items[2];
        assert!(!past.pinned);
        assert_eq!(past.transform.translate_y, at_end);
    }

    #[test]
    fn rotation_scales_with_index_and_progress() {
        let c = config().with_rotation_amount(2.0);
        let f = frame_at(&c, 5_000.0);
        assert_eq!(f.items[0].transform.rotation, 0.0);
        assert_eq!(f.items[1].transform.rotation, 2.0);
        assert_eq!(f.items[2].transform.rotation, 4.0);
    }

    #[test]
    fn blur_grows_with_stack_depth() {
        let c = config().with_blur_amount(1.5);
        let f = frame_at(&c, 5_000.0);
        assert_eq!(f.top_card_index, 2);
        assert_eq!(f.items[0].transform.blur, 3.0);
        assert_eq!(f.items[1].transform.blur, 1.5);
        assert_eq!(f.items[2].transform.blur, 0.0);
        let depths: Vec<f64> = f.items.iter().rev().map(|i| i.transform.blur).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn top_card_index_defaults_to_zero() {
        let c = config();
        let g = StackGeometry::resolve(&c, HEIGHT, 1000.0, Some(END));
        assert_eq!(top_card_index(&c, &g, -100.0, &OFFSETS), 0);
        assert_eq!(top_card_index(&c, &g, 400.0, &OFFSETS), 1);
    }

    #[test]
    fn compute_is_idempotent() {
        let c = config().with_blur_amount(1.0).with_rotation_amount(3.0);
        for s in [-50.0, 0.0, 123.4, 600.0, 1_500.0, 9_999.0] {
            assert_eq!(frame_at(&c, s), frame_at(&c, s));
        }
    }

    #[test]
    fn unlaid_out_or_empty_yields_nothing() {
        let c = config();
        assert!(StackFrame::compute(&c, ScrollState::new(0.0, 0.0), &OFFSETS, None).is_none());
        assert!(StackFrame::compute(&c, ScrollState::new(0.0, HEIGHT), &[], None).is_none());
    }

    #[test]
    fn non_finite_offset_rests_at_identity() {
        let c = config();
        let g = StackGeometry::resolve(&c, HEIGHT, 1000.0, Some(END));
        let item = compute_item(&c, &g, 500.0, f64::NAN, 1, 0);
        assert_eq!(item.transform, CardTransform::IDENTITY);
        assert!(!item.pinned);
    }

    #[test]
    fn last_item_pinned_follows_interval() {
        let c = config();
        let last_start = OFFSETS[2] - 160.0 - 60.0;
        assert!(!frame_at(&c, last_start - 1.0).last_item_pinned());
        assert!(frame_at(&c, last_start).last_item_pinned());
        assert!(frame_at(&c, END - 400.0).last_item_pinned());
        assert!(!frame_at(&c, END - 399.0).last_item_pinned());
    }
}
