// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item arena with change detection.
//!
//! [`ItemArena`] owns one [`ItemRecord`] per discovered item, indexed by the
//! item's stable index: the rendering-layer handle plus the last transform
//! actually written for it. The last-written value is only ever used for
//! comparison, never to decide anything about scroll position.
//!
//! Candidates are quantized to a [`Granularity`] and compared against the last
//! written value. A write is scheduled only when a rounded field moves by more
//! than half its step, which means any change in the quantized value is
//! written and the converged value is always the quantized calculator output.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use understory_dirty::DirtySet;

use crate::dirty;
use crate::transform::{CardTransform, Granularity};

/// One stackable item.
#[derive(Clone, Debug)]
pub struct ItemRecord<H> {
    handle: H,
    last_written: Option<CardTransform>,
}

impl<H> ItemRecord<H> {
    /// The rendering-layer handle.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// The last transform written for this item, if any.
    #[inline]
    #[must_use]
    pub fn last_written(&self) -> Option<CardTransform> {
        self.last_written
    }
}

/// Item indices with pending writes, per channel, in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameChanges {
    /// Items whose `transform` must be written.
    pub transforms: Vec<usize>,
    /// Items whose `filter` must be written.
    pub filters: Vec<usize>,
}

impl FrameChanges {
    /// Returns `true` if nothing needs writing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty() && self.filters.is_empty()
    }

    /// Number of distinct items touched.
    #[must_use]
    pub fn item_count(&self) -> usize {
        let shared = self
            .filters
            .iter()
            .filter(|&&i| self.transforms.binary_search(&i).is_ok())
            .count();
        self.transforms.len() + self.filters.len() - shared
    }
}

/// Arena of items indexed by stable item index.
#[derive(Clone, Debug)]
pub struct ItemArena<H> {
    records: Vec<ItemRecord<H>>,
    granularity: Granularity,
    dirty: DirtySet<usize>,
}

impl<H> ItemArena<H> {
    /// Creates an arena from handles in document order.
    pub fn new(handles: impl IntoIterator<Item = H>) -> Self {
        Self::with_granularity(handles, Granularity::PERCEPTUAL)
    }

    /// Creates an arena that quantizes with `granularity`.
    pub fn with_granularity(handles: impl IntoIterator<Item = H>, granularity: Granularity) -> Self {
        Self {
            records: handles
                .into_iter()
                .map(|handle| ItemRecord {
                    handle,
                    last_written: None,
                })
                .collect(),
            granularity,
            dirty: DirtySet::new(),
        }
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the arena holds no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemRecord<H>> {
        self.records.get(index)
    }

    /// Iterates over records in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ItemRecord<H>> + '_ {
        self.records.iter()
    }

    /// Iterates over handles in index order.
    pub fn handles(&self) -> impl ExactSizeIterator<Item = &H> + '_ {
        self.records.iter().map(|r| &r.handle)
    }

    /// The quantization steps in use.
    #[inline]
    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Offers a freshly computed transform for the item at `index`.
    ///
    /// Returns `true` if a write was scheduled. Non-finite candidates and
    /// out-of-range indices are ignored.
    pub fn stage(&mut self, index: usize, candidate: CardTransform) -> bool {
        if !candidate.is_finite() {
            return false;
        }
        let g = self.granularity;
        let Some(record) = self.records.get_mut(index) else {
            return false;
        };
        let next = candidate.quantize(&g);
        let (transform_changed, filter_changed) = match record.last_written {
            None => (true, true),
            Some(prev) => (
                exceeds(prev.translate_y, next.translate_y, g.translate_y)
                    || exceeds(prev.scale, next.scale, g.scale)
                    || exceeds(prev.rotation, next.rotation, g.rotation),
                exceeds(prev.blur, next.blur, g.blur),
            ),
        };
        if transform_changed {
            self.dirty.mark(index, dirty::TRANSFORM);
        }
        if filter_changed {
            self.dirty.mark(index, dirty::FILTER);
        }
        let changed = transform_changed || filter_changed;
        if changed {
            record.last_written = Some(next);
        }
        changed
    }

    /// Drains pending writes.
    pub fn take_changes(&mut self) -> FrameChanges {
        let mut transforms: Vec<usize> = self.dirty.drain(dirty::TRANSFORM).collect();
        let mut filters: Vec<usize> = self.dirty.drain(dirty::FILTER).collect();
        transforms.sort_unstable();
        filters.sort_unstable();
        FrameChanges {
            transforms,
            filters,
        }
    }

    /// Forgets every last-written value and pending write.
    pub fn clear(&mut self) {
        for record in &mut self.records {
            record.last_written = None;
        }
        self.dirty.clear_all();
    }

    /// Drops every record, releasing the handles.
    pub fn release(&mut self) {
        self.records.clear();
        self.dirty.clear_all();
    }
}

/// Rounded delta exceeds half a step, i.e. the quantized values differ.
///
/// A one-step move is written. Requiring more than a full step would leave
/// the last write one step short of where the motion settles.
fn exceeds(prev: f64, next: f64, step: f64) -> bool {
    (next - prev).abs() > step * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(n: usize) -> ItemArena<usize> {
        ItemArena::new(0..n)
    }

    fn shifted(dy: f64) -> CardTransform {
        CardTransform {
            translate_y: dy,
            ..CardTransform::IDENTITY
        }
    }

    #[test]
    fn first_stage_always_writes_both_channels() {
        let mut a = arena(2);
        assert!(a.stage(0, CardTransform::IDENTITY));
        let changes = a.take_changes();
        assert_eq!(changes.transforms, [0]);
        assert_eq!(changes.filters, [0]);
        assert_eq!(changes.item_count(), 1);
    }

    #[test]
    fn sub_step_jitter_is_suppressed() {
        let mut a = arena(1);
        a.stage(0, shifted(10.0));
        let _ = a.take_changes();
        assert!(!a.stage(0, shifted(10.2)));
        assert!(!a.stage(0, shifted(9.8)));
        assert!(a.take_changes().is_empty());
        assert_eq!(a.get(0).and_then(ItemRecord::last_written), Some(shifted(10.0)));
    }

    #[test]
    fn one_step_change_is_written() {
        let mut a = arena(1);
        a.stage(0, shifted(10.0));
        let _ = a.take_changes();
        assert!(a.stage(0, shifted(10.4)));
        let changes = a.take_changes();
        assert_eq!(changes.transforms, [0]);
        assert!(changes.filters.is_empty());
        assert_eq!(a.get(0).and_then(ItemRecord::last_written), Some(shifted(10.5)));
    }

    #[test]
    fn exactly_one_step_is_written() {
        let mut a = arena(1);
        a.stage(0, shifted(10.0));
        let _ = a.take_changes();
        // 10.3 quantizes to 10.5: a rounded delta of exactly one step.
        assert!(a.stage(0, shifted(10.3)), "one-step delta writes");
        assert_eq!(a.get(0).and_then(ItemRecord::last_written), Some(shifted(10.5)));
    }

    #[test]
    fn converges_to_quantized_value() {
        let mut a = arena(1);
        // Creep upward in sub-step increments; the final write must still
        // land on the quantized final value.
        let mut y = 0.0;
        while y < 20.0 {
            a.stage(0, shifted(y));
            y += 0.1;
        }
        a.stage(0, shifted(20.0));
        assert_eq!(a.get(0).and_then(ItemRecord::last_written), Some(shifted(20.0)));
    }

    #[test]
    fn blur_only_change_marks_filter() {
        let mut a = arena(1);
        a.stage(0, CardTransform::IDENTITY);
        let _ = a.take_changes();
        let blurred = CardTransform {
            blur: 2.0,
            ..CardTransform::IDENTITY
        };
        assert!(a.stage(0, blurred));
        let changes = a.take_changes();
        assert!(changes.transforms.is_empty());
        assert_eq!(changes.filters, [0]);
    }

    #[test]
    fn changes_are_sorted() {
        let mut a = arena(5);
        for i in [4, 1, 3, 0, 2] {
            a.stage(i, shifted(i as f64));
        }
        let changes = a.take_changes();
        assert_eq!(changes.transforms, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn non_finite_and_out_of_range_are_ignored() {
        let mut a = arena(1);
        assert!(!a.stage(0, shifted(f64::NAN)));
        assert!(!a.stage(7, shifted(1.0)));
        assert!(a.take_changes().is_empty());
    }

    #[test]
    fn clear_forgets_history() {
        let mut a = arena(1);
        a.stage(0, shifted(3.0));
        a.clear();
        assert!(a.get(0).and_then(ItemRecord::last_written).is_none());
        assert!(a.take_changes().is_empty());
        assert!(a.stage(0, shifted(3.0)));
    }
}
