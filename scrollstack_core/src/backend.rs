// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! The engine never touches a rendering layer directly. A backend crate
//! provides three pieces:
//!
//! - **Scroll source**: an implementation of
//!   [`ScrollSource`](crate::scroll::ScrollSource) for its handle type.
//! - **Frame host**: an implementation of
//!   [`FrameHost`](crate::scheduler::FrameHost) over the platform's frame
//!   callback (e.g. `requestAnimationFrame`).
//! - **Presenter**: an implementation of [`Presenter`] that writes baseline
//!   styling at mount and per-frame changes afterwards.
//!
//! `scrollstack_core` owns the math, the change detection, and the
//! lifecycle. Backend crates depend on it and provide the platform glue.

use crate::cache::{FrameChanges, ItemArena};
use crate::config::StackConfig;

/// Applies stack output to a platform-native presentation tree.
///
/// # Pass pseudocode
///
/// ```rust,ignore
/// presenter.prepare(&arena, &config);           // once per mount
///
/// // every pass:
/// let frame = StackFrame::compute(&config, source.scroll_state(), &offsets, end);
/// for (i, item) in frame.items.iter().enumerate() {
///     arena.stage(i, item.transform);
/// }
/// presenter.apply(&arena, &arena.take_changes());
/// ```
pub trait Presenter<H> {
    /// Writes mount-time baseline styling for every item in `arena`.
    fn prepare(&mut self, arena: &ItemArena<H>, config: &StackConfig);

    /// Writes the given changes, reading each item's
    /// [`last_written`](crate::cache::ItemRecord::last_written) value from
    /// `arena`.
    fn apply(&mut self, arena: &ItemArena<H>, changes: &FrameChanges);
}

impl<H, P: Presenter<H> + ?Sized> Presenter<H> for &mut P {
    fn prepare(&mut self, arena: &ItemArena<H>, config: &StackConfig) {
        (**self).prepare(arena, config);
    }

    fn apply(&mut self, arena: &ItemArena<H>, changes: &FrameChanges) {
        (**self).apply(arena, changes);
    }
}
