// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The [`ItemArena`](crate::cache::ItemArena) marks items dirty through
//! [`understory_dirty`] when a staged transform differs perceptibly from the
//! last written one. Channels are local-only: items are independent, so no
//! dependency edges exist and nothing propagates.
//!
//! Each [`ItemArena::take_changes`](crate::cache::ItemArena::take_changes)
//! call drains both channels and surfaces the result as
//! [`FrameChanges`](crate::cache::FrameChanges), which presenters
//! [consume](crate::backend::Presenter::apply) to issue the writes.

use understory_dirty::Channel;

/// Translation, scale, or rotation changed: the `transform` needs rewriting.
pub const TRANSFORM: Channel = Channel::new(0);

/// Blur changed: the `filter` needs rewriting.
pub const FILTER: Channel = Channel::new(1);
