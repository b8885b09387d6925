// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll source contract.
//!
//! A [`ScrollSource`] supplies the current [`ScrollState`] and the top offset
//! of any item handle. Offsets and `scroll_top` **must** share one coordinate
//! space: document-relative for window scrolling, container-relative for a
//! wrapped scroll container. Mixing the two produces silently wrong stacking.
//!
//! Backends provide the implementations; the engine never branches on which
//! variant it was given.

/// One sample of the scroll signal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Current scroll offset in pixels.
    pub scroll_top: f64,
    /// Height of the visible scroll viewport in pixels.
    pub container_height: f64,
}

impl ScrollState {
    /// Creates a scroll state.
    #[inline]
    #[must_use]
    pub const fn new(scroll_top: f64, container_height: f64) -> Self {
        Self {
            scroll_top,
            container_height,
        }
    }

    /// Returns `true` once the viewport has a usable, non-zero height.
    #[inline]
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.container_height > 0.0
            && self.container_height.is_finite()
            && self.scroll_top.is_finite()
    }
}

/// Supplies scroll position and element offsets for items of handle type `H`.
pub trait ScrollSource<H> {
    /// Samples the current scroll state.
    fn scroll_state(&self) -> ScrollState;

    /// Returns the top offset of `element` in the same coordinate space as
    /// [`ScrollState::scroll_top`].
    fn element_offset(&self, element: &H) -> f64;
}

impl<H, S: ScrollSource<H> + ?Sized> ScrollSource<H> for &S {
    fn scroll_state(&self) -> ScrollState {
        (**self).scroll_state()
    }

    fn element_offset(&self, element: &H) -> f64 {
        (**self).element_offset(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_height_is_not_laid_out() {
        assert!(!ScrollState::new(0.0, 0.0).is_laid_out());
        assert!(!ScrollState::new(f64::NAN, 600.0).is_laid_out());
        assert!(ScrollState::new(0.0, 600.0).is_laid_out());
    }
}
