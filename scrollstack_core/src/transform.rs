// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-card visual transform.
//!
//! [`CardTransform`] is the output of the calculator: a vertical translation,
//! a uniform scale, a rotation in degrees, and a blur radius. It is a plain
//! value, recomputed every pass and never mutated in place by the engine.
//!
//! Presenters can consume it as CSS strings ([`css_transform`],
//! [`css_filter`]) or as a 2-D affine about a transform origin
//! ([`to_affine`]).
//!
//! [`css_transform`]: CardTransform::css_transform
//! [`css_filter`]: CardTransform::css_filter
//! [`to_affine`]: CardTransform::to_affine

use alloc::format;
use alloc::string::String;
use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// Rounding steps applied before change detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Granularity {
    /// Translation step in pixels.
    pub translate_y: f64,
    /// Scale step.
    pub scale: f64,
    /// Rotation step in degrees.
    pub rotation: f64,
    /// Blur step in pixels.
    pub blur: f64,
}

impl Granularity {
    /// Perceptual steps: 0.5 px, 0.002 scale, 0.5°, 0.5 px.
    pub const PERCEPTUAL: Self = Self {
        translate_y: 0.5,
        scale: 0.002,
        rotation: 0.5,
        blur: 0.5,
    };
}

/// The visual transform of one card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Blur radius in pixels.
    pub blur: f64,
}

impl Default for CardTransform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CardTransform {
    /// No translation, unit scale, no rotation, no blur.
    pub const IDENTITY: Self = Self {
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
        blur: 0.0,
    };

    /// Returns `true` if every field is finite.
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.translate_y.is_finite()
            && self.scale.is_finite()
            && self.rotation.is_finite()
            && self.blur.is_finite()
    }

    /// Rounds every field to the nearest multiple of its step in `g`.
    #[must_use]
    pub fn quantize(self, g: &Granularity) -> Self {
        Self {
            translate_y: round_to(self.translate_y, g.translate_y),
            scale: round_to(self.scale, g.scale),
            rotation: round_to(self.rotation, g.rotation),
            blur: round_to(self.blur, g.blur),
        }
    }

    /// Returns the transform as a 2-D affine about `origin`.
    ///
    /// Matches the CSS `translate3d(0, y, 0) scale(s) rotate(r)` function list
    /// applied with `transform-origin` at `origin`.
    #[must_use]
    pub fn to_affine(&self, origin: Point) -> Affine {
        let o = origin.to_vec2();
        Affine::translate(o)
            * Affine::translate(Vec2::new(0.0, self.translate_y))
            * Affine::scale(self.scale)
            * Affine::rotate(self.rotation * PI / 180.0)
            * Affine::translate(-o)
    }

    /// CSS `transform` value.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!(
            "translate3d(0px, {}px, 0px) scale({}) rotate({}deg)",
            self.translate_y, self.scale, self.rotation
        )
    }

    /// CSS `filter` value: `blur(..)` when blurred, `none` otherwise.
    #[must_use]
    pub fn css_filter(&self) -> String {
        if self.blur > 0.0 {
            format!("blur({}px)", self.blur)
        } else {
            String::from("none")
        }
    }
}

/// Transform origin used for cards: the top edge, horizontally centered.
#[inline]
#[must_use]
pub fn top_center_origin(card_width: f64) -> Point {
    Point::new(card_width * 0.5, 0.0)
}

fn round_to(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}
