// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack configuration.
//!
//! A [`StackConfig`] is resolved once per mount and is immutable for the
//! lifetime of that mount; changing any option means tearing the stack down
//! and mounting it again (see
//! [`StackController::remount`](crate::lifecycle::StackController::remount)).
//!
//! Trigger boundaries are expressed as a [`Length`], which is either a pixel
//! value or a percentage of the container height. Percentages are resolved
//! against the container height sampled at the start of every pass, so a
//! resize moves the boundaries without a remount.

use core::fmt;

/// A pixel distance or a percentage of the container height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute distance in CSS pixels.
    Px(f64),
    /// Percentage (0–100) of the container height.
    Percent(f64),
}

impl Length {
    /// Parses a length string.
    ///
    /// Accepts `"20%"`, `"120"`, and `"120px"`, with surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, LengthParseError> {
        let trimmed = s.trim();
        if let Some(number) = trimmed.strip_suffix('%') {
            return parse_number(number).map(Self::Percent);
        }
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
        parse_number(number).map(Self::Px)
    }

    /// Parses the leading number of a length string, ignoring any unit.
    ///
    /// A `%` anywhere makes it a percentage, everything else is taken as
    /// pixels, so `"20vh"` reads as `20px`. Returns `None` when there is no
    /// leading finite number (`"calc(20%)"`, `"1e400"`).
    #[must_use]
    pub fn parse_prefix(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let number = numeric_prefix(trimmed)?.parse::<f64>().ok()?;
        if !number.is_finite() {
            return None;
        }
        Some(if trimmed.contains('%') {
            Self::Percent(number)
        } else {
            Self::Px(number)
        })
    }

    /// Resolves this length to pixels for the given container height.
    #[inline]
    #[must_use]
    pub fn resolve(self, container_height: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => pct / 100.0 * container_height,
        }
    }
}

impl From<f64> for Length {
    fn from(px: f64) -> Self {
        Self::Px(px)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

fn parse_number(s: &str) -> Result<f64, LengthParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(LengthParseError::Empty);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LengthParseError::InvalidNumber),
    }
}

/// Longest prefix of `s` shaped like a decimal number with an optional
/// exponent.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    s.get(..end)
}

/// Error returned by [`Length::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthParseError {
    /// The input had no numeric part.
    Empty,
    /// The numeric part was not a finite number.
    InvalidNumber,
}

impl fmt::Display for LengthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("length is empty"),
            Self::InvalidNumber => f.write_str("length is not a finite number"),
        }
    }
}

impl core::error::Error for LengthParseError {}

/// Where the scroll signal comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollMode {
    /// The stack lives in its own scroll container whose scrolling is driven
    /// by the smooth scroller.
    #[default]
    Wrapped,
    /// The stack follows the browser window's native scroll.
    Window,
}

/// Named tunables for a stack.
///
/// Defaults match [`StackConfig::DEFAULT`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackConfig {
    /// Spacing in pixels added after each item (except the last) in normal flow.
    pub item_distance: f64,
    /// Per-index increment added to [`base_scale`](Self::base_scale) to get
    /// each item's target scale.
    pub item_scale: f64,
    /// Vertical offset step in pixels between stacked items.
    pub item_stack_distance: f64,
    /// Boundary at which an item starts stacking.
    pub stack_position: Length,
    /// Boundary at which an item's scale animation ends.
    pub scale_end_position: Length,
    /// Scale reached by the first item at full progress.
    pub base_scale: f64,
    /// Duration hint for scale animations, in seconds.
    ///
    /// Transforms are scroll-linked, so this is not consulted by the
    /// calculator; it is part of the configuration identity and a change
    /// still requires a remount.
    pub scale_duration: f64,
    /// Degrees of rotation per index at full progress. Zero disables rotation.
    pub rotation_amount: f64,
    /// Pixels of blur per level of stack depth. Zero disables blur.
    pub blur_amount: f64,
    /// Scroll source selection.
    pub scroll_mode: ScrollMode,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl StackConfig {
    /// The default configuration.
    pub const DEFAULT: Self = Self {
        item_distance: 100.0,
        item_scale: 0.03,
        item_stack_distance: 30.0,
        stack_position: Length::Percent(20.0),
        scale_end_position: Length::Percent(10.0),
        base_scale: 0.85,
        scale_duration: 0.5,
        rotation_amount: 0.0,
        blur_amount: 0.0,
        scroll_mode: ScrollMode::Wrapped,
    };

    /// Sets [`item_distance`](Self::item_distance).
    #[must_use]
    pub const fn with_item_distance(mut self, px: f64) -> Self {
        self.item_distance = px;
        self
    }

    /// Sets [`item_scale`](Self::item_scale).
    #[must_use]
    pub const fn with_item_scale(mut self, step: f64) -> Self {
        self.item_scale = step;
        self
    }

    /// Sets [`item_stack_distance`](Self::item_stack_distance).
    #[must_use]
    pub const fn with_item_stack_distance(mut self, px: f64) -> Self {
        self.item_stack_distance = px;
        self
    }

    /// Sets [`stack_position`](Self::stack_position).
    #[must_use]
    pub const fn with_stack_position(mut self, position: Length) -> Self {
        self.stack_position = position;
        self
    }

    /// Sets [`scale_end_position`](Self::scale_end_position).
    #[must_use]
    pub const fn with_scale_end_position(mut self, position: Length) -> Self {
        self.scale_end_position = position;
        self
    }

    /// Sets [`base_scale`](Self::base_scale).
    #[must_use]
    pub const fn with_base_scale(mut self, scale: f64) -> Self {
        self.base_scale = scale;
        self
    }

    /// Sets [`scale_duration`](Self::scale_duration).
    #[must_use]
    pub const fn with_scale_duration(mut self, seconds: f64) -> Self {
        self.scale_duration = seconds;
        self
    }

    /// Sets [`rotation_amount`](Self::rotation_amount).
    #[must_use]
    pub const fn with_rotation_amount(mut self, degrees: f64) -> Self {
        self.rotation_amount = degrees;
        self
    }

    /// Sets [`blur_amount`](Self::blur_amount).
    #[must_use]
    pub const fn with_blur_amount(mut self, px: f64) -> Self {
        self.blur_amount = px;
        self
    }

    /// Sets [`scroll_mode`](Self::scroll_mode).
    #[must_use]
    pub const fn with_scroll_mode(mut self, mode: ScrollMode) -> Self {
        self.scroll_mode = mode;
        self
    }

    /// Returns `true` if the stack follows the window's native scroll.
    #[inline]
    #[must_use]
    pub const fn uses_window_scroll(&self) -> bool {
        matches!(self.scroll_mode, ScrollMode::Window)
    }

    /// Target scale for the item at `index` once fully stacked.
    #[inline]
    #[must_use]
    pub fn target_scale(&self, index: usize) -> f64 {
        self.base_scale + index as f64 * self.item_scale
    }
}

/// Options for the momentum smoothing used by wrapped scrolling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothScrollConfig {
    /// Duration of programmatic (timed) scrolls, in seconds.
    pub duration: f64,
    /// Fraction of the remaining distance covered per 60 Hz frame for wheel input.
    pub lerp: f64,
    /// Smooth wheel input. When `false`, wheel input jumps immediately.
    pub smooth_wheel: bool,
    /// Multiplier applied to wheel deltas.
    pub wheel_multiplier: f64,
    /// Multiplier applied to touch deltas.
    pub touch_multiplier: f64,
    /// Smooth touch input. When `false`, touch is left to native scrolling.
    pub sync_touch: bool,
    /// Lerp used for touch input when [`sync_touch`](Self::sync_touch) is on.
    pub sync_touch_lerp: f64,
    /// Disable clamping to the scrollable range.
    pub infinite: bool,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SmoothScrollConfig {
    /// The default smoothing options.
    pub const DEFAULT: Self = Self {
        duration: 1.0,
        lerp: 0.075,
        smooth_wheel: true,
        wheel_multiplier: 1.0,
        touch_multiplier: 2.0,
        sync_touch: true,
        sync_touch_lerp: 0.1,
        infinite: false,
    };
}
