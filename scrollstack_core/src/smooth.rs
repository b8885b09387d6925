// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Momentum smoothing for wrapped scroll containers.
//!
//! [`SmoothScroller`] is a pure state machine. Input handlers move its
//! target; [`advance`](SmoothScroller::advance) is called once per display
//! frame with the elapsed time and moves the current position toward the
//! target. The caller writes the returned position to the container and
//! notifies the stack.
//!
//! Two kinds of motion exist:
//!
//! - **Damped** (wheel and touch): every frame covers a fixed fraction of
//!   the remaining distance, normalized to 60 Hz so the feel does not depend
//!   on the refresh rate. Motion snaps to the target within half a pixel.
//! - **Timed** (programmatic [`scroll_to`](SmoothScroller::scroll_to)):
//!   ease-out-expo over [`SmoothScrollConfig::duration`] seconds.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::SmoothScrollConfig;

/// Distance under which damped motion snaps to its target.
const SNAP_DISTANCE: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Idle,
    Damped { lerp: f64 },
    Timed { from: f64, elapsed: f64 },
}

/// Smoothed scroll position for one container.
#[derive(Clone, Debug)]
pub struct SmoothScroller {
    config: SmoothScrollConfig,
    current: f64,
    target: f64,
    limit: f64,
    motion: Motion,
    unreported: bool,
}

impl SmoothScroller {
    /// Creates a scroller resting at `position` with maximum scroll `limit`.
    #[must_use]
    pub fn new(config: SmoothScrollConfig, position: f64, limit: f64) -> Self {
        let mut s = Self {
            config,
            current: 0.0,
            target: 0.0,
            limit: sanitize(limit),
            motion: Motion::Idle,
            unreported: false,
        };
        s.current = s.clamp(sanitize(position));
        s.target = s.current;
        s
    }

    /// Current smoothed position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.current
    }

    /// Position the scroller is heading to.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Maximum scroll offset.
    #[inline]
    #[must_use]
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Returns `true` while motion is in progress.
    #[inline]
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.motion != Motion::Idle
    }

    /// The options in use.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SmoothScrollConfig {
        &self.config
    }

    /// Updates the maximum scroll offset, e.g. after a resize.
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = sanitize(limit);
        let current = self.clamp(self.current);
        if current != self.current {
            self.current = current;
            self.unreported = true;
        }
        self.target = self.clamp(self.target);
    }

    /// Applies a wheel delta in pixels (positive scrolls down).
    pub fn on_wheel(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let target = self.clamp(self.target + delta * self.config.wheel_multiplier);
        if self.config.smooth_wheel {
            self.target = target;
            self.motion = Motion::Damped {
                lerp: self.config.lerp,
            };
        } else {
            self.jump(target);
        }
    }

    /// Applies a touch drag delta in pixels (positive scrolls down).
    ///
    /// Returns `false` when touch is left to native scrolling, in which case
    /// the caller must not cancel the native gesture.
    pub fn on_touch(&mut self, delta: f64) -> bool {
        if !self.config.sync_touch {
            return false;
        }
        if delta.is_finite() {
            self.target = self.clamp(self.target + delta * self.config.touch_multiplier);
            self.motion = Motion::Damped {
                lerp: self.config.sync_touch_lerp,
            };
        }
        true
    }

    /// Scrolls to `target`, either immediately or with timed easing.
    pub fn scroll_to(&mut self, target: f64, immediate: bool) {
        if !target.is_finite() {
            return;
        }
        let target = self.clamp(target);
        if immediate || self.config.duration <= 0.0 {
            self.jump(target);
        } else {
            self.target = target;
            self.motion = Motion::Timed {
                from: self.current,
                elapsed: 0.0,
            };
        }
    }

    /// Adopts a position produced outside the scroller (scrollbar drag,
    /// keyboard). Ignored while motion is in progress.
    pub fn sync(&mut self, position: f64) {
        if self.is_scrolling() || !position.is_finite() {
            return;
        }
        let position = self.clamp(position);
        self.current = position;
        self.target = position;
    }

    /// Stops any motion where it is.
    pub fn stop(&mut self) {
        self.target = self.current;
        self.motion = Motion::Idle;
    }

    /// Advances motion by `dt` seconds.
    ///
    /// Returns the new position if it changed since the last report.
    pub fn advance(&mut self, dt: f64) -> Option<f64> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let before = self.current;
        match self.motion {
            Motion::Idle => {}
            Motion::Damped { lerp } => {
                let factor = 1.0 - (1.0 - lerp.clamp(0.0, 1.0)).powf(dt * 60.0);
                self.current += (self.target - self.current) * factor;
                if (self.target - self.current).abs() < SNAP_DISTANCE {
                    self.current = self.target;
                    self.motion = Motion::Idle;
                }
            }
            Motion::Timed { from, elapsed } => {
                let elapsed = elapsed + dt;
                let t = (elapsed / self.config.duration).min(1.0);
                self.current = from + (self.target - from) * ease_out_expo(t);
                self.motion = if t >= 1.0 {
                    self.current = self.target;
                    Motion::Idle
                } else {
                    Motion::Timed { from, elapsed }
                };
            }
        }
        let changed = self.current != before || self.unreported;
        self.unreported = false;
        changed.then_some(self.current)
    }

    fn jump(&mut self, target: f64) {
        self.target = target;
        self.motion = Motion::Idle;
        if self.current != target {
            self.current = target;
            self.unreported = true;
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        if self.config.infinite {
            value
        } else {
            value.clamp(0.0, self.limit)
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Ease-out-expo on `[0, 1]`.
#[must_use]
pub fn ease_out_expo(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        (1.001 - 2.0_f64.powf(-10.0 * t)).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn run_to_rest(s: &mut SmoothScroller) -> usize {
        let mut frames = 0;
        while s.is_scrolling() {
            s.advance(FRAME);
            frames += 1;
            assert!(frames < 10_000, "motion never settled");
        }
        frames
    }

    #[test]
    fn wheel_eases_toward_target_and_snaps() {
        let mut s = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 0.0, 5_000.0);
        s.on_wheel(300.0);
        let first = s.advance(FRAME).expect("moved");
        assert!((first - 300.0 * 0.075).abs() < 1e-9, "first step was {first}");
        run_to_rest(&mut s);
        assert_eq!(s.position(), 300.0);
        assert_eq!(s.advance(FRAME), None, "idle scroller reports nothing");
    }

    #[test]
    fn damping_is_frame_rate_independent() {
        let mut a = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 0.0, 5_000.0);
        let mut b = a.clone();
        a.on_wheel(1_000.0);
        b.on_wheel(1_000.0);
        a.advance(2.0 * FRAME);
        b.advance(FRAME);
        b.advance(FRAME);
        assert!((a.position() - b.position()).abs() < 1e-9, "{} vs {}", a.position(), b.position());
    }

    #[test]
    fn target_is_clamped_to_limit() {
        let mut s = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 0.0, 400.0);
        s.on_wheel(10_000.0);
        assert_eq!(s.target(), 400.0);
        s.on_wheel(-50_000.0);
        assert_eq!(s.target(), 0.0);
    }

    #[test]
    fn infinite_does_not_clamp() {
        let config = SmoothScrollConfig {
            infinite: true,
            ..SmoothScrollConfig::DEFAULT
        };
        let mut s = SmoothScroller::new(config, 0.0, 400.0);
        s.on_wheel(1_000.0);
        assert_eq!(s.target(), 1_000.0);
    }

    #[test]
    fn unsmoothed_wheel_jumps() {
        let config = SmoothScrollConfig {
            smooth_wheel: false,
            ..SmoothScrollConfig::DEFAULT
        };
        let mut s = SmoothScroller::new(config, 0.0, 1_000.0);
        s.on_wheel(120.0);
        assert!(!s.is_scrolling());
        assert_eq!(s.advance(FRAME), Some(120.0));
        assert_eq!(s.advance(FRAME), None);
    }

    #[test]
    fn touch_uses_multiplier_or_defers_to_native() {
        let mut s = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 0.0, 1_000.0);
        assert!(s.on_touch(50.0));
        assert_eq!(s.target(), 100.0);

        let native = SmoothScrollConfig {
            sync_touch: false,
            ..SmoothScrollConfig::DEFAULT
        };
        let mut n = SmoothScroller::new(native, 0.0, 1_000.0);
        assert!(!n.on_touch(50.0));
        assert_eq!(n.target(), 0.0);
    }

    #[test]
    fn timed_scroll_lands_after_duration() {
        let mut s = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 0.0, 2_000.0);
        s.scroll_to(1_000.0, false);
        let frames = run_to_rest(&mut s);
        assert_eq!(s.position(), 1_000.0);
        assert!((59..=61).contains(&frames), "took {frames} frames");
    }

    #[test]
    fn sync_only_when_idle() {
        let mut s = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 0.0, 2_000.0);
        s.sync(250.0);
        assert_eq!(s.position(), 250.0);
        s.on_wheel(100.0);
        s.sync(900.0);
        assert_eq!(s.target(), 350.0);
    }

    #[test]
    fn shrinking_limit_pulls_position_back() {
        let mut s = SmoothScroller::new(SmoothScrollConfig::DEFAULT, 800.0, 1_000.0);
        s.set_limit(500.0);
        assert_eq!(s.position(), 500.0);
        assert_eq!(s.advance(FRAME), Some(500.0));
    }

    #[test]
    fn easing_endpoints() {
        assert!(ease_out_expo(0.0).abs() < 0.002);
        assert_eq!(ease_out_expo(1.0), 1.0);
        assert!(ease_out_expo(0.5) > 0.9);
    }
}
