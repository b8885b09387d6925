// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame coalescing.
//!
//! The [`FrameScheduler`] turns a burst of wake-ups (scroll events, resizes,
//! smooth-scroll ticks) into at most one update pass per display frame. Every
//! wake cancels the outstanding frame request and issues a fresh one, so the
//! pass always samples the scroll state as of the frame that runs it.
//!
//! The scheduler also owns the re-entrancy guard: while a pass is in flight
//! ([`begin_pass`](FrameScheduler::begin_pass) without the matching
//! [`end_pass`](FrameScheduler::end_pass)), a second pass is refused. Wakes
//! that arrive during a pass are remembered and re-arm one frame when the
//! pass ends.
//!
//! Platform frame sources are reached through the [`FrameHost`] trait.

/// Identifier of an outstanding frame request, as issued by a [`FrameHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub i32);

/// A source of display frames.
///
/// On the web this is `requestAnimationFrame` / `cancelAnimationFrame`.
pub trait FrameHost {
    /// Requests a callback on the next display frame.
    fn request_frame(&mut self) -> FrameRequestId;

    /// Cancels a previously requested frame. Cancelling a request that has
    /// already fired must be harmless.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

impl<F: FrameHost + ?Sized> FrameHost for &mut F {
    fn request_frame(&mut self) -> FrameRequestId {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        (**self).cancel_frame(id);
    }
}

/// Why the stack was woken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WakeReason {
    /// A native scroll event.
    Scroll,
    /// The window was resized.
    Resize,
    /// The smooth scroller moved the container.
    SmoothScroll,
    /// The mount pass was deferred and needs a follow-up frame.
    Mount,
}

/// Counters kept by the [`FrameScheduler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Wakes received.
    pub wakes: u64,
    /// Wakes that replaced an outstanding frame request.
    pub coalesced: u64,
    /// Passes started.
    pub passes: u64,
    /// Passes refused by the re-entrancy guard.
    pub reentrant: u64,
}

/// Coalesces wakes into at most one pending frame.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<FrameRequestId>,
    in_pass: bool,
    rearm: bool,
    last_reason: Option<WakeReason>,
    stats: SchedulerStats,
}

impl FrameScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a wake and makes sure exactly one frame is pending.
    ///
    /// Any outstanding request is cancelled first. During a pass the wake is
    /// remembered instead and replayed by [`end_pass`](Self::end_pass).
    pub fn notify(&mut self, host: &mut impl FrameHost, reason: WakeReason) {
        self.stats.wakes += 1;
        self.last_reason = Some(reason);
        if self.in_pass {
            self.rearm = true;
            return;
        }
        if let Some(id) = self.pending.take() {
            host.cancel_frame(id);
            self.stats.coalesced += 1;
        }
        self.pending = Some(host.request_frame());
    }

    /// Consumes the pending request when its frame fires.
    ///
    /// Returns `true` if a pass should run now.
    pub fn on_frame(&mut self) -> bool {
        self.pending.take().is_some() && !self.in_pass
    }

    /// Cancels the pending frame, if any, and forgets deferred wakes.
    pub fn cancel(&mut self, host: &mut impl FrameHost) {
        if let Some(id) = self.pending.take() {
            host.cancel_frame(id);
        }
        self.rearm = false;
    }

    /// Enters a pass. Returns `false` if a pass is already in flight.
    pub fn begin_pass(&mut self) -> bool {
        if self.in_pass {
            self.stats.reentrant += 1;
            return false;
        }
        self.in_pass = true;
        self.stats.passes += 1;
        true
    }

    /// Leaves a pass, requesting one more frame if woken meanwhile.
    pub fn end_pass(&mut self, host: &mut impl FrameHost) {
        self.in_pass = false;
        if core::mem::take(&mut self.rearm) {
            if let Some(id) = self.pending.take() {
                host.cancel_frame(id);
            }
            self.pending = Some(host.request_frame());
        }
    }

    /// Returns `true` while a frame request is outstanding.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns `true` while a pass is in flight.
    #[inline]
    #[must_use]
    pub fn in_pass(&self) -> bool {
        self.in_pass
    }

    /// Reason given by the most recent wake.
    #[inline]
    #[must_use]
    pub fn last_reason(&self) -> Option<WakeReason> {
        self.last_reason
    }

    /// Current counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    /// Frame host that hands out sequential ids and records cancellations.
    #[derive(Debug, Default)]
    struct SimHost {
        next: i32,
        live: Vec<FrameRequestId>,
        cancelled: Vec<FrameRequestId>,
    }

    impl FrameHost for SimHost {
        fn request_frame(&mut self) -> FrameRequestId {
            self.next += 1;
            let id = FrameRequestId(self.next);
            self.live.push(id);
            id
        }

        fn cancel_frame(&mut self, id: FrameRequestId) {
            self.live.retain(|&l| l != id);
            self.cancelled.push(id);
        }
    }

    #[test]
    fn burst_coalesces_into_one_frame() {
        let mut host = SimHost::default();
        let mut s = FrameScheduler::new();
        for _ in 0..5 {
            s.notify(&mut host, WakeReason::Scroll);
        }
        assert_eq!(host.live.len(), 1, "only the last request survives");
        assert_eq!(host.cancelled.len(), 4);
        assert_eq!(s.stats().coalesced, 4);
        assert!(s.on_frame());
        assert!(!s.on_frame(), "a fired request cannot run twice");
    }

    #[test]
    fn spurious_frame_does_not_run() {
        let mut s = FrameScheduler::new();
        assert!(!s.on_frame());
    }

    #[test]
    fn reentrant_pass_is_refused() {
        let mut host = SimHost::default();
        let mut s = FrameScheduler::new();
        assert!(s.begin_pass());
        assert!(!s.begin_pass());
        s.end_pass(&mut host);
        assert_eq!(s.stats().passes, 1);
        assert_eq!(s.stats().reentrant, 1);
    }

    #[test]
    fn wake_during_pass_rearms_once() {
        let mut host = SimHost::default();
        let mut s = FrameScheduler::new();
        assert!(s.begin_pass());
        s.notify(&mut host, WakeReason::Resize);
        s.notify(&mut host, WakeReason::Scroll);
        assert!(host.live.is_empty(), "no request while in flight");
        s.end_pass(&mut host);
        assert_eq!(host.live.len(), 1);
        assert!(s.is_pending());
        assert_eq!(s.last_reason(), Some(WakeReason::Scroll));
    }

    #[test]
    fn cancel_clears_pending_and_deferred() {
        let mut host = SimHost::default();
        let mut s = FrameScheduler::new();
        s.notify(&mut host, WakeReason::Mount);
        s.cancel(&mut host);
        assert!(host.live.is_empty());
        assert!(!s.is_pending());
        assert!(!s.on_frame());
    }
}
