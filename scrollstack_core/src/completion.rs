// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge-triggered stack completion.
//!
//! The stack is complete while the last item sits inside its pinned interval.
//! [`CompletionDetector`] turns that level signal into edges so the
//! completion callback fires once per entry, not once per frame.

/// Whether the stack is currently complete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompletionState {
    /// The last item is outside its pinned interval.
    #[default]
    Idle,
    /// The last item is pinned.
    Completed,
}

/// A transition reported by [`CompletionDetector::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionEdge {
    /// Entered the completed state. The completion callback fires.
    Completed,
    /// Left the completed state. Nothing fires.
    Reset,
}

/// Two-state completion tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionDetector {
    state: CompletionState,
}

impl CompletionDetector {
    /// Creates a detector in [`CompletionState::Idle`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CompletionState::Idle,
        }
    }

    /// Feeds the current level and returns the edge it caused, if any.
    pub fn update(&mut self, last_item_pinned: bool) -> Option<CompletionEdge> {
        match (self.state, last_item_pinned) {
            (CompletionState::Idle, true) => {
                self.state = CompletionState::Completed;
                Some(CompletionEdge::Completed)
            }
            (CompletionState::Completed, false) => {
                self.state = CompletionState::Idle;
                Some(CompletionEdge::Reset)
            }
            _ => None,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> CompletionState {
        self.state
    }

    /// Returns to [`CompletionState::Idle`] without reporting an edge.
    pub fn reset(&mut self) {
        self.state = CompletionState::Idle;
    }
}
