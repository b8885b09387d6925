// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace sink.

use alloc::format;
use alloc::string::String;

use scrollstack_core::completion::CompletionEdge;
use scrollstack_core::trace::{
    CompletionEvent, PassBeginEvent, PassSkippedEvent, PassSummary, TraceSink, WakeEvent,
};
use wasm_bindgen::JsValue;

/// A [`TraceSink`] that writes one `console.debug` line per event.
///
/// Wakes and pass starts are frequent while scrolling, so they are only
/// logged when [`verbose`](Self::verbose) is set.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    /// Creates a sink that logs skips, completions, and pass summaries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that also logs every wake and pass start.
    #[must_use]
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

fn log(line: String) {
    web_sys::console::debug_1(&JsValue::from_str(&line));
}

impl TraceSink for ConsoleSink {
    fn on_wake(&mut self, e: &WakeEvent) {
        if self.verbose {
            log(format!(
                "[scrollstack] wake {:?} coalesced={} deferred={}",
                e.reason, e.coalesced, e.deferred
            ));
        }
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        if self.verbose {
            log(format!(
                "[scrollstack] pass {} begin scroll_top={:.1} height={:.1}",
                e.pass_index, e.scroll_top, e.container_height
            ));
        }
    }

    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        log(format!(
            "[scrollstack] pass {} skipped: {:?}",
            e.pass_index, e.reason
        ));
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        let what = match e.edge {
            CompletionEdge::Completed => "complete",
            CompletionEdge::Reset => "reset",
        };
        log(format!(
            "[scrollstack] pass {} stack {what} at scroll_top={:.1}",
            e.pass_index, e.scroll_top
        ));
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        if self.verbose || s.transforms_written + s.filters_written > 0 {
            log(format!(
                "[scrollstack] pass {} top={} transforms={} filters={} {:?}",
                s.pass_index,
                s.top_card_index,
                s.transforms_written,
                s.filters_written,
                s.completion
            ));
        }
    }
}
