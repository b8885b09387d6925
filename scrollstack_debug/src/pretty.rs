// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use scrollstack_core::completion::{CompletionEdge, CompletionState};
use scrollstack_core::lifecycle::SkipReason;
use scrollstack_core::scheduler::WakeReason;
use scrollstack_core::trace::{
    CompletionEvent, ItemChange, ItemField, PassBeginEvent, PassSkippedEvent, PassSummary,
    TraceSink, WakeEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    item_detail: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("item_detail", &self.item_detail)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            item_detail: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            item_detail: false,
        }
    }

    /// Prints one line per item write instead of a count.
    #[must_use]
    pub fn with_item_detail(mut self, on: bool) -> Self {
        self.item_detail = on;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn reason_name(reason: WakeReason) -> &'static str {
    match reason {
        WakeReason::Scroll => "scroll",
        WakeReason::Resize => "resize",
        WakeReason::SmoothScroll => "smooth",
        WakeReason::Mount => "mount",
    }
}

fn skip_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotMounted => "not-mounted",
        SkipReason::NotScheduled => "not-scheduled",
        SkipReason::Reentrant => "reentrant",
        SkipReason::AwaitingLayout => "awaiting-layout",
        SkipReason::Static => "static",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_wake(&mut self, e: &WakeEvent) {
        let mut flags = String::new();
        if e.coalesced {
            flags.push_str(" coalesced");
        }
        if e.deferred {
            flags.push_str(" deferred");
        }
        let _ = writeln!(self.writer, "[wake] {}{flags}", reason_name(e.reason));
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} scroll={:.1}px height={:.1}px",
            e.pass_index, e.scroll_top, e.container_height,
        );
    }

    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:skip] pass={} {}",
            e.pass_index,
            skip_name(e.reason),
        );
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        let edge = match e.edge {
            CompletionEdge::Completed => "COMPLETE",
            CompletionEdge::Reset => "reset",
        };
        let _ = writeln!(
            self.writer,
            "[complete] pass={} {edge} at {:.1}px",
            e.pass_index, e.scroll_top,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let state = match s.completion {
            CompletionState::Idle => "idle",
            CompletionState::Completed => "complete",
        };
        let _ = writeln!(
            self.writer,
            "[summary] pass={} scroll={:.1}px items={} top={} transforms={} filters={} {state}",
            s.pass_index,
            s.scroll_top,
            s.item_count,
            s.top_card_index,
            s.transforms_written,
            s.filters_written,
        );
    }

    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        if !self.item_detail {
            let _ = writeln!(
                self.writer,
                "[items] pass={pass_index} writes={}",
                changes.len(),
            );
            return;
        }
        for c in changes {
            let v = c.value;
            let _ = match c.field {
                ItemField::Transform => writeln!(
                    self.writer,
                    "[item] pass={pass_index} #{} y={:.1} scale={:.3} rot={:.1}",
                    c.item_index, v.translate_y, v.scale, v.rotation,
                ),
                ItemField::Filter => writeln!(
                    self.writer,
                    "[item] pass={pass_index} #{} blur={:.1}",
                    c.item_index, v.blur,
                ),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollstack_core::transform::CardTransform;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_wake() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_wake(&WakeEvent {
            reason: WakeReason::Scroll,
            coalesced: true,
            deferred: false,
        });
        let output = output(sink);
        assert_eq!(output, "[wake] scroll coalesced\n");
    }

    #[test]
    fn pretty_print_summary_and_completion() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_completion(&CompletionEvent {
            pass_index: 7,
            edge: CompletionEdge::Completed,
            scroll_top: 1100.0,
        });
        sink.on_pass_summary(&PassSummary {
            pass_index: 7,
            scroll_top: 1100.0,
            container_height: 800.0,
            item_count: 3,
            top_card_index: 2,
            transforms_written: 3,
            filters_written: 0,
            completion: CompletionState::Completed,
        });
        let output = output(sink);
        assert!(output.contains("[complete] pass=7 COMPLETE"), "got: {output}");
        assert!(output.contains("top=2 transforms=3"), "got: {output}");
        assert!(output.ends_with("complete\n"), "got: {output}");
    }

    #[test]
    fn item_changes_count_or_detail() {
        let changes = [
            ItemChange {
                item_index: 0,
                field: ItemField::Transform,
                value: CardTransform::IDENTITY,
            },
            ItemChange {
                item_index: 0,
                field: ItemField::Filter,
                value: CardTransform::IDENTITY,
            },
        ];

        let mut terse = PrettyPrintSink::with_writer(Vec::<u8>::new());
        terse.on_item_changes(3, &changes);
        assert_eq!(output(terse), "[items] pass=3 writes=2\n");

        let mut detailed = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_item_detail(true);
        detailed.on_item_changes(3, &changes);
        let text = output(detailed);
        assert_eq!(text.lines().count(), 2, "got: {text}");
        assert!(text.contains("scale=1.000"), "got: {text}");
        assert!(text.contains("blur=0.0"), "got: {text}");
    }

    #[test]
    fn skip_reasons_are_named() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_pass_skipped(&PassSkippedEvent {
            pass_index: 0,
            reason: SkipReason::AwaitingLayout,
        });
        assert_eq!(output(sink), "[pass:skip] pass=0 awaiting-layout\n");
    }
}
