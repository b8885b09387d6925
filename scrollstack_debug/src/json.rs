// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON trace export.
//!
//! [`JsonTraceSink`] keeps every event it receives as a [`serde_json::Value`]
//! and writes them out as one JSON array with [`JsonTraceSink::write_to`].
//! Each object carries a `name`, the `pass` index where one applies, and an
//! `args` object with the event fields.

use std::io::{self, Write};

use serde_json::{Value, json};

use scrollstack_core::trace::{
    CompletionEvent, ItemChange, ItemField, PassBeginEvent, PassSkippedEvent, PassSummary,
    TraceSink, WakeEvent,
};

/// Collects trace events as JSON values.
#[derive(Debug, Default)]
pub struct JsonTraceSink {
    events: Vec<Value>,
}

impl JsonTraceSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events collected so far.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Number of events collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards collected events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Writes the collected events as a pretty-printed JSON array.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    /// Consumes the sink and returns the events as a JSON array.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Array(self.events)
    }
}

impl TraceSink for JsonTraceSink {
    fn on_wake(&mut self, e: &WakeEvent) {
        self.events.push(json!({
            "name": "Wake",
            "args": {
                "reason": format!("{:?}", e.reason),
                "coalesced": e.coalesced,
                "deferred": e.deferred,
            }
        }));
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.events.push(json!({
            "name": "PassBegin",
            "pass": e.pass_index,
            "args": {
                "scroll_top": e.scroll_top,
                "container_height": e.container_height,
            }
        }));
    }

    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        self.events.push(json!({
            "name": "PassSkipped",
            "pass": e.pass_index,
            "args": {
                "reason": format!("{:?}", e.reason),
            }
        }));
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        self.events.push(json!({
            "name": "Completion",
            "pass": e.pass_index,
            "args": {
                "edge": format!("{:?}", e.edge),
                "scroll_top": e.scroll_top,
            }
        }));
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.events.push(json!({
            "name": "PassSummary",
            "pass": s.pass_index,
            "args": {
                "scroll_top": s.scroll_top,
                "container_height": s.container_height,
                "item_count": s.item_count,
                "top_card_index": s.top_card_index,
                "transforms_written": s.transforms_written,
                "filters_written": s.filters_written,
                "completion": format!("{:?}", s.completion),
            }
        }));
    }

    fn on_item_changes(&mut self, pass_index: u64, changes: &[ItemChange]) {
        let items: Vec<Value> = changes
            .iter()
            .map(|c| match c.field {
                ItemField::Transform => json!({
                    "item": c.item_index,
                    "translate_y": c.value.translate_y,
                    "scale": c.value.scale,
                    "rotation": c.value.rotation,
                }),
                ItemField::Filter => json!({
                    "item": c.item_index,
                    "blur": c.value.blur,
                }),
            })
            .collect();
        self.events.push(json!({
            "name": "ItemChanges",
            "pass": pass_index,
            "args": { "items": items }
        }));
    }
}
