// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON export for scrollstack diagnostics.
//!
//! This crate provides [`TraceSink`](scrollstack_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`json::JsonTraceSink`]: collects events as JSON objects and writes them
//!   out as a single array.

pub mod json;
pub mod pretty;
