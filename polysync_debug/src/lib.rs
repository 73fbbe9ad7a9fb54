// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for polysync diagnostics.
//!
//! This crate provides [`TraceSink`](polysync_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: Human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: In-memory recording of
//!   [`recorder::RecordedEvent`]s.
//! - [`json::export`]: Writes recorded events as a JSON array.

pub mod json;
pub mod pretty;
pub mod recorder;
