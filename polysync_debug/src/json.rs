// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter for recorded events.
//!
//! [`export`] writes the events held by a
//! [`RecorderSink`](super::recorder::RecorderSink) as a pretty-printed JSON
//! array, one object per event:
//!
//! ```json
//! { "seq": 0, "overlay": 7, "event": "register", "args": { ... } }
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded events as a JSON array.
///
/// `seq` is the event's position in `events`; `overlay` is the numeric
/// overlay id; `args` carries the event payload with camel-cased patch
/// fields.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());

    for (seq, recorded) in events.iter().enumerate() {
        let mut value = serde_json::to_value(recorded)?;
        if let Value::Object(map) = &mut value {
            map.insert("seq".to_owned(), json!(seq));
            map.insert("overlay".to_owned(), json!(recorded.overlay().get()));
        }
        out.push(value);
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}
