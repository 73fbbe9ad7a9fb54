// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use polysync_core::geo::GeometryChange;
use polysync_core::id::OverlayId;
use polysync_core::lifecycle::LifecycleState;
use polysync_core::patch::OptionPatch;
use polysync_core::trace::{
    RegisterEvent, RegisterOutcome, ResyncEvent, SubscriptionAction, SubscriptionEvent,
    TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn state_name(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Uninitialized => "uninitialized",
        LifecycleState::Initializing => "initializing",
        LifecycleState::Active => "active",
        LifecycleState::Destroyed => "destroyed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[state] overlay={} {} -> {}",
            e.overlay,
            state_name(e.from),
            state_name(e.to),
        );
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        let outcome = match e.outcome {
            RegisterOutcome::Registered => "ok",
            RegisterOutcome::Refused => "REFUSED",
        };
        let container = e
            .container
            .map_or_else(|| "default".to_owned(), |c| c.0.to_string());
        let _ = writeln!(
            self.writer,
            "[register] overlay={} container={container} {outcome}",
            e.overlay,
        );
    }

    fn on_patch(&mut self, patch: &OptionPatch) {
        let _ = writeln!(
            self.writer,
            "[patch] overlay={} fields={}",
            patch.id,
            patch.field_count(),
        );
    }

    fn on_resync(&mut self, e: &ResyncEvent) {
        let change = match e.change {
            GeometryChange::Replaced => "replaced",
            GeometryChange::Mutated => "mutated",
        };
        let _ = writeln!(
            self.writer,
            "[resync] overlay={} {change} rings={} points={}",
            e.overlay, e.rings, e.points,
        );
    }

    fn on_subscriptions(&mut self, e: &SubscriptionEvent) {
        let action = match e.action {
            SubscriptionAction::Attached => "attached",
            SubscriptionAction::Released => "released",
        };
        let _ = writeln!(
            self.writer,
            "[subs] overlay={} {action} count={}",
            e.overlay, e.count,
        );
    }

    fn on_deregister(&mut self, overlay: OverlayId) {
        let _ = writeln!(self.writer, "[deregister] overlay={overlay}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysync_core::id::ContainerId;

    #[test]
    fn pretty_print_register() {
        let overlay = OverlayId::next();
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_register(&RegisterEvent {
            overlay,
            container: Some(ContainerId(3)),
            outcome: RegisterOutcome::Refused,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[register]"), "got: {output}");
        assert!(output.contains(&format!("overlay={overlay}")), "got: {output}");
        assert!(output.contains("container=3 REFUSED"), "got: {output}");
    }

    #[test]
    fn pretty_print_patch_counts_fields() {
        let mut patch = OptionPatch::empty(OverlayId::next());
        patch.fill_color = Some(Some("#fff".to_owned()));
        patch.fill_opacity = Some(None);
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_patch(&patch);
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("fields=2"), "got: {output}");
    }
}
