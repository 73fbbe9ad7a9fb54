// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event it
//! receives, in order, as a [`RecordedEvent`]. Recordings can be inspected
//! directly in tests or handed to [`json::export`](crate::json::export).

use polysync_core::id::OverlayId;
use polysync_core::patch::OptionPatch;
use polysync_core::trace::{
    RegisterEvent, ResyncEvent, SubscriptionEvent, TraceSink, TransitionEvent,
};
use serde::Serialize;

/// One recorded trace event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "args", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// A state change.
    Transition(TransitionEvent),
    /// A registration attempt.
    Register(RegisterEvent),
    /// A forwarded option patch.
    Patch(OptionPatch),
    /// A forwarded geometry resync.
    Resync(ResyncEvent),
    /// Subscriptions attached or released.
    Subscriptions(SubscriptionEvent),
    /// A deregistration.
    Deregister(OverlayId),
}

impl RecordedEvent {
    /// Returns the overlay the event concerns.
    #[must_use]
    pub fn overlay(&self) -> OverlayId {
        match self {
            Self::Transition(e) => e.overlay,
            Self::Register(e) => e.overlay,
            Self::Patch(p) => p.id,
            Self::Resync(e) => e.overlay,
            Self::Subscriptions(e) => e.overlay,
            Self::Deregister(id) => *id,
        }
    }

    /// Returns a short name for the event's kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transition(_) => "transition",
            Self::Register(_) => "register",
            Self::Patch(_) => "patch",
            Self::Resync(_) => "resync",
            Self::Subscriptions(_) => "subscriptions",
            Self::Deregister(_) => "deregister",
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }
}

impl TraceSink for RecorderSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.events.push(RecordedEvent::Transition(*e));
    }

    fn on_register(&mut self, e: &RegisterEvent) {
        self.events.push(RecordedEvent::Register(*e));
    }

    fn on_patch(&mut self, patch: &OptionPatch) {
        self.events.push(RecordedEvent::Patch(patch.clone()));
    }

    fn on_resync(&mut self, e: &ResyncEvent) {
        self.events.push(RecordedEvent::Resync(*e));
    }

    fn on_subscriptions(&mut self, e: &SubscriptionEvent) {
        self.events.push(RecordedEvent::Subscriptions(*e));
    }

    fn on_deregister(&mut self, overlay: OverlayId) {
        self.events.push(RecordedEvent::Deregister(overlay));
    }
}
