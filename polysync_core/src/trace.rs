// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for overlay lifecycles.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`LifecycleController`](crate::lifecycle::LifecycleController) calls at
//! each step. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: Enables the `Tracer` method bodies (one branch per call).

use crate::geo::GeometryChange;
use crate::id::{ContainerId, OverlayId};
use crate::lifecycle::LifecycleState;
use crate::patch::OptionPatch;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Result of a registration attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RegisterOutcome {
    /// The service accepted the overlay.
    Registered,
    /// The service refused; the controller will retry on the next ready
    /// signal.
    Refused,
}

/// What happened to an overlay's subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SubscriptionAction {
    /// Adapters were subscribed.
    Attached,
    /// Subscriptions were released.
    Released,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a controller changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransitionEvent {
    /// The overlay.
    pub overlay: OverlayId,
    /// State before the transition.
    pub from: LifecycleState,
    /// State after the transition.
    pub to: LifecycleState,
}

/// Emitted after each registration attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegisterEvent {
    /// The overlay.
    pub overlay: OverlayId,
    /// The container it was registered into.
    pub container: Option<ContainerId>,
    /// What the service said.
    pub outcome: RegisterOutcome,
}

/// Emitted after a geometry resync is forwarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResyncEvent {
    /// The overlay.
    pub overlay: OverlayId,
    /// How the geometry changed.
    pub change: GeometryChange,
    /// Ring count after the change.
    pub rings: usize,
    /// Point count after the change.
    pub points: usize,
}

/// Emitted when subscriptions are attached or released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubscriptionEvent {
    /// The overlay.
    pub overlay: OverlayId,
    /// Attach or release.
    pub action: SubscriptionAction,
    /// Number of subscriptions affected.
    pub count: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from lifecycle controllers.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a controller changes state.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called after each registration attempt.
    fn on_register(&mut self, e: &RegisterEvent) {
        _ = e;
    }

    /// Called after an option patch is forwarded.
    fn on_patch(&mut self, patch: &OptionPatch) {
        _ = patch;
    }

    /// Called after a geometry resync is forwarded.
    fn on_resync(&mut self, e: &ResyncEvent) {
        _ = e;
    }

    /// Called when subscriptions are attached or released.
    fn on_subscriptions(&mut self, e: &SubscriptionEvent) {
        _ = e;
    }

    /// Called after an overlay is deregistered.
    fn on_deregister(&mut self, overlay: OverlayId) {
        _ = overlay;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RegisterEvent`].
    #[inline]
    pub fn register(&mut self, e: &RegisterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_register(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a forwarded [`OptionPatch`].
    #[inline]
    pub fn patch(&mut self, patch: &OptionPatch) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_patch(patch);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = patch;
        }
    }

    /// Emits a [`ResyncEvent`].
    #[inline]
    pub fn resync(&mut self, e: &ResyncEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resync(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SubscriptionEvent`].
    #[inline]
    pub fn subscriptions(&mut self, e: &SubscriptionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_subscriptions(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a deregistration.
    #[inline]
    pub fn deregister(&mut self, overlay: OverlayId) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_deregister(overlay);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = overlay;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
