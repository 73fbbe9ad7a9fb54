// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-polygon lifecycle state machine.
//!
//! A [`LifecycleController`] owns one [`OverlayHandle`] and its
//! [`EventRelay`], and turns the host's lifecycle notifications into service
//! calls:
//!
//! ```text
//!  Uninitialized ──on_ready──▶ Initializing ──register ok──▶ Active
//!        │                      │    ▲                         │
//!        │                      └────┘ refused: retry on        │
//!        │                             next on_ready            │
//!        └──────────────on_dispose──────────▶ Destroyed ◀──on_dispose
//! ```
//!
//! Property changes are folded into the handle in every state, but only an
//! `Active` controller talks to the service about them: first the option
//! patch, then the geometry resync.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::fmt;

use crate::error::ServiceError;
use crate::event::OutputChannels;
use crate::geo::{GeometryChange, Paths};
use crate::handle::OverlayHandle;
use crate::id::{ChildOverlayId, ContainerId, OverlayId};
use crate::options::{PolygonOptions, PropertyDelta, PropertyValue};
use crate::patch::{ChangeRecord, build_patch};
use crate::relay::EventRelay;
use crate::service::{ContainerResolver, OverlayService};
use crate::trace::{
    RegisterEvent, RegisterOutcome, ResyncEvent, SubscriptionAction, SubscriptionEvent, Tracer,
    TransitionEvent,
};

/// Where a controller is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LifecycleState {
    /// Created; the host has not signalled readiness.
    Uninitialized,
    /// Container resolved; waiting for the service to accept registration.
    Initializing,
    /// Registered and subscribed.
    Active,
    /// Torn down. Terminal.
    Destroyed,
}

/// Drives one polygon overlay through its lifecycle.
pub struct LifecycleController<S: OverlayService, R = Option<ContainerId>> {
    service: Rc<S>,
    resolver: R,
    handle: OverlayHandle,
    relay: EventRelay<S>,
    state: LifecycleState,
}

impl<S: OverlayService, R> fmt::Debug for LifecycleController<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("state", &self.state)
            .field("handle", &self.handle)
            .field("relay", &self.relay)
            .finish_non_exhaustive()
    }
}

impl<S, R> LifecycleController<S, R>
where
    S: OverlayService + 'static,
    S::Native: 'static,
    R: ContainerResolver,
{
    /// Creates an uninitialized controller for a polygon with the given
    /// initial configuration.
    #[must_use]
    pub fn new(service: Rc<S>, resolver: R, options: PolygonOptions, paths: Paths) -> Self {
        let relay = EventRelay::new(&service, Rc::new(OutputChannels::new()));
        Self {
            service,
            resolver,
            handle: OverlayHandle::new(options, paths),
            relay,
            state: LifecycleState::Uninitialized,
        }
    }

    // -- Queries --

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns whether the service currently holds this overlay.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.handle.is_registered()
    }

    /// Returns the overlay's identity.
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.handle.id()
    }

    /// Returns the overlay's identity as decimal text.
    #[must_use]
    pub fn id_text(&self) -> String {
        self.handle.id().to_string()
    }

    /// Returns whether the polygon sits inside a custom layer.
    ///
    /// Always `false` before the first [`on_ready`](Self::on_ready).
    #[must_use]
    pub fn in_custom_layer(&self) -> bool {
        self.handle.container().is_some()
    }

    /// Returns the containing custom layer, if any.
    #[must_use]
    pub fn layer_id(&self) -> Option<ContainerId> {
        self.handle.container()
    }

    /// Returns the current options.
    #[must_use]
    pub fn options(&self) -> &PolygonOptions {
        self.handle.options()
    }

    /// Returns the current geometry.
    #[must_use]
    pub fn paths(&self) -> &Paths {
        self.handle.paths()
    }

    /// Returns the named output channels the host observes.
    #[must_use]
    pub fn outputs(&self) -> &Rc<OutputChannels<S::Native>> {
        self.relay.outputs()
    }

    /// Returns the underlying handle.
    #[must_use]
    pub fn handle(&self) -> &OverlayHandle {
        &self.handle
    }

    // -- Child overlay --

    /// Attaches an info overlay to open on primary clicks. Replaces any
    /// previous child.
    pub fn attach_child(&mut self, child: ChildOverlayId) {
        self.handle.child().set(Some(child));
    }

    /// Detaches the info overlay, returning it.
    pub fn detach_child(&mut self) -> Option<ChildOverlayId> {
        let child = self.handle.child().get();
        self.handle.child().set(None);
        child
    }

    // -- Hooks --

    /// Handles the host's content-ready signal.
    ///
    /// # Errors
    ///
    /// Propagates [`ServiceError::Provider`] from registration. A refusal is
    /// not an error: the controller stays `Initializing` and tries again on
    /// the next call.
    pub fn on_ready(&mut self) -> Result<(), ServiceError> {
        self.on_ready_traced(&mut Tracer::none())
    }

    /// [`on_ready`](Self::on_ready) reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`on_ready`](Self::on_ready).
    pub fn on_ready_traced(&mut self, tracer: &mut Tracer<'_>) -> Result<(), ServiceError> {
        match self.state {
            LifecycleState::Uninitialized => {
                self.handle.set_container(self.resolver.resolve_container());
                self.transition(LifecycleState::Initializing, tracer);
                self.try_register(tracer)
            }
            LifecycleState::Initializing => self.try_register(tracer),
            LifecycleState::Active | LifecycleState::Destroyed => Ok(()),
        }
    }

    /// Handles a property-change notification.
    ///
    /// New values are always stored. While `Active`, the minimal option patch
    /// is sent first, then a geometry resync if the paths changed after their
    /// initial binding. Entries whose previous value equals the current one
    /// are not sent.
    ///
    /// # Errors
    ///
    /// Propagates [`ServiceError::Provider`] from the patch or resync, the
    /// patch's error first. A failed patch does not hold back the resync.
    /// Values are stored even when sending fails.
    pub fn on_property_change(
        &mut self,
        delta: impl Into<PropertyDelta>,
    ) -> Result<(), ServiceError> {
        self.on_property_change_traced(delta, &mut Tracer::none())
    }

    /// [`on_property_change`](Self::on_property_change) reporting to
    /// `tracer`.
    ///
    /// # Errors
    ///
    /// See [`on_property_change`](Self::on_property_change).
    pub fn on_property_change_traced(
        &mut self,
        delta: impl Into<PropertyDelta>,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), ServiceError> {
        let mut record = ChangeRecord::new();
        for change in delta.into() {
            if !change.is_unchanged() {
                record.mark(change.property(), change.first_change);
            }
            match change.current {
                PropertyValue::Paths(paths) => self.handle.set_paths(paths),
                value => {
                    self.handle.options_mut().apply(value);
                }
            }
        }

        if self.state != LifecycleState::Active {
            return Ok(());
        }
        let patched = match build_patch(self.handle.id(), self.handle.options(), &record) {
            Some(patch) => self
                .service
                .apply_option_patch(&self.handle, &patch)
                .map(|()| tracer.patch(&patch)),
            None => Ok(()),
        };
        let resynced = if record.needs_geometry_resync() {
            self.resync(GeometryChange::Replaced, tracer)
        } else {
            Ok(())
        };
        patched.and(resynced)
    }

    /// Edits the geometry in place with `f`, returning its result.
    ///
    /// While `Active`, the edited geometry is resynced once afterwards.
    ///
    /// # Errors
    ///
    /// Propagates [`ServiceError::Provider`] from the resync. The edit is
    /// kept even when the resync fails.
    pub fn edit_paths<T>(&mut self, f: impl FnOnce(&mut Paths) -> T) -> Result<T, ServiceError> {
        self.edit_paths_traced(f, &mut Tracer::none())
    }

    /// [`edit_paths`](Self::edit_paths) reporting to `tracer`.
    ///
    /// # Errors
    ///
    /// See [`edit_paths`](Self::edit_paths).
    pub fn edit_paths_traced<T>(
        &mut self,
        f: impl FnOnce(&mut Paths) -> T,
        tracer: &mut Tracer<'_>,
    ) -> Result<T, ServiceError> {
        let out = f(self.handle.paths_mut());
        if self.state == LifecycleState::Active {
            self.resync(GeometryChange::Mutated, tracer)?;
        }
        Ok(out)
    }

    /// Handles the host's teardown signal.
    ///
    /// Deregisters (if registered) and releases every subscription. Safe to
    /// call repeatedly; only the first call does anything.
    pub fn on_dispose(&mut self) {
        self.on_dispose_traced(&mut Tracer::none());
    }

    /// [`on_dispose`](Self::on_dispose) reporting to `tracer`.
    pub fn on_dispose_traced(&mut self, tracer: &mut Tracer<'_>) {
        if self.state == LifecycleState::Destroyed {
            return;
        }
        if self.handle.is_registered() {
            self.service.deregister(&self.handle);
            self.handle.set_registered(false);
            tracer.deregister(self.handle.id());
        }
        let released = self.relay.release();
        if released > 0 {
            tracer.subscriptions(&SubscriptionEvent {
                overlay: self.handle.id(),
                action: SubscriptionAction::Released,
                count: released,
            });
        }
        self.transition(LifecycleState::Destroyed, tracer);
    }

    // -- Internals --

    fn try_register(&mut self, tracer: &mut Tracer<'_>) -> Result<(), ServiceError> {
        let outcome = match self.service.register(&self.handle) {
            Ok(()) => RegisterOutcome::Registered,
            Err(err) if err.is_refusal() => RegisterOutcome::Refused,
            Err(err) => return Err(err),
        };
        tracer.register(&RegisterEvent {
            overlay: self.handle.id(),
            container: self.handle.container(),
            outcome,
        });
        if outcome == RegisterOutcome::Refused {
            return Ok(());
        }

        self.handle.set_registered(true);
        self.transition(LifecycleState::Active, tracer);
        let attached = self.relay.attach(&self.handle);
        tracer.subscriptions(&SubscriptionEvent {
            overlay: self.handle.id(),
            action: SubscriptionAction::Attached,
            count: attached,
        });
        Ok(())
    }

    fn resync(&self, change: GeometryChange, tracer: &mut Tracer<'_>) -> Result<(), ServiceError> {
        self.service.resync_geometry(&self.handle)?;
        let paths = self.handle.paths();
        tracer.resync(&ResyncEvent {
            overlay: self.handle.id(),
            change,
            rings: paths.len(),
            points: paths.point_count(),
        });
        Ok(())
    }

    fn transition(&mut self, to: LifecycleState, tracer: &mut Tracer<'_>) {
        let from = core::mem::replace(&mut self.state, to);
        tracer.transition(&TransitionEvent {
            overlay: self.handle.id(),
            from,
            to,
        });
    }
}
