// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable recording overlay service for polysync hosts and tests.
//!
//! [`RecordingService`] implements
//! [`OverlayService`](polysync_core::service::OverlayService) without a map
//! provider behind it. It keeps an ordered log of every call it receives
//! ([`ServiceCall`]), tracks which overlays are registered and subscribed,
//! and lets tests inject native events with [`RecordingService::emit`].
//!
//! Failure injection:
//!
//! - [`refuse_registrations`](RecordingService::refuse_registrations) makes
//!   the next `n` registrations return
//!   [`ServiceError::Refused`](polysync_core::error::ServiceError::Refused).
//! - [`fail_next_patch`](RecordingService::fail_next_patch) makes the next
//!   option patch return a provider error.
//!
//! Like a real provider, the service ignores patches and resyncs for
//! overlays it does not hold.

#![no_std]

extern crate alloc;

use alloc::borrow::ToOwned;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Point;
use polysync_core::error::ServiceError;
use polysync_core::event::{EventKind, NativeEvent};
use polysync_core::geo::{ClickLocation, LatLng, Paths};
use polysync_core::handle::OverlayHandle;
use polysync_core::id::{ChildOverlayId, ContainerId, OverlayId};
use polysync_core::options::PolygonOptions;
use polysync_core::patch::OptionPatch;
use polysync_core::service::{EventSource, NativeHandler, OverlayService, Subscription};

/// The native pointer event delivered by [`RecordingService`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Geographic position under the pointer.
    pub position: LatLng,
    /// Screen position in pixels.
    pub pixel: Point,
}

impl PointerSample {
    /// Creates a sample at `position`, shown at `pixel`.
    #[must_use]
    pub const fn new(position: LatLng, pixel: Point) -> Self {
        Self { position, pixel }
    }
}

/// One entry in a [`RecordingService`]'s call log.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceCall {
    /// An accepted registration, with the configuration it was made with.
    Register {
        /// The overlay.
        overlay: OverlayId,
        /// Its container.
        container: Option<ContainerId>,
        /// Options at registration time.
        options: PolygonOptions,
        /// Geometry at registration time.
        paths: Paths,
    },
    /// A refused registration attempt.
    Refused(OverlayId),
    /// A deregistration.
    Deregister(OverlayId),
    /// An applied option patch.
    Patch(OptionPatch),
    /// An applied geometry resync.
    Resync {
        /// The overlay.
        overlay: OverlayId,
        /// Geometry after the resync.
        paths: Paths,
    },
    /// A click-coordinate resolution.
    ResolveClick(PointerSample),
    /// A child overlay opened.
    OpenChild {
        /// The child.
        child: ChildOverlayId,
        /// Where it was opened.
        location: ClickLocation,
    },
    /// An event subscription.
    Subscribe {
        /// The overlay.
        overlay: OverlayId,
        /// The event kind.
        kind: EventKind,
    },
    /// A subscription release.
    Unsubscribe {
        /// The overlay.
        overlay: OverlayId,
        /// The event kind.
        kind: EventKind,
    },
    /// A caller-inserted marker, see [`RecordingService::mark`].
    Mark(&'static str),
}

struct Slot {
    token: u64,
    overlay: OverlayId,
    kind: EventKind,
    handler: Option<NativeHandler<PointerSample>>,
}

#[derive(Default)]
struct Inner {
    calls: RefCell<Vec<ServiceCall>>,
    registered: RefCell<Vec<OverlayId>>,
    slots: RefCell<Vec<Slot>>,
    next_token: Cell<u64>,
    refusals: Cell<usize>,
    patch_failure: RefCell<Option<String>>,
}

impl Inner {
    fn record(&self, call: ServiceCall) {
        self.calls.borrow_mut().push(call);
    }

    fn holds(&self, overlay: OverlayId) -> bool {
        self.registered.borrow().contains(&overlay)
    }
}

/// An in-memory [`OverlayService`] that records every call.
///
/// Clones share state.
#[derive(Clone, Default)]
pub struct RecordingService {
    inner: Rc<Inner>,
}

impl fmt::Debug for RecordingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingService")
            .field("calls", &self.inner.calls.borrow().len())
            .field("registered", &self.inner.registered.borrow())
            .field("subscriptions", &self.inner.slots.borrow().len())
            .finish_non_exhaustive()
    }
}

impl RecordingService {
    /// Creates a service that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Call log --

    /// Returns a copy of the call log.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.inner.calls.borrow().clone()
    }

    /// Returns the call log and clears it.
    pub fn take_calls(&self) -> Vec<ServiceCall> {
        core::mem::take(&mut *self.inner.calls.borrow_mut())
    }

    /// Returns how many logged calls match `pred`.
    #[must_use]
    pub fn count(&self, pred: impl Fn(&ServiceCall) -> bool) -> usize {
        self.inner.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Appends a marker to the call log, for checking the order of host-side
    /// reactions relative to service calls.
    pub fn mark(&self, label: &'static str) {
        self.inner.record(ServiceCall::Mark(label));
    }

    // -- State --

    /// Returns whether `overlay` is currently registered.
    #[must_use]
    pub fn is_registered(&self, overlay: OverlayId) -> bool {
        self.inner.holds(overlay)
    }

    /// Returns the number of live subscriptions for `overlay`.
    #[must_use]
    pub fn subscriber_count(&self, overlay: OverlayId) -> usize {
        self.inner
            .slots
            .borrow()
            .iter()
            .filter(|s| s.overlay == overlay)
            .count()
    }

    // -- Failure injection --

    /// Refuses the next `n` registrations.
    pub fn refuse_registrations(&self, n: usize) {
        self.inner.refusals.set(n);
    }

    /// Fails the next option patch with a provider error carrying `message`.
    pub fn fail_next_patch(&self, message: &str) {
        *self.inner.patch_failure.borrow_mut() = Some(message.to_owned());
    }

    // -- Event injection --

    /// Delivers `event` to the subscriber for `kind` on `overlay`.
    ///
    /// Returns whether a subscriber received it. The subscriber may call back
    /// into the service while it runs.
    pub fn emit(
        &self,
        kind: EventKind,
        overlay: OverlayId,
        event: NativeEvent<PointerSample>,
    ) -> bool {
        let taken = {
            let mut slots = self.inner.slots.borrow_mut();
            slots
                .iter_mut()
                .find(|s| s.kind == kind && s.overlay == overlay)
                .and_then(|s| s.handler.take().map(|h| (s.token, h)))
        };
        let Some((token, mut handler)) = taken else {
            return false;
        };
        handler(event);
        if let Some(slot) = self
            .inner
            .slots
            .borrow_mut()
            .iter_mut()
            .find(|s| s.token == token)
        {
            slot.handler = Some(handler);
        }
        true
    }

    /// Delivers a primary click at `sample` on `overlay`.
    pub fn click(&self, overlay: OverlayId, sample: PointerSample) -> bool {
        self.emit(EventKind::Click, overlay, NativeEvent::Pointer(sample))
    }
}

/// Event stream handed out by [`RecordingService::event_stream`].
pub struct RecordingSource {
    inner: Rc<Inner>,
    overlay: OverlayId,
    kind: EventKind,
}

impl fmt::Debug for RecordingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSource")
            .field("overlay", &self.overlay)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Subscription returned by [`RecordingSource`].
pub struct RecordingSubscription {
    inner: Rc<Inner>,
    token: u64,
}

impl fmt::Debug for RecordingSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSubscription")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl EventSource<PointerSample> for RecordingSource {
    type Subscription = RecordingSubscription;

    fn subscribe(self, handler: NativeHandler<PointerSample>) -> RecordingSubscription {
        let token = self.inner.next_token.get();
        self.inner.next_token.set(token + 1);
        self.inner.slots.borrow_mut().push(Slot {
            token,
            overlay: self.overlay,
            kind: self.kind,
            handler: Some(handler),
        });
        self.inner.record(ServiceCall::Subscribe {
            overlay: self.overlay,
            kind: self.kind,
        });
        RecordingSubscription {
            inner: self.inner,
            token,
        }
    }
}

impl Subscription for RecordingSubscription {
    fn unsubscribe(self) {
        let removed = {
            let mut slots = self.inner.slots.borrow_mut();
            let pos = slots.iter().position(|s| s.token == self.token);
            pos.map(|i| slots.remove(i))
        };
        if let Some(slot) = removed {
            self.inner.record(ServiceCall::Unsubscribe {
                overlay: slot.overlay,
                kind: slot.kind,
            });
        }
    }
}

impl OverlayService for RecordingService {
    type Native = PointerSample;
    type Source = RecordingSource;

    fn register(&self, handle: &OverlayHandle) -> Result<(), ServiceError> {
        let refusals = self.inner.refusals.get();
        if refusals > 0 {
            self.inner.refusals.set(refusals - 1);
            self.inner.record(ServiceCall::Refused(handle.id()));
            return Err(ServiceError::refused("container not ready"));
        }
        self.inner.registered.borrow_mut().push(handle.id());
        self.inner.record(ServiceCall::Register {
            overlay: handle.id(),
            container: handle.container(),
            options: handle.options().clone(),
            paths: handle.paths().clone(),
        });
        Ok(())
    }

    fn deregister(&self, handle: &OverlayHandle) {
        let removed = {
            let mut registered = self.inner.registered.borrow_mut();
            let pos = registered.iter().position(|&id| id == handle.id());
            pos.map(|i| registered.remove(i))
        };
        if removed.is_some() {
            self.inner.record(ServiceCall::Deregister(handle.id()));
        }
    }

    fn apply_option_patch(
        &self,
        handle: &OverlayHandle,
        patch: &OptionPatch,
    ) -> Result<(), ServiceError> {
        if let Some(message) = self.inner.patch_failure.borrow_mut().take() {
            return Err(ServiceError::provider(message));
        }
        if self.inner.holds(handle.id()) {
            self.inner.record(ServiceCall::Patch(patch.clone()));
        }
        Ok(())
    }

    fn resync_geometry(&self, handle: &OverlayHandle) -> Result<(), ServiceError> {
        if self.inner.holds(handle.id()) {
            self.inner.record(ServiceCall::Resync {
                overlay: handle.id(),
                paths: handle.paths().clone(),
            });
        }
        Ok(())
    }

    fn open_child_overlay_at(&self, child: ChildOverlayId, location: &ClickLocation) {
        self.inner.record(ServiceCall::OpenChild {
            child,
            location: *location,
        });
    }

    fn resolve_click_coordinates(&self, native: &PointerSample) -> ClickLocation {
        self.inner.record(ServiceCall::ResolveClick(*native));
        ClickLocation {
            position: native.position,
            pixel: native.pixel,
        }
    }

    fn event_stream(&self, kind: EventKind, handle: &OverlayHandle) -> RecordingSource {
        RecordingSource {
            inner: Rc::clone(&self.inner),
            overlay: handle.id(),
            kind,
        }
    }
}
