// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-crate service double for unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Point;

use crate::error::ServiceError;
use crate::event::{EventKind, NativeEvent};
use crate::geo::{ClickLocation, LatLng};
use crate::handle::OverlayHandle;
use crate::id::{ChildOverlayId, OverlayId};
use crate::patch::OptionPatch;
use crate::service::{EventSource, NativeHandler, OverlayService, Subscription};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Register(OverlayId),
    Deregister(OverlayId),
    Patch(OptionPatch),
    Resync(OverlayId),
    OpenChild(ChildOverlayId),
    ResolveClick(u32),
    Subscribe(EventKind),
    Unsubscribe(EventKind),
    Note(&'static str),
}

struct Slot {
    token: u64,
    kind: EventKind,
    overlay: OverlayId,
    handler: Option<NativeHandler<u32>>,
}

#[derive(Default)]
struct Inner {
    calls: RefCell<Vec<Call>>,
    slots: RefCell<Vec<Slot>>,
    next_token: Cell<u64>,
    refusals: Cell<u32>,
    fail_patches: Cell<bool>,
    unsubscribes: Cell<usize>,
}

impl Inner {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

#[derive(Default)]
pub(crate) struct MockService {
    inner: Rc<Inner>,
}

impl MockService {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.inner.calls.borrow_mut().clear();
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.inner.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn note(&self, what: &'static str) {
        self.inner.record(Call::Note(what));
    }

    pub(crate) fn refuse_next(&self, n: u32) {
        self.inner.refusals.set(n);
    }

    pub(crate) fn fail_patches(&self, fail: bool) {
        self.inner.fail_patches.set(fail);
    }

    pub(crate) fn live_subscriptions(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    pub(crate) fn unsubscribe_count(&self) -> usize {
        self.inner.unsubscribes.get()
    }

    pub(crate) fn has_subscriber(&self, kind: EventKind, overlay: OverlayId) -> bool {
        self.inner
            .slots
            .borrow()
            .iter()
            .any(|s| s.kind == kind && s.overlay == overlay)
    }

    /// Removes and returns the handler for `kind`, leaving the subscription
    /// registered.
    pub(crate) fn take_handler(
        &self,
        kind: EventKind,
        overlay: OverlayId,
    ) -> Option<NativeHandler<u32>> {
        self.inner
            .slots
            .borrow_mut()
            .iter_mut()
            .find(|s| s.kind == kind && s.overlay == overlay)
            .and_then(|s| s.handler.take())
    }

    pub(crate) fn emit(&self, kind: EventKind, overlay: OverlayId, event: NativeEvent<u32>) {
        let taken = {
            let mut slots = self.inner.slots.borrow_mut();
            slots
                .iter_mut()
                .find(|s| s.kind == kind && s.overlay == overlay)
                .and_then(|s| s.handler.take().map(|h| (s.token, h)))
        };
        let Some((token, mut handler)) = taken else {
            return;
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
    }
}

pub(crate) struct MockSource {
    inner: Rc<Inner>,
    kind: EventKind,
    overlay: OverlayId,
}

pub(crate) struct MockSubscription {
    inner: Rc<Inner>,
    token: u64,
}

impl EventSource<u32> for MockSource {
    type Subscription = MockSubscription;

    fn subscribe(self, handler: NativeHandler<u32>) -> MockSubscription {
        let token = self.inner.next_token.get();
        self.inner.next_token.set(token + 1);
        self.inner.slots.borrow_mut().push(Slot {
            token,
            kind: self.kind,
            overlay: self.overlay,
            handler: Some(handler),
        });
        self.inner.record(Call::Subscribe(self.kind));
        MockSubscription {
            inner: self.inner,
            token,
        }
    }
}

impl Subscription for MockSubscription {
    fn unsubscribe(self) {
        let removed = {
            let mut slots = self.inner.slots.borrow_mut();
            let pos = slots.iter().position(|s| s.token == self.token);
            pos.map(|i| slots.remove(i))
        };
        if let Some(slot) = removed {
            self.inner.record(Call::Unsubscribe(slot.kind));
            self.inner.unsubscribes.set(self.inner.unsubscribes.get() + 1);
        }
    }
}

impl OverlayService for MockService {
    type Native = u32;
    type Source = MockSource;

    fn register(&self, handle: &OverlayHandle) -> Result<(), ServiceError> {
        self.inner.record(Call::Register(handle.id()));
        let refusals = self.inner.refusals.get();
        if refusals > 0 {
            self.inner.refusals.set(refusals - 1);
            return Err(ServiceError::refused("container not ready"));
        }
        Ok(())
    }

    fn deregister(&self, handle: &OverlayHandle) {
        self.inner.record(Call::Deregister(handle.id()));
    }

    fn apply_option_patch(
        &self,
        _handle: &OverlayHandle,
        patch: &OptionPatch,
    ) -> Result<(), ServiceError> {
        if self.inner.fail_patches.get() {
            return Err(ServiceError::provider("quota exceeded"));
        }
        self.inner.record(Call::Patch(patch.clone()));
        Ok(())
    }

    fn resync_geometry(&self, handle: &OverlayHandle) -> Result<(), ServiceError> {
        self.inner.record(Call::Resync(handle.id()));
        Ok(())
    }

    fn open_child_overlay_at(&self, child: ChildOverlayId, _location: &ClickLocation) {
        self.inner.record(Call::OpenChild(child));
    }

    fn resolve_click_coordinates(&self, native: &u32) -> ClickLocation {
        self.inner.record(Call::ResolveClick(*native));
        ClickLocation {
            position: LatLng::new(f64::from(*native), 0.0),
            pixel: Point::ZERO,
        }
    }

    fn event_stream(&self, kind: EventKind, handle: &OverlayHandle) -> MockSource {
        MockSource {
            inner: Rc::clone(&self.inner),
            kind,
            overlay: handle.id(),
        }
    }
}
