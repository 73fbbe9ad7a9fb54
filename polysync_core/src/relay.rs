// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exclusive event subscriptions for one overlay.
//!
//! An [`EventRelay`] bridges the service's native event streams for one
//! overlay into the [`OutputChannels`] observed by the host. It subscribes
//! one adapter per [`EventKind`] on [`attach`](EventRelay::attach) and
//! unsubscribes all of them on [`release`](EventRelay::release).
//!
//! Adapters wrap raw events into [`OverlayEvent`] envelopes. A primary click
//! on an overlay with an attached child first resolves the click location
//! and opens the child there, then emits the envelope, so click observers
//! can rely on the child being positioned.
//!
//! Each adapter only forwards payloads that fit its own kind: vertex edits
//! on the paths stream, pointer events everywhere else. Anything else is
//! dropped. Once released, adapters drop everything they receive, even if
//! the service keeps calling them.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use crate::event::{EventKind, NativeEvent, OutputChannels, OverlayEvent, PointerEvent};
use crate::handle::{ChildSlot, OverlayHandle};
use crate::id::OverlayId;
use crate::service::{EventSource, NativeHandler, OverlayService, Subscription};

type SubscriptionOf<S> = <<S as OverlayService>::Source as EventSource<
    <S as OverlayService>::Native,
>>::Subscription;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RelayState {
    Detached,
    Attached,
    Released,
}

/// Owns the event subscriptions of one overlay.
pub struct EventRelay<S: OverlayService> {
    service: Weak<S>,
    outputs: Rc<OutputChannels<S::Native>>,
    live: Rc<Cell<bool>>,
    subscriptions: Vec<SubscriptionOf<S>>,
    state: RelayState,
}

impl<S: OverlayService> fmt::Debug for EventRelay<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRelay")
            .field("state", &self.state)
            .field("subscriptions", &self.subscriptions.len())
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

impl<S> EventRelay<S>
where
    S: OverlayService + 'static,
    S::Native: 'static,
{
    /// Creates a detached relay emitting into `outputs`.
    #[must_use]
    pub fn new(service: &Rc<S>, outputs: Rc<OutputChannels<S::Native>>) -> Self {
        Self {
            service: Rc::downgrade(service),
            outputs,
            live: Rc::new(Cell::new(false)),
            subscriptions: Vec::new(),
            state: RelayState::Detached,
        }
    }

    /// Returns the output channels events are emitted on.
    #[must_use]
    pub fn outputs(&self) -> &Rc<OutputChannels<S::Native>> {
        &self.outputs
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns whether [`attach`](Self::attach) has run and
    /// [`release`](Self::release) has not.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state == RelayState::Attached
    }

    /// Subscribes one adapter per event kind to `handle`'s streams.
    ///
    /// Returns the number of subscriptions made; zero if the relay was
    /// already attached or has been released.
    pub fn attach(&mut self, handle: &OverlayHandle) -> usize {
        if self.state != RelayState::Detached {
            return 0;
        }
        let Some(service) = self.service.upgrade() else {
            return 0;
        };
        self.live.set(true);
        for kind in EventKind::ALL {
            let handler = self.adapter(kind, handle.id(), handle.child().clone());
            let source = service.event_stream(kind, handle);
            self.subscriptions.push(source.subscribe(handler));
        }
        self.state = RelayState::Attached;
        self.subscriptions.len()
    }

    /// Unsubscribes every subscription made by [`attach`](Self::attach).
    ///
    /// Returns the number released. Safe to call before `attach` or more than
    /// once; later calls release nothing.
    pub fn release(&mut self) -> usize {
        if self.state != RelayState::Attached {
            return 0;
        }
        self.live.set(false);
        let released = self.subscriptions.len();
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.state = RelayState::Released;
        released
    }

    fn adapter(
        &self,
        kind: EventKind,
        overlay: OverlayId,
        child: ChildSlot,
    ) -> NativeHandler<S::Native> {
        let service = self.service.clone();
        let outputs = Rc::clone(&self.outputs);
        let live = Rc::clone(&self.live);
        Box::new(move |native: NativeEvent<S::Native>| {
            if !live.get() {
                return;
            }
            let event = match (kind, native) {
                (EventKind::PathsChanged, NativeEvent::PathEdit(edit)) => {
                    OverlayEvent::PathEdit(edit)
                }
                (EventKind::PathsChanged, NativeEvent::Pointer(_))
                | (_, NativeEvent::PathEdit(_)) => return,
                (kind, NativeEvent::Pointer(native)) => {
                    if kind == EventKind::Click {
                        open_child_at_click(&service, &child, &native);
                    }
                    OverlayEvent::Pointer(PointerEvent {
                        overlay,
                        kind,
                        native,
                    })
                }
            };
            outputs.emit(event);
        })
    }
}

/// Opens the attached child, if any, where the click landed.
fn open_child_at_click<S: OverlayService>(
    service: &Weak<S>,
    child: &ChildSlot,
    native: &S::Native,
) {
    let Some(child) = child.get() else {
        return;
    };
    let Some(service) = service.upgrade() else {
        return;
    };
    let location = service.resolve_click_coordinates(native);
    service.open_child_overlay_at(child, &location);
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::event::{PathEdit, PathEditEvent};
    use crate::geo::Paths;
    use crate::id::ChildOverlayId;
    use crate::options::PolygonOptions;
    use crate::testing::{Call, MockService};

    fn setup() -> (Rc<MockService>, OverlayHandle, EventRelay<MockService>) {
        let service = Rc::new(MockService::default());
        let handle = OverlayHandle::new(PolygonOptions::default(), Paths::new());
        let relay = EventRelay::new(&service, Rc::new(OutputChannels::new()));
        (service, handle, relay)
    }

    #[test]
    fn attach_subscribes_every_kind_once() {
        let (service, handle, mut relay) = setup();
        assert_eq!(relay.attach(&handle), EventKind::COUNT);
        assert_eq!(relay.attach(&handle), 0, "second attach is a no-op");
        assert_eq!(service.live_subscriptions(), EventKind::COUNT);
        for kind in EventKind::ALL {
            assert!(service.has_subscriber(kind, handle.id()), "{kind:?} not subscribed");
        }
    }

    #[test]
    fn release_before_attach_is_a_no_op() {
        let (service, _handle, mut relay) = setup();
        assert_eq!(relay.release(), 0);
        assert!(service.calls().is_empty(), "no service traffic");
    }

    #[test]
    fn release_unsubscribes_once() {
        let (service, handle, mut relay) = setup();
        relay.attach(&handle);
        assert_eq!(relay.release(), EventKind::COUNT);
        assert_eq!(relay.release(), 0, "second release is a no-op");
        assert_eq!(service.live_subscriptions(), 0);
        assert_eq!(service.unsubscribe_count(), EventKind::COUNT);
    }

    #[test]
    fn events_reach_their_channel_with_overlay_id() {
        let (service, handle, mut relay) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        relay
            .outputs()
            .connect(EventKind::MouseOver, move |e| s.borrow_mut().push(e.clone()));
        relay.attach(&handle);

        service.emit(EventKind::MouseOver, handle.id(), NativeEvent::Pointer(5));
        service.emit(EventKind::MouseOut, handle.id(), NativeEvent::Pointer(6));

        assert_eq!(
            *seen.borrow(),
            vec![OverlayEvent::Pointer(PointerEvent {
                overlay: handle.id(),
                kind: EventKind::MouseOver,
                native: 5,
            })]
        );
    }

    #[test]
    fn click_opens_child_before_emitting() {
        let (service, handle, mut relay) = setup();
        handle.child().set(Some(ChildOverlayId(4)));
        let svc = service.clone();
        relay.outputs().connect(EventKind::Click, move |_| svc.note("observer"));
        relay.attach(&handle);
        service.clear_calls();

        service.emit(EventKind::Click, handle.id(), NativeEvent::Pointer(1));

        assert_eq!(
            service.calls(),
            vec![
                Call::ResolveClick(1),
                Call::OpenChild(ChildOverlayId(4)),
                Call::Note("observer"),
            ]
        );
    }

    #[test]
    fn click_without_child_skips_resolution() {
        let (service, handle, mut relay) = setup();
        relay.attach(&handle);
        service.clear_calls();
        service.emit(EventKind::Click, handle.id(), NativeEvent::Pointer(1));
        assert!(service.calls().is_empty(), "nothing to open");
    }

    #[test]
    fn mismatched_payloads_are_dropped() {
        let (service, handle, mut relay) = setup();
        handle.child().set(Some(ChildOverlayId(4)));
        let seen = Rc::new(Cell::new(0));
        for kind in EventKind::ALL {
            let s = seen.clone();
            relay.outputs().connect(kind, move |_| s.set(s.get() + 1));
        }
        relay.attach(&handle);
        service.clear_calls();

        let edit = PathEditEvent {
            overlay: handle.id(),
            edit: PathEdit::InsertAt,
            ring: 0,
            index: 0,
            previous: None,
            points: vec![],
        };
        service.emit(EventKind::Click, handle.id(), NativeEvent::PathEdit(edit));
        service.emit(EventKind::PathsChanged, handle.id(), NativeEvent::Pointer(2));

        assert_eq!(seen.get(), 0, "no channel saw a mismatched payload");
        assert!(service.calls().is_empty(), "no click resolution for an edit");
    }

    #[test]
    fn released_adapters_drop_events() {
        let (service, handle, mut relay) = setup();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        relay.outputs().connect(EventKind::Drag, move |_| c.set(c.get() + 1));
        relay.attach(&handle);
        let stale = service.take_handler(EventKind::Drag, handle.id());
        relay.release();

        let mut stale = stale.expect("drag handler was subscribed");
        stale(NativeEvent::Pointer(0));
        assert_eq!(count.get(), 0, "no delivery after release");
    }

    #[test]
    fn relays_do_not_share_subscriptions() {
        let service = Rc::new(MockService::default());
        let a = OverlayHandle::new(PolygonOptions::default(), Paths::new());
        let b = OverlayHandle::new(PolygonOptions::default(), Paths::new());
        let mut relay_a = EventRelay::new(&service, Rc::new(OutputChannels::new()));
        let mut relay_b = EventRelay::new(&service, Rc::new(OutputChannels::new()));
        relay_a.attach(&a);
        relay_b.attach(&b);

        let hits_b = Rc::new(Cell::new(0));
        let h = hits_b.clone();
        relay_b.outputs().connect(EventKind::Click, move |_| h.set(h.get() + 1));

        service.emit(EventKind::Click, a.id(), NativeEvent::Pointer(0));
        assert_eq!(hits_b.get(), 0, "a's click must not reach b");

        relay_a.release();
        assert_eq!(service.live_subscriptions(), EventKind::COUNT, "b still subscribed");
    }
}
