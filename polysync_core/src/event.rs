// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event kinds, envelopes, and output channels.
//!
//! Overlays emit a fixed, closed set of events ([`EventKind`]). Services
//! deliver them as [`NativeEvent`]s: either a raw provider event, or (for
//! [`EventKind::PathsChanged`]) a ready-made [`PathEditEvent`]. The relay
//! wraps raw events together with the originating overlay into an
//! [`OverlayEvent`] envelope and emits it on the kind's named channel in
//! [`OutputChannels`].

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::geo::{LatLng, Ring};
use crate::id::OverlayId;

/// The events a polygon overlay can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EventKind {
    /// Primary-button click.
    Click,
    /// Double click.
    DoubleClick,
    /// The user started dragging the polygon.
    DragStart,
    /// The polygon is being dragged.
    Drag,
    /// The user stopped dragging the polygon.
    DragEnd,
    /// Pointer button pressed.
    MouseDown,
    /// Pointer moved over the polygon.
    MouseMove,
    /// Pointer left the polygon.
    MouseOut,
    /// Pointer entered the polygon.
    MouseOver,
    /// Pointer button released.
    MouseUp,
    /// Secondary-button (context) click.
    RightClick,
    /// A vertex edit completed.
    PathsChanged,
}

impl EventKind {
    /// Number of event kinds.
    pub const COUNT: usize = 12;

    /// Every event kind, in subscription order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Click,
        Self::DoubleClick,
        Self::DragStart,
        Self::Drag,
        Self::DragEnd,
        Self::MouseDown,
        Self::MouseMove,
        Self::MouseOut,
        Self::MouseOver,
        Self::MouseUp,
        Self::RightClick,
        Self::PathsChanged,
    ];

    /// Returns the kind's position in [`ALL`](Self::ALL).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the name of the output channel for this kind.
    #[must_use]
    pub const fn channel_name(self) -> &'static str {
        match self {
            Self::Click => "polyClick",
            Self::DoubleClick => "polyDblClick",
            Self::DragStart => "polyDragStart",
            Self::Drag => "polyDrag",
            Self::DragEnd => "polyDragEnd",
            Self::MouseDown => "polyMouseDown",
            Self::MouseMove => "polyMouseMove",
            Self::MouseOut => "polyMouseOut",
            Self::MouseOver => "polyMouseOver",
            Self::MouseUp => "polyMouseUp",
            Self::RightClick => "polyRightClick",
            Self::PathsChanged => "polyPathsChange",
        }
    }

    /// Parses a channel name.
    #[must_use]
    pub fn from_channel_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.channel_name() == name)
    }
}

/// The kind of vertex edit reported by a [`PathEditEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PathEdit {
    /// A vertex was inserted.
    InsertAt,
    /// A vertex was removed.
    RemoveAt,
    /// A vertex was moved.
    SetAt,
}

/// A completed vertex edit, delivered already in envelope form.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathEditEvent {
    /// The edited overlay.
    pub overlay: OverlayId,
    /// What happened.
    pub edit: PathEdit,
    /// Index of the edited ring.
    pub ring: usize,
    /// Index of the edited vertex within the ring.
    pub index: usize,
    /// The vertex before the edit, for removals and moves.
    pub previous: Option<LatLng>,
    /// The ring after the edit.
    pub points: Ring,
}

/// An event as delivered by a service's event stream.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeEvent<N> {
    /// A raw provider pointer event.
    Pointer(N),
    /// A completed vertex edit.
    PathEdit(PathEditEvent),
}

/// A raw pointer event tagged with its kind and originating overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<N> {
    /// The overlay the event came from.
    pub overlay: OverlayId,
    /// Which event this is.
    pub kind: EventKind,
    /// The provider's event object.
    pub native: N,
}

/// The uniform envelope emitted on output channels.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayEvent<N> {
    /// A pointer event.
    Pointer(PointerEvent<N>),
    /// A vertex edit.
    PathEdit(PathEditEvent),
}

impl<N> OverlayEvent<N> {
    /// Returns the event's kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Pointer(e) => e.kind,
            Self::PathEdit(_) => EventKind::PathsChanged,
        }
    }

    /// Returns the overlay the event came from.
    #[must_use]
    pub fn overlay(&self) -> OverlayId {
        match self {
            Self::Pointer(e) => e.overlay,
            Self::PathEdit(e) => e.overlay,
        }
    }
}

/// A downstream observer of one output channel.
pub type Observer<N> = Box<dyn FnMut(&OverlayEvent<N>)>;

/// One named channel per [`EventKind`], each fanning out to any number of
/// observers.
///
/// Observers run in connection order. An observer may connect further
/// observers while it runs; they receive events from the next emission on.
/// An observer may also emit on the channel it is observing: the nested
/// event is queued and delivered once the current event has reached every
/// observer.
pub struct OutputChannels<N> {
    channels: [Channel<N>; EventKind::COUNT],
}

struct Channel<N> {
    observers: RefCell<Vec<Observer<N>>>,
    pending: RefCell<VecDeque<OverlayEvent<N>>>,
    dispatching: Cell<bool>,
}

impl<N> Channel<N> {
    fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    fn deliver(&self, event: &OverlayEvent<N>) {
        let mut running = core::mem::take(&mut *self.observers.borrow_mut());
        for observer in &mut running {
            observer(event);
        }
        let mut slot = self.observers.borrow_mut();
        let connected_meanwhile = core::mem::replace(&mut *slot, running);
        slot.extend(connected_meanwhile);
    }
}

impl<N> fmt::Debug for OutputChannels<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            map.entry(&kind.channel_name(), &self.observer_count(kind));
        }
        map.finish()
    }
}

impl<N> Default for OutputChannels<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> OutputChannels<N> {
    /// Creates channels with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: core::array::from_fn(|_| Channel::new()),
        }
    }

    /// Connects `observer` to the channel for `kind`.
    pub fn connect(&self, kind: EventKind, observer: impl FnMut(&OverlayEvent<N>) + 'static) {
        self.channels[kind.index()]
            .observers
            .borrow_mut()
            .push(Box::new(observer));
    }

    /// Returns the number of observers on the channel for `kind`.
    #[must_use]
    pub fn observer_count(&self, kind: EventKind) -> usize {
        self.channels[kind.index()]
            .observers
            .try_borrow()
            .map_or(0, |observers| observers.len())
    }

    /// Delivers `event` to every observer on its kind's channel.
    ///
    /// Called from inside an observer of the same channel, the event is
    /// queued behind the one being delivered; the outermost call drains the
    /// queue in emission order before returning.
    pub fn emit(&self, event: OverlayEvent<N>) {
        let channel = &self.channels[event.kind().index()];
        if channel.dispatching.replace(true) {
            channel.pending.borrow_mut().push_back(event);
            return;
        }
        let mut next = Some(event);
        while let Some(event) = next {
            channel.deliver(&event);
            next = channel.pending.borrow_mut().pop_front();
        }
        channel.dispatching.set(false);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::Cell;

    use super::*;

    fn click(overlay: OverlayId) -> OverlayEvent<u32> {
        OverlayEvent::Pointer(PointerEvent {
            overlay,
            kind: EventKind::Click,
            native: 7,
        })
    }

    #[test]
    fn table_is_consistent() {
        for (i, kind) in EventKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i, "{kind:?} out of place");
            assert_eq!(EventKind::from_channel_name(kind.channel_name()), Some(kind));
        }
    }

    #[test]
    fn emit_reaches_only_matching_channel() {
        let outputs = OutputChannels::<u32>::new();
        let clicks = Rc::new(Cell::new(0));
        let drags = Rc::new(Cell::new(0));
        let c = clicks.clone();
        outputs.connect(EventKind::Click, move |_| c.set(c.get() + 1));
        let d = drags.clone();
        outputs.connect(EventKind::Drag, move |_| d.set(d.get() + 1));

        outputs.emit(click(OverlayId::next()));
        assert_eq!(clicks.get(), 1);
        assert_eq!(drags.get(), 0);
    }

    #[test]
    fn observers_run_in_connection_order() {
        let outputs = Rc::new(OutputChannels::<u32>::new());
        let log = Rc::new(RefCell::new(vec![]));
        for tag in 0..3 {
            let log = log.clone();
            outputs.connect(EventKind::Click, move |_| log.borrow_mut().push(tag));
        }
        outputs.emit(click(OverlayId::next()));
        assert_eq!(*log.borrow(), [0, 1, 2]);
    }

    #[test]
    fn connecting_during_emit_is_deferred() {
        let outputs = Rc::new(OutputChannels::<u32>::new());
        let late = Rc::new(Cell::new(0));
        let (o, l) = (outputs.clone(), late.clone());
        outputs.connect(EventKind::Click, move |_| {
            let l = l.clone();
            o.connect(EventKind::Click, move |_| l.set(l.get() + 1));
        });

        outputs.emit(click(OverlayId::next()));
        assert_eq!(late.get(), 0, "new observer misses the current emission");
        assert_eq!(outputs.observer_count(EventKind::Click), 2);

        outputs.emit(click(OverlayId::next()));
        assert_eq!(late.get(), 1, "new observer sees the next emission");
    }

    #[test]
    fn nested_emit_is_delivered_after_current() {
        let outputs = Rc::new(OutputChannels::<u32>::new());
        let seen = Rc::new(RefCell::new(vec![]));
        let (o, s) = (outputs.clone(), seen.clone());
        let id = OverlayId::next();
        outputs.connect(EventKind::Click, move |e| {
            let OverlayEvent::Pointer(p) = e else {
                return;
            };
            s.borrow_mut().push(("first", p.native));
            if p.native == 0 {
                o.emit(OverlayEvent::Pointer(PointerEvent {
                    overlay: id,
                    kind: EventKind::Click,
                    native: 1,
                }));
            }
        });
        let s = seen.clone();
        outputs.connect(EventKind::Click, move |e| {
            if let OverlayEvent::Pointer(p) = e {
                s.borrow_mut().push(("second", p.native));
            }
        });

        outputs.emit(OverlayEvent::Pointer(PointerEvent {
            overlay: id,
            kind: EventKind::Click,
            native: 0,
        }));
        assert_eq!(
            *seen.borrow(),
            [("first", 0), ("second", 0), ("first", 1), ("second", 1)],
            "nested click reaches every observer after the outer one"
        );

        outputs.emit(click(id));
        assert_eq!(seen.borrow().len(), 6, "channel is usable again");
    }

    #[test]
    fn path_edit_envelope_kind() {
        let id = OverlayId::next();
        let e: OverlayEvent<()> = OverlayEvent::PathEdit(PathEditEvent {
            overlay: id,
            edit: PathEdit::SetAt,
            ring: 0,
            index: 2,
            previous: Some(LatLng::new(1.0, 1.0)),
            points: vec![],
        });
        assert_eq!(e.kind(), EventKind::PathsChanged);
        assert_eq!(e.overlay(), id);
    }
}
