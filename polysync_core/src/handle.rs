// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay handle: one polygon instance as the service sees it.
//!
//! An [`OverlayHandle`] has:
//!
//! - An identity ([`OverlayId`]) assigned at construction and never reused.
//! - A container ([`ContainerId`]) resolved once before registration, or
//!   none for the map's default surface.
//! - The current [`PolygonOptions`] and [`Paths`].
//! - A registration flag, set when the service accepts the handle and
//!   cleared at teardown.
//! - A [`ChildSlot`] naming an attached info overlay, if any. The handle does
//!   not own the child.
//!
//! Only the lifecycle controller mutates a handle; services and event
//! adapters read it.

use alloc::rc::Rc;
use core::cell::Cell;

use crate::geo::Paths;
use crate::id::{ChildOverlayId, ContainerId, OverlayId};
use crate::options::PolygonOptions;

/// Shared, non-owning reference to an attached child overlay.
///
/// Cloning yields another view of the same slot, so event adapters observe
/// attach/detach performed after they were created.
#[derive(Clone, Debug, Default)]
pub struct ChildSlot(Rc<Cell<Option<ChildOverlayId>>>);

impl ChildSlot {
    /// Returns the attached child, if any.
    #[must_use]
    pub fn get(&self) -> Option<ChildOverlayId> {
        self.0.get()
    }

    pub(crate) fn set(&self, child: Option<ChildOverlayId>) {
        self.0.set(child);
    }
}

/// One polygon overlay.
#[derive(Debug)]
pub struct OverlayHandle {
    id: OverlayId,
    container: Option<ContainerId>,
    container_resolved: bool,
    registered: bool,
    options: PolygonOptions,
    paths: Paths,
    child: ChildSlot,
}

impl OverlayHandle {
    /// Creates an unregistered handle with a fresh identity.
    #[must_use]
    pub fn new(options: PolygonOptions, paths: Paths) -> Self {
        Self {
            id: OverlayId::next(),
            container: None,
            container_resolved: false,
            registered: false,
            options,
            paths,
            child: ChildSlot::default(),
        }
    }

    /// Returns the handle's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Returns the owning custom layer, or `None` for the default surface.
    #[must_use]
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// Returns whether the container has been resolved.
    #[must_use]
    pub fn container_resolved(&self) -> bool {
        self.container_resolved
    }

    /// Returns whether the service has accepted this handle.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Returns the current options.
    #[must_use]
    pub fn options(&self) -> &PolygonOptions {
        &self.options
    }

    /// Returns the current geometry.
    #[must_use]
    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Returns the child-overlay slot.
    #[must_use]
    pub fn child(&self) -> &ChildSlot {
        &self.child
    }

    // -- Controller-side mutation --

    /// Records the resolved container. Later resolutions are ignored.
    ///
    /// Returns whether this call set the container.
    pub(crate) fn set_container(&mut self, container: Option<ContainerId>) -> bool {
        if self.container_resolved {
            return false;
        }
        self.container = container;
        self.container_resolved = true;
        true
    }

    pub(crate) fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }

    pub(crate) fn options_mut(&mut self) -> &mut PolygonOptions {
        &mut self.options
    }

    pub(crate) fn set_paths(&mut self, paths: Paths) {
        self.paths = paths;
    }

    pub(crate) fn paths_mut(&mut self) -> &mut Paths {
        &mut self.paths
    }
}
