// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay, container, and child-overlay identity types.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Process-wide source of overlay identities.
///
/// Never reset and never recycled, so an event tagged with an old id cannot
/// be mistaken for one from a handle created later.
static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one polygon overlay.
///
/// Used as the registration key with the overlay service and as the
/// correlation key on every relayed event. Values are assigned in increasing
/// order by [`OverlayId::next`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OverlayId(u64);

impl OverlayId {
    /// Allocates a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identity.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverlayId({})", self.0)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a custom layer that owns overlays.
///
/// Overlays without a container belong to the map's default surface.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContainerId(pub u32);

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.0)
    }
}

/// An opaque reference to a child info overlay.
///
/// Child overlays are created and owned by the host; a polygon only knows
/// whether one is attached.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChildOverlayId(pub u32);

impl fmt::Debug for ChildOverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChildOverlayId({})", self.0)
    }
}
