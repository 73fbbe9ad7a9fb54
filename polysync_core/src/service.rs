// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract for map-provider integrations.
//!
//! Polysync splits provider-specific work out of the core. An integration
//! provides:
//!
//! - **Overlay service**: Implements [`OverlayService`]: registers and
//!   deregisters overlays, applies option patches and geometry, opens child
//!   overlays, resolves click coordinates, and hands out per-overlay
//!   [event streams](EventSource).
//!
//! - **Container resolution**: Implements [`ContainerResolver`] to report
//!   whether the polygon sits inside a custom layer. How the host finds that
//!   out (walking a UI tree, configuration) is its own business.
//!
//! # Reentrancy
//!
//! All service methods take `&self`. Event adapters call back into the
//! service (to resolve click coordinates and open child overlays) while the
//! service is delivering an event, so services keep their mutable state
//! behind `Cell`/`RefCell` and must not hold a borrow across a handler call.
//!
//! # Call pattern
//!
//! ```rust,ignore
//! // Content ready
//! service.register(&handle)?;
//! for kind in EventKind::ALL {
//!     subs.push(service.event_stream(kind, &handle).subscribe(adapter(kind)));
//! }
//!
//! // Property change
//! if let Some(patch) = build_patch(handle.id(), handle.options(), &record) {
//!     service.apply_option_patch(&handle, &patch)?;
//! }
//! if record.needs_geometry_resync() {
//!     service.resync_geometry(&handle)?;
//! }
//!
//! // Teardown
//! service.deregister(&handle);
//! for sub in subs.drain(..) {
//!     sub.unsubscribe();
//! }
//! ```

use alloc::boxed::Box;

use crate::error::ServiceError;
use crate::event::{EventKind, NativeEvent};
use crate::geo::ClickLocation;
use crate::handle::OverlayHandle;
use crate::id::{ChildOverlayId, ContainerId};
use crate::patch::OptionPatch;

/// Callback receiving events from an [`EventSource`].
pub type NativeHandler<N> = Box<dyn FnMut(NativeEvent<N>)>;

/// A live subscription to an [`EventSource`].
pub trait Subscription {
    /// Stops delivery. Consumes the subscription so it cannot be released
    /// twice.
    fn unsubscribe(self);
}

/// A subscribable stream of native events for one overlay and kind.
pub trait EventSource<N> {
    /// The subscription handle returned by [`subscribe`](Self::subscribe).
    type Subscription: Subscription;

    /// Starts delivering events to `handler`.
    fn subscribe(self, handler: NativeHandler<N>) -> Self::Subscription;
}

/// The external overlay-management service.
pub trait OverlayService {
    /// The provider's raw pointer event type.
    type Native;

    /// The event stream type returned by [`event_stream`](Self::event_stream).
    type Source: EventSource<Self::Native>;

    /// Creates the provider overlay for `handle` using its current options and
    /// paths, inside its container.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Refused`] if the overlay cannot be placed yet;
    /// [`ServiceError::Provider`] on provider failure.
    fn register(&self, handle: &OverlayHandle) -> Result<(), ServiceError>;

    /// Removes the provider overlay. Unknown handles are ignored.
    fn deregister(&self, handle: &OverlayHandle);

    /// Applies a partial option update.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Provider`] on provider failure.
    fn apply_option_patch(
        &self,
        handle: &OverlayHandle,
        patch: &OptionPatch,
    ) -> Result<(), ServiceError>;

    /// Replaces the provider overlay's geometry with `handle`'s current paths.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Provider`] on provider failure.
    fn resync_geometry(&self, handle: &OverlayHandle) -> Result<(), ServiceError>;

    /// Opens the child overlay `child` at `location`.
    fn open_child_overlay_at(&self, child: ChildOverlayId, location: &ClickLocation);

    /// Resolves the geographic and screen position of a pointer event.
    fn resolve_click_coordinates(&self, native: &Self::Native) -> ClickLocation;

    /// Returns the stream of `kind` events for `handle`.
    fn event_stream(&self, kind: EventKind, handle: &OverlayHandle) -> Self::Source;
}

/// Reports which custom layer, if any, contains a polygon.
pub trait ContainerResolver {
    /// Returns the containing layer, or `None` for the map's default surface.
    fn resolve_container(&self) -> Option<ContainerId>;
}

/// A fixed answer.
impl ContainerResolver for Option<ContainerId> {
    fn resolve_container(&self) -> Option<ContainerId> {
        *self
    }
}
