// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronization engine between declarative polygon descriptions and
//! imperative map overlays.
//!
//! `polysync_core` keeps a declarative shape description (a polygon's rings
//! and its visual/behavioral options) consistent with a stateful overlay
//! object owned by an external map provider, and relays the overlay's native
//! events back to declarative observers. It is `no_std` compatible (with
//! `alloc`) and renders nothing: it decides *what* changed and *when* to
//! synchronize.
//!
//! # Architecture
//!
//! ```text
//!   Host framework (ready / change / dispose signals)
//!       │
//!       ▼
//!   LifecycleController ──► ContainerResolver::resolve_container()
//!       │
//!       ├── on_ready ──► OverlayService::register() ──► EventRelay::attach()
//!       │                                                    │
//!       │                 ┌──────────────────────────────────┘
//!       │                 ▼
//!       │   OverlayService::event_stream() ──► adapters ──► OutputChannels
//!       │
//!       ├── on_property_change ──► build_patch() ──► apply_option_patch()
//!       │                                        └─► resync_geometry()
//!       │
//!       └── on_dispose ──► OverlayService::deregister() ──► EventRelay::release()
//! ```
//!
//! **[`handle`]**: [`OverlayHandle`](handle::OverlayHandle): identity,
//! container membership, options, geometry, registration status.
//!
//! **[`patch`]**: The change-set builder. Turns a property snapshot plus a
//! [`ChangeRecord`](patch::ChangeRecord) into a minimal
//! [`OptionPatch`](patch::OptionPatch).
//!
//! **[`relay`]**: [`EventRelay`](relay::EventRelay): exclusive
//! subscriptions from native event streams into named output channels.
//!
//! **[`lifecycle`]**: [`LifecycleController`](lifecycle::LifecycleController):
//! the state machine tying the pieces together.
//!
//! **[`service`]**: The [`OverlayService`](service::OverlayService) contract
//! that provider integrations implement, and the
//! [`ContainerResolver`](service::ContainerResolver) capability.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `serde` (disabled by default): Derives `Serialize` for patches, options
//!   and geometry.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod error;
pub mod event;
pub mod geo;
pub mod handle;
pub mod id;
pub mod lifecycle;
pub mod options;
pub mod patch;
pub mod relay;
pub mod service;
pub mod trace;

#[cfg(test)]
mod testing;
