// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by overlay services.

use alloc::string::String;

/// A failure reported by an [`OverlayService`](crate::service::OverlayService).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service declined to register the overlay, e.g. because its
    /// container is not ready yet.
    ///
    /// The lifecycle controller absorbs this and retries on the next ready
    /// signal.
    #[error("registration refused: {reason}")]
    Refused {
        /// Service-provided explanation.
        reason: String,
    },
    /// The map provider failed (network, quota, SDK error).
    ///
    /// Propagated unchanged to the hook that triggered the call.
    #[error("provider error: {message}")]
    Provider {
        /// Provider-supplied message.
        message: String,
    },
}

impl ServiceError {
    /// Creates a [`Refused`](Self::Refused) error.
    #[must_use]
    pub fn refused(reason: impl Into<String>) -> Self {
        Self::Refused {
            reason: reason.into(),
        }
    }

    /// Creates a [`Provider`](Self::Provider) error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Returns whether this is a registration refusal.
    #[must_use]
    pub const fn is_refusal(&self) -> bool {
        matches!(self, Self::Refused { .. })
    }
}
