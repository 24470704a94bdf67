//! Unified error type for Atrium operations
//!
//! One enum covers every failure the orchestration layer can report.
//! The variants are abstract error kinds, not transport codes: the
//! presentation layer maps them to whatever wire format it speaks.
//!
//! `NotFound` deliberately covers both "absent" and "present but not
//! readable" so callers cannot probe for the existence of resources
//! they have no access to. `FeatureDisabled` is distinct from
//! `Unauthorized` so callers can tell a switched-off feature apart
//! from a missing capability.

use serde::{Deserialize, Serialize};

/// Result alias used throughout the Atrium crates
pub type AtriumResult<T> = Result<T, AtriumError>;

/// Unified error type for all Atrium operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AtriumError {
    /// Malformed request payload, rejected before any collaborator is
    /// consulted
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was malformed about the request
        message: String,
    },

    /// Resource absent, or present but not readable by the actor
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Resource exists and is readable but the actor lacks the
    /// required capability
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// The missing capability
        message: String,
    },

    /// Well-formed request that violates a domain precondition
    #[error("Unprocessable: {message}")]
    Unprocessable {
        /// The violated precondition; may span multiple lines for
        /// aggregated batch failures
        message: String,
    },

    /// Operation valid in general but unsupported by this resource's
    /// backend
    #[error("Not supported: {message}")]
    NotSupported {
        /// The unsupported operation
        message: String,
    },

    /// Operation gated behind a feature flag that is switched off
    #[error("Feature disabled: {message}")]
    FeatureDisabled {
        /// The disabled flag
        message: String,
    },

    /// Collaborator failure the orchestration layer cannot interpret
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the underlying failure
        message: String,
    },
}

impl AtriumError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an unprocessable error
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
        }
    }

    /// Create a not supported error
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported {
            message: message.into(),
        }
    }

    /// Create a feature disabled error
    pub fn feature_disabled(message: impl Into<String>) -> Self {
        Self::FeatureDisabled {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The human-readable message carried by this error
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidRequest { message }
            | Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::Unprocessable { message }
            | Self::NotSupported { message }
            | Self::FeatureDisabled { message }
            | Self::Internal { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn constructors_set_kind_and_message() {
        assert_matches!(
            AtriumError::not_found("service instance"),
            AtriumError::NotFound { message } if message == "service instance"
        );
        assert_matches!(
            AtriumError::feature_disabled("service_instance_creation"),
            AtriumError::FeatureDisabled { .. }
        );
    }

    #[test]
    fn display_prefixes_kind() {
        let err = AtriumError::unprocessable("bad plan");
        assert_eq!(err.to_string(), "Unprocessable: bad plan");
        assert_eq!(err.message(), "bad plan");
    }
}
