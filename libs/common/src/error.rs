//! Custom error types for the common library
//!
//! This module defines the error taxonomy shared by every implementation of
//! the community service, plus configuration errors.

use thiserror::Error;

/// Message carried by an envelope when identity could not be resolved
pub const UNAUTHENTICATED_MESSAGE: &str = "User not authenticated";

/// Message carried by an envelope for operations reserved for a real backend
pub const NOT_IMPLEMENTED_MESSAGE: &str = "Not implemented";

/// Error type for community operations
#[derive(Error, Debug)]
pub enum CommunityError {
    /// Identity required but neither the caller nor the fallback provided one
    #[error("User not authenticated")]
    Unauthenticated,

    /// Operation intentionally left as a stub
    #[error("Not implemented")]
    NotImplemented,

    /// Transport failure talking to a remote backend
    #[error("{0}")]
    Transport(String),

    /// Payload could not be encoded or decoded
    #[error("Invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Any other fault
    #[error("{0}")]
    Unexpected(String),
}

impl CommunityError {
    /// Rebuild an error from the message carried by a failed envelope
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        match message.as_str() {
            UNAUTHENTICATED_MESSAGE => CommunityError::Unauthenticated,
            NOT_IMPLEMENTED_MESSAGE => CommunityError::NotImplemented,
            _ => CommunityError::Unexpected(message),
        }
    }

    /// True for outcomes callers are expected to hit in normal use
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            CommunityError::Unauthenticated | CommunityError::NotImplemented
        )
    }
}

/// Type alias for Result with CommunityError
pub type CommunityResult<T> = Result<T, CommunityError>;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value was present but invalid
    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message_recognizes_known_errors() {
        assert!(matches!(
            CommunityError::from_message("User not authenticated"),
            CommunityError::Unauthenticated
        ));
        assert!(matches!(
            CommunityError::from_message("Not implemented"),
            CommunityError::NotImplemented
        ));
        assert!(matches!(
            CommunityError::from_message("boom"),
            CommunityError::Unexpected(m) if m == "boom"
        ));
    }

    #[test]
    fn test_display_matches_envelope_messages() {
        assert_eq!(
            CommunityError::Unauthenticated.to_string(),
            UNAUTHENTICATED_MESSAGE
        );
        assert_eq!(
            CommunityError::NotImplemented.to_string(),
            NOT_IMPLEMENTED_MESSAGE
        );
    }

    #[test]
    fn test_only_caller_outcomes_are_expected() {
        assert!(CommunityError::Unauthenticated.is_expected());
        assert!(CommunityError::NotImplemented.is_expected());
        assert!(!CommunityError::Transport("connection refused".to_string()).is_expected());
        assert!(!CommunityError::Unexpected("boom".to_string()).is_expected());
    }
}
