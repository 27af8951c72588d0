//! Errors raised at public entry points for malformed caller input.
//!
//! Runtime failures (resolution, listing, hydration) never surface as
//! errors; they degrade to empty pages. Only programmer errors land here.

use thiserror::Error;

use super::DidValidationError;

/// Caller-side input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// A public entry point received input it cannot act on.
    #[error("invalid argument `{argument}`: {message}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Human readable reason.
        message: String,
    },
}

impl FeedError {
    /// Helper for invalid argument failures.
    pub fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            message: message.into(),
        }
    }

    /// Wrap a DID validation failure for the named argument.
    pub fn invalid_did(argument: &'static str, error: &DidValidationError) -> Self {
        Self::invalid_argument(argument, error.to_string())
    }
}
