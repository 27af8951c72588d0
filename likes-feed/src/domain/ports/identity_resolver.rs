//! Driven port for resolving DIDs into identity documents.
//!
//! Resolution goes straight to the authority for the DID method (the PLC
//! directory or the did:web host), never through an account's own service.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Did, IdentityDocument};

define_port_error! {
    /// Errors surfaced while resolving an identity document.
    pub enum IdentityResolutionError {
        /// The DID method has no resolution strategy.
        UnsupportedMethod { method: String } =>
            "unsupported did method: {method}",
        /// The authority answered but has no document for the DID.
        NotFound { message: String } =>
            "identity document not found: {message}",
        /// Transport failure or non-success response.
        Network { message: String } =>
            "identity resolution failed: {message}",
        /// The response body was not a usable identity document.
        Decode { message: String } =>
            "identity document decode failed: {message}",
    }
}

/// Port for fetching the identity document of a DID.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Fetch the current identity document for `did`.
    async fn resolve(&self, did: &Did) -> Result<IdentityDocument, IdentityResolutionError>;
}

/// Fixture resolver returning a fixed document for every DID.
#[derive(Debug, Clone, Default)]
pub struct FixtureIdentityResolver {
    document: IdentityDocument,
}

impl FixtureIdentityResolver {
    /// Serve `document` for every resolution.
    pub fn new(document: IdentityDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl IdentityResolver for FixtureIdentityResolver {
    async fn resolve(&self, _did: &Did) -> Result<IdentityDocument, IdentityResolutionError> {
        Ok(self.document.clone())
    }
}
