//! Driven port for bulk post lookups (`app.bsky.feed.getPosts`).

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::PostView;

/// Upstream cap on URIs per bulk lookup request.
pub const MAX_POST_URIS_PER_REQUEST: usize = 25;

define_port_error! {
    /// Errors surfaced by a bulk post lookup.
    pub enum PostLookupError {
        /// Transport failure or non-success response.
        Network { message: String } =>
            "post lookup failed: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "post lookup decode failed: {message}",
        /// The request was rejected before or by the upstream.
        InvalidRequest { message: String } =>
            "post lookup request invalid: {message}",
    }
}

/// Port for hydrating post URIs into post views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostLookup: Send + Sync {
    /// Fetch views for up to [`MAX_POST_URIS_PER_REQUEST`] URIs.
    ///
    /// URIs the upstream cannot resolve are omitted from the result rather
    /// than reported as errors.
    async fn get_posts(&self, uris: &[String]) -> Result<Vec<PostView>, PostLookupError>;
}

/// Fixture lookup that resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePostLookup;

#[async_trait]
impl PostLookup for FixturePostLookup {
    async fn get_posts(&self, _uris: &[String]) -> Result<Vec<PostView>, PostLookupError> {
        Ok(Vec::new())
    }
}
