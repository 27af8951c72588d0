//! Driven port for the AppView's aggregated `getActorLikes` endpoint.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Did, FeedViewPost};

/// Aggregated likes request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorLikesRequest {
    /// Account whose likes are listed.
    pub actor: Did,
    /// Opaque cursor from a previous call.
    pub cursor: Option<String>,
    /// Maximum items to return.
    pub limit: u32,
}

/// Page returned by the aggregated endpoint, verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActorLikesPage {
    /// Cursor as emitted upstream.
    pub cursor: Option<String>,
    /// Hydrated feed items.
    pub feed: Vec<FeedViewPost>,
    /// Upstream items dropped because they could not be decoded.
    pub undecodable: usize,
}

define_port_error! {
    /// Errors surfaced by the aggregated likes endpoint.
    pub enum ActorLikesError {
        /// Transport failure or server-side error.
        Network { message: String } =>
            "actor likes request failed: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "actor likes decode failed: {message}",
        /// The upstream refused the request (for example, not the viewer's
        /// own likes).
        Rejected { message: String } =>
            "actor likes request rejected: {message}",
    }
}

/// Port for `app.bsky.feed.getActorLikes`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorLikesSource: Send + Sync {
    /// Fetch one aggregated page.
    async fn get_actor_likes(
        &self,
        request: &ActorLikesRequest,
    ) -> Result<ActorLikesPage, ActorLikesError>;
}

/// Fixture source returning an empty page with no cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureActorLikesSource;

#[async_trait]
impl ActorLikesSource for FixtureActorLikesSource {
    async fn get_actor_likes(
        &self,
        _request: &ActorLikesRequest,
    ) -> Result<ActorLikesPage, ActorLikesError> {
        Ok(ActorLikesPage::default())
    }
}
