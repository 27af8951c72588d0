//! Source-agnostic likes feed.
//!
//! [`LikesFeed`] is a closed choice between the aggregated AppView feed and
//! the direct repository feed. Both expose the same `fetch`/`peek_latest`
//! contract, so callers page through either without knowing which one they
//! hold.

use super::{
    ActorLikesFeed, Did, DirectRepoLikesFeed, FeatureFlags, FeedPage, FeedRequest, FeedViewPost,
};

/// Which source should serve a given (viewer, actor) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikesFeedKind {
    /// Aggregated `getActorLikes` endpoint.
    ActorLikes,
    /// Direct repository listing plus hydration.
    DirectRepo,
}

impl LikesFeedKind {
    /// Pick a source.
    ///
    /// The aggregated endpoint only serves an account's own likes, so any
    /// other actor goes through the repository when the flag allows it.
    ///
    /// # Examples
    /// ```
    /// use likes_feed::domain::{Did, FeatureFlags, LikesFeedKind};
    ///
    /// let me = Did::new("did:plc:me").expect("did");
    /// let other = Did::new("did:plc:other").expect("did");
    /// let flags = FeatureFlags::default();
    /// assert_eq!(LikesFeedKind::select(Some(&me), &me, flags), LikesFeedKind::ActorLikes);
    /// assert_eq!(LikesFeedKind::select(Some(&me), &other, flags), LikesFeedKind::DirectRepo);
    /// ```
    pub fn select(viewer: Option<&Did>, actor: &Did, flags: FeatureFlags) -> Self {
        let is_own_profile = viewer.is_some_and(|viewer| viewer == actor);
        if !is_own_profile && flags.other_profile_likes {
            Self::DirectRepo
        } else {
            Self::ActorLikes
        }
    }
}

/// Likes feed backed by one of the two sources.
#[derive(Clone)]
pub enum LikesFeed {
    /// Served by the AppView's aggregated endpoint.
    ActorLikes(ActorLikesFeed),
    /// Assembled from the actor's repository.
    DirectRepo(DirectRepoLikesFeed),
}

impl LikesFeed {
    /// Which source backs this feed.
    pub fn kind(&self) -> LikesFeedKind {
        match self {
            Self::ActorLikes(_) => LikesFeedKind::ActorLikes,
            Self::DirectRepo(_) => LikesFeedKind::DirectRepo,
        }
    }

    /// Actor whose likes are listed.
    pub fn actor(&self) -> &Did {
        match self {
            Self::ActorLikes(feed) => feed.actor(),
            Self::DirectRepo(feed) => feed.actor(),
        }
    }

    /// Fetch one page.
    pub async fn fetch(&self, request: &FeedRequest) -> FeedPage {
        match self {
            Self::ActorLikes(feed) => feed.fetch(request).await,
            Self::DirectRepo(feed) => feed.fetch(request).await,
        }
    }

    /// Most recent item, if any.
    pub async fn peek_latest(&self) -> Option<FeedViewPost> {
        match self {
            Self::ActorLikes(feed) => feed.peek_latest().await,
            Self::DirectRepo(feed) => feed.peek_latest().await,
        }
    }
}
