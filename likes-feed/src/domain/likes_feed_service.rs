//! Likes feed application service.
//!
//! Builds the right [`LikesFeed`] for a (viewer, actor) pair, fetches pages
//! from it, and hides reposts by accounts the viewer has muted. Also owns
//! updates to the viewer's muted-reposts preference.

use std::sync::Arc;

use tracing::warn;

use super::ports::{
    ActorLikesSource, IdentityResolver, MutedRepostsStore, MutedRepostsStoreError, PostLookup,
    RepositoryRecordSource,
};
use super::{
    ActorLikesFeed, Did, DirectRepoLikesFeed, DirectRepoLikesFeedPorts, FeatureFlags, FeedError,
    FeedPage, FeedRequest, FeedViewPost, LikesFeed, LikesFeedKind, MutedRepostsByDid,
    filter_feed_items_by_muted_reposts,
};

/// Driven ports used by [`LikesFeedService`].
#[derive(Clone)]
pub struct LikesFeedServicePorts {
    /// Identity document resolver.
    pub identity_resolver: Arc<dyn IdentityResolver>,
    /// Raw repository listing.
    pub record_source: Arc<dyn RepositoryRecordSource>,
    /// Bulk post lookup.
    pub post_lookup: Arc<dyn PostLookup>,
    /// Aggregated likes endpoint.
    pub actor_likes_source: Arc<dyn ActorLikesSource>,
    /// Viewer mute preferences.
    pub muted_reposts_store: Arc<dyn MutedRepostsStore>,
}

/// Entry point for reading likes feeds.
#[derive(Clone)]
pub struct LikesFeedService {
    ports: LikesFeedServicePorts,
    flags: FeatureFlags,
}

impl LikesFeedService {
    /// Create a service over `ports` honouring `flags`.
    pub fn new(ports: LikesFeedServicePorts, flags: FeatureFlags) -> Self {
        Self { ports, flags }
    }

    /// Active feature flags.
    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    /// Build the feed of `actor`'s likes as seen by `viewer`.
    ///
    /// # Errors
    /// Returns [`FeedError::InvalidArgument`] when `actor` is not a DID.
    pub fn feed_for(&self, viewer: Option<&Did>, actor: &str) -> Result<LikesFeed, FeedError> {
        let actor = Did::new(actor).map_err(|err| FeedError::invalid_did("actor", &err))?;
        let feed = match LikesFeedKind::select(viewer, &actor, self.flags) {
            LikesFeedKind::ActorLikes => LikesFeed::ActorLikes(ActorLikesFeed::new(
                actor,
                Arc::clone(&self.ports.actor_likes_source),
            )),
            LikesFeedKind::DirectRepo => LikesFeed::DirectRepo(DirectRepoLikesFeed::new(
                actor,
                DirectRepoLikesFeedPorts {
                    identity_resolver: Arc::clone(&self.ports.identity_resolver),
                    record_source: Arc::clone(&self.ports.record_source),
                    post_lookup: Arc::clone(&self.ports.post_lookup),
                },
            )),
        };
        Ok(feed)
    }

    /// Fetch one page of `feed` with `viewer`'s repost mutes applied.
    ///
    /// The upstream cursor is kept even when filtering empties the page.
    pub async fn fetch_page(
        &self,
        viewer: Option<&Did>,
        feed: &LikesFeed,
        request: &FeedRequest,
    ) -> FeedPage {
        let page = feed.fetch(request).await;
        let muted = self.active_mutes(viewer).await;
        FeedPage {
            cursor: page.cursor,
            feed: filter_feed_items_by_muted_reposts(page.feed, muted.as_ref()),
        }
    }

    /// Most recent item of `feed`, unless it is a repost `viewer` has muted.
    pub async fn peek_latest(&self, viewer: Option<&Did>, feed: &LikesFeed) -> Option<FeedViewPost> {
        let latest = feed.peek_latest().await?;
        let muted = self.active_mutes(viewer).await;
        filter_feed_items_by_muted_reposts(vec![latest], muted.as_ref())
            .into_iter()
            .next()
    }

    async fn active_mutes(&self, viewer: Option<&Did>) -> Option<MutedRepostsByDid> {
        if !self.flags.mute_reposts_by_account {
            return None;
        }
        self.muted_reposts(viewer?).await
    }

    /// Load `viewer`'s mute set, treating storage failures as "no mutes".
    pub async fn muted_reposts(&self, viewer: &Did) -> Option<MutedRepostsByDid> {
        match self.ports.muted_reposts_store.read(viewer).await {
            Ok(muted) => muted,
            Err(error) => {
                warn!(viewer = %viewer, error = %error, "muted reposts unreadable; not filtering");
                None
            }
        }
    }

    /// Mute or unmute reposts by `account` for `viewer`, returning the
    /// stored set.
    ///
    /// # Errors
    /// Propagates storage failures. A set that was unreadable is replaced.
    pub async fn set_repost_mute(
        &self,
        viewer: &Did,
        account: &Did,
        muted: bool,
    ) -> Result<MutedRepostsByDid, MutedRepostsStoreError> {
        let mut current = self.muted_reposts(viewer).await.unwrap_or_default();
        if muted {
            current.mute(account.as_str());
        } else {
            current.unmute(account.as_str());
        }
        self.ports.muted_reposts_store.save(viewer, &current).await?;
        Ok(current)
    }
}
