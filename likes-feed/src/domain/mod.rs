//! Likes feed domain.
//!
//! Purpose: Assemble pages of posts an account has liked, either from the
//! AppView's aggregated endpoint or straight from the account's own
//! repository, and hide reposts by accounts the viewer has muted. Nothing in
//! here knows about HTTP; all I/O goes through [`ports`].
//!
//! Public surface:
//! - Did (alias to `did::Did`): validated decentralized identifier.
//! - IdentityDocument / RepositoryEndpoint: DID document and the PDS URL
//!   extracted from it.
//! - FeedPage / FeedRequest / FeedViewPost: paging contract shared by every
//!   feed source.
//! - LikesFeed: closed choice over `ActorLikesFeed` and
//!   `DirectRepoLikesFeed`.
//! - LikesFeedService: builds feeds for a viewer and applies repost mutes.
//! - FeedError: invalid caller input at public entry points.

pub mod ports;

mod actor_likes_feed;
mod did;
mod direct_repo_likes_feed;
mod error;
mod feature_flags;
mod feed;
mod identity;
mod likes_feed;
mod likes_feed_service;
mod post_hydrator;
mod record_reader;
mod repost_filter;

#[cfg(test)]
mod test_support;

pub use self::actor_likes_feed::ActorLikesFeed;
pub use self::did::{Did, DidMethod, DidValidationError};
pub use self::direct_repo_likes_feed::{DirectRepoLikesFeed, DirectRepoLikesFeedPorts};
pub use self::error::FeedError;
pub use self::feature_flags::FeatureFlags;
pub use self::feed::{
    FeedPage, FeedReason, FeedRequest, FeedViewPost, LikeRecord, LikeRecordValue,
    MAX_FEED_PAGE_LIMIT, PostView, ProfileViewBasic, StrongRef,
};
pub use self::identity::{
    DidService, IdentityDocument, PDS_SERVICE_ID_FRAGMENT, PDS_SERVICE_TYPE, RepositoryEndpoint,
    extract_repository_endpoint,
};
pub use self::likes_feed::{LikesFeed, LikesFeedKind};
pub use self::likes_feed_service::{LikesFeedService, LikesFeedServicePorts};
pub use self::post_hydrator::{HydratedPosts, PostHydrator};
pub use self::record_reader::{LIKE_COLLECTION, RepositoryRecordReader};
pub use self::repost_filter::{
    MutedRepostsByDid, filter_feed_items_by_muted_reposts, is_repost_by_muted_account,
};
