//! Feed records, post views, and page envelopes.
//!
//! These mirror the `app.bsky.feed.*` lexicon shapes closely enough to be
//! serialised straight back out by callers, but they are decoded from
//! transport DTOs by the outbound adapters rather than directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FeedError;

/// Largest page size accepted by the listing and aggregated likes APIs.
pub const MAX_FEED_PAGE_LIMIT: u32 = 100;

/// Reference to a record by URI and content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongRef {
    /// `at://` URI of the referenced record.
    pub uri: String,
    /// Content identifier of the referenced record.
    #[serde(default)]
    pub cid: String,
}

/// Body of an `app.bsky.feed.like` record.
///
/// Only `subject.uri` is required. Older repositories hold likes whose
/// `createdAt` is not a valid RFC 3339 timestamp, so it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecordValue {
    /// Liked post.
    pub subject: StrongRef,
    /// When the like was created, as written by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One like record as stored in an account's repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRecord {
    /// URI of the like record itself.
    pub uri: String,
    /// Content identifier of the like record.
    pub cid: String,
    /// Decoded record body.
    pub value: LikeRecordValue,
}

impl LikeRecord {
    /// URI of the liked post.
    pub fn subject_uri(&self) -> &str {
        self.value.subject.uri.as_str()
    }
}

/// Minimal author profile attached to posts and repost reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewBasic {
    /// Account DID as reported by the AppView.
    pub did: String,
    /// Current handle.
    pub handle: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Optional avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Fully hydrated post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Post URI; the hydration lookup key.
    pub uri: String,
    /// Post content identifier.
    pub cid: String,
    /// Post author.
    pub author: ProfileViewBasic,
    /// Raw post record.
    pub record: Value,
    /// Embedded media or quote view, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Value>,
    /// Reply count.
    #[serde(default)]
    pub reply_count: u64,
    /// Repost count.
    #[serde(default)]
    pub repost_count: u64,
    /// Like count.
    #[serde(default)]
    pub like_count: u64,
    /// Quote count.
    #[serde(default)]
    pub quote_count: u64,
    /// When the AppView indexed the post.
    pub indexed_at: DateTime<Utc>,
}

/// Reason a post appears in a feed other than authorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum FeedReason {
    /// The post was reposted by `by`.
    #[serde(rename = "app.bsky.feed.defs#reasonRepost")]
    Repost {
        /// Reposting account.
        by: ProfileViewBasic,
        /// When the repost was indexed.
        #[serde(rename = "indexedAt")]
        indexed_at: DateTime<Utc>,
    },
    /// The post is pinned on the author's profile.
    #[serde(rename = "app.bsky.feed.defs#reasonPin")]
    Pin,
    /// A reason this client does not know; the item is kept as-is.
    #[serde(other)]
    Unknown,
}

impl FeedReason {
    /// DID of the reposting account, if this is a repost.
    pub fn reposted_by(&self) -> Option<&str> {
        match self {
            Self::Repost { by, .. } => Some(by.did.as_str()),
            Self::Pin | Self::Unknown => None,
        }
    }
}

/// Unit returned to feed consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedViewPost {
    /// Hydrated post.
    pub post: PostView,
    /// Present only for repost or pin entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FeedReason>,
}

impl FeedViewPost {
    /// Wrap a post with no reason.
    pub fn original(post: PostView) -> Self {
        Self { post, reason: None }
    }
}

/// One page of feed items.
///
/// `cursor == None` is the only end-of-feed signal. An empty `feed` with a
/// cursor present is a valid, non-final page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedPage {
    /// Cursor for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Items on this page.
    pub feed: Vec<FeedViewPost>,
}

impl FeedPage {
    /// Terminal empty page.
    pub fn end() -> Self {
        Self::default()
    }

    /// Empty page that keeps the upstream cursor.
    pub fn empty(cursor: Option<String>) -> Self {
        Self {
            cursor,
            feed: Vec::new(),
        }
    }

    /// Whether the page signals the end of the feed.
    pub fn is_final(&self) -> bool {
        self.cursor.is_none()
    }
}

/// Validated page request.
///
/// ## Invariants
/// - `limit` is within `1..=MAX_FEED_PAGE_LIMIT`.
/// - `cursor`, when present, is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    cursor: Option<String>,
    limit: u32,
}

impl FeedRequest {
    /// Validate a page request.
    ///
    /// # Examples
    /// ```
    /// use likes_feed::domain::FeedRequest;
    ///
    /// let request = FeedRequest::new(None, 30).expect("valid request");
    /// assert_eq!(request.limit(), 30);
    /// assert!(FeedRequest::new(None, 0).is_err());
    /// ```
    pub fn new(cursor: Option<String>, limit: u32) -> Result<Self, FeedError> {
        if limit == 0 || limit > MAX_FEED_PAGE_LIMIT {
            return Err(FeedError::invalid_argument(
                "limit",
                format!("must be within 1..={MAX_FEED_PAGE_LIMIT}, got {limit}"),
            ));
        }
        if cursor.as_deref().is_some_and(str::is_empty) {
            return Err(FeedError::invalid_argument(
                "cursor",
                "must not be empty when present",
            ));
        }
        Ok(Self { cursor, limit })
    }

    /// First page with a single item, used by latest-item peeks.
    pub fn peek() -> Self {
        Self {
            cursor: None,
            limit: 1,
        }
    }

    /// Cursor supplied by the caller.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Requested item count.
    pub fn limit(&self) -> u32 {
        self.limit
    }
}
