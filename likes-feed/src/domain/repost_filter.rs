//! Repost mute filtering.
//!
//! Muting an account's reposts hides entries whose reason is a repost by
//! that account. The account's own posts are untouched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::FeedViewPost;

/// Set of DIDs whose reposts a viewer has muted.
///
/// Persisted as a `{ "<did>": true }` object. Entries stored as `false`
/// are not members.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct MutedRepostsByDid(BTreeSet<String>);

impl MutedRepostsByDid {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `did` to the set.
    pub fn mute(&mut self, did: impl Into<String>) {
        self.0.insert(did.into());
    }

    /// Remove `did` from the set.
    pub fn unmute(&mut self, did: &str) {
        self.0.remove(did);
    }

    /// Whether reposts by `did` are muted.
    pub fn contains(&self, did: &str) -> bool {
        self.0.contains(did)
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of muted accounts.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for MutedRepostsByDid {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, bool>> for MutedRepostsByDid {
    fn from(value: BTreeMap<String, bool>) -> Self {
        value
            .into_iter()
            .filter_map(|(did, muted)| muted.then_some(did))
            .collect()
    }
}

impl From<MutedRepostsByDid> for BTreeMap<String, bool> {
    fn from(value: MutedRepostsByDid) -> Self {
        value.0.into_iter().map(|did| (did, true)).collect()
    }
}

/// Whether `item` is a repost by an account in `muted`.
pub fn is_repost_by_muted_account(item: &FeedViewPost, muted: &MutedRepostsByDid) -> bool {
    item.reason
        .as_ref()
        .and_then(|reason| reason.reposted_by())
        .is_some_and(|did| muted.contains(did))
}

/// Drop reposts by muted accounts, preserving the order of everything else.
///
/// With no mute set, or an empty one, `feed` is returned as-is.
///
/// # Examples
/// ```
/// use likes_feed::domain::{MutedRepostsByDid, filter_feed_items_by_muted_reposts};
///
/// let feed = Vec::new();
/// assert!(filter_feed_items_by_muted_reposts(feed, Some(&MutedRepostsByDid::new())).is_empty());
/// ```
pub fn filter_feed_items_by_muted_reposts(
    feed: Vec<FeedViewPost>,
    muted: Option<&MutedRepostsByDid>,
) -> Vec<FeedViewPost> {
    match muted {
        Some(muted) if !muted.is_empty() => feed
            .into_iter()
            .filter(|item| !is_repost_by_muted_account(item, muted))
            .collect(),
        _ => feed,
    }
}
