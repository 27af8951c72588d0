//! DTOs for decoding XRPC JSON responses.
//!
//! Envelopes are decoded strictly; list items are decoded one at a time so a
//! single malformed record or post does not void the rest of the response.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{ActorLikesPage, RecordPage};
use crate::domain::{FeedViewPost, LikeRecord, PostView};

#[derive(Debug, Deserialize)]
pub(super) struct ListRecordsResponseDto {
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    records: Vec<Value>,
}

impl ListRecordsResponseDto {
    pub(super) fn into_record_page(self) -> RecordPage {
        RecordPage {
            records: decode_items::<LikeRecord>(self.records, "like record"),
            cursor: normalise_cursor(self.cursor),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GetPostsResponseDto {
    #[serde(default)]
    posts: Vec<Value>,
}

impl GetPostsResponseDto {
    pub(super) fn into_posts(self) -> Vec<PostView> {
        decode_items(self.posts, "post view")
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GetActorLikesResponseDto {
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    feed: Vec<Value>,
}

impl GetActorLikesResponseDto {
    pub(super) fn into_page(self) -> ActorLikesPage {
        let total = self.feed.len();
        let feed = decode_items::<FeedViewPost>(self.feed, "feed item");
        ActorLikesPage {
            cursor: normalise_cursor(self.cursor),
            undecodable: total.saturating_sub(feed.len()),
            feed,
        }
    }
}

/// XRPC error body, e.g. `{"error":"InvalidRequest","message":"..."}`.
#[derive(Debug, Deserialize)]
pub(super) struct XrpcErrorDto {
    pub(super) error: Option<String>,
    pub(super) message: Option<String>,
}

impl XrpcErrorDto {
    pub(super) fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    pub(super) fn describe(&self) -> Option<String> {
        match (self.error.as_deref(), self.message.as_deref()) {
            (Some(error), Some(message)) => Some(format!("{error}: {message}")),
            (Some(error), None) => Some(error.to_owned()),
            (None, Some(message)) => Some(message.to_owned()),
            (None, None) => None,
        }
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>, kind: &'static str) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(kind, error = %error, "dropping undecodable item");
                None
            }
        })
        .collect();
    if decoded.len() < total {
        debug!(kind, total, kept = decoded.len(), "response contained undecodable items");
    }
    decoded
}

fn normalise_cursor(cursor: Option<String>) -> Option<String> {
    cursor.filter(|cursor| !cursor.is_empty())
}
