//! Repository record reader for like records.
//!
//! Wraps a [`RepositoryRecordSource`] and presents each page newest-first.
//! Upstream listings are creation-ordered ascending, so every batch is
//! reversed before it leaves this module.

use std::sync::Arc;

use super::ports::{ListRecordsRequest, RecordListingError, RecordPage, RepositoryRecordSource};
use super::{Did, RepositoryEndpoint};

/// Collection NSID holding like records.
pub const LIKE_COLLECTION: &str = "app.bsky.feed.like";

/// Reads like records directly from an account's repository.
#[derive(Clone)]
pub struct RepositoryRecordReader {
    source: Arc<dyn RepositoryRecordSource>,
}

impl RepositoryRecordReader {
    /// Create a reader over `source`.
    pub fn new(source: Arc<dyn RepositoryRecordSource>) -> Self {
        Self { source }
    }

    /// List up to `limit` like records, newest first within the page.
    ///
    /// The returned cursor is passed through untouched; an empty page with a
    /// cursor is a valid result.
    pub async fn list_likes(
        &self,
        endpoint: &RepositoryEndpoint,
        repo: &Did,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<RecordPage, RecordListingError> {
        let request = ListRecordsRequest {
            endpoint: endpoint.clone(),
            repo: repo.clone(),
            collection: LIKE_COLLECTION.to_owned(),
            cursor: cursor.map(str::to_owned),
            limit,
        };
        let mut page = self.source.list_records(&request).await?;
        page.records.reverse();
        Ok(page)
    }
}
