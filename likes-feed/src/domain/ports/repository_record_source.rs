//! Driven port for listing records straight from a personal data server.
//!
//! Adapters return records in the upstream order (oldest first). Reordering
//! for presentation is the record reader's job, not the adapter's.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Did, LikeRecord, RepositoryEndpoint};

/// One listing call against a repository collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRecordsRequest {
    /// Repository host.
    pub endpoint: RepositoryEndpoint,
    /// Repository owner.
    pub repo: Did,
    /// Collection NSID, e.g. `app.bsky.feed.like`.
    pub collection: String,
    /// Opaque cursor from a previous call.
    pub cursor: Option<String>,
    /// Maximum records to return.
    pub limit: u32,
}

/// Records returned by one listing call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordPage {
    /// Decoded like records.
    pub records: Vec<LikeRecord>,
    /// Cursor for the next call, if the upstream returned one.
    pub cursor: Option<String>,
}

define_port_error! {
    /// Errors surfaced while listing repository records.
    pub enum RecordListingError {
        /// Transport failure or non-success response.
        Network { message: String } =>
            "record listing failed: {message}",
        /// The listing response could not be decoded.
        Decode { message: String } =>
            "record listing decode failed: {message}",
    }
}

/// Port for `com.atproto.repo.listRecords`-style listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryRecordSource: Send + Sync {
    /// List one page of records in upstream order.
    async fn list_records(
        &self,
        request: &ListRecordsRequest,
    ) -> Result<RecordPage, RecordListingError>;
}

/// Fixture source returning an empty, final page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRepositoryRecordSource;

#[async_trait]
impl RepositoryRecordSource for FixtureRepositoryRecordSource {
    async fn list_records(
        &self,
        _request: &ListRecordsRequest,
    ) -> Result<RecordPage, RecordListingError> {
        Ok(RecordPage::default())
    }
}
