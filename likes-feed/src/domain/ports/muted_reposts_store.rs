//! Driven port for the per-viewer muted-reposts preference.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Did, MutedRepostsByDid};

define_port_error! {
    /// Errors surfaced by mute preference storage.
    pub enum MutedRepostsStoreError {
        /// Underlying storage could not be read or written.
        Io { message: String } =>
            "muted reposts storage failed: {message}",
        /// Stored content was not a valid mute map.
        Decode { message: String } =>
            "muted reposts decode failed: {message}",
    }
}

/// Port for persisting the set of accounts whose reposts a viewer hides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MutedRepostsStore: Send + Sync {
    /// Load the viewer's mute set; `None` when nothing is stored.
    async fn read(&self, viewer: &Did) -> Result<Option<MutedRepostsByDid>, MutedRepostsStoreError>;

    /// Persist the viewer's mute set. An empty set removes the stored entry.
    async fn save(
        &self,
        viewer: &Did,
        muted: &MutedRepostsByDid,
    ) -> Result<(), MutedRepostsStoreError>;
}

/// Fixture store that holds nothing and accepts every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureMutedRepostsStore;

#[async_trait]
impl MutedRepostsStore for FixtureMutedRepostsStore {
    async fn read(
        &self,
        _viewer: &Did,
    ) -> Result<Option<MutedRepostsByDid>, MutedRepostsStoreError> {
        Ok(None)
    }

    async fn save(
        &self,
        _viewer: &Did,
        _muted: &MutedRepostsByDid,
    ) -> Result<(), MutedRepostsStoreError> {
        Ok(())
    }
}
