//! Process-local muted-reposts store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{MutedRepostsStore, MutedRepostsStoreError};
use crate::domain::{Did, MutedRepostsByDid};

/// Mute preferences held in memory; lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryMutedRepostsStore {
    entries: Mutex<HashMap<Did, MutedRepostsByDid>>,
}

impl InMemoryMutedRepostsStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> MutedRepostsStoreError {
    MutedRepostsStoreError::io("in-memory mute store lock poisoned")
}

#[async_trait]
impl MutedRepostsStore for InMemoryMutedRepostsStore {
    async fn read(&self, viewer: &Did) -> Result<Option<MutedRepostsByDid>, MutedRepostsStoreError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(viewer).cloned())
    }

    async fn save(
        &self,
        viewer: &Did,
        muted: &MutedRepostsByDid,
    ) -> Result<(), MutedRepostsStoreError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        if muted.is_empty() {
            entries.remove(viewer);
        } else {
            entries.insert(viewer.clone(), muted.clone());
        }
        Ok(())
    }
}
