//! Muted-reposts preference stores.

mod in_memory;
mod json_file_store;

pub use in_memory::InMemoryMutedRepostsStore;
pub use json_file_store::JsonFileMutedRepostsStore;
