//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Each driven port exposes a strongly typed error generated by
//! `define_port_error!` so adapters map their failures into predictable
//! variants instead of returning `anyhow::Result`.

mod macros;
pub(crate) use macros::define_port_error;

mod actor_likes_source;
mod identity_resolver;
mod muted_reposts_store;
mod post_lookup;
mod repository_record_source;

#[cfg(test)]
pub use actor_likes_source::MockActorLikesSource;
pub use actor_likes_source::{
    ActorLikesError, ActorLikesPage, ActorLikesRequest, ActorLikesSource, FixtureActorLikesSource,
};
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{FixtureIdentityResolver, IdentityResolutionError, IdentityResolver};
#[cfg(test)]
pub use muted_reposts_store::MockMutedRepostsStore;
pub use muted_reposts_store::{
    FixtureMutedRepostsStore, MutedRepostsStore, MutedRepostsStoreError,
};
#[cfg(test)]
pub use post_lookup::MockPostLookup;
pub use post_lookup::{FixturePostLookup, MAX_POST_URIS_PER_REQUEST, PostLookup, PostLookupError};
#[cfg(test)]
pub use repository_record_source::MockRepositoryRecordSource;
pub use repository_record_source::{
    FixtureRepositoryRecordSource, ListRecordsRequest, RecordListingError, RecordPage,
    RepositoryRecordSource,
};
