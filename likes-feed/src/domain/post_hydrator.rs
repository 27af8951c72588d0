//! Best-effort bulk hydration of post URIs.
//!
//! URIs are de-duplicated, split into chunks of at most
//! [`MAX_POST_URIS_PER_REQUEST`], and looked up one chunk at a time. A chunk
//! that fails is logged and skipped; its URIs are simply absent from the
//! result while the remaining chunks still run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use super::PostView;
use super::ports::{MAX_POST_URIS_PER_REQUEST, PostLookup};

/// Hydrated posts keyed by URI.
pub type HydratedPosts = HashMap<String, PostView>;

/// Converts post URIs into post views through a [`PostLookup`].
#[derive(Clone)]
pub struct PostHydrator {
    lookup: Arc<dyn PostLookup>,
}

impl PostHydrator {
    /// Create a hydrator over `lookup`.
    pub fn new(lookup: Arc<dyn PostLookup>) -> Self {
        Self { lookup }
    }

    /// Hydrate `uris`, returning every view that resolved.
    ///
    /// Chunks are issued sequentially. Views returned for URIs that were not
    /// requested are ignored.
    pub async fn hydrate(&self, uris: &[String]) -> HydratedPosts {
        let unique = dedupe_preserving_order(uris);
        let mut hydrated = HydratedPosts::with_capacity(unique.len());

        for (index, chunk) in unique.chunks(MAX_POST_URIS_PER_REQUEST).enumerate() {
            match self.lookup.get_posts(chunk).await {
                Ok(posts) => {
                    let requested: HashSet<&str> = chunk.iter().map(String::as_str).collect();
                    hydrated.extend(
                        posts
                            .into_iter()
                            .filter(|post| requested.contains(post.uri.as_str()))
                            .map(|post| (post.uri.clone(), post)),
                    );
                }
                Err(error) => {
                    warn!(
                        chunk = index,
                        chunk_len = chunk.len(),
                        error = %error,
                        "post hydration chunk failed; skipping"
                    );
                }
            }
        }

        debug!(
            requested = unique.len(),
            hydrated = hydrated.len(),
            "post hydration finished"
        );
        hydrated
    }
}

fn dedupe_preserving_order(uris: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(uris.len());
    uris.iter()
        .filter(|uri| seen.insert(*uri))
        .cloned()
        .collect()
}
