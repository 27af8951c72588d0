//! Likes feed assembled straight from the actor's repository.
//!
//! Resolution order per page: identity document, repository endpoint, like
//! records, post hydration. Every failure degrades to a well-formed
//! [`FeedPage`]; nothing is raised to the caller.
//!
//! Two empty outcomes are deliberately distinct:
//! - no usable identity or endpoint yields a terminal page (`cursor: None`);
//! - zero records with an upstream cursor keeps that cursor so a caller can
//!   keep paging.

use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::{IdentityResolver, PostLookup, RepositoryRecordSource};
use super::{
    Did, FeedPage, FeedRequest, FeedViewPost, PostHydrator, RepositoryEndpoint,
    RepositoryRecordReader, extract_repository_endpoint,
};

/// Ports required by [`DirectRepoLikesFeed`].
#[derive(Clone)]
pub struct DirectRepoLikesFeedPorts {
    /// Identity document resolver.
    pub identity_resolver: Arc<dyn IdentityResolver>,
    /// Raw repository listing.
    pub record_source: Arc<dyn RepositoryRecordSource>,
    /// Bulk post lookup.
    pub post_lookup: Arc<dyn PostLookup>,
}

/// Feed of posts liked by one actor, read from the actor's own repository.
#[derive(Clone)]
pub struct DirectRepoLikesFeed {
    actor: Did,
    identity_resolver: Arc<dyn IdentityResolver>,
    reader: RepositoryRecordReader,
    hydrator: PostHydrator,
}

impl DirectRepoLikesFeed {
    /// Build a feed for `actor`.
    pub fn new(actor: Did, ports: DirectRepoLikesFeedPorts) -> Self {
        Self {
            actor,
            identity_resolver: ports.identity_resolver,
            reader: RepositoryRecordReader::new(ports.record_source),
            hydrator: PostHydrator::new(ports.post_lookup),
        }
    }

    /// Actor whose likes this feed lists.
    pub fn actor(&self) -> &Did {
        &self.actor
    }

    /// Most recent item of the first page, if any.
    pub async fn peek_latest(&self) -> Option<FeedViewPost> {
        self.fetch(&FeedRequest::peek()).await.feed.into_iter().next()
    }

    /// Fetch one page.
    pub async fn fetch(&self, request: &FeedRequest) -> FeedPage {
        let Some(endpoint) = self.resolve_endpoint().await else {
            return FeedPage::end();
        };

        let page = match self
            .reader
            .list_likes(&endpoint, &self.actor, request.cursor(), request.limit())
            .await
        {
            Ok(page) => page,
            Err(error) => {
                warn!(did = %self.actor, %endpoint, error = %error, "listing like records failed");
                return FeedPage::end();
            }
        };

        if page.records.is_empty() {
            debug!(did = %self.actor, has_cursor = page.cursor.is_some(), "no like records on page");
            return FeedPage::empty(page.cursor);
        }

        let subject_uris: Vec<String> = page
            .records
            .iter()
            .map(|record| record.subject_uri().to_owned())
            .collect();
        let hydrated = self.hydrator.hydrate(&subject_uris).await;

        let feed: Vec<FeedViewPost> = page
            .records
            .iter()
            .filter_map(|record| hydrated.get(record.subject_uri()))
            .cloned()
            .map(FeedViewPost::original)
            .collect();

        debug!(
            did = %self.actor,
            records = page.records.len(),
            items = feed.len(),
            "assembled likes page"
        );
        FeedPage {
            cursor: page.cursor,
            feed,
        }
    }

    async fn resolve_endpoint(&self) -> Option<RepositoryEndpoint> {
        let document = match self.identity_resolver.resolve(&self.actor).await {
            Ok(document) => document,
            Err(error) => {
                warn!(did = %self.actor, error = %error, "failed to resolve identity document");
                return None;
            }
        };
        let endpoint = extract_repository_endpoint(&document);
        if endpoint.is_none() {
            warn!(did = %self.actor, "identity document has no repository endpoint");
        }
        endpoint
    }
}

#[cfg(test)]
mod tests {
    //! Assembly order, degradation, and cursor handling.

    use super::*;
    use crate::domain::IdentityDocument;
    use crate::domain::ports::{
        IdentityResolutionError, MockIdentityResolver, MockPostLookup,
        MockRepositoryRecordSource, PostLookupError, RecordListingError, RecordPage,
    };
    use crate::domain::test_support::{did, document_with_pds, like_record, post_view};
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> FeedRequest {
        FeedRequest::new(Some("cursor-in".to_owned()), 30).expect("valid request")
    }

    fn resolver_with(document: IdentityDocument) -> MockIdentityResolver {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .returning(move |_| Ok(document.clone()));
        resolver
    }

    fn source_returning(page: RecordPage) -> MockRepositoryRecordSource {
        let mut source = MockRepositoryRecordSource::new();
        source
            .expect_list_records()
            .returning(move |_| Ok(page.clone()));
        source
    }

    fn lookup_resolving(uris: &'static [&'static str]) -> MockPostLookup {
        let mut lookup = MockPostLookup::new();
        lookup.expect_get_posts().returning(move |chunk| {
            Ok(chunk
                .iter()
                .filter(|uri| uris.contains(&uri.as_str()))
                .map(|uri| post_view(uri))
                .collect())
        });
        lookup
    }

    fn feed(
        resolver: MockIdentityResolver,
        source: MockRepositoryRecordSource,
        lookup: MockPostLookup,
    ) -> DirectRepoLikesFeed {
        DirectRepoLikesFeed::new(
            did("did:plc:alice"),
            DirectRepoLikesFeedPorts {
                identity_resolver: Arc::new(resolver),
                record_source: Arc::new(source),
                post_lookup: Arc::new(lookup),
            },
        )
    }

    fn uris(page: &FeedPage) -> Vec<&str> {
        page.feed.iter().map(|item| item.post.uri.as_str()).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn preserves_newest_first_record_order_and_drops_unhydrated(request: FeedRequest) {
        let page = RecordPage {
            records: vec![
                like_record(1, "at://post/a"),
                like_record(2, "at://post/b"),
                like_record(3, "at://post/c"),
            ],
            cursor: Some("cursor-out".to_owned()),
        };
        let feed = feed(
            resolver_with(document_with_pds("https://pds.example.com")),
            source_returning(page),
            lookup_resolving(&["at://post/a", "at://post/c"]),
        );

        let result = feed.fetch(&request).await;

        assert_eq!(uris(&result), vec!["at://post/c", "at://post/a"]);
        assert!(result.feed.iter().all(|item| item.reason.is_none()));
        assert_eq!(result.cursor.as_deref(), Some("cursor-out"));
    }

    #[rstest]
    #[tokio::test]
    async fn order_survives_hydration_returning_posts_shuffled(request: FeedRequest) {
        let page = RecordPage {
            records: (1..=30)
                .map(|i| like_record(i, &format!("at://post/{i}")))
                .collect(),
            cursor: None,
        };
        let mut lookup = MockPostLookup::new();
        lookup.expect_get_posts().returning(|chunk| {
            Ok(chunk
                .iter()
                .rev()
                .filter(|uri| !uri.ends_with("/7"))
                .map(|uri| post_view(uri))
                .collect())
        });
        let feed = feed(
            resolver_with(document_with_pds("https://pds.example.com")),
            source_returning(page),
            lookup,
        );

        let result = feed.fetch(&request).await;

        let expected: Vec<String> = (1..=30)
            .rev()
            .filter(|i| *i != 7)
            .map(|i| format!("at://post/{i}"))
            .collect();
        assert_eq!(uris(&result), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn partial_hydration_keeps_successful_posts_across_chunks(request: FeedRequest) {
        // Upstream order is oldest first; after reversal the chunks are
        // [a + 24 fillers], [b + 24 fillers], [c]. Only the middle one fails.
        let mut records = vec![like_record(0, "at://post/c")];
        records.extend((1..=24).map(|i| like_record(i, &format!("at://post/filler-{i}"))));
        records.push(like_record(25, "at://post/b"));
        records.extend((26..=49).map(|i| like_record(i, &format!("at://post/filler-{i}"))));
        records.push(like_record(50, "at://post/a"));
        let page = RecordPage {
            records,
            cursor: None,
        };
        let mut lookup = MockPostLookup::new();
        lookup.expect_get_posts().returning(|chunk| {
            if chunk.iter().any(|uri| uri == "at://post/b") {
                Err(PostLookupError::network("status 502"))
            } else {
                Ok(chunk.iter().map(|uri| post_view(uri)).collect())
            }
        });
        let feed = feed(
            resolver_with(document_with_pds("https://pds.example.com")),
            source_returning(page),
            lookup,
        );

        let result = feed.fetch(&request).await;
        let got = uris(&result);

        assert_eq!(got.len(), 26);
        assert_eq!(got.first(), Some(&"at://post/a"));
        assert_eq!(got.last(), Some(&"at://post/c"));
        assert!(!got.contains(&"at://post/b"));
        assert!(!got.contains(&"at://post/filler-1"));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_records_with_cursor_keep_the_cursor(request: FeedRequest) {
        let mut lookup = MockPostLookup::new();
        lookup.expect_get_posts().never();
        let feed = feed(
            resolver_with(document_with_pds("https://pds.example.com")),
            source_returning(RecordPage {
                records: Vec::new(),
                cursor: Some("upstream-cursor".to_owned()),
            }),
            lookup,
        );

        let result = feed.fetch(&request).await;

        assert_eq!(result, FeedPage::empty(Some("upstream-cursor".to_owned())));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_endpoint_is_terminal_regardless_of_cursor(request: FeedRequest) {
        let mut source = MockRepositoryRecordSource::new();
        source.expect_list_records().never();
        let mut lookup = MockPostLookup::new();
        lookup.expect_get_posts().never();
        let feed = feed(resolver_with(IdentityDocument::default()), source, lookup);

        let result = feed.fetch(&request).await;

        assert_eq!(result, FeedPage::end());
    }

    #[rstest]
    #[case::unsupported(IdentityResolutionError::unsupported_method("key"))]
    #[case::network(IdentityResolutionError::network("status 503"))]
    #[case::not_found(IdentityResolutionError::not_found("did:plc:alice"))]
    #[tokio::test]
    async fn resolution_failure_is_terminal(
        request: FeedRequest,
        #[case] error: IdentityResolutionError,
    ) {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(move |_| Err(error.clone()));
        let mut source = MockRepositoryRecordSource::new();
        source.expect_list_records().never();

        let result = feed(resolver, source, MockPostLookup::new())
            .fetch(&request)
            .await;

        assert_eq!(result, FeedPage::end());
    }

    #[rstest]
    #[tokio::test]
    async fn listing_failure_degrades_to_terminal_page(request: FeedRequest) {
        let mut source = MockRepositoryRecordSource::new();
        source
            .expect_list_records()
            .returning(|_| Err(RecordListingError::network("connection reset")));

        let result = feed(
            resolver_with(document_with_pds("https://pds.example.com")),
            source,
            MockPostLookup::new(),
        )
        .fetch(&request)
        .await;

        assert_eq!(result, FeedPage::end());
    }

    #[rstest]
    #[tokio::test]
    async fn peek_latest_returns_first_item_of_single_item_page() {
        let mut source = MockRepositoryRecordSource::new();
        source
            .expect_list_records()
            .withf(|request| request.limit == 1 && request.cursor.is_none())
            .returning(|_| {
                Ok(RecordPage {
                    records: vec![like_record(1, "at://post/only")],
                    cursor: Some("next".to_owned()),
                })
            });

        let latest = feed(
            resolver_with(document_with_pds("https://pds.example.com")),
            source,
            lookup_resolving(&["at://post/only"]),
        )
        .peek_latest()
        .await
        .expect("latest item");

        assert_eq!(latest.post.uri, "at://post/only");
    }
}
