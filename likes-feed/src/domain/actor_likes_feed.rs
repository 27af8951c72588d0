//! Likes feed served by the AppView's aggregated endpoint.
//!
//! The aggregated endpoint sometimes emits a cursor alongside an empty page.
//! Here a page the upstream sent empty ends the feed; the direct repository
//! feed keeps such cursors instead, because its upstream behaves differently.
//! A page that only looks empty because its items failed to decode keeps its
//! cursor.

use std::sync::Arc;

use tracing::warn;

use super::ports::{ActorLikesRequest, ActorLikesSource};
use super::{Did, FeedPage, FeedRequest, FeedViewPost};

/// Feed of posts liked by one actor, via `getActorLikes`.
#[derive(Clone)]
pub struct ActorLikesFeed {
    actor: Did,
    source: Arc<dyn ActorLikesSource>,
}

impl ActorLikesFeed {
    /// Build a feed for `actor`.
    pub fn new(actor: Did, source: Arc<dyn ActorLikesSource>) -> Self {
        Self { actor, source }
    }

    /// Actor whose likes this feed lists.
    pub fn actor(&self) -> &Did {
        &self.actor
    }

    /// Most recent liked post, if any.
    pub async fn peek_latest(&self) -> Option<FeedViewPost> {
        self.fetch(&FeedRequest::peek()).await.feed.into_iter().next()
    }

    /// Fetch one page.
    pub async fn fetch(&self, request: &FeedRequest) -> FeedPage {
        let upstream = ActorLikesRequest {
            actor: self.actor.clone(),
            cursor: request.cursor().map(str::to_owned),
            limit: request.limit(),
        };
        match self.source.get_actor_likes(&upstream).await {
            Ok(page) if page.feed.is_empty() && page.undecodable == 0 => FeedPage::end(),
            Ok(page) => FeedPage {
                cursor: page.cursor,
                feed: page.feed,
            },
            Err(error) => {
                warn!(did = %self.actor, error = %error, "aggregated likes request failed");
                FeedPage::end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ActorLikesError, ActorLikesPage, MockActorLikesSource};
    use crate::domain::test_support::{did, post_view};
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> FeedRequest {
        FeedRequest::new(Some("c0".to_owned()), 25).expect("valid request")
    }

    fn feed_with(source: MockActorLikesSource) -> ActorLikesFeed {
        ActorLikesFeed::new(did("did:plc:alice"), Arc::new(source))
    }

    #[rstest]
    #[tokio::test]
    async fn passes_page_through_with_cursor(request: FeedRequest) {
        let mut source = MockActorLikesSource::new();
        source
            .expect_get_actor_likes()
            .withf(|req| {
                req.actor.as_str() == "did:plc:alice"
                    && req.cursor.as_deref() == Some("c0")
                    && req.limit == 25
            })
            .times(1)
            .returning(|_| {
                Ok(ActorLikesPage {
                    cursor: Some("c1".to_owned()),
                    feed: vec![
                        FeedViewPost::original(post_view("at://post/2")),
                        FeedViewPost::original(post_view("at://post/1")),
                    ],
                    undecodable: 0,
                })
            });

        let page = feed_with(source).fetch(&request).await;

        assert_eq!(page.cursor.as_deref(), Some("c1"));
        assert_eq!(page.feed.len(), 2);
        assert_eq!(page.feed[0].post.uri, "at://post/2");
    }

    #[rstest]
    #[tokio::test]
    async fn suppresses_cursor_on_empty_page(request: FeedRequest) {
        let mut source = MockActorLikesSource::new();
        source.expect_get_actor_likes().returning(|_| {
            Ok(ActorLikesPage {
                cursor: Some("bogus".to_owned()),
                feed: Vec::new(),
                undecodable: 0,
            })
        });

        let page = feed_with(source).fetch(&request).await;

        assert_eq!(page, FeedPage::end());
    }

    #[rstest]
    #[tokio::test]
    async fn keeps_cursor_when_every_upstream_item_was_undecodable(request: FeedRequest) {
        let mut source = MockActorLikesSource::new();
        source.expect_get_actor_likes().returning(|_| {
            Ok(ActorLikesPage {
                cursor: Some("next".to_owned()),
                feed: Vec::new(),
                undecodable: 2,
            })
        });

        let page = feed_with(source).fetch(&request).await;

        assert_eq!(page, FeedPage::empty(Some("next".to_owned())));
        assert!(!page.is_final());
    }

    #[rstest]
    #[case::rejected(ActorLikesError::rejected("Profile not found"))]
    #[case::network(ActorLikesError::network("status 500"))]
    #[tokio::test]
    async fn upstream_failure_degrades_to_empty_final_page(
        request: FeedRequest,
        #[case] error: ActorLikesError,
    ) {
        let mut source = MockActorLikesSource::new();
        source
            .expect_get_actor_likes()
            .returning(move |_| Err(error.clone()));

        let page = feed_with(source).fetch(&request).await;

        assert_eq!(page, FeedPage::end());
    }

    #[tokio::test]
    async fn peek_latest_requests_a_single_item() {
        let mut source = MockActorLikesSource::new();
        source
            .expect_get_actor_likes()
            .withf(|req| req.limit == 1 && req.cursor.is_none())
            .returning(|_| {
                Ok(ActorLikesPage {
                    cursor: Some("c1".to_owned()),
                    feed: vec![FeedViewPost::original(post_view("at://post/latest"))],
                    undecodable: 0,
                })
            });

        let latest = feed_with(source).peek_latest().await.expect("latest item");

        assert_eq!(latest.post.uri, "at://post/latest");
    }
}
