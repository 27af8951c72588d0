//! Reqwest-backed AppView adapter.
//!
//! Serves two ports from one client: bulk post hydration through
//! `app.bsky.feed.getPosts` and the aggregated `app.bsky.feed.getActorLikes`
//! listing.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{GetActorLikesResponseDto, GetPostsResponseDto};
use super::transport::{self, XrpcFailure};
use crate::domain::PostView;
use crate::domain::ports::{
    ActorLikesError, ActorLikesPage, ActorLikesRequest, ActorLikesSource,
    MAX_POST_URIS_PER_REQUEST, PostLookup, PostLookupError,
};
use crate::outbound::http_support::HttpClientSettings;

/// Default public AppView.
pub const DEFAULT_APPVIEW_URL: &str = "https://public.api.bsky.app";

const GET_POSTS_NSID: &str = "app.bsky.feed.getPosts";
const GET_ACTOR_LIKES_NSID: &str = "app.bsky.feed.getActorLikes";

/// Client for the AppView's read endpoints.
pub struct AppViewClient {
    client: Client,
    get_posts_url: Url,
    get_actor_likes_url: Url,
}

/// Raised when the AppView base URL cannot carry XRPC paths.
#[derive(Debug, thiserror::Error)]
pub enum AppViewClientError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The base URL is not usable.
    #[error("invalid AppView URL: {0}")]
    BaseUrl(String),
}

impl AppViewClient {
    /// Build a client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot be extended with XRPC paths.
    pub fn new(base_url: &Url, settings: &HttpClientSettings) -> Result<Self, AppViewClientError> {
        Ok(Self {
            client: settings.build_client()?,
            get_posts_url: transport::xrpc_url(base_url, GET_POSTS_NSID)
                .map_err(AppViewClientError::BaseUrl)?,
            get_actor_likes_url: transport::xrpc_url(base_url, GET_ACTOR_LIKES_NSID)
                .map_err(AppViewClientError::BaseUrl)?,
        })
    }
}

#[async_trait]
impl PostLookup for AppViewClient {
    async fn get_posts(&self, uris: &[String]) -> Result<Vec<PostView>, PostLookupError> {
        if uris.is_empty() {
            return Ok(Vec::new());
        }
        if uris.len() > MAX_POST_URIS_PER_REQUEST {
            return Err(PostLookupError::invalid_request(format!(
                "{} URIs exceeds the per-request cap of {MAX_POST_URIS_PER_REQUEST}",
                uris.len()
            )));
        }

        let query: Vec<(&str, &str)> = uris.iter().map(|uri| ("uris", uri.as_str())).collect();
        let body = transport::get(&self.client, self.get_posts_url.clone(), &query)
            .await
            .map_err(map_post_lookup_failure)?;
        let decoded: GetPostsResponseDto = serde_json::from_slice(&body).map_err(|error| {
            PostLookupError::decode(format!("invalid getPosts payload: {error}"))
        })?;
        Ok(decoded.into_posts())
    }
}

#[async_trait]
impl ActorLikesSource for AppViewClient {
    async fn get_actor_likes(
        &self,
        request: &ActorLikesRequest,
    ) -> Result<ActorLikesPage, ActorLikesError> {
        let limit = request.limit.to_string();
        let mut query = vec![("actor", request.actor.as_str()), ("limit", limit.as_str())];
        if let Some(cursor) = request.cursor.as_deref() {
            query.push(("cursor", cursor));
        }

        let body = transport::get(&self.client, self.get_actor_likes_url.clone(), &query)
            .await
            .map_err(map_actor_likes_failure)?;
        let decoded: GetActorLikesResponseDto = serde_json::from_slice(&body).map_err(|error| {
            ActorLikesError::decode(format!("invalid getActorLikes payload: {error}"))
        })?;
        Ok(decoded.into_page())
    }
}

fn map_post_lookup_failure(failure: XrpcFailure) -> PostLookupError {
    match failure {
        XrpcFailure::Status { status, message } if status == StatusCode::BAD_REQUEST => {
            PostLookupError::invalid_request(message)
        }
        other => PostLookupError::network(other.into_message()),
    }
}

fn map_actor_likes_failure(failure: XrpcFailure) -> ActorLikesError {
    match failure {
        XrpcFailure::Status { status, message } if status.is_client_error() => {
            ActorLikesError::rejected(message)
        }
        other => ActorLikesError::network(other.into_message()),
    }
}
