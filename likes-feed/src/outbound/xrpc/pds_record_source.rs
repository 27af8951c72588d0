//! Reqwest-backed `com.atproto.repo.listRecords` adapter.
//!
//! The target host varies per request (each actor lives on its own PDS), so
//! the adapter holds only a client and builds the URL from the request.

use async_trait::async_trait;
use reqwest::Client;

use super::dto::ListRecordsResponseDto;
use super::transport::{self, XrpcFailure};
use crate::domain::ports::{
    ListRecordsRequest, RecordListingError, RecordPage, RepositoryRecordSource,
};
use crate::outbound::http_support::HttpClientSettings;

const LIST_RECORDS_NSID: &str = "com.atproto.repo.listRecords";

/// Lists repository records straight from the owning PDS.
pub struct PdsRecordSource {
    client: Client,
}

impl PdsRecordSource {
    /// Build an adapter with the given client settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: &HttpClientSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: settings.build_client()?,
        })
    }
}

#[async_trait]
impl RepositoryRecordSource for PdsRecordSource {
    async fn list_records(
        &self,
        request: &ListRecordsRequest,
    ) -> Result<RecordPage, RecordListingError> {
        let url = transport::xrpc_url(request.endpoint.as_url(), LIST_RECORDS_NSID)
            .map_err(RecordListingError::network)?;
        let limit = request.limit.to_string();
        let mut query = vec![
            ("repo", request.repo.as_str()),
            ("collection", request.collection.as_str()),
            ("limit", limit.as_str()),
        ];
        if let Some(cursor) = request.cursor.as_deref() {
            query.push(("cursor", cursor));
        }

        let body = transport::get(&self.client, url, &query)
            .await
            .map_err(map_failure)?;
        let decoded: ListRecordsResponseDto = serde_json::from_slice(&body).map_err(|error| {
            RecordListingError::decode(format!("invalid listRecords payload: {error}"))
        })?;
        Ok(decoded.into_record_page())
    }
}

fn map_failure(failure: XrpcFailure) -> RecordListingError {
    RecordListingError::network(failure.into_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Did, RepositoryEndpoint};
    use crate::outbound::http_support::can_bind_localhost;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn request(endpoint: &str, cursor: Option<&str>) -> ListRecordsRequest {
        ListRecordsRequest {
            endpoint: RepositoryEndpoint::parse(endpoint).expect("endpoint"),
            repo: Did::new("did:plc:alice").expect("did"),
            collection: "app.bsky.feed.like".to_owned(),
            cursor: cursor.map(str::to_owned),
            limit: 50,
        }
    }

    fn like(rkey: &str) -> serde_json::Value {
        json!({
            "uri": format!("at://did:plc:alice/app.bsky.feed.like/{rkey}"),
            "cid": format!("cid-{rkey}"),
            "value": {
                "subject": { "uri": format!("at://did:plc:bob/app.bsky.feed.post/{rkey}"), "cid": "bafy" },
                "createdAt": "2024-05-01T12:00:00Z"
            }
        })
    }

    #[tokio::test]
    async fn lists_records_with_query_parameters() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/xrpc/com.atproto.repo.listRecords")
                    .query_param("repo", "did:plc:alice")
                    .query_param("collection", "app.bsky.feed.like")
                    .query_param("limit", "50")
                    .query_param("cursor", "3kprev");
                then.status(200).json_body(json!({
                    "cursor": "3knext",
                    "records": [like("a"), like("b")]
                }));
            })
            .await;

        let page = PdsRecordSource::new(&HttpClientSettings::default())
            .expect("client")
            .list_records(&request(&server.base_url(), Some("3kprev")))
            .await
            .expect("page");

        mock.assert_async().await;
        assert_eq!(page.cursor.as_deref(), Some("3knext"));
        let uris: Vec<&str> = page.records.iter().map(|record| record.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "at://did:plc:alice/app.bsky.feed.like/a",
                "at://did:plc:alice/app.bsky.feed.like/b"
            ]
        );
    }

    #[tokio::test]
    async fn first_page_without_records_is_empty() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/xrpc/com.atproto.repo.listRecords")
                    .query_param("repo", "did:plc:alice");
                then.status(200).json_body(json!({ "records": [] }));
            })
            .await;

        let page = PdsRecordSource::new(&HttpClientSettings::default())
            .expect("client")
            .list_records(&request(&server.base_url(), None))
            .await
            .expect("page");

        mock.assert_async().await;
        assert_eq!(page, RecordPage::default());
    }

    #[tokio::test]
    async fn maps_failures_to_port_errors() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).query_param("cursor", "broken");
                then.status(200).body("not json");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).query_param("cursor", "down");
                then.status(502)
                    .json_body(json!({ "error": "UpstreamFailure", "message": "pds offline" }));
            })
            .await;
        let source = PdsRecordSource::new(&HttpClientSettings::default()).expect("client");

        let decode = source
            .list_records(&request(&server.base_url(), Some("broken")))
            .await
            .expect_err("decode failure");
        let network = source
            .list_records(&request(&server.base_url(), Some("down")))
            .await
            .expect_err("status failure");

        assert!(matches!(decode, RecordListingError::Decode { .. }));
        assert_eq!(
            network,
            RecordListingError::network("status 502: UpstreamFailure: pds offline")
        );
    }
}
