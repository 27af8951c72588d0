//! Shared GET plumbing for XRPC query endpoints.

use reqwest::{Client, StatusCode, Url};

use super::dto::XrpcErrorDto;
use crate::outbound::http_support::{status_message, transport_message};

/// Why an XRPC call did not produce a success body.
#[derive(Debug)]
pub(super) enum XrpcFailure {
    /// The request never completed.
    Transport(String),
    /// The server answered with a non-success status.
    Status { status: StatusCode, message: String },
}

/// `<base>/xrpc/<nsid>`, keeping any base path.
pub(super) fn xrpc_url(base: &Url, nsid: &str) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| format!("`{base}` cannot be a base URL"))?
        .pop_if_empty()
        .extend(["xrpc", nsid]);
    Ok(url)
}

/// Issue a GET with `query` and return the body of a 2xx response.
pub(super) async fn get(
    client: &Client,
    url: Url,
    query: &[(&str, &str)],
) -> Result<Vec<u8>, XrpcFailure> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .query(query)
        .send()
        .await
        .map_err(|error| XrpcFailure::Transport(transport_message(&error)))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|error| XrpcFailure::Transport(transport_message(&error)))?;
    if !status.is_success() {
        let message = XrpcErrorDto::parse(body.as_ref())
            .and_then(|dto| dto.describe())
            .map(|described| format!("status {}: {described}", status.as_u16()))
            .unwrap_or_else(|| status_message(status, body.as_ref()));
        return Err(XrpcFailure::Status { status, message });
    }
    Ok(body.to_vec())
}

impl XrpcFailure {
    pub(super) fn into_message(self) -> String {
        match self {
            Self::Transport(message) | Self::Status { message, .. } => message,
        }
    }
}
