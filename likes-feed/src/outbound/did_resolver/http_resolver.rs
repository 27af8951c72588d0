//! Reqwest-backed identity resolver.
//!
//! `did:plc` documents come from the PLC directory; `did:web` documents come
//! from the host's `/.well-known/did.json`. Other methods are refused
//! without a network call.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::{IdentityResolutionError, IdentityResolver};
use crate::domain::{Did, DidMethod, IdentityDocument};
use crate::outbound::http_support::{HttpClientSettings, status_message, transport_message};

/// Default PLC directory.
pub const DEFAULT_PLC_DIRECTORY_URL: &str = "https://plc.directory";

const WELL_KNOWN_DID_PATH: &str = ".well-known/did.json";

/// URL scheme used to reach did:web hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebDidScheme {
    /// Production hosts.
    #[default]
    Https,
    /// Local development hosts.
    Http,
}

impl WebDidScheme {
    /// Scheme as it appears in a URL.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for WebDidScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for a scheme other than `http` or `https`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported did:web scheme `{0}`; expected http or https")]
pub struct WebDidSchemeError(String);

impl FromStr for WebDidScheme {
    type Err = WebDidSchemeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "https" => Ok(Self::Https),
            "http" => Ok(Self::Http),
            other => Err(WebDidSchemeError(other.to_owned())),
        }
    }
}

/// Identity resolver that queries the authority for each DID method.
pub struct HttpIdentityResolver {
    client: Client,
    plc_directory: Url,
    web_scheme: WebDidScheme,
}

impl HttpIdentityResolver {
    /// Build a resolver for `plc_directory` and did:web hosts over
    /// `web_scheme`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        plc_directory: Url,
        web_scheme: WebDidScheme,
        settings: &HttpClientSettings,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: settings.build_client()?,
            plc_directory,
            web_scheme,
        })
    }

    fn document_url(&self, did: &Did) -> Result<Url, IdentityResolutionError> {
        match did.method() {
            DidMethod::Plc => plc_document_url(&self.plc_directory, did),
            DidMethod::Web => web_did_document_url(did.identifier(), self.web_scheme),
            DidMethod::Other(method) => Err(IdentityResolutionError::unsupported_method(method)),
        }
    }
}

/// `<directory>/<did>`, keeping any base path on the directory URL.
fn plc_document_url(directory: &Url, did: &Did) -> Result<Url, IdentityResolutionError> {
    let mut url = directory.clone();
    url.path_segments_mut()
        .map_err(|()| {
            IdentityResolutionError::network(format!("PLC directory `{directory}` cannot be a base"))
        })?
        .pop_if_empty()
        .push(did.as_str());
    Ok(url)
}

/// `<scheme>://<host>/.well-known/did.json` for a did:web identifier.
///
/// `%3A` in the identifier encodes a port separator. A bare `:` marks the
/// path form, which is not supported.
fn web_did_document_url(
    identifier: &str,
    scheme: WebDidScheme,
) -> Result<Url, IdentityResolutionError> {
    if identifier.contains(':') {
        return Err(IdentityResolutionError::decode(format!(
            "path-form did:web `{identifier}` is not supported"
        )));
    }
    let host = identifier.replace("%3A", ":").replace("%3a", ":");
    if host.is_empty() || host.contains('/') {
        return Err(IdentityResolutionError::decode(format!(
            "invalid did:web host `{identifier}`"
        )));
    }
    Url::parse(&format!("{scheme}://{host}/{WELL_KNOWN_DID_PATH}")).map_err(|error| {
        IdentityResolutionError::decode(format!("invalid did:web host `{identifier}`: {error}"))
    })
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, did: &Did) -> Result<IdentityDocument, IdentityResolutionError> {
        let url = self.document_url(did)?;
        debug!(did = %did, url = %url, "resolving identity document");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            IdentityResolutionError::decode(format!("invalid identity document for {did}: {error}"))
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityResolutionError {
    IdentityResolutionError::network(transport_message(&error))
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityResolutionError {
    let message = status_message(status, body);
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => IdentityResolutionError::not_found(message),
        _ => IdentityResolutionError::network(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::http_support::can_bind_localhost;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use rstest::rstest;
    use serde_json::json;

    fn did(raw: &str) -> Did {
        Did::new(raw).expect("valid did")
    }

    fn resolver(plc_directory: &str) -> HttpIdentityResolver {
        HttpIdentityResolver::new(
            Url::parse(plc_directory).expect("url"),
            WebDidScheme::Http,
            &HttpClientSettings::default(),
        )
        .expect("client")
    }

    fn plc_document() -> serde_json::Value {
        json!({
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": "did:plc:alice",
            "alsoKnownAs": ["at://alice.test"],
            "service": [{
                "id": "#atproto_pds",
                "type": "AtprotoPersonalDataServer",
                "serviceEndpoint": "https://pds.example.com"
            }]
        })
    }

    #[rstest]
    #[case::plain("example.com", WebDidScheme::Https, "https://example.com/.well-known/did.json")]
    #[case::port("localhost%3A8080", WebDidScheme::Http, "http://localhost:8080/.well-known/did.json")]
    #[case::lower_port("localhost%3a8080", WebDidScheme::Http, "http://localhost:8080/.well-known/did.json")]
    fn builds_web_document_urls(
        #[case] identifier: &str,
        #[case] scheme: WebDidScheme,
        #[case] expected: &str,
    ) {
        let url = web_did_document_url(identifier, scheme).expect("url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::slash("example.com/users/alice")]
    #[case::colon_path("example.com:u:alice")]
    fn rejects_path_form_web_identifiers(#[case] identifier: &str) {
        let error = web_did_document_url(identifier, WebDidScheme::Https)
            .expect_err("path form is unsupported");
        assert!(matches!(error, IdentityResolutionError::Decode { .. }));
    }

    #[rstest]
    #[case::https("https", WebDidScheme::Https)]
    #[case::http_upper("HTTP", WebDidScheme::Http)]
    fn parses_web_schemes(#[case] raw: &str, #[case] expected: WebDidScheme) {
        assert_eq!(raw.parse::<WebDidScheme>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_web_scheme() {
        assert!("ftp".parse::<WebDidScheme>().is_err());
    }

    #[test]
    fn plc_url_keeps_directory_base_path() {
        let url = plc_document_url(
            &Url::parse("https://directory.test/mirror/").expect("url"),
            &did("did:plc:alice"),
        )
        .expect("url");
        assert_eq!(url.as_str(), "https://directory.test/mirror/did:plc:alice");
    }

    #[tokio::test]
    async fn resolves_plc_document_from_directory() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/did:plc:alice");
                then.status(200).json_body(plc_document());
            })
            .await;

        let document = resolver(&server.base_url())
            .resolve(&did("did:plc:alice"))
            .await
            .expect("document");

        mock.assert_async().await;
        assert_eq!(document.id, "did:plc:alice");
        assert_eq!(document.services.len(), 1);
    }

    #[tokio::test]
    async fn resolves_web_document_from_well_known_path() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }
        let server = MockServer::start_async().await;
        let web_did = did(&format!("did:web:localhost%3A{}", server.port()));
        let body = json!({ "id": web_did.as_str(), "service": [] });
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/.well-known/did.json");
                then.status(200).json_body(body);
            })
            .await;

        let document = resolver("https://plc.invalid")
            .resolve(&web_did)
            .await
            .expect("document");

        mock.assert_async().await;
        assert!(document.services.is_empty());
    }

    #[rstest]
    #[case::not_found(404, "NotFound")]
    #[case::server_error(500, "Network")]
    #[tokio::test]
    async fn maps_error_statuses(#[case] status: u16, #[case] expected: &str) {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/did:plc:ghost");
                then.status(status).body("DID not registered");
            })
            .await;

        let error = resolver(&server.base_url())
            .resolve(&did("did:plc:ghost"))
            .await
            .expect_err("should fail");

        match expected {
            "NotFound" => assert!(matches!(error, IdentityResolutionError::NotFound { .. })),
            "Network" => assert!(matches!(error, IdentityResolutionError::Network { .. })),
            _ => panic!("unsupported test expectation: {expected}"),
        }
        assert!(error.to_string().contains("DID not registered"));
    }

    #[tokio::test]
    async fn malformed_document_is_a_decode_error() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/did:plc:alice");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let error = resolver(&server.base_url())
            .resolve(&did("did:plc:alice"))
            .await
            .expect_err("should fail");

        assert!(matches!(error, IdentityResolutionError::Decode { .. }));
    }

    #[tokio::test]
    async fn other_methods_are_refused_without_network() {
        let error = resolver("http://127.0.0.1:9")
            .resolve(&did("did:key:z6Mkabc"))
            .await
            .expect_err("unsupported");

        assert_eq!(
            error,
            IdentityResolutionError::unsupported_method("key")
        );
    }
}
