//! Identity documents and repository endpoint extraction.
//!
//! Only the `service` list of a DID document is modelled. Everything else in
//! the document is ignored on decode.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Fragment identifying the personal data server service entry.
pub const PDS_SERVICE_ID_FRAGMENT: &str = "#atproto_pds";
/// Service type declared by personal data server entries.
pub const PDS_SERVICE_TYPE: &str = "AtprotoPersonalDataServer";

/// One service entry declared by an identity document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidService {
    /// Service identifier, either a bare fragment or `<did>#fragment`.
    #[serde(default)]
    pub id: String,
    /// Declared service type.
    #[serde(rename = "type", default)]
    pub service_type: String,
    /// Endpoint value. DID Core allows strings, maps, or lists; only
    /// strings are usable as repository addresses.
    #[serde(default)]
    pub service_endpoint: Value,
}

/// Resolved identity document for one DID.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDocument {
    /// Subject identifier as declared by the document.
    #[serde(default)]
    pub id: String,
    /// Alternative identifiers, typically `at://<handle>`.
    #[serde(default)]
    pub also_known_as: Vec<String>,
    /// Declared service endpoints.
    #[serde(default, rename = "service")]
    pub services: Vec<DidService>,
}

/// Network location of an account's personal data repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryEndpoint(Url);

impl RepositoryEndpoint {
    /// Accept `http`/`https` URLs only.
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;
        matches!(url.scheme(), "http" | "https")
            .then_some(url)
            .filter(Url::has_host)
            .map(Self)
    }

    /// Borrow the endpoint URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for RepositoryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl DidService {
    fn is_repository_service(&self, document_id: &str) -> bool {
        let id_matches = self.id == PDS_SERVICE_ID_FRAGMENT
            || self
                .id
                .strip_suffix(PDS_SERVICE_ID_FRAGMENT)
                .is_some_and(|prefix| !prefix.is_empty() && prefix == document_id);
        id_matches && self.service_type == PDS_SERVICE_TYPE
    }
}

/// Find the personal data server endpoint declared by `document`.
///
/// The entry must be identified as `#atproto_pds` (bare or prefixed by the
/// document id), typed `AtprotoPersonalDataServer`, and carry a string
/// `http`/`https` endpoint. Returns `None` when no entry qualifies.
///
/// # Examples
/// ```
/// use likes_feed::domain::{IdentityDocument, extract_repository_endpoint};
///
/// let document: IdentityDocument = serde_json::from_str(r##"{
///     "id": "did:plc:alice",
///     "service": [{
///         "id": "#atproto_pds",
///         "type": "AtprotoPersonalDataServer",
///         "serviceEndpoint": "https://pds.example.com"
///     }]
/// }"##).expect("document");
/// let endpoint = extract_repository_endpoint(&document).expect("endpoint");
/// assert_eq!(endpoint.as_url().host_str(), Some("pds.example.com"));
/// ```
pub fn extract_repository_endpoint(document: &IdentityDocument) -> Option<RepositoryEndpoint> {
    let service = document
        .services
        .iter()
        .find(|service| service.is_repository_service(&document.id))?;
    service
        .service_endpoint
        .as_str()
        .and_then(RepositoryEndpoint::parse)
}
