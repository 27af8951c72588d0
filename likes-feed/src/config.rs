//! Likes feed configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::FeatureFlags;
use crate::outbound::did_resolver::{DEFAULT_PLC_DIRECTORY_URL, WebDidScheme, WebDidSchemeError};
use crate::outbound::http_support::{DEFAULT_USER_AGENT, HttpClientSettings};
use crate::outbound::xrpc::DEFAULT_APPVIEW_URL;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings that fail validation after loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A URL setting did not parse.
    #[error("invalid {field} `{value}`: {source}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Raw value.
        value: String,
        /// Parser failure.
        source: url::ParseError,
    },
    /// The did:web scheme is neither `http` nor `https`.
    #[error(transparent)]
    InvalidWebDidScheme(#[from] WebDidSchemeError),
}

/// Service endpoints, transport limits, and feature flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LIKES_FEED")]
pub struct LikesFeedSettings {
    /// PLC directory base URL.
    pub plc_directory_url: Option<String>,
    /// AppView base URL for post hydration and aggregated likes.
    pub appview_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Scheme used to fetch did:web documents (`https` or `http`).
    pub web_did_scheme: Option<String>,
    /// `User-Agent` header for outbound requests.
    pub user_agent: Option<String>,
    /// JSON file holding mute preferences; in-memory when unset.
    pub mutes_path: Option<PathBuf>,
    /// Serve other accounts' likes from their repositories.
    pub other_profile_likes: Option<bool>,
    /// Hide reposts by accounts the viewer has muted.
    pub mute_reposts_by_account: Option<bool>,
}

impl LikesFeedSettings {
    /// PLC directory URL, falling back to the public directory.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidUrl`] for an unparsable override.
    pub fn plc_directory_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "plc_directory_url",
            self.plc_directory_url
                .as_deref()
                .unwrap_or(DEFAULT_PLC_DIRECTORY_URL),
        )
    }

    /// AppView URL, falling back to the public AppView.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidUrl`] for an unparsable override.
    pub fn appview_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "appview_url",
            self.appview_url.as_deref().unwrap_or(DEFAULT_APPVIEW_URL),
        )
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// did:web scheme, defaulting to `https`.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidWebDidScheme`] for other schemes.
    pub fn web_did_scheme(&self) -> Result<WebDidScheme, SettingsError> {
        match self.web_did_scheme.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(WebDidScheme::default()),
        }
    }

    /// Client settings shared by every HTTP adapter.
    pub fn http_client_settings(&self) -> HttpClientSettings {
        HttpClientSettings {
            timeout: self.request_timeout(),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        }
    }

    /// Feature flags; unset flags keep their enabled default.
    pub fn feature_flags(&self) -> FeatureFlags {
        let defaults = FeatureFlags::default();
        FeatureFlags {
            other_profile_likes: self
                .other_profile_likes
                .unwrap_or(defaults.other_profile_likes),
            mute_reposts_by_account: self
                .mute_reposts_by_account
                .unwrap_or(defaults.mute_reposts_by_account),
        }
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}
