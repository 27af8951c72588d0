//! Decentralised identifier model.
//!
//! A [`Did`] is an opaque, method-prefixed account identifier
//! (`did:<method>:<identifier>`). The method decides which authority the
//! identity resolver consults, so it is parsed once at construction and
//! exposed through [`Did::method`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DID_SCHEME: &str = "did";

/// Validation errors returned by [`Did::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DidValidationError {
    /// Input was empty.
    #[error("did must not be empty")]
    Empty,
    /// Input contained whitespace anywhere.
    #[error("did must not contain whitespace")]
    ContainsWhitespace,
    /// Input did not start with the `did:` scheme.
    #[error("did must start with `did:`")]
    MissingScheme,
    /// The method segment was empty or not lowercase alphanumeric.
    #[error("did method must be non-empty lowercase alphanumeric")]
    InvalidMethod,
    /// Nothing followed the method segment.
    #[error("did must include a method-specific identifier")]
    MissingIdentifier,
}

/// DID method, which selects the resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DidMethod {
    /// `did:plc`, resolved through the PLC directory.
    Plc,
    /// `did:web`, resolved through the host's well-known document.
    Web,
    /// Any other method. Resolution is not supported.
    Other(String),
}

impl DidMethod {
    fn parse(raw: &str) -> Self {
        match raw {
            "plc" => Self::Plc,
            "web" => Self::Web,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Borrow the method name as written in the identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plc => "plc",
            Self::Web => "web",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for DidMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated decentralised identifier.
///
/// ## Invariants
/// - Non-empty, no whitespace.
/// - Shaped `did:<method>:<identifier>` with a lowercase alphanumeric
///   method and a non-empty identifier.
///
/// # Examples
/// ```
/// use likes_feed::domain::{Did, DidMethod};
///
/// let did = Did::new("did:plc:ewvi7nxzyoun6zhxrhs64oiz").expect("valid did");
/// assert_eq!(did.method(), DidMethod::Plc);
/// assert_eq!(did.identifier(), "ewvi7nxzyoun6zhxrhs64oiz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Validate and construct a [`Did`] from borrowed input.
    pub fn new(value: impl AsRef<str>) -> Result<Self, DidValidationError> {
        Self::from_owned(value.as_ref().to_owned())
    }

    fn from_owned(raw: String) -> Result<Self, DidValidationError> {
        if raw.is_empty() {
            return Err(DidValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(DidValidationError::ContainsWhitespace);
        }

        let Some(rest) = raw
            .strip_prefix(DID_SCHEME)
            .and_then(|tail| tail.strip_prefix(':'))
        else {
            return Err(DidValidationError::MissingScheme);
        };
        let Some((method, identifier)) = rest.split_once(':') else {
            return Err(DidValidationError::MissingIdentifier);
        };
        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(DidValidationError::InvalidMethod);
        }
        if identifier.is_empty() {
            return Err(DidValidationError::MissingIdentifier);
        }

        Ok(Self(raw))
    }

    /// Parsed DID method.
    pub fn method(&self) -> DidMethod {
        DidMethod::parse(self.method_name())
    }

    fn method_name(&self) -> &str {
        self.0.splitn(3, ':').nth(1).unwrap_or_default()
    }

    /// Method-specific identifier (everything after `did:<method>:`).
    pub fn identifier(&self) -> &str {
        self.0.splitn(3, ':').nth(2).unwrap_or_default()
    }

    /// Borrow the full identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Did> for String {
    fn from(value: Did) -> Self {
        value.0
    }
}

impl TryFrom<String> for Did {
    type Error = DidValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
