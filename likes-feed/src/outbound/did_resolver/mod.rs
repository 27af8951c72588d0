//! Identity document resolution adapters.
//!
//! Provides a thin HTTP implementation of the `IdentityResolver` port.

mod http_resolver;

pub use http_resolver::{
    DEFAULT_PLC_DIRECTORY_URL, HttpIdentityResolver, WebDidScheme, WebDidSchemeError,
};
