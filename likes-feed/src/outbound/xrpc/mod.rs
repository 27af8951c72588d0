//! XRPC outbound adapters.
//!
//! Thin HTTP implementations of the repository listing, post lookup, and
//! aggregated likes ports.

mod appview_client;
mod dto;
mod pds_record_source;
mod transport;

pub use appview_client::{AppViewClient, AppViewClientError, DEFAULT_APPVIEW_URL};
pub use pds_record_source::PdsRecordSource;
