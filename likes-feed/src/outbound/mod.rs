//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **did_resolver**: identity documents from the PLC directory and did:web
//!   hosts
//! - **xrpc**: repository listing against a PDS, post hydration and
//!   aggregated likes against the AppView
//! - **muted_reposts**: mute preference persistence
//!
//! Adapters are thin translators that convert between domain types and
//! wire representations. They contain no business logic.

pub mod did_resolver;
pub mod http_support;
pub mod muted_reposts;
pub mod xrpc;
