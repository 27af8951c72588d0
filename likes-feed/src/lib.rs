//! Likes feed aggregation for AT Protocol accounts.
//!
//! `domain` holds the feed sources and their ports; `outbound` holds the
//! HTTP and storage adapters; `config` loads runtime settings.

pub mod config;
pub mod domain;
pub mod outbound;
