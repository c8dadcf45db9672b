//! n8n REST API contract types
//!
//! This crate defines the wire types exchanged with an n8n instance over its
//! public REST API (`/api/v1/...`), the webhook trigger surface
//! (`/webhook/...`) and the liveness probe (`/healthz`). These types are
//! shared between the REST client, the in-memory mock client and the CLI.

pub mod error;
pub mod summary;
pub mod types;

pub use error::*;
pub use summary::*;
pub use types::*;
