//! # Script Gateway
//!
//! This crate is the client side of the playerbot script API. It exchanges
//! an in-game token for an account id and then reads, replaces, updates and
//! removes the scripts stored for that account.
//!
//! ## Endpoints
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Playerbot Script API                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  GET  /scripts/{token}/      ──► account id (or nothing)        │
//! │  GET  /scripts/{accountId}/  ──► stored scripts                 │
//! │  POST /scripts               ──► upsert / full replace          │
//! │  POST /scripts/delete/       ──► remove by name                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::{HttpGateway, ScriptGateway};
pub use error::{GatewayError, Result};
pub use models::{AccountId, RemoteScript, ScriptUpload};
