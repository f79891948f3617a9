//! Wire types for the script API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account that owns a set of scripts on the server.
///
/// The server reports an unknown or expired token as account `0`, so a
/// zero id never becomes an `AccountId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i32);

impl AccountId {
    /// Wrap a raw id, rejecting the zero sentinel.
    pub fn new(raw: i32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// The raw numeric id.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A script as stored on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteScript {
    /// Owning account.
    #[serde(default)]
    pub account_id: i32,

    /// Logical module name.
    pub name: String,

    /// Lua source.
    #[serde(default)]
    pub script: String,

    /// Opaque per-script data kept by the game server.
    #[serde(default)]
    pub data: Option<String>,
}

/// A script to create or replace on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUpload {
    /// Logical module name.
    pub name: String,

    /// Lua source.
    pub script: String,
}

impl ScriptUpload {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }
}

/// Token lookup response. Only the account id is of interest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub account_id: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireScript<'a> {
    pub account_id: AccountId,
    pub name: &'a str,
    pub script: &'a str,
}

/// Body of `POST /scripts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetScriptsRequest<'a> {
    pub account_id: AccountId,
    pub scripts: Vec<WireScript<'a>>,
    /// When set the server drops every script not in `scripts`.
    pub is_complete: bool,
}

/// Body of `POST /scripts/delete/`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteScriptsRequest<'a> {
    pub account_id: AccountId,
    pub script_names: &'a [String],
}
