//! Script gateway trait and its HTTP implementation.

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use tracing::{debug, info};

use crate::error::{GatewayError, Result};
use crate::models::{
    AccountId, DeleteScriptsRequest, RemoteScript, ScriptUpload, SetScriptsRequest,
    TokenResponse, WireScript,
};

/// Operations the client needs from the script server.
#[async_trait]
pub trait ScriptGateway: Send + Sync {
    /// Exchange an in-game token for the account it belongs to.
    ///
    /// Returns `None` when the token is unknown or has expired.
    async fn exchange_token(&self, token: &str) -> Result<Option<AccountId>>;

    /// Fetch every script stored for the account.
    async fn fetch_scripts(&self, account: AccountId) -> Result<Vec<RemoteScript>>;

    /// Create or replace scripts.
    ///
    /// With `full_deploy` set the server also removes every script of the
    /// account that is not part of `scripts`.
    async fn upload_scripts(
        &self,
        account: AccountId,
        scripts: &[ScriptUpload],
        full_deploy: bool,
    ) -> Result<()>;

    /// Remove scripts by logical name.
    async fn delete_scripts(&self, account: AccountId, names: &[String]) -> Result<()>;
}

/// Script gateway backed by the playerbot HTTP API.
pub struct HttpGateway {
    /// API base URL.
    base_url: Url,

    /// HTTP client.
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway for the given API host, e.g. `http://localhost:5000`.
    pub fn new(api_host: &str) -> Result<Self> {
        let base_url =
            Url::parse(api_host).map_err(|e| GatewayError::InvalidUrl(format!("{api_host}: {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(api_host.to_string()));
        }

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL below the base URL.
    fn endpoint(&self, segments: &[&str], trailing_slash: bool) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| GatewayError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
            if trailing_slash {
                path.push("");
            }
        }
        Ok(url)
    }
}

/// Turn a non-success response into `GatewayError::Api`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ScriptGateway for HttpGateway {
    async fn exchange_token(&self, token: &str) -> Result<Option<AccountId>> {
        let url = self.endpoint(&["scripts", token], true)?;
        debug!("Exchanging token at {url}");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND
            || response.status() == StatusCode::NO_CONTENT
        {
            return Ok(None);
        }

        let body = check_status(response).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let entry: Option<TokenResponse> = serde_json::from_str(&body)?;
        Ok(entry.and_then(|t| AccountId::new(t.account_id)))
    }

    async fn fetch_scripts(&self, account: AccountId) -> Result<Vec<RemoteScript>> {
        let url = self.endpoint(&["scripts", &account.to_string()], true)?;
        debug!("Fetching scripts from {url}");

        let response = check_status(self.client.get(url).send().await?).await?;
        let scripts: Vec<RemoteScript> = response.json().await?;

        info!("Fetched {} scripts for account {account}", scripts.len());
        Ok(scripts)
    }

    async fn upload_scripts(
        &self,
        account: AccountId,
        scripts: &[ScriptUpload],
        full_deploy: bool,
    ) -> Result<()> {
        let url = self.endpoint(&["scripts"], false)?;
        let body = SetScriptsRequest {
            account_id: account,
            scripts: scripts
                .iter()
                .map(|s| WireScript {
                    account_id: account,
                    name: &s.name,
                    script: &s.script,
                })
                .collect(),
            is_complete: full_deploy,
        };

        debug!(
            "Uploading {} scripts to {url} (full deploy: {full_deploy})",
            scripts.len()
        );
        check_status(self.client.post(url).json(&body).send().await?).await?;

        info!("Uploaded {} scripts for account {account}", scripts.len());
        Ok(())
    }

    async fn delete_scripts(&self, account: AccountId, names: &[String]) -> Result<()> {
        let url = self.endpoint(&["scripts", "delete"], true)?;
        let body = DeleteScriptsRequest {
            account_id: account,
            script_names: names,
        };

        debug!("Deleting {names:?} at {url}");
        check_status(self.client.post(url).json(&body).send().await?).await?;

        info!("Deleted {} scripts for account {account}", names.len());
        Ok(())
    }
}
