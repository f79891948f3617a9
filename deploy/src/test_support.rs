//! In-memory gateway for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use playerbot_gateway::{AccountId, GatewayError, RemoteScript, ScriptGateway, ScriptUpload};

/// A gateway call as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Upload { names: Vec<String>, full_deploy: bool },
    Delete { names: Vec<String> },
}

/// Records every call and answers from canned data.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    uploads: Mutex<Vec<ScriptUpload>>,
    remote: Vec<RemoteScript>,
    failing: AtomicBool,
}

impl RecordingGateway {
    pub fn with_remote(remote: Vec<RemoteScript>) -> Self {
        Self {
            remote,
            ..Self::default()
        }
    }

    /// Make subsequent upload and delete calls fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Source of the most recent upload of `name`.
    pub fn uploaded_source(&self, name: &str) -> Option<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|u| u.name == name)
            .map(|u| u.script.clone())
    }

    fn check_failing(&self) -> playerbot_gateway::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ScriptGateway for RecordingGateway {
    async fn exchange_token(&self, _token: &str) -> playerbot_gateway::Result<Option<AccountId>> {
        Ok(AccountId::new(7))
    }

    async fn fetch_scripts(
        &self,
        _account: AccountId,
    ) -> playerbot_gateway::Result<Vec<RemoteScript>> {
        Ok(self.remote.clone())
    }

    async fn upload_scripts(
        &self,
        _account: AccountId,
        scripts: &[ScriptUpload],
        full_deploy: bool,
    ) -> playerbot_gateway::Result<()> {
        self.check_failing()?;
        self.calls.lock().unwrap().push(Call::Upload {
            names: scripts.iter().map(|s| s.name.clone()).collect(),
            full_deploy,
        });
        self.uploads.lock().unwrap().extend_from_slice(scripts);
        Ok(())
    }

    async fn delete_scripts(
        &self,
        _account: AccountId,
        names: &[String],
    ) -> playerbot_gateway::Result<()> {
        self.check_failing()?;
        self.calls.lock().unwrap().push(Call::Delete {
            names: names.to_vec(),
        });
        Ok(())
    }
}
