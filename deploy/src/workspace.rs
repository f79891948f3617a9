//! Local script directory and its remote projection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use playerbot_gateway::{AccountId, ScriptGateway, ScriptUpload};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{DeployError, Result};
use crate::resolver::{
    ENTRYPOINT_NAME, LogicalName, SCRIPT_EXTENSION, ScriptFile, ScriptRoot, is_script_path,
};

/// Script written into an empty script directory.
pub const STARTER_SCRIPT: &str = r#"-- Entry point for your playerbots. The game server calls main() every
-- update; other modules in this directory can be loaded with require().
function main()
end
"#;

/// Every script file below `root`, sorted by path.
pub fn discover_scripts(root: &Path) -> Vec<PathBuf> {
    let mut scripts: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && is_script_path(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    scripts.sort();
    scripts
}

/// Create the script directory if it is missing. Returns whether it was
/// created.
pub fn ensure_root(root: &Path) -> Result<bool> {
    if root.is_dir() {
        return Ok(false);
    }

    std::fs::create_dir_all(root)?;
    info!("Created script directory {}", root.display());
    Ok(true)
}

/// Write the starter entry-point script if `root` holds no scripts.
///
/// Returns the path of the new script, or `None` when scripts already exist.
pub fn init_script_dir(root: &Path) -> Result<Option<PathBuf>> {
    if !discover_scripts(root).is_empty() {
        return Ok(None);
    }

    ensure_root(root)?;
    let path = root.join(ENTRYPOINT_NAME).with_extension(SCRIPT_EXTENSION);
    std::fs::write(&path, STARTER_SCRIPT)?;

    info!("Wrote starter script {}", path.display());
    Ok(Some(path))
}

/// Result of downloading the account's scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Scripts written to disk.
    pub written: Vec<LogicalName>,

    /// Scripts left alone because a local copy exists.
    pub skipped: Vec<LogicalName>,

    /// Remote names that cannot be laid out on disk.
    pub invalid: Vec<String>,
}

/// Pushes local scripts to, and pulls them from, one account.
#[derive(Clone)]
pub struct Deployer {
    gateway: Arc<dyn ScriptGateway>,
    account: AccountId,
    root: ScriptRoot,
}

impl Deployer {
    pub fn new(gateway: Arc<dyn ScriptGateway>, account: AccountId, root: ScriptRoot) -> Self {
        Self {
            gateway,
            account,
            root,
        }
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn root(&self) -> &ScriptRoot {
        &self.root
    }

    /// Upload the given scripts in one request.
    pub async fn upload_scripts(&self, scripts: &[ScriptFile], full_deploy: bool) -> Result<()> {
        let mut uploads = Vec::with_capacity(scripts.len());
        for script in scripts {
            let source = fs::read_to_string(&script.path)
                .await
                .map_err(|source| DeployError::ReadScript {
                    path: script.path.clone(),
                    source,
                })?;
            uploads.push(ScriptUpload::new(script.name.as_str(), source));
        }

        self.gateway
            .upload_scripts(self.account, &uploads, full_deploy)
            .await?;
        Ok(())
    }

    /// Remove the given scripts in one request.
    pub async fn delete_scripts(&self, scripts: &[ScriptFile]) -> Result<()> {
        let names: Vec<String> = scripts.iter().map(|s| s.name.to_string()).collect();
        self.gateway.delete_scripts(self.account, &names).await?;
        Ok(())
    }

    /// Upload the scripts at `paths`. Paths that are not scripts under the
    /// root are skipped. Returns the number of scripts sent.
    pub async fn upload_paths(&self, paths: &[PathBuf], full_deploy: bool) -> Result<usize> {
        let scripts = self.resolve_all(paths);
        self.upload_scripts(&scripts, full_deploy).await?;
        Ok(scripts.len())
    }

    /// Remove the scripts at `paths`. Returns the number of names sent.
    pub async fn delete_paths(&self, paths: &[PathBuf]) -> Result<usize> {
        let scripts = self.resolve_all(paths);
        self.delete_scripts(&scripts).await?;
        Ok(scripts.len())
    }

    /// Replace the account's scripts with every local script.
    pub async fn deploy_all(&self) -> Result<usize> {
        let paths = discover_scripts(self.root.path());
        let count = self.upload_paths(&paths, true).await?;
        info!("Full deploy of {count} scripts for account {}", self.account);
        Ok(count)
    }

    /// Write the account's scripts into the script directory.
    ///
    /// Local files are only replaced when `overwrite` is set.
    pub async fn download(&self, overwrite: bool) -> Result<DownloadReport> {
        let remote = self.gateway.fetch_scripts(self.account).await?;
        let mut report = DownloadReport::default();

        for script in remote {
            let Some(name) = LogicalName::parse(&script.name) else {
                warn!("Skipping remote script with unusable name {:?}", script.name);
                report.invalid.push(script.name);
                continue;
            };

            let path = self.root.path_for(&name);
            if !overwrite && fs::try_exists(&path).await? {
                debug!("Keeping local {}", path.display());
                report.skipped.push(name);
                continue;
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, script.script).await?;
            debug!("Wrote {}", path.display());
            report.written.push(name);
        }

        info!(
            "Downloaded {} scripts ({} kept, {} invalid)",
            report.written.len(),
            report.skipped.len(),
            report.invalid.len()
        );
        Ok(report)
    }

    fn resolve_all(&self, paths: &[PathBuf]) -> Vec<ScriptFile> {
        paths.iter().filter_map(|p| self.root.resolve(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, RecordingGateway};
    use playerbot_gateway::RemoteScript;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn remote(name: &str, script: &str) -> RemoteScript {
        RemoteScript {
            account_id: 7,
            name: name.to_string(),
            script: script.to_string(),
            data: None,
        }
    }

    fn deployer(gateway: &Arc<RecordingGateway>, root: &Path) -> Deployer {
        Deployer::new(
            gateway.clone(),
            AccountId::new(7).unwrap(),
            ScriptRoot::new(root),
        )
    }

    #[test]
    fn test_discover_scripts_is_recursive_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("ai")).unwrap();
        std::fs::write(root.join("main.lua"), "").unwrap();
        std::fs::write(root.join("ai/combat.lua"), "").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();

        assert_eq!(
            discover_scripts(root),
            vec![root.join("ai/combat.lua"), root.join("main.lua")]
        );
    }

    #[test]
    fn test_init_script_dir_only_seeds_empty_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("scripts");

        assert!(ensure_root(&root).unwrap());
        assert!(!ensure_root(&root).unwrap());

        let created = init_script_dir(&root).unwrap();
        assert_eq!(created, Some(root.join("main.lua")));
        assert_eq!(std::fs::read_to_string(root.join("main.lua")).unwrap(), STARTER_SCRIPT);

        assert_eq!(init_script_dir(&root).unwrap(), None);
    }

    #[tokio::test]
    async fn test_deploy_all_is_a_full_deploy() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("main.lua"), "function main() end").unwrap();
        std::fs::create_dir_all(root.join("lib")).unwrap();
        std::fs::write(root.join("lib/util.lua"), "return {}").unwrap();

        let gateway = Arc::new(RecordingGateway::default());
        let count = deployer(&gateway, root).deploy_all().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            gateway.calls(),
            vec![Call::Upload {
                names: vec!["lib.util".to_string(), "main".to_string()],
                full_deploy: true,
            }]
        );
        assert_eq!(gateway.uploaded_source("main").as_deref(), Some("function main() end"));
    }

    #[tokio::test]
    async fn test_deploy_all_sends_each_name_once() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("ai")).unwrap();
        std::fs::write(root.join("ai/combat.lua"), "return 'nested'").unwrap();
        std::fs::write(root.join("ai.combat.lua"), "return 'dotted'").unwrap();

        let gateway = Arc::new(RecordingGateway::default());
        let count = deployer(&gateway, root).deploy_all().await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            gateway.calls(),
            vec![Call::Upload {
                names: vec!["ai.combat".to_string()],
                full_deploy: true,
            }]
        );
        assert_eq!(
            gateway.uploaded_source("ai.combat").as_deref(),
            Some("return 'nested'")
        );
    }

    #[tokio::test]
    async fn test_upload_paths_skips_non_scripts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("a.lua"), "").unwrap();

        let gateway = Arc::new(RecordingGateway::default());
        let sent = deployer(&gateway, root)
            .upload_paths(&[root.join("a.lua"), root.join("readme.md")], false)
            .await
            .unwrap();

        assert_eq!(sent, 1);
        assert_eq!(
            gateway.calls(),
            vec![Call::Upload {
                names: vec!["a".to_string()],
                full_deploy: false,
            }]
        );
    }

    #[tokio::test]
    async fn test_upload_of_missing_file_fails_before_sending() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = Arc::new(RecordingGateway::default());

        let result = deployer(&gateway, temp_dir.path())
            .upload_paths(&[temp_dir.path().join("gone.lua")], false)
            .await;

        assert!(matches!(result, Err(DeployError::ReadScript { .. })));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_paths_sends_names() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = Arc::new(RecordingGateway::default());

        let sent = deployer(&gateway, temp_dir.path())
            .delete_paths(&[temp_dir.path().join("ai/combat.lua")])
            .await
            .unwrap();

        assert_eq!(sent, 1);
        assert_eq!(
            gateway.calls(),
            vec![Call::Delete {
                names: vec!["ai.combat".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn test_download_respects_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("main.lua"), "local").unwrap();

        let gateway = Arc::new(RecordingGateway::with_remote(vec![
            remote("main", "remote main"),
            remote("ai.combat", "remote combat"),
            remote("bad..name", ""),
        ]));
        let deployer = deployer(&gateway, root);

        let report = deployer.download(false).await.unwrap();
        assert_eq!(report.written, vec![LogicalName::parse("ai.combat").unwrap()]);
        assert_eq!(report.skipped, vec![LogicalName::parse("main").unwrap()]);
        assert_eq!(report.invalid, vec!["bad..name".to_string()]);
        assert_eq!(std::fs::read_to_string(root.join("main.lua")).unwrap(), "local");
        assert_eq!(
            std::fs::read_to_string(root.join("ai/combat.lua")).unwrap(),
            "remote combat"
        );

        let report = deployer.download(true).await.unwrap();
        assert_eq!(report.written.len(), 2);
        assert_eq!(std::fs::read_to_string(root.join("main.lua")).unwrap(), "remote main");
    }
}
