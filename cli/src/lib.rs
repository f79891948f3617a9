//! The `playerbot` command: download, deploy and watch account scripts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use playerbot_deploy::{
    ChangeReporter, ClientConfig, ConfigLoad, DEFAULT_CONFIG_FILE, Deployer, DownloadReport,
    ScriptRoot, WatchSession, ensure_root, init_script_dir,
};
use playerbot_gateway::{HttpGateway, ScriptGateway};
use tracing::{info, warn};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "playerbot", version, about = "Manage playerbot script development")]
pub struct Cli {
    /// Watch for and automatically deploy script changes.
    #[arg(long)]
    pub watch: bool,

    /// Deploy all scripts to the server.
    #[arg(long)]
    pub deploy: bool,

    /// Overwrite local scripts with the server's copies.
    #[arg(long, conflicts_with_all = ["watch", "deploy"])]
    pub overwrite: bool,

    /// Configuration file. The script directory is resolved next to it.
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log progress details.
    #[arg(long, short)]
    pub verbose: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All requested work finished.
    Completed,

    /// No configuration existed; a template was written.
    ConfigCreated,

    /// The server did not accept the configured token.
    TokenRejected,

    /// Watching ended with Ctrl-C.
    Interrupted,
}

impl RunOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Self::TokenRejected)
    }
}

/// Run the client.
pub async fn run(cli: Cli) -> Result<RunOutcome> {
    let config = match ClientConfig::load_or_init(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?
    {
        ConfigLoad::Loaded(config) => config,
        ConfigLoad::Created(path) => {
            println!(
                "Created configuration file '{}'. Set your token there and run again.",
                path.display()
            );
            return Ok(RunOutcome::ConfigCreated);
        }
    };

    let gateway = Arc::new(HttpGateway::new(&config.api_host)?);
    let Some(account) = gateway
        .exchange_token(&config.token)
        .await
        .context("failed to validate token")?
    else {
        println!(
            "Error: provided token '{}' is not valid or has expired.",
            config.token.to_uppercase()
        );
        println!("Use '.bot ai get token' in-game to get a valid token.");
        return Ok(RunOutcome::TokenRejected);
    };
    info!("Authenticated as account {account}");

    let src_dir = config.src_dir_in(&config_dir(&cli.config)?);
    if ensure_root(&src_dir)? {
        println!(
            "Source directory does not exist. Creating '{}'.",
            config.src_dir.display()
        );
    }
    // Watch events carry canonical paths.
    let src_dir = src_dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", src_dir.display()))?;

    let deployer = Deployer::new(gateway, account, ScriptRoot::new(&src_dir));

    if cli.deploy || cli.watch {
        let purpose = if cli.watch {
            " to initialize file watching"
        } else {
            ""
        };
        println!("Beginning full script deployment{purpose}.");
        let count = deployer.deploy_all().await?;
        println!("{}", deploy_summary(count));
    } else {
        let report = deployer.download(cli.overwrite).await?;
        print_download(&report);
    }

    let session = if cli.watch {
        let reporter = ChangeReporter::new(deployer.clone(), config.throttle_window());
        let session = WatchSession::start(reporter)?;
        println!("File watcher ready.");
        Some(session)
    } else {
        None
    };

    if let Some(path) = init_script_dir(&src_dir)? {
        println!("Created starter script '{}'.", path.display());
    }

    if let Some(session) = session {
        println!("Press CTRL+C to exit.");
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?;
        session.stop();
        return Ok(RunOutcome::Interrupted);
    }

    println!("All tasks complete.");
    Ok(RunOutcome::Completed)
}

fn deploy_summary(count: usize) -> String {
    format!("Full deployment of {count} scripts complete.")
}

/// Directory the configuration file lives in.
fn config_dir(config: &Path) -> Result<PathBuf> {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => std::env::current_dir().context("failed to read the working directory"),
    }
}

fn print_download(report: &DownloadReport) {
    for name in &report.written {
        println!("Downloaded {}", name.pretty());
    }
    for name in &report.skipped {
        println!(
            "Kept local {} (use --overwrite to replace it)",
            name.pretty()
        );
    }
    for name in &report.invalid {
        warn!("Server script {name:?} has a name that cannot be stored locally");
    }
}
