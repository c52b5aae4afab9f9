use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tgdigest_api_client::{BridgeClient, OllamaClient};
use tgdigest_core::ChatBackend;
use tgdigest_summary::Summarizer;
use tgdigest_tui::Services;

#[derive(Parser)]
#[command(name = "tgdigest", about = "Summarize Telegram chats with a local language model")]
struct Args {
    /// Config file (default: ~/.config/tgdigest/tgdigest.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: ~/.config/tgdigest/tgdigest.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = match args.log_file.clone() {
        Some(path) => path,
        None => tgdigest_tui::default_log_path()?,
    };
    init_logging(&log_path)?;

    let config = tgdigest_tui::load_config(args.config.as_deref())?;

    if args.init_config {
        let path = match args.config {
            Some(path) => path,
            None => tgdigest_tui::default_config_path()?,
        };
        tgdigest_tui::save_config(&config, &path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut bridge = BridgeClient::new(
        &config.bridge.url,
        Duration::from_secs(config.bridge.timeout_secs),
    )
    .context("Failed to create chat bridge client")?;
    if !config.bridge.token.is_empty() {
        bridge.set_auth(config.bridge.token.clone());
    }
    let backend: Arc<dyn ChatBackend> = Arc::new(bridge);

    let generator = OllamaClient::new(
        &config.ollama.host,
        Duration::from_secs(config.ollama.timeout_secs),
    )
    .context("Failed to create generation client")?;
    info!(
        bridge = %config.bridge.url,
        endpoint = generator.endpoint(),
        model = %config.ollama.model,
        "starting tgdigest"
    );

    let summarizer = Summarizer::from_config(backend.clone(), Arc::new(generator), &config);
    tgdigest_tui::run(
        config.ui.clone(),
        Services {
            backend,
            summarizer,
        },
    )
}

/// Logs go to a file so they never corrupt the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("TGDIGEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}
