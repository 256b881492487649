//! mattersync host
//!
//! Drives the metadata engine over stdin/stdout so a panel (or a test
//! harness) can talk to it without an editor:
//! 1. reads one JSON command per line from stdin
//! 2. writes one JSON panel message per line to stdout
//!
//! Usage:
//!   mattersync-host --workspace ./site --config ./site/mattersync.toml
//!
//! Logs go to stderr so stdout carries only protocol messages.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mattersync_engine::{ChannelTransport, MetadataEngine, Settings};
use mattersync_host::{FsFolderInfo, FsWorkspace, handle_line};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "mattersync-host")]
#[command(about = "JSON-lines host for the mattersync metadata engine")]
struct Args {
    /// Workspace root
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document to focus on startup
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let root = settings
        .workspace_root
        .clone()
        .unwrap_or_else(|| args.workspace.clone());
    info!("mattersync host starting in {}", root.display());

    let (transport, mut rx) = ChannelTransport::new();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = rx.recv().await {
            let mut line = match serde_json::to_string(&message) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Cannot encode panel message: {}", e);
                    continue;
                }
            };
            line.push('\n');
            if let Err(e) = stdout.write_all(line.as_bytes()).await {
                warn!("stdout closed: {}", e);
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let folders = FsFolderInfo::new(root.clone(), settings.content_folders.clone());
    let mut engine = MetadataEngine::new(settings, FsWorkspace::new(root), Arc::new(transport))
        .with_folder_info(Box::new(folders));

    if let Some(file) = &args.file {
        engine.host_mut().open(file);
    }
    engine.set_panel_visible(true);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if let Err(e) = handle_line(&mut engine, &line) {
            warn!("Ignoring input line: {}", e);
        }
    }

    debug!("stdin closed, shutting down");
    drop(engine);
    writer.await.context("Writer task failed")?;
    Ok(())
}
