use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{DirectoryCommand, DirectoryController, HttpDirectoryClient};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod input;
mod repl;
mod settings;
mod terminal;

use settings::{load_settings, OutputFormat, Settings};
use terminal::TerminalView;

/// Interactive client for a remote user directory.
#[derive(Parser, Debug)]
#[command(name = "directory", version)]
struct Args {
    /// Settings file; a missing file is ignored.
    #[arg(long, default_value = "directory.toml")]
    config: PathBuf,
    /// Collection endpoint of the directory service.
    #[arg(long)]
    api_url: Option<String>,
    /// Give up on a request after this many seconds (0 waits forever).
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Render the table as HTML fragments instead of plain text.
    #[arg(long)]
    html: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.api_url {
            settings.api_url = v.clone();
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = Some(v);
        }
        if self.html {
            settings.output = OutputFormat::Html;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    args.apply(&mut settings);
    info!(
        api_url = %settings.api_url,
        timeout_secs = ?settings.request_timeout_secs,
        output = ?settings.output,
        "starting directory client"
    );

    let api = HttpDirectoryClient::with_timeout(&settings.api_url, settings.request_timeout())
        .with_context(|| format!("cannot use directory service at '{}'", settings.api_url))?;
    info!(collection_url = %api.collection_url(), "directory service configured");
    let mut controller = DirectoryController::new(api, TerminalView::stdio(settings.output));

    controller.dispatch(DirectoryCommand::Load).await;
    repl::run(&mut controller, BufReader::new(tokio::io::stdin())).await
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
