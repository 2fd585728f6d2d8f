//! `farmhand-tui` — Terminal management panel for farm livestock.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `farmhand-core`'s snapshot store. The panel shows the herd, lets the
//! operator filter it, add records, feed/harvest/terminate animals, and
//! inspect per-record reports in a modal overlay.
//!
//! Logs are written to a file (default `/tmp/farmhand-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! store updates from the panel controller into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod components;
mod data_bridge;
mod event;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use farmhand_core::{Panel, PanelConfig};

use crate::app::App;

/// Terminal management panel for farm livestock.
#[derive(Parser, Debug)]
#[command(name = "farmhand-tui", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:8080)
    #[arg(short = 'u', long, env = "FARMHAND_SERVER")]
    server: Option<String>,

    /// Named profile from the config file
    #[arg(short = 'p', long)]
    profile: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Log file path (defaults to /tmp/farmhand-tui.log)
    #[arg(long, default_value = "/tmp/farmhand-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "farmhand_tui={log_level},farmhand_core={log_level},farmhand_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("farmhand-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Build a [`PanelConfig`] from CLI args, if a server URL was provided.
fn config_from_cli(cli: &Cli) -> Result<Option<PanelConfig>> {
    let Some(server) = cli.server.as_deref() else {
        return Ok(None);
    };
    let server = server
        .parse()
        .map_err(|e| eyre!("invalid server URL '{server}': {e}"))?;
    Ok(Some(PanelConfig {
        server,
        timeout: Duration::from_secs(cli.timeout),
        ..PanelConfig::default()
    }))
}

/// Resolve a config from the config file: the named profile, or the
/// default profile if none was requested.
fn config_from_file(cli: &Cli) -> Option<PanelConfig> {
    let config = farmhand_config::load_config_or_default();
    match cli.profile.as_deref() {
        Some(name) => farmhand_config::profile_to_panel_config(&config, name).ok(),
        None => farmhand_config::default_panel_config(&config),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flags > config file
    let panel_config = match config_from_cli(&cli)? {
        Some(config) => config,
        None => config_from_file(&cli).ok_or_else(|| {
            eyre!(
                "no backend configured — pass --server, set FARMHAND_SERVER, \
                 or add a profile to {}",
                farmhand_config::config_path().display()
            )
        })?,
    };

    info!(server = %panel_config.server, "starting farmhand-tui");

    let panel = Panel::new(panel_config).map_err(|e| eyre!("failed to build panel: {e}"))?;
    let mut app = App::new(panel);
    app.run().await?;

    Ok(())
}
