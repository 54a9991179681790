mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod search;
mod theme;
mod widgets;
mod workspace;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flowsheet_proto::api::BackendClient;
use flowsheet_proto::config::Config;

/// Command-line arguments for the flowsheet console
#[derive(Parser, Debug)]
#[command(name = "flowsheet")]
#[command(about = "Terminal flowsheet and library console for a radio station")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/flowsheet/config.toml)
    #[arg(short, long, env = "FLOWSHEET_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(short, long, env = "FLOWSHEET_BACKEND")]
    backend: Option<String>,

    /// DJ id for the personal bin, overrides the config file
    #[arg(short, long, env = "FLOWSHEET_DJ_ID")]
    dj_id: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = flowsheet_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("flowsheet.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("flowsheet log: {}", log_path.display());

    tracing::info!("flowsheet starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(url) = args.backend {
        config.backend.base_url = url;
    }
    if let Some(dj_id) = args.dj_id {
        config.session.dj_id = Some(dj_id);
    }
    tracing::info!(
        "backend {} dj_id={:?}",
        config.backend.base_url,
        config.session.dj_id
    );

    let client = BackendClient::new(&config.backend, &config.session)
        .with_context(|| format!("backend url {:?}", config.backend.base_url))?;

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(&config, client);
    app.run().await?;

    Ok(())
}
