use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Result;
use clap::Parser;

mod app;
mod chat;
mod config;
mod handler;
mod logging;
mod slang;
mod state;
mod tui;
mod ui;
mod wrap;

use app::App;
use config::Config;
use slang::SlangClient;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "phillygpt")]
#[command(version, about = "Chat with the philly-slang assistant from your terminal")]
struct Cli {
    /// Base URL of the slang backend (overrides PHILLYGPT_BACKEND_URL and the config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Persist the effective backend URL to the config file
    #[arg(long)]
    save_config: bool,

    /// Write logs here instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match cli.log_file {
        Some(path) => path,
        None => logging::default_log_path()?,
    };
    let _log_guard = logging::init(&log_path)?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {e}");
        Config::new()
    });
    let backend_url = config.backend_url(cli.backend_url.as_deref());

    if cli.save_config {
        let saved = Config { backend_url: Some(backend_url.clone()) };
        let path = saved.save()?;
        tracing::info!("saved config to {}", path.display());
    }

    let backend = Arc::new(SlangClient::new(&backend_url));
    tracing::info!(backend_url = %backend.base_url(), "starting phillygpt");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, backend, backend_url).await;
    tui::restore()?;

    result
}

async fn run(terminal: &mut Tui, backend: Arc<SlangClient>, backend_url: String) -> Result<()> {
    let mut events = EventHandler::new();
    let mut app = App::new(backend, backend_url, events.sender());

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event),
            None => break,
        }
    }

    if app.session.is_loading() {
        tracing::info!("quitting with a request still in flight");
    }
    Ok(())
}
