use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default log location; stdout and stderr are owned by the terminal UI.
pub fn default_log_path() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?;

    Ok(cache_dir.join("phillygpt").join("phillygpt.log"))
}

/// Route `tracing` output to `path`. Keep the guard alive until exit so
/// buffered lines get flushed.
pub fn init(path: &Path) -> Result<WorkerGuard> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("log path {} has no parent directory", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log path {} has no file name", path.display()))?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::debug!("Tracing initialized");
    Ok(guard)
}
