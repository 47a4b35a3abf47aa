//! Tracing subscriber setup for binaries.
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Where and how much to log.
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub default_level: String,
    /// Adds a file layer writing `<dir>/<file_name>` when set.
    pub dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            dir: None,
            file_name: "simulation.log".to_string(),
        }
    }
}

impl LogConfig {
    pub fn with_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dir = dir;
        self
    }
}

/// Installs the global subscriber: stderr always, plus a file when
/// configured.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and closes the file writer.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_level))
        .map_err(|e| anyhow::anyhow!("Invalid log filter {}: {}", config.default_level, e))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow::anyhow!("Failed to create log dir {}: {}", dir.display(), e))?;
            let appender = tracing_appender::rolling::never(dir, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    if let Some(dir) = &config.dir {
        tracing::info!("Log file: {}/{}", dir.display(), config.file_name);
    }
    Ok(guard)
}
