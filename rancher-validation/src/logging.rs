//! Logging configuration
//!
//! Console output goes to stderr so reports printed to stdout stay parseable.
//! An optional log directory adds a daily rolling JSON file.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub const LOG_FILE_NAME: &str = "secret-validation.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file_dir: Option<PathBuf>,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_dir: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG` wins over the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber.
    ///
    /// The returned guard flushes the log file and must be held until exit.
    pub fn init(&self) -> anyhow::Result<Option<WorkerGuard>> {
        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

        let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        if self.json_format {
            layers.push(console_layer.json().boxed());
        } else {
            layers.push(console_layer.with_ansi(true).boxed());
        }

        let guard = match &self.file_dir {
            Some(dir) => {
                let (writer, guard) = non_blocking(rolling::daily(dir, LOG_FILE_NAME));
                layers.push(
                    fmt::layer()
                        .with_thread_ids(true)
                        .with_ansi(false)
                        .json()
                        .with_writer(writer)
                        .boxed(),
                );
                Some(guard)
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(layers)
            .with(self.env_filter())
            .try_init()?;

        tracing::debug!(level = %self.level, json = self.json_format, "Logging initialized");

        Ok(guard)
    }
}

/// Route logs through the test harness writer. Safe to call from every test.
pub fn init_for_tests() {
    let _ = fmt()
        .with_env_filter(LoggingConfig::default().env_filter())
        .with_test_writer()
        .try_init();
}
