//! Installs the process-wide logger.
//!
//! Records from the `log` facade used across Scribe are bridged into a
//! `tracing` subscriber that writes to stderr, either as text or as JSON
//! lines. Configuration lives under `logging`:
//!
//! ```json
//! { "logging": { "level": "debug,scribe_core::conversion=trace", "format": "json" } }
//! ```
//!
//! `RUST_LOG`, when set, overrides `logging.level`.
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use scribe_core::{Editor, Error, Plugin, PluginConstructor, Result};

pub const DEFAULT_LEVEL: &str = "info";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: default_level(), format: LogFormat::default() }
    }
}

impl LoggingSettings {
    /// Reads `logging` from the editor configuration.
    pub fn from_editor(editor: &Editor) -> Result<Self> {
        match editor.config_value("logging") {
            Some(value) => serde_json::from_value(value).map_err(Error::plugin),
            None => Ok(Self::default()),
        }
    }

    /// The filter for `level`.
    pub fn filter(&self) -> std::result::Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.level).map_err(|e| LoggingError::InvalidFilter {
            filter: self.level.clone(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct LoggingPlugin;

#[async_trait]
impl Plugin for LoggingPlugin {
    async fn init(&self, editor: &Editor) -> Result<()> {
        let settings = LoggingSettings::from_editor(editor)?;
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => settings.filter().map_err(Error::plugin)?,
        };

        if let Err(e) = tracing_log::LogTracer::init() {
            // Another logger owns the `log` facade, e.g. a second editor in this process.
            debug!("Log bridge already installed: {}", e);
            return Ok(());
        }
        let registry = tracing_subscriber::registry().with(filter);
        let installed = match settings.format {
            LogFormat::Text => tracing::subscriber::set_global_default(registry.with(fmt::layer().with_writer(std::io::stderr))),
            LogFormat::Json => {
                tracing::subscriber::set_global_default(registry.with(fmt::layer().json().with_writer(std::io::stderr)))
            }
        };
        match installed {
            Ok(()) => info!("Logging initialized (level '{}', format {:?})", settings.level, settings.format),
            Err(e) => warn!("A global tracing subscriber is already set: {}", e),
        }
        Ok(())
    }
}

impl PluginConstructor for LoggingPlugin {
    const PLUGIN_NAME: Option<&'static str> = Some("Logging");

    fn create(editor: &Editor) -> Result<Self> {
        editor.define_config("logging.level", DEFAULT_LEVEL)?;
        editor.define_config("logging.format", LogFormat::default())?;
        Ok(LoggingPlugin)
    }
}
