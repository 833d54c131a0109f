//! # Scribe Editor Errors
//!
//! [`Error`] is the crate-wide error. Every subsystem error converts into it,
//! and errors raised by plugin code are carried unchanged in
//! [`Error::Plugin`].
use std::error::Error as StdError;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::conversion::error::ConversionError;
use crate::editor::state::EditorState;
use crate::event::error::EventSystemError;
use crate::plugin_system::error::PluginSystemError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("editor-command-not-found: command '{name}' is not registered")]
    CommandNotFound { name: String },

    #[error("Invalid editor state transition from '{from}' to '{to}'")]
    InvalidState { from: EditorState, to: EditorState },

    #[error("editor-create-initial-data: initial data was passed both as an argument and as the 'initialData' option")]
    InitialDataConflict,

    /// An error raised by plugin or command code, kept as it was raised.
    #[error("{0}")]
    Plugin(Box<dyn StdError + Send + Sync + 'static>),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps an error raised by plugin code.
    pub fn plugin<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Plugin(Box::new(error))
    }

    /// The original plugin error, if this is one.
    pub fn plugin_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Error::Plugin(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }

    /// Attempts to view the plugin error as `E`.
    pub fn downcast_plugin<E: StdError + 'static>(&self) -> Option<&E> {
        self.plugin_error().and_then(|inner| inner.downcast_ref::<E>())
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Other(message.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Other(message)
    }
}

pub type Result<T> = StdResult<T, Error>;
