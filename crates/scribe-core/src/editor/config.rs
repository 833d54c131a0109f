use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Config, ConfigError};
use crate::plugin_system::{PluginDescriptor, PluginRef};

/// Options an editor is created with.
///
/// The typed fields mirror the `plugins`, `removePlugins`, `initialData`
/// and `language` keys; everything else stays in `values` for plugins to
/// read.
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    pub plugins: Vec<PluginRef>,
    pub remove_plugins: Vec<PluginRef>,
    pub initial_data: Option<String>,
    pub language: Option<String>,
    pub values: Config,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the typed keys out of a loaded configuration. Plugin lists
    /// hold plugin names.
    pub fn from_config(values: Config) -> Result<Self, ConfigError> {
        let names = |key: &str| -> Result<Vec<PluginRef>, ConfigError> {
            Ok(typed::<Vec<String>>(&values, key)?
                .unwrap_or_default()
                .into_iter()
                .map(PluginRef::Name)
                .collect())
        };
        let language = match values.get_value("language") {
            Some(serde_json::Value::Object(_)) => typed::<String>(&values, "language.ui")?,
            _ => typed::<String>(&values, "language")?,
        };
        Ok(Self {
            plugins: names("plugins")?,
            remove_plugins: names("removePlugins")?,
            initial_data: typed(&values, "initialData")?,
            language,
            values,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_config(Config::from_path(path)?)
    }

    pub fn with_plugins<I, R>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<PluginRef>,
    {
        self.plugins.extend(plugins.into_iter().map(Into::into));
        self
    }

    pub fn with_removed_plugins<I, R>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<PluginRef>,
    {
        self.remove_plugins.extend(plugins.into_iter().map(Into::into));
        self
    }

    pub fn with_initial_data(mut self, data: &str) -> Self {
        self.initial_data = Some(data.to_string());
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn with_value<T: Serialize>(mut self, path: &str, value: T) -> Result<Self, ConfigError> {
        self.values.set(path, value)?;
        Ok(self)
    }
}

fn typed<T: DeserializeOwned>(values: &Config, key: &str) -> Result<Option<T>, ConfigError> {
    values
        .get_value(key)
        .map(|value| {
            serde_json::from_value(value.clone()).map_err(|e| ConfigError::DeserializationError {
                format: format!("option '{}'", key),
                source: Box::new(e),
            })
        })
        .transpose()
}

/// Plugins and configuration every editor built with these defaults starts
/// from. Configured plugin names resolve against `plugins`, and when the
/// editor configuration lists no plugins all of them are loaded.
#[derive(Debug, Clone, Default)]
pub struct BuildDefaults {
    pub plugins: Vec<PluginDescriptor>,
    pub config: Config,
}

impl BuildDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, descriptor: PluginDescriptor) -> Self {
        self.plugins.push(descriptor);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}
