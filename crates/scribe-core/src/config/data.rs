use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::error::ConfigError;

type Result<T> = std::result::Result<T, ConfigError>;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Editor configuration values, read with dotted paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    root: Map<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    /// Wraps a JSON object. Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ConfigError::InvalidPath {
                path: String::new(),
                reason: format!("configuration root must be an object, got {}", other),
            }),
        }
    }

    /// Reads a configuration file, choosing the format by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::deserialize(&content, format)
    }

    pub fn get_value(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.get_value(path).and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn get_or<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get_value(path).is_some()
    }

    /// Sets a value, creating intermediate objects.
    pub fn set<T: Serialize>(&mut self, path: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| ConfigError::SerializationError {
            format: "json".to_string(),
            source: Box::new(e),
        })?;
        let (parents, last) = match path.rsplit_once('.') {
            Some((parents, last)) => (parents.split('.').collect::<Vec<_>>(), last),
            None => (Vec::new(), path),
        };
        let mut current = &mut self.root;
        for segment in parents {
            let entry = current.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
            current = entry.as_object_mut().ok_or_else(|| ConfigError::InvalidPath {
                path: path.to_string(),
                reason: format!("'{}' is not an object", segment),
            })?;
        }
        current.insert(last.to_string(), value);
        Ok(())
    }

    /// Sets a value only when the path is not set yet.
    pub fn define<T: Serialize>(&mut self, path: &str, value: T) -> Result<()> {
        if self.contains(path) {
            return Ok(());
        }
        self.set(path, value)
    }

    pub fn remove(&mut self, path: &str) -> Option<Value> {
        match path.rsplit_once('.') {
            None => self.root.remove(path),
            Some((parents, last)) => {
                let mut current = &mut self.root;
                for segment in parents.split('.') {
                    current = current.get_mut(segment)?.as_object_mut()?;
                }
                current.remove(last)
            }
        }
    }

    /// Deep merge: objects are merged key by key, other values from `other` win.
    pub fn merge(&mut self, other: &Config) {
        merge_maps(&mut self.root, &other.root);
    }

    /// Fills in everything `defaults` has and `self` lacks.
    pub fn merge_defaults(&mut self, defaults: &Config) {
        let mut merged = defaults.root.clone();
        merge_maps(&mut merged, &self.root);
        self.root = merged;
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn serialize(&self, format: ConfigFormat) -> Result<String> {
        let serialization_error = |format: &str, e: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SerializationError { format: format.to_string(), source: e }
        };
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&self.root).map_err(|e| serialization_error("json", Box::new(e))),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(&self.root).map_err(|e| serialization_error("yaml", Box::new(e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(&self.root).map_err(|e| serialization_error("toml", Box::new(e))),
        }
    }

    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self> {
        let deserialization_error = |format: &str, e: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::DeserializationError { format: format.to_string(), source: e }
        };
        let value: Value = match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| deserialization_error("json", Box::new(e)))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| deserialization_error("yaml", Box::new(e)))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| deserialization_error("toml", Box::new(e)))?,
        };
        if value.is_null() {
            return Ok(Self::new());
        }
        Self::from_value(value)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_maps(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => merge_maps(existing, incoming),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
