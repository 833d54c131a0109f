//! # Configuration
//!
//! A tree of JSON values addressed by dotted paths (`"logging.level"`),
//! loadable from JSON and, behind the `yaml-config` / `toml-config`
//! features, from YAML and TOML files.

pub mod data;
pub mod error;

pub use data::{Config, ConfigFormat};
pub use error::ConfigError;
