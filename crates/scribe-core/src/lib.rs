//! # Scribe Core
//!
//! The extensibility core of the Scribe rich-text editor: plugin dependency
//! resolution and lifecycle orchestration, plus the prioritized,
//! consumable-gated conversion between the document model, the editing
//! view and serialized data.
pub mod command;
pub mod config;
pub mod controller;
pub mod conversion;
pub mod editor;
pub mod event;
pub mod model;
pub mod plugin_system;
pub mod tree;
pub mod view;

pub use command::{Command, CommandCollection};
pub use config::{Config, ConfigFormat};
pub use conversion::{Conversion, DowncastGroup, Priority};
pub use editor::{BuildDefaults, Editor, EditorConfig, EditorState, Error, Result};
pub use event::{EditorEvent, Event, EventResult};
pub use plugin_system::{Plugin, PluginCollection, PluginConstructor, PluginDescriptor, PluginRef};
