//! # Editor
//!
//! [`Editor`] drives the lifecycle: load plugins, run their `init` and
//! `after_init` phases, load data, and finally tear everything down. Each
//! step moves [`EditorState`] forward and fires the matching
//! [`EditorEvent`](crate::event::EditorEvent).
pub mod config;
pub mod editor;
pub mod error;
pub mod locale;
pub mod state;

pub use config::{BuildDefaults, EditorConfig};
pub use editor::Editor;
pub use error::{Error, Result};
pub use locale::Locale;
pub use state::EditorState;

#[cfg(test)]
mod tests;
