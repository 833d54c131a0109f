//! # Scribe Plugin System Errors
//!
//! Configuration errors raised while resolving a plugin load plan. Errors a
//! plugin raises itself (construction, `init`, `after_init`) are not wrapped
//! here; they travel as [`Error::Plugin`](crate::editor::error::Error::Plugin).

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("plugincollection-plugin-not-found: plugin '{name}' is not available{}", required_by.as_ref().map(|p| format!(" (required by '{}')", p)).unwrap_or_default())]
    PluginNotFound {
        name: String,
        required_by: Option<String>,
    },

    #[error("plugincollection-self-dependency: plugin '{plugin}' requires itself")]
    SelfDependency { plugin: String },

    #[error("plugincollection-plugin-name-conflict: plugins '{first}' and '{second}' are both named '{name}'")]
    NameConflict {
        name: String,
        first: String,
        second: String,
    },
}
