use async_trait::async_trait;

use crate::editor::error::Result;
use crate::editor::Editor;
use crate::plugin_system::descriptor::PluginRef;

/// Core trait that all editor plugins implement.
///
/// Every phase has an empty default, so a plugin only overrides the phases
/// it takes part in.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// First phase, run for every plugin in load order.
    async fn init(&self, _editor: &Editor) -> Result<()> {
        Ok(())
    }

    /// Second phase, run after every plugin finished `init`.
    async fn after_init(&self, _editor: &Editor) -> Result<()> {
        Ok(())
    }

    /// Teardown, run in reverse load order when the editor is destroyed.
    async fn destroy(&self, _editor: &Editor) -> Result<()> {
        Ok(())
    }
}

/// A plugin type that can describe and construct itself.
///
/// ```ignore
/// struct Bold;
///
/// impl PluginConstructor for Bold {
///     const PLUGIN_NAME: Option<&'static str> = Some("Bold");
///
///     fn create(_editor: &Editor) -> Result<Self> {
///         Ok(Bold)
///     }
/// }
/// ```
pub trait PluginConstructor: Plugin + Sized + 'static {
    /// Secondary lookup key, also accepted in the `plugins` and
    /// `removePlugins` configuration lists.
    const PLUGIN_NAME: Option<&'static str> = None;

    /// Plugins that must be loaded and initialized before this one.
    fn requires() -> Vec<PluginRef> {
        Vec::new()
    }

    /// Builds the plugin. Called once per editor, after every required
    /// plugin has been constructed.
    fn create(editor: &Editor) -> Result<Self>;
}
