use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::command::CommandCollection;
use crate::config::Config;
use crate::controller::{DataController, DataProcessor, EditingController, JsonDataProcessor};
use crate::conversion::Conversion;
use crate::editor::config::{BuildDefaults, EditorConfig};
use crate::editor::error::{Error, Result};
use crate::editor::locale::Locale;
use crate::editor::state::EditorState;
use crate::event::{EditorEvent, SharedEventDispatcher};
use crate::model::document::MAIN_ROOT;
use crate::model::{Model, ModelWriter};
use crate::plugin_system::{PluginCollection, PluginInstance, PluginRef};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The editor: configuration, plugins, commands, the document model and the
/// controllers that keep views in sync with it.
///
/// Plugins receive `&Editor` and reach shared state through the `with_*`
/// accessors. When several are nested, take them in the order conversion,
/// model, then data or editing.
pub struct Editor {
    config: Mutex<Config>,
    plugins_to_load: Vec<PluginRef>,
    plugins_to_remove: Vec<PluginRef>,
    locale: Locale,
    plugins: PluginCollection,
    commands: CommandCollection,
    events: SharedEventDispatcher,
    conversion: Mutex<Conversion>,
    model: Mutex<Model>,
    data: Mutex<DataController>,
    editing: Mutex<EditingController>,
    state: Mutex<EditorState>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state())
            .field("plugins", &self.plugins)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// An editor without build defaults. Call [`init_plugins`](Self::init_plugins)
    /// to load its plugins, or use [`create`](Self::create) for the full
    /// lifecycle.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_defaults(config, BuildDefaults::default())
    }

    pub fn with_defaults(config: EditorConfig, defaults: BuildDefaults) -> Self {
        let EditorConfig { plugins, remove_plugins, language, mut values, .. } = config;
        values.merge_defaults(&defaults.config);

        let mut locale = Locale::from_config(&values);
        if let Some(language) = language {
            locale = Locale::new(&language, &language).with_translations(
                values
                    .get::<std::collections::HashMap<String, String>>(&format!("translations.{}", language))
                    .unwrap_or_default(),
            );
        }

        let plugins_to_load = if plugins.is_empty() {
            defaults.plugins.iter().cloned().map(PluginRef::Descriptor).collect()
        } else {
            plugins
        };

        log::debug!("Editor constructed with {} requested plugins", plugins_to_load.len());
        Self {
            config: Mutex::new(values),
            plugins_to_load,
            plugins_to_remove: remove_plugins,
            locale,
            plugins: PluginCollection::new(defaults.plugins),
            commands: CommandCollection::new(),
            events: SharedEventDispatcher::new(),
            conversion: Mutex::new(Conversion::new()),
            model: Mutex::new(Model::new()),
            data: Mutex::new(DataController::new(Box::new(JsonDataProcessor::new()))),
            editing: Mutex::new(EditingController::new()),
            state: Mutex::new(EditorState::Constructed),
        }
    }

    /// Builds an editor and runs its whole start-up: plugins, then data.
    ///
    /// `data` and the `initialData` option are mutually exclusive.
    pub async fn create(data: Option<&str>, config: EditorConfig) -> Result<Editor> {
        Self::create_with_defaults(data, config, BuildDefaults::default()).await
    }

    pub async fn create_with_defaults(data: Option<&str>, config: EditorConfig, defaults: BuildDefaults) -> Result<Editor> {
        if data.is_some() && config.initial_data.is_some() {
            let err = Error::InitialDataConflict;
            log::error!("{}", err);
            return Err(err);
        }
        let data = data.map(str::to_string).or_else(|| config.initial_data.clone()).unwrap_or_default();

        let editor = Self::with_defaults(config, defaults);
        editor.create_root(MAIN_ROOT);
        editor.init_plugins().await?;

        editor.load_initial_data(&data)?;
        editor.transition(EditorState::DataReady).await?;
        editor.transition(EditorState::Ready).await?;
        Ok(editor)
    }

    /// Creates a model root and its editing view root.
    pub fn create_root(&self, name: &str) {
        let mut model = lock(&self.model);
        model.create_root(name);
        lock(&self.editing).attach_root(&model, name);
    }

    /// Loads the configured plugins, then runs `init` on each of them in
    /// load order and `after_init` on each in the same order. Each call is
    /// awaited before the next starts.
    pub async fn init_plugins(&self) -> Result<Vec<PluginInstance>> {
        self.transition(EditorState::PluginsInitializing).await?;

        let loaded = self.plugins.load(self, &self.plugins_to_load, &self.plugins_to_remove)?;
        for instance in &loaded {
            instance.plugin().init(self).await.map_err(|e| {
                log::error!("Plugin init failed: {}", e);
                e
            })?;
        }
        for instance in &loaded {
            instance.plugin().after_init(self).await.map_err(|e| {
                log::error!("Plugin after_init failed: {}", e);
                e
            })?;
        }

        self.transition(EditorState::PluginsReady).await?;
        Ok(loaded)
    }

    async fn transition(&self, to: EditorState) -> Result<()> {
        let from = {
            let mut state = lock(&self.state);
            let from = *state;
            if !from.can_transition_to(to) {
                let err = Error::InvalidState { from, to };
                log::error!("{}", err);
                return Err(err);
            }
            *state = to;
            from
        };
        log::info!("Editor state: {} -> {}", from, to);
        if let Some(event) = EditorEvent::for_state(to) {
            self.events.dispatch(&event).await?;
        }
        Ok(())
    }

    fn load_initial_data(&self, data: &str) -> Result<()> {
        let conversion = lock(&self.conversion);
        let mut model = lock(&self.model);
        lock(&self.data).init(data, &mut model, &conversion, MAIN_ROOT)?;
        self.flush_changes(&conversion, &mut model)
    }

    fn flush_changes(&self, conversion: &Conversion, model: &mut Model) -> Result<()> {
        let changes = model.take_changes();
        if changes.is_empty() {
            return Ok(());
        }
        log::debug!("Converting {} model changes into the editing view", changes.len());
        lock(&self.editing).convert_changes(changes, model, conversion.editing_downcast())?;
        Ok(())
    }

    /// Runs a command by name.
    pub fn execute(&self, command: &str, args: &[Value]) -> Result<()> {
        self.commands.execute(self, command, args)
    }

    /// Applies model writes, then brings the editing view up to date.
    pub fn change<R>(&self, callback: impl FnOnce(&mut ModelWriter<'_>) -> R) -> Result<R> {
        let conversion = lock(&self.conversion);
        let mut model = lock(&self.model);
        let result = model.change(callback);
        self.flush_changes(&conversion, &mut model)?;
        Ok(result)
    }

    /// Replaces the content of the main root.
    pub fn set_data(&self, data: &str) -> Result<()> {
        let conversion = lock(&self.conversion);
        let mut model = lock(&self.model);
        lock(&self.data).set(data, &mut model, &conversion, MAIN_ROOT)?;
        self.flush_changes(&conversion, &mut model)
    }

    /// Serializes the main root.
    pub fn get_data(&self) -> Result<String> {
        self.get_root_data(MAIN_ROOT)
    }

    pub fn get_root_data(&self, root_name: &str) -> Result<String> {
        let conversion = lock(&self.conversion);
        let model = lock(&self.model);
        Ok(lock(&self.data).get(&model, &conversion, root_name)?)
    }

    pub fn set_data_processor(&self, processor: Box<dyn DataProcessor>) {
        lock(&self.data).set_processor(processor);
    }

    /// Tears the editor down: fires `destroy`, then destroys commands,
    /// plugins (reverse load order), the model and both controllers.
    /// A second call fails with [`Error::InvalidState`].
    pub async fn destroy(&self) -> Result<()> {
        self.transition(EditorState::Destroyed).await?;
        self.commands.destroy();
        let plugins_result = self.plugins.destroy(self).await;

        lock(&self.model).destroy();
        lock(&self.data).destroy();
        lock(&self.editing).destroy();
        log::info!("Editor destroyed");
        plugins_result
    }

    pub fn state(&self) -> EditorState {
        *lock(&self.state)
    }

    pub fn plugins(&self) -> &PluginCollection {
        &self.plugins
    }

    pub fn commands(&self) -> &CommandCollection {
        &self.commands
    }

    pub fn events(&self) -> &SharedEventDispatcher {
        &self.events
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Shortcut for `locale().t(..)`.
    pub fn t(&self, message: &str, values: &[&str]) -> String {
        self.locale.t(message, values)
    }

    pub fn config_get<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        lock(&self.config).get(path)
    }

    pub fn config_value(&self, path: &str) -> Option<Value> {
        lock(&self.config).get_value(path).cloned()
    }

    /// Sets a configuration default; values already configured win.
    pub fn define_config<T: Serialize>(&self, path: &str, value: T) -> Result<()> {
        lock(&self.config).define(path, value)?;
        Ok(())
    }

    pub fn with_conversion<R>(&self, f: impl FnOnce(&mut Conversion) -> R) -> R {
        f(&mut lock(&self.conversion))
    }

    pub fn with_model<R>(&self, f: impl FnOnce(&mut Model) -> R) -> R {
        f(&mut lock(&self.model))
    }

    pub fn with_editing<R>(&self, f: impl FnOnce(&EditingController) -> R) -> R {
        f(&lock(&self.editing))
    }
}
