use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::editor::error::Result;
use crate::editor::Editor;
use crate::plugin_system::traits::{Plugin, PluginConstructor};

#[derive(Clone, PartialEq, Eq, Hash)]
enum IdKey {
    Type(TypeId),
    Custom(Arc<str>),
}

/// Identity of a plugin: the type that implements it, or an explicit key
/// for plugins assembled at runtime.
#[derive(Clone)]
pub struct PluginId {
    key: IdKey,
    label: Arc<str>,
}

impl PluginId {
    pub fn of<T: 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let short = full.rsplit("::").next().unwrap_or(full);
        Self { key: IdKey::Type(TypeId::of::<T>()), label: Arc::from(short) }
    }

    pub fn custom(key: &str) -> Self {
        let key: Arc<str> = Arc::from(key);
        Self { key: IdKey::Custom(key.clone()), label: key }
    }

    /// Short display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for PluginId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PluginId {}

impl Hash for PluginId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginId({})", self.label)
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// A constructed plugin, viewable both as `dyn Plugin` and as its
/// concrete type.
#[derive(Clone)]
pub struct PluginInstance {
    plugin: Arc<dyn Plugin>,
    any: Arc<dyn Any + Send + Sync>,
}

impl PluginInstance {
    pub fn new<P: Plugin + 'static>(plugin: P) -> Self {
        let plugin = Arc::new(plugin);
        Self { plugin: plugin.clone(), any: plugin }
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    pub fn downcast<P: Plugin + 'static>(&self) -> Option<Arc<P>> {
        self.any.clone().downcast::<P>().ok()
    }

    /// Whether both handles point at the same plugin object.
    pub fn ptr_eq(&self, other: &PluginInstance) -> bool {
        Arc::ptr_eq(&self.any, &other.any)
    }
}

impl fmt::Debug for PluginInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInstance").finish_non_exhaustive()
    }
}

pub type RequiresFn = Arc<dyn Fn() -> Vec<PluginRef> + Send + Sync>;
pub type PluginFactory = Arc<dyn Fn(&Editor) -> Result<PluginInstance> + Send + Sync>;

/// Everything the collection needs to resolve and build a plugin.
///
/// `requires` is evaluated lazily so two descriptors may refer to each other.
#[derive(Clone)]
pub struct PluginDescriptor {
    id: PluginId,
    name: Option<String>,
    requires: RequiresFn,
    factory: PluginFactory,
}

impl PluginDescriptor {
    pub fn new<F>(id: PluginId, factory: F) -> Self
    where
        F: Fn(&Editor) -> Result<PluginInstance> + Send + Sync + 'static,
    {
        Self { id, name: None, requires: Arc::new(Vec::new), factory: Arc::new(factory) }
    }

    /// Descriptor of a [`PluginConstructor`] type.
    pub fn of<P: PluginConstructor>() -> Self {
        Self {
            id: PluginId::of::<P>(),
            name: P::PLUGIN_NAME.map(str::to_string),
            requires: Arc::new(P::requires),
            factory: Arc::new(|editor| P::create(editor).map(PluginInstance::new)),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_requires<F>(mut self, requires: F) -> Self
    where
        F: Fn() -> Vec<PluginRef> + Send + Sync + 'static,
    {
        self.requires = Arc::new(requires);
        self
    }

    pub fn id(&self) -> &PluginId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name if declared, type label otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.label())
    }

    pub fn requires(&self) -> Vec<PluginRef> {
        (self.requires)()
    }

    pub fn instantiate(&self, editor: &Editor) -> Result<PluginInstance> {
        (self.factory)(editor)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A reference to a plugin in `plugins`, `removePlugins` or `requires`.
#[derive(Debug, Clone)]
pub enum PluginRef {
    Descriptor(PluginDescriptor),
    /// Resolved against the descriptors available to the collection.
    Name(String),
}

impl PluginRef {
    pub fn of<P: PluginConstructor>() -> Self {
        PluginRef::Descriptor(PluginDescriptor::of::<P>())
    }

    pub fn name(name: &str) -> Self {
        PluginRef::Name(name.to_string())
    }
}

impl From<PluginDescriptor> for PluginRef {
    fn from(descriptor: PluginDescriptor) -> Self {
        PluginRef::Descriptor(descriptor)
    }
}

impl From<&str> for PluginRef {
    fn from(name: &str) -> Self {
        PluginRef::Name(name.to_string())
    }
}

impl From<String> for PluginRef {
    fn from(name: String) -> Self {
        PluginRef::Name(name)
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginRef::Descriptor(descriptor) => f.write_str(descriptor.display_name()),
            PluginRef::Name(name) => f.write_str(name),
        }
    }
}
