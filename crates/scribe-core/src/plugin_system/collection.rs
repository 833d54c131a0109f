use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error, info, warn};

use crate::editor::error::Result;
use crate::editor::Editor;
use crate::plugin_system::descriptor::{PluginDescriptor, PluginId, PluginInstance, PluginRef};
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::traits::Plugin;

#[derive(Default)]
struct Entries {
    /// Load order.
    loaded: Vec<(PluginDescriptor, PluginInstance)>,
    by_id: HashMap<PluginId, usize>,
    by_name: HashMap<String, usize>,
}

/// Plugins removed from a load request, matched by identity or by name.
struct Removals {
    ids: HashSet<PluginId>,
    names: HashSet<String>,
}

impl Removals {
    fn matches(&self, descriptor: &PluginDescriptor) -> bool {
        self.ids.contains(descriptor.id()) || descriptor.name().is_some_and(|name| self.names.contains(name))
    }
}

/// State of one depth-first resolution.
#[derive(Default)]
struct Resolution {
    order: Vec<PluginDescriptor>,
    resolved: HashSet<PluginId>,
    resolving: HashSet<PluginId>,
}

/// The editor's loaded plugins, keyed by identity and by name.
///
/// Entries are only ever added by [`load`](Self::load) and only removed by
/// [`destroy`](Self::destroy).
pub struct PluginCollection {
    available: Vec<PluginDescriptor>,
    entries: RwLock<Entries>,
}

impl std::fmt::Debug for PluginCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded: Vec<String> = self.read().loaded.iter().map(|(d, _)| d.display_name().to_string()).collect();
        f.debug_struct("PluginCollection")
            .field("available", &self.available.len())
            .field("loaded", &loaded)
            .finish()
    }
}

impl PluginCollection {
    /// `available` are the descriptors plugin names resolve against.
    pub fn new(available: Vec<PluginDescriptor>) -> Self {
        Self { available, entries: RwLock::new(Entries::default()) }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn available(&self) -> &[PluginDescriptor] {
        &self.available
    }

    /// Computes the load plan for `to_load` minus `to_remove`: every
    /// dependency precedes its dependents and nothing already loaded is
    /// repeated. A requested plugin that needs a removed plugin, directly or
    /// through its own requirements, is left out as well.
    pub fn resolve(&self, to_load: &[PluginRef], to_remove: &[PluginRef]) -> Result<Vec<PluginDescriptor>> {
        let requested: Vec<PluginDescriptor> = to_load
            .iter()
            .filter_map(|r| match r {
                PluginRef::Descriptor(d) => Some(d.clone()),
                PluginRef::Name(_) => None,
            })
            .collect();

        let mut removals = Removals { ids: HashSet::new(), names: HashSet::new() };
        for r in to_remove {
            match r {
                PluginRef::Descriptor(d) => {
                    removals.ids.insert(d.id().clone());
                    if let Some(name) = d.name() {
                        removals.names.insert(name.to_string());
                    }
                }
                PluginRef::Name(name) => {
                    removals.names.insert(name.clone());
                }
            }
        }

        let mut resolution = Resolution::default();
        for r in to_load {
            let descriptor = self.lookup(r, &requested, None)?;
            if removals.matches(&descriptor) {
                debug!("Plugin '{}' requested but removed, skipping", descriptor.display_name());
                continue;
            }
            if let Some(removed) = self.removed_requirement(&descriptor, &requested, &removals, &mut HashSet::new())? {
                warn!(
                    "Plugin '{}' requires '{}', which is removed from this editor; skipping it",
                    descriptor.display_name(),
                    removed
                );
                continue;
            }
            self.visit(descriptor, &requested, &mut resolution)?;
        }
        Ok(resolution.order)
    }

    fn visit(
        &self,
        descriptor: PluginDescriptor,
        requested: &[PluginDescriptor],
        resolution: &mut Resolution,
    ) -> Result<()> {
        let id = descriptor.id().clone();
        if resolution.resolved.contains(&id) || self.read().by_id.contains_key(&id) {
            return Ok(());
        }
        if resolution.resolving.contains(&id) {
            // Mutual requirement: whoever was entered first is already placed.
            debug!("Plugin '{}' is being resolved further up, treating it as satisfied", descriptor.display_name());
            return Ok(());
        }
        resolution.resolving.insert(id.clone());

        for dependency_ref in descriptor.requires() {
            let dependency = self.lookup(&dependency_ref, requested, Some(&descriptor))?;
            if *dependency.id() == id {
                return Err(PluginSystemError::SelfDependency { plugin: descriptor.display_name().to_string() }.into());
            }
            self.visit(dependency, requested, resolution)?;
        }

        resolution.resolving.remove(&id);
        resolution.resolved.insert(id);
        debug!("Resolved plugin '{}' at position {}", descriptor.display_name(), resolution.order.len());
        resolution.order.push(descriptor);
        Ok(())
    }

    /// Name of the first removed plugin `descriptor` transitively requires.
    /// Plugins already in the collection count as satisfied.
    fn removed_requirement(
        &self,
        descriptor: &PluginDescriptor,
        requested: &[PluginDescriptor],
        removals: &Removals,
        seen: &mut HashSet<PluginId>,
    ) -> Result<Option<String>> {
        if !seen.insert(descriptor.id().clone()) || self.read().by_id.contains_key(descriptor.id()) {
            return Ok(None);
        }
        for dependency_ref in descriptor.requires() {
            let dependency = self.lookup(&dependency_ref, requested, Some(descriptor))?;
            if removals.matches(&dependency) {
                return Ok(Some(dependency.display_name().to_string()));
            }
            if let Some(removed) = self.removed_requirement(&dependency, requested, removals, seen)? {
                return Ok(Some(removed));
            }
        }
        Ok(None)
    }

    fn lookup(&self, r: &PluginRef, requested: &[PluginDescriptor], required_by: Option<&PluginDescriptor>) -> Result<PluginDescriptor> {
        let name = match r {
            PluginRef::Descriptor(d) => return Ok(d.clone()),
            PluginRef::Name(name) => name,
        };
        let by_name = |d: &&PluginDescriptor| d.name() == Some(name.as_str());
        if let Some(found) = requested.iter().find(by_name).or_else(|| self.available.iter().find(by_name)) {
            return Ok(found.clone());
        }
        let entries = self.read();
        if let Some(index) = entries.by_name.get(name) {
            return Ok(entries.loaded[*index].0.clone());
        }
        Err(PluginSystemError::PluginNotFound {
            name: name.clone(),
            required_by: required_by.map(|d| d.display_name().to_string()),
        }
        .into())
    }

    /// Resolves and constructs plugins, returning the new instances in load
    /// order.
    ///
    /// Construction stops at the first failing factory and its error is
    /// returned as is.
    pub fn load(&self, editor: &Editor, to_load: &[PluginRef], to_remove: &[PluginRef]) -> Result<Vec<PluginInstance>> {
        let plan = self.resolve(to_load, to_remove).map_err(|e| {
            error!("plugincollection-load: {}", e);
            e
        })?;
        info!(
            "Loading plugins: [{}]",
            plan.iter().map(PluginDescriptor::display_name).collect::<Vec<_>>().join(", ")
        );

        let mut created = Vec::with_capacity(plan.len());
        for descriptor in plan {
            let instance = descriptor.instantiate(editor).map_err(|e| {
                error!("plugincollection-load: plugin '{}' failed to load: {}", descriptor.display_name(), e);
                e
            })?;
            self.insert(descriptor, instance.clone())?;
            created.push(instance);
        }
        Ok(created)
    }

    fn insert(&self, descriptor: PluginDescriptor, instance: PluginInstance) -> Result<()> {
        let mut entries = self.write();
        let index = entries.loaded.len();
        if let Some(name) = descriptor.name() {
            if let Some(existing) = entries.by_name.get(name) {
                let first = entries.loaded[*existing].0.id().to_string();
                let err = PluginSystemError::NameConflict {
                    name: name.to_string(),
                    first,
                    second: descriptor.id().to_string(),
                };
                error!("plugincollection-load: {}", err);
                return Err(err.into());
            }
            entries.by_name.insert(name.to_string(), index);
        }
        entries.by_id.insert(descriptor.id().clone(), index);
        entries.loaded.push((descriptor, instance));
        Ok(())
    }

    /// Typed access to a loaded plugin.
    pub fn get<P: Plugin + 'static>(&self) -> Option<Arc<P>> {
        self.get_by_id(&PluginId::of::<P>()).and_then(|instance| instance.downcast::<P>())
    }

    pub fn get_by_id(&self, id: &PluginId) -> Option<PluginInstance> {
        let entries = self.read();
        entries.by_id.get(id).map(|index| entries.loaded[*index].1.clone())
    }

    pub fn get_by_name(&self, name: &str) -> Option<PluginInstance> {
        let entries = self.read();
        entries.by_name.get(name).map(|index| entries.loaded[*index].1.clone())
    }

    pub fn contains<P: Plugin + 'static>(&self) -> bool {
        self.read().by_id.contains_key(&PluginId::of::<P>())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.read().by_name.contains_key(name)
    }

    /// Snapshot of the loaded plugins in load order.
    pub fn iter(&self) -> std::vec::IntoIter<(PluginDescriptor, PluginInstance)> {
        self.read().loaded.clone().into_iter()
    }

    /// Display names in load order.
    pub fn names(&self) -> Vec<String> {
        self.read().loaded.iter().map(|(d, _)| d.display_name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().loaded.is_empty()
    }

    /// Destroys every plugin in reverse load order and empties the
    /// collection. All plugins are given the chance to clean up; the first
    /// error is returned.
    pub async fn destroy(&self, editor: &Editor) -> Result<()> {
        let loaded = std::mem::take(&mut *self.write()).loaded;
        let mut first_error = None;
        for (descriptor, instance) in loaded.into_iter().rev() {
            debug!("Destroying plugin '{}'", descriptor.display_name());
            if let Err(e) = instance.plugin().destroy(editor).await {
                error!("Plugin '{}' failed to destroy: {}", descriptor.display_name(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
