use std::collections::BTreeMap;

use crate::model::node::{ModelItem, ModelTree};
use crate::model::schema::Schema;
use crate::model::writer::{Change, ModelWriter};
use crate::tree::NodeId;

/// Name of the root every editor creates.
pub const MAIN_ROOT: &str = "main";

/// The document model: one tree, its named roots and the schema.
#[derive(Debug)]
pub struct Model {
    tree: ModelTree,
    roots: BTreeMap<String, NodeId>,
    schema: Schema,
    pending: Vec<Change>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            tree: ModelTree::new(),
            roots: BTreeMap::new(),
            schema: Schema::new(),
            pending: Vec::new(),
        }
    }

    /// Creates the root `name`, or returns it when it already exists.
    pub fn create_root(&mut self, name: &str) -> NodeId {
        if let Some(id) = self.roots.get(name) {
            return *id;
        }
        let id = self.tree.create(ModelItem::Root { root_name: name.to_string() });
        self.roots.insert(name.to_string(), id);
        log::debug!("Created model root '{}'", name);
        id
    }

    pub fn root(&self, name: &str) -> Option<NodeId> {
        self.roots.get(name).copied()
    }

    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn tree(&self) -> &ModelTree {
        &self.tree
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    /// Tree, schema and change buffer borrowed together, for conversion.
    pub fn parts_mut(&mut self) -> (&mut ModelTree, &Schema, &mut Vec<Change>) {
        (&mut self.tree, &self.schema, &mut self.pending)
    }

    /// Runs `callback` with a writer; changes to attached roots are queued.
    pub fn change<R>(&mut self, callback: impl FnOnce(&mut ModelWriter<'_>) -> R) -> R {
        let mut writer = ModelWriter::new(&mut self.tree, &mut self.pending);
        callback(&mut writer)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.pending)
    }

    /// Drops every root and node.
    pub fn destroy(&mut self) {
        self.roots.clear();
        self.pending.clear();
        self.tree = ModelTree::new();
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
