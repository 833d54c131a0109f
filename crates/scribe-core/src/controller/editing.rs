use std::collections::{BTreeMap, HashSet};

use crate::conversion::downcast::{DowncastConversionApi, DowncastDispatcher};
use crate::conversion::error::ConversionResult;
use crate::conversion::mapper::Mapper;
use crate::model::{Change, Model};
use crate::tree::{NodeId, Position, Range};
use crate::view::{ViewItem, ViewTree};

/// Owns the editing view and keeps it in sync with the model.
///
/// Its mapper lives as long as the editor, so view positions can be mapped
/// back to the model at any time.
#[derive(Debug, Default)]
pub struct EditingController {
    view: ViewTree,
    mapper: Mapper,
    roots: BTreeMap<String, NodeId>,
}

impl EditingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewTree {
        &self.view
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn view_root(&self, name: &str) -> Option<NodeId> {
        self.roots.get(name).copied()
    }

    /// Creates the view root for the model root `name` and binds them.
    pub fn attach_root(&mut self, model: &Model, name: &str) -> Option<NodeId> {
        let model_root = model.root(name)?;
        if let Some(existing) = self.roots.get(name) {
            return Some(*existing);
        }
        let view_root = self.view.create(ViewItem::Root { root_name: name.to_string() });
        self.mapper.bind_elements(model_root, view_root);
        self.roots.insert(name.to_string(), view_root);
        Some(view_root)
    }

    /// Converts recorded model changes into the editing view.
    pub fn convert_changes(&mut self, changes: Vec<Change>, model: &Model, dispatcher: &DowncastDispatcher) -> ConversionResult<()> {
        let inserted: HashSet<NodeId> = changes
            .iter()
            .filter_map(|change| match change {
                Change::Insert { node } => Some(*node),
                _ => None,
            })
            .collect();
        let tree = model.tree();
        let mut api = DowncastConversionApi::new(tree, model.schema(), &mut self.view, &mut self.mapper);

        for change in changes {
            match change {
                Change::Insert { node } => {
                    if !tree.is_attached(node) || api.mapper.to_view_element(node).is_some() {
                        continue;
                    }
                    let (Some(start), Some(end)) = (tree.position_before(node), tree.position_after(node)) else {
                        continue;
                    };
                    dispatcher.convert_insert(Range::new(start, end), &mut api)?;
                }
                Change::Remove { parent, nodes } => {
                    dispatcher.convert_remove(parent, &nodes, &mut api)?;
                }
                Change::Attribute { node, key, old_value, new_value } => {
                    let fresh = std::iter::once(node).chain(tree.ancestors(node)).any(|n| inserted.contains(&n));
                    if fresh || !tree.is_attached(node) {
                        continue;
                    }
                    dispatcher.convert_attribute(node, &key, old_value, new_value, &mut api)?;
                }
            }
        }
        Ok(())
    }

    /// Maps a position in the editing view to the model.
    pub fn to_model_position(&self, model: &Model, position: Position) -> Option<Position> {
        self.mapper.to_model_position(&self.view, model.tree(), position)
    }

    pub fn destroy(&mut self) {
        self.mapper.clear_bindings();
        self.roots.clear();
        self.view = ViewTree::new();
    }
}
