use std::collections::HashMap;

use crate::model::ModelTree;
use crate::tree::{NodeId, Position};
use crate::view::ViewTree;

/// Bidirectional correspondence between model and view nodes.
///
/// The editing controller keeps one mapper for the lifetime of the editor;
/// the data pipeline clears its mapper before every serialization.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    model_to_view: HashMap<NodeId, NodeId>,
    view_to_model: HashMap<NodeId, NodeId>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `model` and `view` to each other, dropping any earlier binding
    /// of either side.
    pub fn bind_elements(&mut self, model: NodeId, view: NodeId) {
        self.unbind_model_element(model);
        self.unbind_view_element(view);
        self.model_to_view.insert(model, view);
        self.view_to_model.insert(view, model);
    }

    pub fn unbind_model_element(&mut self, model: NodeId) {
        if let Some(view) = self.model_to_view.remove(&model) {
            self.view_to_model.remove(&view);
        }
    }

    pub fn unbind_view_element(&mut self, view: NodeId) {
        if let Some(model) = self.view_to_model.remove(&view) {
            self.model_to_view.remove(&model);
        }
    }

    pub fn clear_bindings(&mut self) {
        self.model_to_view.clear();
        self.view_to_model.clear();
    }

    pub fn to_view_element(&self, model: NodeId) -> Option<NodeId> {
        self.model_to_view.get(&model).copied()
    }

    pub fn to_model_element(&self, view: NodeId) -> Option<NodeId> {
        self.view_to_model.get(&view).copied()
    }

    pub fn len(&self) -> usize {
        self.model_to_view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model_to_view.is_empty()
    }

    /// Nearest view ancestor of `view` (or `view` itself) bound to the model.
    pub fn find_mapped_view_ancestor(&self, view_tree: &ViewTree, view: NodeId) -> Option<NodeId> {
        std::iter::once(view)
            .chain(view_tree.ancestors(view))
            .find(|node| self.view_to_model.contains_key(node))
    }

    /// Maps a model position to the view.
    ///
    /// The view offset is placed after the view counterpart of the last
    /// mapped model node before the position. View wrappers (attribute
    /// elements) around that counterpart are stepped over.
    pub fn to_view_position(&self, model: &ModelTree, view: &ViewTree, position: Position) -> Option<Position> {
        let view_parent = self.to_view_element(position.parent)?;
        let before = &model.children(position.parent)[..position.offset.min(model.child_count(position.parent))];
        for model_node in before.iter().rev() {
            let Some(view_node) = self.to_view_element(*model_node) else {
                continue;
            };
            if let Some(child) = child_of(view, view_parent, view_node) {
                return view.index_of(child).map(|index| Position::new(view_parent, index + 1));
            }
        }
        Some(Position::at_start(view_parent))
    }

    /// Maps a view position to the model, climbing to the nearest mapped
    /// container when the view parent itself has no model counterpart.
    pub fn to_model_position(&self, view: &ViewTree, model: &ModelTree, position: Position) -> Option<Position> {
        if self.to_model_element(position.parent).is_none() {
            let ancestor = self.find_mapped_view_ancestor(view, position.parent)?;
            let child = child_of(view, ancestor, position.parent)?;
            let offset = view.index_of(child)? + usize::from(position.offset > 0);
            return self.to_model_position(view, model, Position::new(ancestor, offset));
        }
        let model_parent = self.to_model_element(position.parent)?;
        let before = &view.children(position.parent)[..position.offset.min(view.child_count(position.parent))];
        for view_node in before.iter().rev() {
            let mapped = std::iter::once(*view_node)
                .chain(view.descendants(*view_node).into_iter().rev())
                .find_map(|v| self.to_model_element(v));
            if let Some(model_node) = mapped {
                if model.parent(model_node) == Some(model_parent) {
                    return model.index_of(model_node).map(|index| Position::new(model_parent, index + 1));
                }
            }
        }
        Some(Position::at_start(model_parent))
    }
}

/// The child of `parent` that is `node` or contains it.
fn child_of(tree: &ViewTree, parent: NodeId, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|candidate| tree.parent(*candidate) == Some(parent))
}
