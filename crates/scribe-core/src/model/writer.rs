use serde_json::Value;

use crate::model::node::{Attributes, ModelItem, ModelTree};
use crate::tree::{NodeId, Position};

/// A mutation of an attached document root, recorded for the editing pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Insert { node: NodeId },
    Remove { parent: NodeId, nodes: Vec<NodeId> },
    Attribute { node: NodeId, key: String, old_value: Option<Value>, new_value: Option<Value> },
}

/// Result of [`ModelWriter::split`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    /// Position inside the limit element, between the two halves.
    pub position: Position,
    /// The second half of the element the split started in.
    pub cursor_parent: Option<NodeId>,
    /// Every `(original, copy)` pair created, innermost first.
    pub pairs: Vec<(NodeId, NodeId)>,
}

/// Mutates a model tree. Mutations of nodes under a document root are
/// recorded as [`Change`]s; detached fragments are written silently.
pub struct ModelWriter<'a> {
    tree: &'a mut ModelTree,
    changes: &'a mut Vec<Change>,
}

impl<'a> ModelWriter<'a> {
    pub fn new(tree: &'a mut ModelTree, changes: &'a mut Vec<Change>) -> Self {
        Self { tree, changes }
    }

    pub fn tree(&self) -> &ModelTree {
        &*self.tree
    }

    pub fn create_element(&mut self, name: &str, attributes: Attributes) -> NodeId {
        self.tree.create(ModelItem::Element { name: name.to_string(), attributes })
    }

    pub fn create_text(&mut self, data: &str, attributes: Attributes) -> NodeId {
        self.tree.create(ModelItem::Text { data: data.to_string(), attributes })
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.tree.create(ModelItem::Fragment)
    }

    pub fn insert(&mut self, node: NodeId, position: Position) {
        if self.tree.parent(node).is_some() {
            self.remove(node);
        }
        self.tree.insert(position, node);
        if self.tree.is_attached(node) {
            self.changes.push(Change::Insert { node });
        }
    }

    pub fn append(&mut self, node: NodeId, parent: NodeId) {
        let end = self.tree.child_count(parent);
        self.insert(node, Position::new(parent, end));
    }

    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.tree.parent(node) else {
            return;
        };
        let attached = self.tree.is_attached(node);
        self.tree.detach(node);
        if attached {
            self.changes.push(Change::Remove { parent, nodes: vec![node] });
        }
    }

    /// Removes every child of `parent`.
    pub fn clear(&mut self, parent: NodeId) {
        let nodes = self.tree.children(parent).to_vec();
        if nodes.is_empty() {
            return;
        }
        let attached = self.tree.is_attached(parent);
        for node in &nodes {
            self.tree.detach(*node);
        }
        if attached {
            self.changes.push(Change::Remove { parent, nodes });
        }
    }

    pub fn set_attribute(&mut self, key: &str, value: Value, node: NodeId) {
        let attached = self.tree.is_attached(node);
        let Some(attributes) = self.tree.get_mut(node).attributes_mut() else {
            return;
        };
        let old_value = attributes.insert(key.to_string(), value.clone());
        if attached && old_value.as_ref() != Some(&value) {
            self.changes.push(Change::Attribute {
                node,
                key: key.to_string(),
                old_value,
                new_value: Some(value),
            });
        }
    }

    pub fn remove_attribute(&mut self, key: &str, node: NodeId) {
        let attached = self.tree.is_attached(node);
        let Some(attributes) = self.tree.get_mut(node).attributes_mut() else {
            return;
        };
        let old_value = attributes.remove(key);
        if attached && old_value.is_some() {
            self.changes.push(Change::Attribute { node, key: key.to_string(), old_value, new_value: None });
        }
    }

    /// Splits every element from `position.parent` up to (excluding) `limit`.
    ///
    /// Each split element keeps the children before the split point; a
    /// shallow copy inserted right after it receives the rest. `limit` must
    /// be an ancestor of `position.parent`, or `position.parent` itself.
    pub fn split(&mut self, position: Position, limit: NodeId) -> SplitOutcome {
        let mut position = position;
        let mut pairs = Vec::new();
        while position.parent != limit {
            let element = position.parent;
            let (Some(parent), Some(index)) = (self.tree.parent(element), self.tree.index_of(element)) else {
                break;
            };
            let attached = self.tree.is_attached(element);
            let moved = self.tree.children(element).get(position.offset..).map(<[NodeId]>::to_vec).unwrap_or_default();

            let copy = self.tree.shallow_clone(element);
            self.tree.move_children(element, position.offset, copy);
            self.tree.insert(Position::new(parent, index + 1), copy);
            if attached {
                if !moved.is_empty() {
                    self.changes.push(Change::Remove { parent: element, nodes: moved });
                }
                self.changes.push(Change::Insert { node: copy });
            }

            pairs.push((element, copy));
            position = Position::new(parent, index + 1);
        }
        SplitOutcome { position, cursor_parent: pairs.first().map(|(_, copy)| *copy), pairs }
    }
}
