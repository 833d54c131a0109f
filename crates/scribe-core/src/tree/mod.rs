//! # Arena Trees
//!
//! The model and the view are both stored as [`Tree`]s: an arena of nodes
//! addressed by [`NodeId`], with [`Position`]s expressed as a parent node and
//! a child offset. Detached nodes stay in the arena so bindings that point at
//! them remain valid handles.

use std::fmt;

/// Handle of a node inside one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A place between two children of `parent`; `offset` counts child nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub parent: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(parent: NodeId, offset: usize) -> Self {
        Self { parent, offset }
    }

    pub fn at_start(parent: NodeId) -> Self {
        Self { parent, offset: 0 }
    }

    pub fn shifted(self, by: usize) -> Self {
        Self { parent: self.parent, offset: self.offset + by }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn collapsed(position: Position) -> Self {
        Self { start: position, end: position }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Range that contains exactly the children of `parent` between `start` and `end`.
    pub fn flat(parent: NodeId, start: usize, end: usize) -> Self {
        Self::new(Position::new(parent, start), Position::new(parent, end))
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    data: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node to the arena.
    pub fn create(&mut self, data: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { data, parent: None, children: Vec::new() });
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> &T {
        &self.nodes[id.0].data
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    pub fn is_empty_node(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Inserts `node` at `position`, detaching it from its previous parent first.
    /// An offset past the end appends.
    pub fn insert(&mut self, position: Position, node: NodeId) {
        self.detach(node);
        let children = &mut self.nodes[position.parent.0].children;
        let offset = position.offset.min(children.len());
        children.insert(offset, node);
        self.nodes[node.0].parent = Some(position.parent);
    }

    pub fn append(&mut self, parent: NodeId, node: NodeId) {
        let end = self.child_count(parent);
        self.insert(Position::new(parent, end), node);
    }

    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Moves the children of `from` starting at `offset` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, offset: usize, to: NodeId) {
        let moved: Vec<NodeId> = {
            let children = &mut self.nodes[from.0].children;
            let offset = offset.min(children.len());
            children.drain(offset..).collect()
        };
        for child in moved {
            self.nodes[child.0].parent = Some(to);
            self.nodes[to.0].children.push(child);
        }
    }

    /// Ancestors of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            result.push(node);
            current = self.parent(node);
        }
        result
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    pub fn position_before(&self, id: NodeId) -> Option<Position> {
        Some(Position::new(self.parent(id)?, self.index_of(id)?))
    }

    pub fn position_after(&self, id: NodeId) -> Option<Position> {
        Some(Position::new(self.parent(id)?, self.index_of(id)? + 1))
    }

    pub fn node_after(&self, position: Position) -> Option<NodeId> {
        self.children(position.parent).get(position.offset).copied()
    }

    pub fn node_before(&self, position: Position) -> Option<NodeId> {
        let offset = position.offset.checked_sub(1)?;
        self.children(position.parent).get(offset).copied()
    }

    /// Descendants of `id` in document order (pre-order), not including `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        result
    }

    /// Nodes whose start lies inside `range`, in document order.
    ///
    /// The ends may have different parents, as after a split: the walk leaves
    /// ancestors of the start and enters the nodes leading to the end. A node
    /// entered on the way to the end is included even though only its head is
    /// covered.
    pub fn walk(&self, range: &Range) -> Vec<NodeId> {
        let end = range.end;
        let mut result = Vec::new();
        let mut current = range.start;
        loop {
            if current.parent == end.parent && current.offset >= end.offset {
                break;
            }
            match self.node_after(current) {
                Some(node) => {
                    result.push(node);
                    current = if self.children(node).is_empty() {
                        current.shifted(1)
                    } else {
                        Position::at_start(node)
                    };
                }
                None => {
                    let parent = current.parent;
                    if parent == end.parent || self.is_ancestor_of(parent, end.parent) {
                        break;
                    }
                    match self.position_after(parent) {
                        Some(after) => current = after,
                        None => break,
                    }
                }
            }
        }
        result
    }
}

impl<T: Clone> Tree<T> {
    /// Creates a detached copy of `id` without its children.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let data = self.get(id).clone();
        self.create(data)
    }
}
