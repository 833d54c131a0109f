//! Per-pass claims over `(item, aspect)` pairs.
//!
//! Converters test and consume aspects before acting; an aspect that has
//! been consumed is unavailable to every later converter in the same pass.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::model::ModelTree;
use crate::tree::NodeId;
use crate::view::{ViewItem, ViewTree};

#[derive(Debug, Clone)]
pub struct Consumable<K> {
    items: HashMap<K, BTreeMap<String, bool>>,
}

impl<K: Eq + Hash + Copy> Consumable<K> {
    pub fn new() -> Self {
        Self { items: HashMap::new() }
    }

    /// Marks `aspect` of `item` as available.
    pub fn add(&mut self, item: K, aspect: impl Into<String>) {
        self.items.entry(item).or_default().insert(aspect.into(), true);
    }

    /// Whether every aspect is known and still available.
    pub fn test<S: AsRef<str>>(&self, item: K, aspects: &[S]) -> bool {
        let Some(available) = self.items.get(&item) else {
            return false;
        };
        aspects.iter().all(|a| available.get(a.as_ref()).copied().unwrap_or(false))
    }

    /// Consumes all aspects, or none of them when any is unavailable.
    pub fn consume<S: AsRef<str>>(&mut self, item: K, aspects: &[S]) -> bool {
        if !self.test(item, aspects) {
            return false;
        }
        if let Some(available) = self.items.get_mut(&item) {
            for aspect in aspects {
                available.insert(aspect.as_ref().to_string(), false);
            }
        }
        true
    }

    /// Makes consumed aspects available again. Unknown aspects are ignored.
    pub fn revert<S: AsRef<str>>(&mut self, item: K, aspects: &[S]) {
        if let Some(available) = self.items.get_mut(&item) {
            for aspect in aspects {
                if let Some(flag) = available.get_mut(aspect.as_ref()) {
                    *flag = true;
                }
            }
        }
    }

    /// Aspects of `item` not consumed yet, sorted.
    pub fn remaining(&self, item: K) -> Vec<&str> {
        self.items
            .get(&item)
            .map(|aspects| aspects.iter().filter(|(_, free)| **free).map(|(a, _)| a.as_str()).collect())
            .unwrap_or_default()
    }
}

impl<K: Eq + Hash + Copy> Default for Consumable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Aspects of a view element a converter wants to claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewMatch {
    aspects: Vec<String>,
}

impl ViewMatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the element name.
    pub fn name() -> Self {
        Self { aspects: vec!["name".to_string()] }
    }

    pub fn attribute(mut self, key: &str) -> Self {
        self.aspects.push(format!("attribute:{}", key));
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.aspects.push(format!("class:{}", class));
        self
    }

    pub fn style(mut self, style: &str) -> Self {
        self.aspects.push(format!("style:{}", style));
        self
    }

    pub fn aspects(&self) -> &[String] {
        &self.aspects
    }
}

/// Consumable covering `root` and every node below it.
pub fn view_consumable(tree: &ViewTree, root: NodeId) -> Consumable<NodeId> {
    let mut consumable = Consumable::new();
    for node in std::iter::once(root).chain(tree.descendants(root)) {
        consumable.add(node, "name");
        if let ViewItem::Element(element) = tree.get(node) {
            for key in element.attributes.keys() {
                consumable.add(node, format!("attribute:{}", key));
            }
            for class in &element.classes {
                consumable.add(node, format!("class:{}", class));
            }
            for style in element.styles.keys() {
                consumable.add(node, format!("style:{}", style));
            }
        }
    }
    consumable
}

/// Consumable for model nodes about to be inserted into a view.
pub fn model_consumable(tree: &ModelTree, nodes: &[NodeId]) -> Consumable<NodeId> {
    let mut consumable = Consumable::new();
    for node in nodes {
        consumable.add(*node, "insert");
        if let Some(attributes) = tree.get(*node).attributes() {
            for key in attributes.keys() {
                consumable.add(*node, format!("attribute:{}", key));
            }
        }
    }
    consumable
}

/// Turns a downcast event name into the aspect it claims:
/// `insert:paragraph` -> `insert`, `attribute:bold:$text` -> `attribute:bold`.
pub fn model_aspect(event_name: &str) -> String {
    let mut parts = event_name.split(':');
    match (parts.next(), parts.next()) {
        (Some("attribute"), Some(key)) => format!("attribute:{}", key),
        (Some(kind), _) => kind.to_string(),
        (None, _) => String::new(),
    }
}
