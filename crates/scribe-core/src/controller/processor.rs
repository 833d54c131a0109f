use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conversion::error::ConversionResult;
use crate::tree::NodeId;
use crate::view::{ViewElement, ViewItem, ViewTree};

/// Translates between external data and view fragments.
pub trait DataProcessor: Send + Sync {
    /// Parses `data` into a new fragment of `view`.
    fn to_view(&self, data: &str, view: &mut ViewTree) -> ConversionResult<NodeId>;

    /// Serializes the children of `fragment`.
    fn to_data(&self, view: &ViewTree, fragment: NodeId) -> ConversionResult<String>;
}

/// A node of the JSON data format: a string is text, an object is an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonNode {
    Text(String),
    Element {
        name: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<JsonNode>,
    },
}

/// Data processor for JSON arrays of [`JsonNode`]s.
#[derive(Debug, Clone, Default)]
pub struct JsonDataProcessor {
    pretty: bool,
}

impl JsonDataProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    fn build(&self, node: &JsonNode, view: &mut ViewTree, parent: NodeId) {
        match node {
            JsonNode::Text(text) => {
                let id = view.create(ViewItem::Text(text.clone()));
                view.append(parent, id);
            }
            JsonNode::Element { name, attributes, children } => {
                let mut element = ViewElement::container(name.as_str());
                for (key, value) in attributes {
                    element.set_attribute(key, value);
                }
                let id = view.create(ViewItem::Element(element));
                view.append(parent, id);
                for child in children {
                    self.build(child, view, id);
                }
            }
        }
    }

    fn export(&self, view: &ViewTree, node: NodeId) -> Option<JsonNode> {
        match view.get(node) {
            ViewItem::Text(text) => Some(JsonNode::Text(text.clone())),
            ViewItem::Element(element) => {
                let mut attributes = element.attributes.clone();
                if let Some(class) = element.class_attribute() {
                    attributes.insert("class".to_string(), class);
                }
                if let Some(style) = element.style_attribute() {
                    attributes.insert("style".to_string(), style);
                }
                let children = view.children(node).iter().filter_map(|c| self.export(view, *c)).collect();
                Some(JsonNode::Element { name: element.name.clone(), attributes, children })
            }
            ViewItem::Root { .. } | ViewItem::Fragment => None,
        }
    }
}

impl DataProcessor for JsonDataProcessor {
    fn to_view(&self, data: &str, view: &mut ViewTree) -> ConversionResult<NodeId> {
        let fragment = view.create(ViewItem::Fragment);
        if data.trim().is_empty() {
            return Ok(fragment);
        }
        let nodes: Vec<JsonNode> = serde_json::from_str(data)?;
        for node in &nodes {
            self.build(node, view, fragment);
        }
        Ok(fragment)
    }

    fn to_data(&self, view: &ViewTree, fragment: NodeId) -> ConversionResult<String> {
        let nodes: Vec<JsonNode> = view.children(fragment).iter().filter_map(|c| self.export(view, *c)).collect();
        let data = if self.pretty { serde_json::to_string_pretty(&nodes)? } else { serde_json::to_string(&nodes)? };
        Ok(data)
    }
}
