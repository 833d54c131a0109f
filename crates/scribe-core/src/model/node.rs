use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;

use crate::tree::{NodeId, Tree};

pub type Attributes = BTreeMap<String, Value>;

pub type ModelTree = Tree<ModelItem>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelItem {
    Root { root_name: String },
    Fragment,
    Element { name: String, attributes: Attributes },
    Text { data: String, attributes: Attributes },
}

impl ModelItem {
    pub fn element(name: impl Into<String>) -> Self {
        ModelItem::Element { name: name.into(), attributes: Attributes::new() }
    }

    pub fn text(data: impl Into<String>) -> Self {
        ModelItem::Text { data: data.into(), attributes: Attributes::new() }
    }

    /// Schema name of the item. Text is `$text`, roots are `$root`.
    pub fn name(&self) -> &str {
        match self {
            ModelItem::Root { .. } => "$root",
            ModelItem::Fragment => "$documentFragment",
            ModelItem::Element { name, .. } => name,
            ModelItem::Text { .. } => "$text",
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            ModelItem::Element { attributes, .. } | ModelItem::Text { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut Attributes> {
        match self {
            ModelItem::Element { attributes, .. } | ModelItem::Text { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes().and_then(|attrs| attrs.get(key))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, ModelItem::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ModelItem::Text { .. })
    }

    pub fn is_root(&self) -> bool {
        matches!(self, ModelItem::Root { .. })
    }

    pub fn text_data(&self) -> Option<&str> {
        match self {
            ModelItem::Text { data, .. } => Some(data),
            _ => None,
        }
    }
}

impl Tree<ModelItem> {
    pub fn name(&self, id: NodeId) -> &str {
        self.get(id).name()
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&Value> {
        self.get(id).attribute(key)
    }

    /// True when the node sits under a document root (not a detached fragment).
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get(self.root_of(id)).is_root()
    }

    /// Schema names from the outermost ancestor down to `id` itself.
    pub fn context_names(&self, id: NodeId) -> Vec<String> {
        let mut names: Vec<String> = self.ancestors(id).iter().rev().map(|a| self.name(*a).to_string()).collect();
        names.push(self.name(id).to_string());
        names
    }

    /// Compact markup of the children of `id`, used by logs and tests.
    pub fn stringify_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.stringify_into(*child, &mut out);
        }
        out
    }

    fn stringify_into(&self, id: NodeId, out: &mut String) {
        match self.get(id) {
            ModelItem::Text { data, attributes } if attributes.is_empty() => out.push_str(data),
            ModelItem::Text { data, attributes } => {
                out.push_str("<$text");
                write_attributes(attributes, out);
                let _ = write!(out, ">{}</$text>", data);
            }
            ModelItem::Element { name, attributes } => {
                let _ = write!(out, "<{}", name);
                write_attributes(attributes, out);
                out.push('>');
                for child in self.children(id) {
                    self.stringify_into(*child, out);
                }
                let _ = write!(out, "</{}>", name);
            }
            ModelItem::Root { .. } | ModelItem::Fragment => {
                for child in self.children(id) {
                    self.stringify_into(*child, out);
                }
            }
        }
    }
}

fn write_attributes(attributes: &Attributes, out: &mut String) {
    for (key, value) in attributes {
        match value {
            Value::String(s) => {
                let _ = write!(out, " {}=\"{}\"", key, s);
            }
            other => {
                let _ = write!(out, " {}=\"{}\"", key, other);
            }
        }
    }
}
