use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::tree::{NodeId, Tree};

pub type ViewTree = Tree<ViewItem>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
    /// Block-like element mapped to a model element.
    #[default]
    Container,
    /// Inline wrapper produced from a model text attribute.
    Attribute,
    /// Element that cannot hold children.
    Empty,
    /// Container the user can type into (a root or a nested editable).
    Editable,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewElement {
    pub name: String,
    pub kind: ElementKind,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
}

impl ViewElement {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self { name: name.into(), kind, ..Default::default() }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Container)
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Sets an attribute; `class` and `style` are split into their parts.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match key {
            "class" => self.classes.extend(value.split_whitespace().map(str::to_string)),
            "style" => self.styles.extend(parse_styles(value)),
            _ => {
                self.attributes.insert(key.to_string(), value.to_string());
            }
        }
    }

    pub fn remove_attribute(&mut self, key: &str) {
        match key {
            "class" => self.classes.clear(),
            "style" => self.styles.clear(),
            _ => {
                self.attributes.remove(key);
            }
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn class_attribute(&self) -> Option<String> {
        (!self.classes.is_empty()).then(|| self.classes.iter().cloned().collect::<Vec<_>>().join(" "))
    }

    pub fn style_attribute(&self) -> Option<String> {
        (!self.styles.is_empty()).then(|| {
            self.styles.iter().map(|(k, v)| format!("{}:{}", k, v)).collect::<Vec<_>>().join(";")
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewItem {
    Root { root_name: String },
    Fragment,
    Element(ViewElement),
    Text(String),
}

impl ViewItem {
    pub fn name(&self) -> &str {
        match self {
            ViewItem::Root { .. } => "$root",
            ViewItem::Fragment => "$documentFragment",
            ViewItem::Element(element) => &element.name,
            ViewItem::Text(_) => "$text",
        }
    }

    pub fn as_element(&self) -> Option<&ViewElement> {
        match self {
            ViewItem::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ViewElement> {
        match self {
            ViewItem::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ViewItem::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Tree<ViewItem> {
    pub fn name(&self, id: NodeId) -> &str {
        self.get(id).name()
    }

    pub fn element(&self, id: NodeId) -> Option<&ViewElement> {
        self.get(id).as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ViewElement> {
        self.get_mut(id).as_element_mut()
    }

    /// Markup of the children of `id`; attributes sorted, then class, then style.
    pub fn stringify_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.stringify_into(*child, &mut out);
        }
        out
    }

    fn stringify_into(&self, id: NodeId, out: &mut String) {
        match self.get(id) {
            ViewItem::Text(text) => out.push_str(text),
            ViewItem::Element(element) => {
                let _ = write!(out, "<{}", element.name);
                for (key, value) in &element.attributes {
                    let _ = write!(out, " {}=\"{}\"", key, value);
                }
                if let Some(class) = element.class_attribute() {
                    let _ = write!(out, " class=\"{}\"", class);
                }
                if let Some(style) = element.style_attribute() {
                    let _ = write!(out, " style=\"{}\"", style);
                }
                out.push('>');
                for child in self.children(id) {
                    self.stringify_into(*child, out);
                }
                let _ = write!(out, "</{}>", element.name);
            }
            ViewItem::Root { .. } | ViewItem::Fragment => {
                for child in self.children(id) {
                    self.stringify_into(*child, out);
                }
            }
        }
    }
}

/// Parses an inline style declaration list (`a: 1; b: 2`).
pub fn parse_styles(value: &str) -> BTreeMap<String, String> {
    value
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let (name, value) = (name.trim(), value.trim());
            (!name.is_empty() && !value.is_empty()).then(|| (name.to_lowercase(), value.to_string()))
        })
        .collect()
}
