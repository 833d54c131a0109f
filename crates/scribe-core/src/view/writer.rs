use crate::tree::{NodeId, Position};
use crate::view::element::{ElementKind, ViewElement, ViewItem, ViewTree};

/// Builds and edits a view tree.
pub struct ViewWriter<'a> {
    tree: &'a mut ViewTree,
}

impl<'a> ViewWriter<'a> {
    pub fn new(tree: &'a mut ViewTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &ViewTree {
        &*self.tree
    }

    pub fn create_element(&mut self, element: ViewElement) -> NodeId {
        self.tree.create(ViewItem::Element(element))
    }

    pub fn create_container_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.create_with_kind(name, ElementKind::Container, attributes)
    }

    pub fn create_attribute_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.create_with_kind(name, ElementKind::Attribute, attributes)
    }

    pub fn create_empty_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.create_with_kind(name, ElementKind::Empty, attributes)
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.tree.create(ViewItem::Text(data.to_string()))
    }

    fn create_with_kind(&mut self, name: &str, kind: ElementKind, attributes: &[(&str, &str)]) -> NodeId {
        let mut element = ViewElement::new(name, kind);
        for (key, value) in attributes {
            element.set_attribute(key, value);
        }
        self.create_element(element)
    }

    pub fn insert(&mut self, position: Position, node: NodeId) {
        self.tree.insert(position, node);
    }

    pub fn remove(&mut self, node: NodeId) {
        self.tree.detach(node);
    }

    pub fn set_attribute(&mut self, key: &str, value: &str, node: NodeId) {
        if let Some(element) = self.tree.element_mut(node) {
            element.set_attribute(key, value);
        }
    }

    pub fn remove_attribute(&mut self, key: &str, node: NodeId) {
        if let Some(element) = self.tree.element_mut(node) {
            element.remove_attribute(key);
        }
    }

    pub fn add_class(&mut self, class: &str, node: NodeId) {
        if let Some(element) = self.tree.element_mut(node) {
            element.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str, node: NodeId) {
        if let Some(element) = self.tree.element_mut(node) {
            element.classes.remove(class);
        }
    }

    pub fn set_style(&mut self, name: &str, value: &str, node: NodeId) {
        if let Some(element) = self.tree.element_mut(node) {
            element.styles.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_style(&mut self, name: &str, node: NodeId) {
        if let Some(element) = self.tree.element_mut(node) {
            element.styles.remove(name);
        }
    }

    /// Puts `node` inside `wrapper`, at the place `node` occupied.
    pub fn wrap(&mut self, node: NodeId, wrapper: NodeId) {
        if let Some(position) = self.tree.position_before(node) {
            self.tree.insert(position, wrapper);
        }
        self.tree.append(wrapper, node);
    }

    /// Replaces `wrapper` with its children.
    pub fn unwrap(&mut self, wrapper: NodeId) {
        let Some(position) = self.tree.position_before(wrapper) else {
            return;
        };
        let children = self.tree.children(wrapper).to_vec();
        for (offset, child) in children.into_iter().enumerate() {
            self.tree.insert(position.shifted(offset + 1), child);
        }
        self.tree.detach(wrapper);
    }
}
