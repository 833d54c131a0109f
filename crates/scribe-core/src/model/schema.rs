//! Structural rules for the model.
//!
//! Items are registered under a name with a [`SchemaItemDefinition`];
//! converters ask [`SchemaCheck::check`] whether an item may be placed in a
//! context (the names of its would-be ancestors, outermost first).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Structural query used by converters before they create model content.
pub trait SchemaCheck {
    /// Whether `name` may be a child of the last item of `context` and,
    /// when `attribute` is given, whether it may carry that attribute.
    fn check(&self, name: &str, context: &[String], attribute: Option<&str>) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaItemDefinition {
    pub allow_in: Vec<String>,
    pub allow_where: Vec<String>,
    pub allow_content_of: Vec<String>,
    pub allow_attributes: Vec<String>,
    pub allow_attributes_of: Vec<String>,
    pub is_block: bool,
    pub is_limit: bool,
    pub is_object: bool,
}

impl SchemaItemDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_in(mut self, parent: &str) -> Self {
        self.allow_in.push(parent.to_string());
        self
    }

    pub fn allow_where(mut self, item: &str) -> Self {
        self.allow_where.push(item.to_string());
        self
    }

    pub fn allow_content_of(mut self, item: &str) -> Self {
        self.allow_content_of.push(item.to_string());
        self
    }

    pub fn allow_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn allow_attributes_of(mut self, item: &str) -> Self {
        self.allow_attributes_of.push(item.to_string());
        self
    }

    pub fn block(mut self) -> Self {
        self.is_block = true;
        self
    }

    pub fn limit(mut self) -> Self {
        self.is_limit = true;
        self
    }

    pub fn object(mut self) -> Self {
        self.is_object = true;
        self
    }

    fn merge(&mut self, other: SchemaItemDefinition) {
        self.allow_in.extend(other.allow_in);
        self.allow_where.extend(other.allow_where);
        self.allow_content_of.extend(other.allow_content_of);
        self.allow_attributes.extend(other.allow_attributes);
        self.allow_attributes_of.extend(other.allow_attributes_of);
        self.is_block |= other.is_block;
        self.is_limit |= other.is_limit;
        self.is_object |= other.is_object;
    }
}

/// Custom child rule: `(context, child name)`, `Some` overrides the definitions.
pub type ChildCheck = Box<dyn Fn(&[String], &str) -> Option<bool> + Send + Sync>;

/// Custom attribute rule: `(context including the item, attribute)`.
pub type AttributeCheck = Box<dyn Fn(&[String], &str) -> Option<bool> + Send + Sync>;

pub struct Schema {
    definitions: BTreeMap<String, SchemaItemDefinition>,
    child_checks: Vec<ChildCheck>,
    attribute_checks: Vec<AttributeCheck>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("items", &self.definitions.keys().collect::<Vec<_>>())
            .field("child_checks", &self.child_checks.len())
            .field("attribute_checks", &self.attribute_checks.len())
            .finish()
    }
}

impl Schema {
    /// A schema with the base items `$root`, `$block` and `$text`.
    pub fn new() -> Self {
        let mut schema = Self {
            definitions: BTreeMap::new(),
            child_checks: Vec::new(),
            attribute_checks: Vec::new(),
        };
        schema.register("$root", SchemaItemDefinition::new().limit());
        schema.register("$block", SchemaItemDefinition::new().allow_in("$root").block());
        schema.register("$text", SchemaItemDefinition::new().allow_in("$block"));
        schema
    }

    /// Registers `name`, replacing any previous definition.
    pub fn register(&mut self, name: &str, definition: SchemaItemDefinition) {
        if self.definitions.insert(name.to_string(), definition).is_some() {
            log::warn!("Schema item '{}' was registered twice; the last definition wins", name);
        }
    }

    /// Adds rules to an item, registering it if needed.
    pub fn extend(&mut self, name: &str, definition: SchemaItemDefinition) {
        self.definitions.entry(name.to_string()).or_default().merge(definition);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn definition(&self, name: &str) -> Option<&SchemaItemDefinition> {
        self.definitions.get(name)
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.definitions.get(name).is_some_and(|d| d.is_block)
    }

    pub fn is_limit(&self, name: &str) -> bool {
        self.definitions.get(name).is_some_and(|d| d.is_limit || d.is_object)
    }

    pub fn is_object(&self, name: &str) -> bool {
        self.definitions.get(name).is_some_and(|d| d.is_object)
    }

    pub fn add_child_check(&mut self, check: ChildCheck) {
        self.child_checks.push(check);
    }

    pub fn add_attribute_check(&mut self, check: AttributeCheck) {
        self.attribute_checks.push(check);
    }

    pub fn check_child(&self, context: &[String], name: &str) -> bool {
        for check in &self.child_checks {
            if let Some(verdict) = check(context, name) {
                return verdict;
            }
        }
        let Some(parent) = context.last() else {
            return false;
        };
        self.allowed_parents(name).contains(parent)
    }

    /// `context` ends with the item that would carry `attribute`.
    pub fn check_attribute(&self, context: &[String], attribute: &str) -> bool {
        for check in &self.attribute_checks {
            if let Some(verdict) = check(context, attribute) {
                return verdict;
            }
        }
        let Some(item) = context.last() else {
            return false;
        };
        self.allowed_attributes(item, &mut BTreeSet::new()).contains(attribute)
    }

    fn allowed_parents(&self, name: &str) -> BTreeSet<String> {
        let mut parents = self.direct_parents(name, &mut BTreeSet::new());
        // Items that take the content of an allowed parent accept the item too.
        loop {
            let before = parents.len();
            for (item, definition) in &self.definitions {
                if definition.allow_content_of.iter().any(|p| parents.contains(p)) {
                    parents.insert(item.clone());
                }
            }
            if parents.len() == before {
                break parents;
            }
        }
    }

    fn direct_parents(&self, name: &str, visiting: &mut BTreeSet<String>) -> BTreeSet<String> {
        let mut parents = BTreeSet::new();
        if !visiting.insert(name.to_string()) {
            return parents;
        }
        if let Some(definition) = self.definitions.get(name) {
            parents.extend(definition.allow_in.iter().cloned());
            for other in &definition.allow_where {
                parents.extend(self.direct_parents(other, visiting));
            }
        }
        parents
    }

    fn allowed_attributes(&self, name: &str, visiting: &mut BTreeSet<String>) -> BTreeSet<String> {
        let mut attributes = BTreeSet::new();
        if !visiting.insert(name.to_string()) {
            return attributes;
        }
        if let Some(definition) = self.definitions.get(name) {
            attributes.extend(definition.allow_attributes.iter().cloned());
            for other in &definition.allow_attributes_of {
                attributes.extend(self.allowed_attributes(other, visiting));
            }
        }
        attributes
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaCheck for Schema {
    fn check(&self, name: &str, context: &[String], attribute: Option<&str>) -> bool {
        if !self.check_child(context, name) {
            return false;
        }
        match attribute {
            None => true,
            Some(attribute) => {
                let mut item_context = context.to_vec();
                item_context.push(name.to_string());
                self.check_attribute(&item_context, attribute)
            }
        }
    }
}
