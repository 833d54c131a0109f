//! View -> model conversion.
//!
//! [`UpcastDispatcher::convert`] walks a view subtree and fires
//! `element:<name>`, `text` and `documentFragment` events. Converters
//! receive an [`UpcastData`] describing the item and the model cursor, and
//! an [`UpcastConversionApi`] with the consumable, a model writer and the
//! structural helpers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::conversion::consumable::{view_consumable, Consumable};
use crate::conversion::error::ConversionResult;
use crate::conversion::priority::Priority;
use crate::conversion::registry::{ConverterId, ConverterRegistry};
use crate::event::EventResult;
use crate::model::{Attributes, Change, ModelItem, ModelTree, ModelWriter, Schema};
use crate::tree::{NodeId, Position, Range};
use crate::view::{ViewItem, ViewTree};

/// Converter input and output for one view item.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcastData {
    pub view_item: NodeId,
    /// Where the converted content goes; converters move it past what they insert.
    pub model_cursor: Position,
    /// Set by the converter that produced model content for the item.
    pub model_range: Option<Range>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedItem {
    pub model_range: Option<Range>,
    pub model_cursor: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedChildren {
    pub model_range: Range,
    pub model_cursor: Position,
}

/// Outcome of [`UpcastConversionApi::split_to_allowed_parent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitResult {
    /// Where the element must be inserted.
    pub position: Position,
    /// Second half of the split element; conversion continues inside it.
    /// `None` when nothing had to be split.
    pub cursor_parent: Option<NodeId>,
}

pub type UpcastHandler =
    dyn Fn(&str, &mut UpcastData, &mut UpcastConversionApi<'_>) -> ConversionResult<EventResult> + Send + Sync;

pub struct UpcastDispatcher {
    registry: ConverterRegistry<UpcastHandler>,
}

impl fmt::Debug for UpcastDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpcastDispatcher").field("registry", &self.registry).finish()
    }
}

impl UpcastDispatcher {
    /// A dispatcher with the lowest-priority text and container converters.
    pub fn new() -> Self {
        let mut dispatcher = Self { registry: ConverterRegistry::new() };
        dispatcher.on("text", Priority::LOWEST, convert_text);
        dispatcher.on("element", Priority::LOWEST, convert_to_model_fragment);
        dispatcher.on("documentFragment", Priority::LOWEST, convert_to_model_fragment);
        dispatcher
    }

    pub fn on<F>(&mut self, event_name: &str, priority: Priority, handler: F) -> ConverterId
    where
        F: Fn(&str, &mut UpcastData, &mut UpcastConversionApi<'_>) -> ConversionResult<EventResult>
            + Send
            + Sync
            + 'static,
    {
        self.registry.on(event_name, priority, Arc::new(handler))
    }

    pub fn off(&mut self, id: ConverterId) -> bool {
        self.registry.off(id)
    }

    /// Converts `view_item` into a new detached model fragment.
    ///
    /// `context` names the ancestors the result will be inserted into (for
    /// the schema), usually `["$root"]`.
    pub fn convert(
        &self,
        view: &ViewTree,
        view_item: NodeId,
        model: &mut ModelTree,
        schema: &Schema,
        context: &[String],
    ) -> ConversionResult<NodeId> {
        let fragment = model.create(ModelItem::Fragment);
        let mut api = UpcastConversionApi {
            dispatcher: self,
            view,
            model,
            schema,
            consumable: view_consumable(view, view_item),
            context: context.to_vec(),
            fragment,
            scratch: Vec::new(),
            split_parts: HashMap::new(),
        };

        let converted = api.convert_item(view_item, Position::at_start(fragment))?;
        if converted.model_range.is_some() {
            api.remove_empty_elements();
        } else {
            let leftovers = api.model.children(fragment).to_vec();
            for node in leftovers {
                api.model.detach(node);
            }
        }
        log::debug!(
            "Upcast '{}' into a fragment with {} top-level node(s)",
            view.name(view_item),
            api.model.child_count(fragment)
        );
        Ok(fragment)
    }
}

impl Default for UpcastDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// State and helpers shared by the converters of one upcast pass.
pub struct UpcastConversionApi<'a> {
    dispatcher: &'a UpcastDispatcher,
    pub view: &'a ViewTree,
    model: &'a mut ModelTree,
    pub schema: &'a Schema,
    pub consumable: Consumable<NodeId>,
    context: Vec<String>,
    fragment: NodeId,
    scratch: Vec<Change>,
    split_parts: HashMap<NodeId, Vec<NodeId>>,
}

impl<'a> UpcastConversionApi<'a> {
    pub fn model(&self) -> &ModelTree {
        &*self.model
    }

    pub fn writer(&mut self) -> ModelWriter<'_> {
        ModelWriter::new(&mut *self.model, &mut self.scratch)
    }

    /// Fires the event for `view_item` with the cursor at `model_cursor`.
    pub fn convert_item(&mut self, view_item: NodeId, model_cursor: Position) -> ConversionResult<ConvertedItem> {
        let event_name = match self.view.get(view_item) {
            ViewItem::Element(element) => format!("element:{}", element.name),
            ViewItem::Text(_) => "text".to_string(),
            ViewItem::Fragment | ViewItem::Root { .. } => "documentFragment".to_string(),
        };
        let mut data = UpcastData { view_item, model_cursor, model_range: None };
        for handler in self.dispatcher.registry.handlers_for(&event_name) {
            if handler(&event_name, &mut data, self)? == EventResult::Stop {
                break;
            }
        }
        Ok(ConvertedItem { model_range: data.model_range, model_cursor: data.model_cursor })
    }

    /// Converts the children of `view_item` one after another, starting at
    /// `model_cursor`. The returned range spans everything they produced.
    pub fn convert_children(&mut self, view_item: NodeId, model_cursor: Position) -> ConversionResult<ConvertedChildren> {
        let mut cursor = model_cursor;
        let mut range = Range::collapsed(model_cursor);
        for child in self.view.children(view_item).to_vec() {
            let converted = self.convert_item(child, cursor)?;
            if let Some(child_range) = converted.model_range {
                range.end = child_range.end;
                cursor = converted.model_cursor;
            }
        }
        Ok(ConvertedChildren { model_range: range, model_cursor: cursor })
    }

    /// Finds where `node` may be inserted starting from `cursor`, splitting
    /// the ancestors between the cursor and the allowed parent.
    ///
    /// Returns `None` when no ancestor up to the nearest limit accepts the
    /// node; callers drop the item.
    pub fn split_to_allowed_parent(&mut self, node: NodeId, cursor: Position) -> Option<SplitResult> {
        let name = self.model.name(node).to_string();
        let allowed_parent = self.find_allowed_parent(cursor, &name)?;
        if allowed_parent == cursor.parent {
            return Some(SplitResult { position: cursor, cursor_parent: None });
        }
        let outcome = self.writer().split(cursor, allowed_parent);
        for (original, copy) in &outcome.pairs {
            self.register_split_pair(*original, *copy);
        }
        Some(SplitResult { position: outcome.position, cursor_parent: outcome.cursor_parent })
    }

    /// All parts `element` was split into during this pass, in order.
    pub fn get_split_parts(&self, element: NodeId) -> Vec<NodeId> {
        self.split_parts.get(&element).cloned().unwrap_or_else(|| vec![element])
    }

    /// Range from before `element` to after its last split part.
    pub fn range_on_split_parts(&self, element: NodeId) -> Option<Range> {
        let parts = self.get_split_parts(element);
        let start = self.model.position_before(element)?;
        let end = self.model.position_after(*parts.last()?)?;
        Some(Range::new(start, end))
    }

    /// Schema context for the children of `parent`.
    pub fn context_of(&self, parent: NodeId) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == self.fragment {
                break;
            }
            chain.push(self.model.name(node).to_string());
            current = self.model.parent(node);
        }
        let mut context = self.context.clone();
        context.extend(chain.into_iter().rev());
        context
    }

    pub fn check_child(&self, cursor: Position, name: &str) -> bool {
        self.schema.check_child(&self.context_of(cursor.parent), name)
    }

    pub fn check_attribute(&self, node: NodeId, attribute: &str) -> bool {
        self.schema.check_attribute(&self.context_of(node), attribute)
    }

    fn find_allowed_parent(&self, cursor: Position, name: &str) -> Option<NodeId> {
        let mut parent = Some(cursor.parent);
        while let Some(candidate) = parent {
            if self.schema.check_child(&self.context_of(candidate), name) {
                return Some(candidate);
            }
            if candidate == self.fragment || self.schema.is_limit(self.model.name(candidate)) {
                return None;
            }
            parent = self.model.parent(candidate);
        }
        None
    }

    fn register_split_pair(&mut self, original: NodeId, copy: NodeId) {
        let mut parts = self.split_parts.get(&original).cloned().unwrap_or_else(|| vec![original]);
        parts.push(copy);
        for part in &parts {
            self.split_parts.insert(*part, parts.clone());
        }
    }

    /// Split leftovers that ended up empty are removed, innermost first.
    fn remove_empty_elements(&mut self) {
        loop {
            let empty: Vec<NodeId> = self
                .split_parts
                .keys()
                .copied()
                .filter(|part| self.model.parent(*part).is_some() && self.model.is_empty_node(*part))
                .collect();
            if empty.is_empty() {
                break;
            }
            for part in empty {
                self.model.detach(part);
            }
        }
    }
}

fn convert_text(_event: &str, data: &mut UpcastData, api: &mut UpcastConversionApi<'_>) -> ConversionResult<EventResult> {
    if !api.check_child(data.model_cursor, "$text") {
        log::warn!("Dropping text: '$text' is not allowed in {:?}", api.context_of(data.model_cursor.parent));
        return Ok(EventResult::Continue);
    }
    if !api.consumable.consume(data.view_item, &["name"]) {
        return Ok(EventResult::Continue);
    }
    let text = api.view.get(data.view_item).text().unwrap_or_default().to_string();
    let mut writer = api.writer();
    let node = writer.create_text(&text, Attributes::new());
    writer.insert(node, data.model_cursor);

    let range = Range::new(data.model_cursor, data.model_cursor.shifted(1));
    data.model_range = Some(range);
    data.model_cursor = range.end;
    Ok(EventResult::Continue)
}

/// Unknown elements and fragments are transparent: their children are
/// converted in place.
fn convert_to_model_fragment(
    _event: &str,
    data: &mut UpcastData,
    api: &mut UpcastConversionApi<'_>,
) -> ConversionResult<EventResult> {
    if data.model_range.is_some() || !api.consumable.consume(data.view_item, &["name"]) {
        return Ok(EventResult::Continue);
    }
    let converted = api.convert_children(data.view_item, data.model_cursor)?;
    data.model_range = Some(converted.model_range);
    data.model_cursor = converted.model_cursor;
    Ok(EventResult::Continue)
}
