//! Model -> view conversion.
//!
//! Insertions fire `insert:<name>` for every node of the inserted range
//! (parents before children) followed by `attribute:<key>:<name>` for each
//! of the node's attributes. Attribute changes on nodes converted earlier
//! fire `attribute:<key>:<name>` alone and find their view counterpart
//! through the mapper. Removals fire `remove:<name>`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::conversion::consumable::{model_aspect, model_consumable, Consumable};
use crate::conversion::error::ConversionResult;
use crate::conversion::mapper::Mapper;
use crate::conversion::priority::Priority;
use crate::conversion::registry::{ConverterId, ConverterRegistry};
use crate::conversion::slots::bind_slots;
use crate::event::EventResult;
use crate::model::{ModelTree, Schema};
use crate::tree::{NodeId, Range};
use crate::view::{ViewTree, ViewWriter};

#[derive(Debug, Clone, PartialEq)]
pub struct DowncastData {
    pub item: NodeId,
    /// Range on the item in the model.
    pub range: Range,
    pub attribute_key: Option<String>,
    pub attribute_old_value: Option<Value>,
    pub attribute_new_value: Option<Value>,
}

impl DowncastData {
    fn insert(item: NodeId, range: Range) -> Self {
        Self { item, range, attribute_key: None, attribute_old_value: None, attribute_new_value: None }
    }

    fn attribute(item: NodeId, range: Range, key: &str, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        Self {
            item,
            range,
            attribute_key: Some(key.to_string()),
            attribute_old_value: old_value,
            attribute_new_value: new_value,
        }
    }
}

pub type DowncastHandler =
    dyn Fn(&str, &DowncastData, &mut DowncastConversionApi<'_>) -> ConversionResult<EventResult> + Send + Sync;

/// Everything a downcast converter works with.
pub struct DowncastConversionApi<'a> {
    pub model: &'a ModelTree,
    pub schema: &'a Schema,
    view: &'a mut ViewTree,
    pub mapper: &'a mut Mapper,
    pub consumable: Consumable<NodeId>,
}

impl<'a> DowncastConversionApi<'a> {
    pub fn new(model: &'a ModelTree, schema: &'a Schema, view: &'a mut ViewTree, mapper: &'a mut Mapper) -> Self {
        Self { model, schema, view, mapper, consumable: Consumable::new() }
    }

    pub fn view(&self) -> &ViewTree {
        &*self.view
    }

    pub fn writer(&mut self) -> ViewWriter<'_> {
        ViewWriter::new(&mut *self.view)
    }

    /// Tests the aspect named by a downcast event for `item`.
    pub fn test(&self, item: NodeId, event_name: &str) -> bool {
        self.consumable.test(item, &[model_aspect(event_name)])
    }

    /// Consumes the aspect named by a downcast event for `item`.
    pub fn consume(&mut self, item: NodeId, event_name: &str) -> bool {
        self.consumable.consume(item, &[model_aspect(event_name)])
    }

    /// Binds the slot children of `element` to the slots of `template`.
    pub fn bind_slots(&mut self, element: NodeId, template: NodeId) -> ConversionResult<()> {
        bind_slots(self.model, &*self.view, &mut *self.mapper, element, template)
    }

    /// Detaches the view counterpart of `item` and forgets every binding
    /// inside it.
    pub fn unbind_subtree(&mut self, item: NodeId) -> Option<NodeId> {
        let view_node = self.mapper.to_view_element(item)?;
        for model_node in std::iter::once(item).chain(self.model.descendants(item)) {
            self.mapper.unbind_model_element(model_node);
        }
        for view_child in self.view.descendants(view_node) {
            self.mapper.unbind_view_element(view_child);
        }
        self.view.detach(view_node);
        Some(view_node)
    }
}

pub struct DowncastDispatcher {
    registry: ConverterRegistry<DowncastHandler>,
}

impl fmt::Debug for DowncastDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DowncastDispatcher").field("registry", &self.registry).finish()
    }
}

impl DowncastDispatcher {
    /// A dispatcher with the lowest-priority text insertion and removal converters.
    pub fn new() -> Self {
        let mut dispatcher = Self { registry: ConverterRegistry::new() };
        dispatcher.on("insert:$text", Priority::LOWEST, insert_text);
        dispatcher.on("remove", Priority::LOWEST, remove_view);
        dispatcher
    }

    pub fn on<F>(&mut self, event_name: &str, priority: Priority, handler: F) -> ConverterId
    where
        F: Fn(&str, &DowncastData, &mut DowncastConversionApi<'_>) -> ConversionResult<EventResult>
            + Send
            + Sync
            + 'static,
    {
        self.registry.on(event_name, priority, Arc::new(handler))
    }

    pub fn off(&mut self, id: ConverterId) -> bool {
        self.registry.off(id)
    }

    /// Converts a flat model range that was just inserted.
    pub fn convert_insert(&self, range: Range, api: &mut DowncastConversionApi<'_>) -> ConversionResult<()> {
        let nodes = api.model.walk(&range);
        api.consumable = model_consumable(api.model, &nodes);

        for node in nodes {
            let (Some(start), Some(end)) = (api.model.position_before(node), api.model.position_after(node)) else {
                continue;
            };
            let item_range = Range::new(start, end);
            let name = api.model.name(node).to_string();
            self.fire(&format!("insert:{}", name), &DowncastData::insert(node, item_range), api)?;

            let attributes: Vec<(String, Value)> = api
                .model
                .get(node)
                .attributes()
                .map(|attrs| attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();
            for (key, value) in attributes {
                let data = DowncastData::attribute(node, item_range, &key, None, Some(value));
                self.fire(&format!("attribute:{}:{}", key, name), &data, api)?;
            }
        }
        Ok(())
    }

    /// Converts one attribute change of an already converted node.
    pub fn convert_attribute(
        &self,
        item: NodeId,
        key: &str,
        old_value: Option<Value>,
        new_value: Option<Value>,
        api: &mut DowncastConversionApi<'_>,
    ) -> ConversionResult<()> {
        let range = match (api.model.position_before(item), api.model.position_after(item)) {
            (Some(start), Some(end)) => Range::new(start, end),
            _ => return Ok(()),
        };
        api.consumable = Consumable::new();
        api.consumable.add(item, format!("attribute:{}", key));
        let name = api.model.name(item).to_string();
        let data = DowncastData::attribute(item, range, key, old_value, new_value);
        self.fire(&format!("attribute:{}:{}", key, name), &data, api)
    }

    /// Converts the removal of `nodes`, which were children of `parent`.
    pub fn convert_remove(&self, parent: NodeId, nodes: &[NodeId], api: &mut DowncastConversionApi<'_>) -> ConversionResult<()> {
        api.consumable = Consumable::new();
        for node in nodes {
            let data = DowncastData::insert(*node, Range::flat(parent, 0, 0));
            let name = api.model.name(*node).to_string();
            self.fire(&format!("remove:{}", name), &data, api)?;
        }
        Ok(())
    }

    fn fire(&self, event_name: &str, data: &DowncastData, api: &mut DowncastConversionApi<'_>) -> ConversionResult<()> {
        for handler in self.registry.handlers_for(event_name) {
            if handler(event_name, data, api)? == EventResult::Stop {
                break;
            }
        }
        Ok(())
    }
}

impl Default for DowncastDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_text(event: &str, data: &DowncastData, api: &mut DowncastConversionApi<'_>) -> ConversionResult<EventResult> {
    if !api.consume(data.item, event) {
        return Ok(EventResult::Continue);
    }
    let Some(position) = api.mapper.to_view_position(api.model, api.view(), data.range.start) else {
        log::warn!("Cannot place text {}: its model parent has no view counterpart", data.item);
        return Ok(EventResult::Continue);
    };
    let text = api.model.get(data.item).text_data().unwrap_or_default().to_string();
    let mut writer = api.writer();
    let view_text = writer.create_text(&text);
    writer.insert(position, view_text);
    api.mapper.bind_elements(data.item, view_text);
    Ok(EventResult::Continue)
}

fn remove_view(_event: &str, data: &DowncastData, api: &mut DowncastConversionApi<'_>) -> ConversionResult<EventResult> {
    api.unbind_subtree(data.item);
    Ok(EventResult::Continue)
}
