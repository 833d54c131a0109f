//! Ready-made view -> model converters.

use serde_json::Value;

use crate::conversion::consumable::ViewMatch;
use crate::conversion::priority::Priority;
use crate::conversion::registry::ConverterId;
use crate::conversion::upcast::UpcastDispatcher;
use crate::event::EventResult;
use crate::model::ModelWriter;
use crate::tree::{NodeId, Position};
use crate::view::{ViewElement, ViewTree};

/// Converts the view element `view_name` into the model element returned by
/// `create`, placing it with the split protocol and converting the view
/// children inside it.
///
/// When neither the cursor parent nor any ancestor up to a limit accepts
/// the element, the view element is left unconverted and a warning is
/// logged.
pub fn element_to_element<F>(dispatcher: &mut UpcastDispatcher, view_name: &str, priority: Priority, create: F) -> ConverterId
where
    F: Fn(&ViewTree, NodeId, &mut ModelWriter<'_>) -> Option<NodeId> + Send + Sync + 'static,
{
    let event_name = format!("element:{}", view_name);
    dispatcher.on(&event_name, priority, move |_event, data, api| {
        if data.model_range.is_some() || !api.consumable.test(data.view_item, &["name"]) {
            return Ok(EventResult::Continue);
        }
        let view = api.view;
        let Some(element) = create(view, data.view_item, &mut api.writer()) else {
            return Ok(EventResult::Continue);
        };
        let Some(split) = api.split_to_allowed_parent(element, data.model_cursor) else {
            log::warn!(
                "Dropping <{}>: model element '{}' is not allowed at the cursor or any ancestor",
                view.name(data.view_item),
                api.model().name(element)
            );
            return Ok(EventResult::Continue);
        };

        api.writer().insert(element, split.position);
        api.consumable.consume(data.view_item, &["name"]);
        api.convert_children(data.view_item, Position::at_start(element))?;

        let Some(range) = api.range_on_split_parts(element) else {
            return Ok(EventResult::Continue);
        };
        data.model_range = Some(range);
        data.model_cursor = match split.cursor_parent {
            Some(parent) => Position::at_start(parent),
            None => range.end,
        };
        Ok(EventResult::Continue)
    })
}

/// Shorthand for [`element_to_element`] creating an attribute-less element.
pub fn element_to_named_element(dispatcher: &mut UpcastDispatcher, view_name: &str, model_name: &str) -> ConverterId {
    let model_name = model_name.to_string();
    element_to_element(dispatcher, view_name, Priority::NORMAL, move |_, _, writer| {
        Some(writer.create_element(&model_name, Default::default()))
    })
}

/// Converts the view element `view_name` into the model attribute `key` set
/// on the content of the element (for example `<strong>` -> `bold`).
pub fn element_to_attribute<F>(
    dispatcher: &mut UpcastDispatcher,
    view_name: &str,
    key: &str,
    priority: Priority,
    value: F,
) -> ConverterId
where
    F: Fn(&ViewElement) -> Option<Value> + Send + Sync + 'static,
{
    let key = key.to_string();
    let event_name = format!("element:{}", view_name);
    dispatcher.on(&event_name, priority, move |_event, data, api| {
        if !api.consumable.test(data.view_item, &["name"]) {
            return Ok(EventResult::Continue);
        }
        let Some(value) = api.view.element(data.view_item).and_then(&value) else {
            return Ok(EventResult::Continue);
        };
        if data.model_range.is_none() {
            let converted = api.convert_children(data.view_item, data.model_cursor)?;
            data.model_range = Some(converted.model_range);
            data.model_cursor = converted.model_cursor;
        }
        let Some(range) = data.model_range else {
            return Ok(EventResult::Continue);
        };

        let targets: Vec<NodeId> = api
            .model()
            .walk(&range)
            .into_iter()
            .filter(|node| api.check_attribute(*node, &key))
            .collect();
        let mut writer = api.writer();
        for node in &targets {
            writer.set_attribute(&key, value.clone(), *node);
        }
        if !targets.is_empty() {
            api.consumable.consume(data.view_item, &["name"]);
        }
        Ok(EventResult::Continue)
    })
}

/// Which part of a view element an attribute converter reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKey {
    Attribute(String),
    Style(String),
    Class(String),
}

impl ViewKey {
    fn view_match(&self) -> ViewMatch {
        match self {
            ViewKey::Attribute(key) => ViewMatch::new().attribute(key),
            ViewKey::Style(style) => ViewMatch::new().style(style),
            ViewKey::Class(class) => ViewMatch::new().class(class),
        }
    }

    fn read(&self, element: &ViewElement) -> Option<Value> {
        match self {
            ViewKey::Attribute(key) => element.attribute(key).map(|v| Value::String(v.to_string())),
            ViewKey::Style(style) => element.style(style).map(|v| Value::String(v.to_string())),
            ViewKey::Class(class) => element.has_class(class).then_some(Value::Bool(true)),
        }
    }
}

/// Copies a view attribute, style or class of an already converted element
/// onto the model element created for it. Runs at `Priority::LOW` by default
/// so the element converter has produced `model_range` before it.
pub fn attribute_to_attribute(
    dispatcher: &mut UpcastDispatcher,
    view_name: Option<&str>,
    view_key: ViewKey,
    model_key: &str,
    priority: Priority,
) -> ConverterId {
    let model_key = model_key.to_string();
    let event_name = view_name.map_or_else(|| "element".to_string(), |name| format!("element:{}", name));
    dispatcher.on(&event_name, priority, move |_event, data, api| {
        let Some(range) = data.model_range else {
            return Ok(EventResult::Continue);
        };
        let view_match = view_key.view_match();
        if !api.consumable.test(data.view_item, view_match.aspects()) {
            return Ok(EventResult::Continue);
        }
        let Some(value) = api.view.element(data.view_item).and_then(|element| view_key.read(element)) else {
            return Ok(EventResult::Continue);
        };
        let Some(target) = api.model().node_after(range.start) else {
            return Ok(EventResult::Continue);
        };
        if !api.model().get(target).is_element() || !api.check_attribute(target, &model_key) {
            return Ok(EventResult::Continue);
        }
        api.writer().set_attribute(&model_key, value, target);
        api.consumable.consume(data.view_item, view_match.aspects());
        Ok(EventResult::Continue)
    })
}
