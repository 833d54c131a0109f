//! Ready-made model -> view converters.

use serde_json::Value;

use crate::conversion::downcast::DowncastDispatcher;
use crate::conversion::priority::Priority;
use crate::conversion::registry::ConverterId;
use crate::event::EventResult;
use crate::model::ModelTree;
use crate::tree::NodeId;
use crate::view::{ElementKind, ViewWriter};

/// Inserts the view element built by `create` for every inserted model
/// element `model_name` and binds the two.
pub fn insert_element<F>(dispatcher: &mut DowncastDispatcher, model_name: &str, priority: Priority, create: F) -> ConverterId
where
    F: Fn(&ModelTree, NodeId, &mut ViewWriter<'_>) -> Option<NodeId> + Send + Sync + 'static,
{
    dispatcher.on(&format!("insert:{}", model_name), priority, move |event, data, api| {
        if !api.test(data.item, event) {
            return Ok(EventResult::Continue);
        }
        let model = api.model;
        let Some(position) = api.mapper.to_view_position(model, api.view(), data.range.start) else {
            log::warn!("Cannot place '{}': its model parent has no view counterpart", model.name(data.item));
            return Ok(EventResult::Continue);
        };
        let Some(view_element) = create(model, data.item, &mut api.writer()) else {
            return Ok(EventResult::Continue);
        };
        api.consume(data.item, event);
        api.writer().insert(position, view_element);
        api.mapper.bind_elements(data.item, view_element);
        Ok(EventResult::Continue)
    })
}

/// Model element `model_name` becomes a container element `view_name`.
pub fn element_to_element(dispatcher: &mut DowncastDispatcher, model_name: &str, view_name: &str) -> ConverterId {
    let view_name = view_name.to_string();
    insert_element(dispatcher, model_name, Priority::NORMAL, move |_, _, writer| {
        Some(writer.create_container_element(&view_name, &[]))
    })
}

/// Inserts a structural template: `create` builds the view subtree and the
/// model slot children are bound to the template's `data-slot` elements.
/// A slot set mismatch aborts the conversion pass.
pub fn insert_structure<F>(dispatcher: &mut DowncastDispatcher, model_name: &str, priority: Priority, create: F) -> ConverterId
where
    F: Fn(&ModelTree, NodeId, &mut ViewWriter<'_>) -> Option<NodeId> + Send + Sync + 'static,
{
    dispatcher.on(&format!("insert:{}", model_name), priority, move |event, data, api| {
        if !api.test(data.item, event) {
            return Ok(EventResult::Continue);
        }
        let model = api.model;
        let Some(position) = api.mapper.to_view_position(model, api.view(), data.range.start) else {
            return Ok(EventResult::Continue);
        };
        let Some(template) = create(model, data.item, &mut api.writer()) else {
            return Ok(EventResult::Continue);
        };
        api.bind_slots(data.item, template)?;
        api.consume(data.item, event);
        api.writer().insert(position, template);
        api.mapper.bind_elements(data.item, template);

        // Slot elements are rendered by the template, not by their own converters.
        for slot in model.children(data.item) {
            api.consume(*slot, "insert");
        }
        Ok(EventResult::Continue)
    })
}

/// Model attribute `model_key` on elements becomes the view attribute `view_key`.
pub fn attribute_to_attribute(dispatcher: &mut DowncastDispatcher, model_key: &str, view_key: &str) -> ConverterId {
    let view_key = view_key.to_string();
    dispatcher.on(&format!("attribute:{}", model_key), Priority::NORMAL, move |event, data, api| {
        if !api.test(data.item, event) {
            return Ok(EventResult::Continue);
        }
        let Some(view_element) = api.mapper.to_view_element(data.item) else {
            return Ok(EventResult::Continue);
        };
        if api.view().element(view_element).is_none() {
            return Ok(EventResult::Continue);
        }
        api.consume(data.item, event);
        let mut writer = api.writer();
        match &data.attribute_new_value {
            Some(value) => writer.set_attribute(&view_key, &stringify_value(value), view_element),
            None => writer.remove_attribute(&view_key, view_element),
        }
        Ok(EventResult::Continue)
    })
}

/// Model text attribute `model_key` becomes a wrapping attribute element
/// `view_name` (for example `bold` -> `<strong>`).
pub fn attribute_to_element(dispatcher: &mut DowncastDispatcher, model_key: &str, view_name: &str) -> ConverterId {
    let view_name = view_name.to_string();
    let event_name = format!("attribute:{}:$text", model_key);
    dispatcher.on(&event_name, Priority::NORMAL, move |event, data, api| {
        let Some(view_text) = api.mapper.to_view_element(data.item) else {
            return Ok(EventResult::Continue);
        };
        if !api.consume(data.item, event) {
            return Ok(EventResult::Continue);
        }
        let wrapper = api
            .view()
            .parent(view_text)
            .filter(|parent| {
                api.view().element(*parent).is_some_and(|e| e.kind == ElementKind::Attribute && e.name == view_name)
            });
        let mut writer = api.writer();
        match (&data.attribute_new_value, wrapper) {
            (Some(_), None) => {
                let element = writer.create_attribute_element(&view_name, &[]);
                writer.wrap(view_text, element);
            }
            (None, Some(element)) => writer.unwrap(element),
            _ => {}
        }
        Ok(EventResult::Continue)
    })
}

fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
