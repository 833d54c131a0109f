use async_trait::async_trait;
use serde_json::{json, Value};

use scribe_core::conversion::downcast::{DowncastConversionApi, DowncastData};
use scribe_core::conversion::upcast_helpers;
use scribe_core::conversion::{ConversionResult, DowncastGroup, ViewMatch};
use scribe_core::model::{Attributes, SchemaItemDefinition};
use scribe_core::tree::{NodeId, Position};
use scribe_core::view::{ElementKind, ViewTree};
use scribe_core::{Editor, EventResult, Plugin, PluginConstructor, PluginRef, Priority, Result};

const LIST_STYLE: &str = "list-style-type";

/// `<li>` <-> `listItem`. The item's `listType` comes from the parent list
/// element (`ol` is `numbered`, anything else `bulleted`); on the way back
/// neighbouring items of one type share a list element, in model order.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl Plugin for List {
    async fn init(&self, editor: &Editor) -> Result<()> {
        editor.with_model(|model| {
            model.schema_mut().register(
                "listItem",
                SchemaItemDefinition::new()
                    .allow_where("$block")
                    .allow_content_of("$block")
                    .allow_attributes(["listType"]),
            );
        });
        editor.with_conversion(|conversion| {
            upcast_helpers::element_to_element(conversion.for_upcast(), "li", Priority::NORMAL, |view, item, writer| {
                let list_type = match view.parent(item).map(|parent| view.name(parent)) {
                    Some("ol") => "numbered",
                    _ => "bulleted",
                };
                let mut attributes = Attributes::new();
                attributes.insert("listType".to_string(), json!(list_type));
                Some(writer.create_element("listItem", attributes))
            });
            conversion.for_downcast(DowncastGroup::Both, |dispatcher| {
                dispatcher.on("insert:listItem", Priority::NORMAL, insert_list_item);
                dispatcher.on("remove:listItem", Priority::NORMAL, remove_list_item);
            });
        });
        Ok(())
    }
}

impl PluginConstructor for List {
    const PLUGIN_NAME: Option<&'static str> = Some("List");

    fn create(_editor: &Editor) -> Result<Self> {
        Ok(List)
    }
}

fn list_element_name(list_type: Option<&Value>) -> &'static str {
    match list_type.and_then(Value::as_str) {
        Some("numbered") => "ol",
        _ => "ul",
    }
}

/// The view `li` of a converted model list item and the list element holding it.
fn item_in_list(api: &DowncastConversionApi<'_>, model_item: Option<NodeId>) -> Option<(NodeId, NodeId)> {
    let model_item = model_item.filter(|item| api.model.name(*item) == "listItem")?;
    let li = api.mapper.to_view_element(model_item)?;
    let list = api.view().parent(li)?;
    let is_list = api.mapper.to_model_element(list).is_none()
        && api.view().element(list).is_some_and(|e| matches!(e.name.as_str(), "ul" | "ol") && e.kind == ElementKind::Container);
    is_list.then_some((li, list))
}

fn insert_list_item(event: &str, data: &DowncastData, api: &mut DowncastConversionApi<'_>) -> ConversionResult<EventResult> {
    if !api.test(data.item, event) {
        return Ok(EventResult::Continue);
    }
    let model = api.model;
    let list_name = list_element_name(model.attribute(data.item, "listType"));
    let previous = item_in_list(api, model.node_before(data.range.start));
    let next = item_in_list(api, model.node_after(data.range.end));
    let same_type = |found: Option<(NodeId, NodeId)>, view: &ViewTree| found.filter(|(_, list)| view.name(*list) == list_name);

    // Right after an item of the same type, or else right before one.
    let target = if let Some((li, list)) = same_type(previous, api.view()) {
        api.view().index_of(li).map(|index| Position::new(list, index + 1))
    } else if let Some((li, list)) = same_type(next, api.view()) {
        api.view().index_of(li).map(|index| Position::new(list, index))
    } else {
        None
    };

    let position = match target {
        Some(position) => position,
        None => {
            // Inside a list of another type: split it so the item gets a list
            // of its own between the halves.
            if let Some((li, list)) = previous {
                split_list_after(api, list, li);
            }
            let Some(position) = api.mapper.to_view_position(model, api.view(), data.range.start) else {
                return Ok(EventResult::Continue);
            };
            let mut writer = api.writer();
            let list = writer.create_container_element(list_name, &[]);
            writer.insert(position, list);
            Position::at_start(list)
        }
    };

    api.consume(data.item, event);
    let item = {
        let mut writer = api.writer();
        let item = writer.create_container_element("li", &[]);
        writer.insert(position, item);
        item
    };
    api.mapper.bind_elements(data.item, item);
    Ok(EventResult::Continue)
}

/// Moves the items of `list` that follow `li` into a copy of `list` placed
/// right after it.
fn split_list_after(api: &mut DowncastConversionApi<'_>, list: NodeId, li: NodeId) {
    let Some(index) = api.view().index_of(li) else {
        return;
    };
    let rest = api.view().children(list)[index + 1..].to_vec();
    if rest.is_empty() {
        return;
    }
    let (Some(element), Some(after)) = (api.view().element(list).cloned(), api.view().position_after(list)) else {
        return;
    };
    let mut writer = api.writer();
    let copy = writer.create_element(element);
    writer.insert(after, copy);
    for (offset, node) in rest.into_iter().enumerate() {
        writer.insert(Position::new(copy, offset), node);
    }
}

/// Removes the item and, when it was the last one, its list element.
fn remove_list_item(_event: &str, data: &DowncastData, api: &mut DowncastConversionApi<'_>) -> ConversionResult<EventResult> {
    let list = api.mapper.to_view_element(data.item).and_then(|item| api.view().parent(item));
    api.unbind_subtree(data.item);
    if let Some(list) = list {
        if api.view().child_count(list) == 0 {
            api.writer().remove(list);
        }
    }
    Ok(EventResult::Continue)
}

/// Keeps the `list-style-type` of a list on its items as `listStyleType`.
///
/// The upcast is a low-priority catch-all on `<li>`: it runs after the
/// `List` converter created the item and extends it with the parent
/// list's style.
#[derive(Debug, Default)]
pub struct ListStyleType;

#[async_trait]
impl Plugin for ListStyleType {
    async fn init(&self, editor: &Editor) -> Result<()> {
        editor.with_model(|model| {
            model.schema_mut().extend("listItem", SchemaItemDefinition::new().allow_attributes(["listStyleType"]));
        });
        editor.with_conversion(|conversion| {
            conversion.for_upcast().on("element:li", Priority::LOW, |_event, data, api| {
                let Some(range) = data.model_range else {
                    return Ok(EventResult::Continue);
                };
                let view = api.view;
                let Some(list) = view.parent(data.view_item) else {
                    return Ok(EventResult::Continue);
                };
                // Every item of the list reads the style, so it is tested and
                // left for the others.
                let aspect = ViewMatch::new().style(LIST_STYLE);
                if !api.consumable.test(list, aspect.aspects()) {
                    return Ok(EventResult::Continue);
                }
                let Some(style) = view.element(list).and_then(|list| list.style(LIST_STYLE)).map(str::to_string) else {
                    return Ok(EventResult::Continue);
                };
                let Some(list_item) = api.model().node_after(range.start) else {
                    return Ok(EventResult::Continue);
                };
                if api.check_attribute(list_item, "listStyleType") {
                    api.writer().set_attribute("listStyleType", json!(style), list_item);
                }
                Ok(EventResult::Continue)
            });
            conversion.for_downcast(DowncastGroup::Both, |dispatcher| {
                dispatcher.on("attribute:listStyleType:listItem", Priority::NORMAL, list_style_to_view);
            });
        });
        Ok(())
    }
}

impl PluginConstructor for ListStyleType {
    const PLUGIN_NAME: Option<&'static str> = Some("ListStyleType");

    fn requires() -> Vec<PluginRef> {
        vec![PluginRef::of::<List>()]
    }

    fn create(_editor: &Editor) -> Result<Self> {
        Ok(ListStyleType)
    }
}

fn list_style_to_view(event: &str, data: &DowncastData, api: &mut DowncastConversionApi<'_>) -> ConversionResult<EventResult> {
    let Some(list) = api.mapper.to_view_element(data.item).and_then(|item| api.view().parent(item)) else {
        return Ok(EventResult::Continue);
    };
    if !api.consume(data.item, event) {
        return Ok(EventResult::Continue);
    }
    let mut writer = api.writer();
    match data.attribute_new_value.as_ref().and_then(Value::as_str) {
        Some(style) => writer.set_style(LIST_STYLE, style, list),
        None => writer.remove_style(LIST_STYLE, list),
    }
    Ok(EventResult::Continue)
}
