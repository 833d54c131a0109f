use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use crate::controller::{DataProcessor, JsonDataProcessor};
use crate::conversion::error::ConversionResult;
use crate::conversion::priority::Priority;
use crate::conversion::upcast::UpcastDispatcher;
use crate::conversion::upcast_helpers::{self, ViewKey};
use crate::event::EventResult;
use crate::model::{Attributes, ModelTree, Schema, SchemaItemDefinition};
use crate::view::ViewTree;

fn schema() -> Schema {
    let mut schema = Schema::new();
    schema.register(
        "paragraph",
        SchemaItemDefinition::new().allow_where("$block").allow_content_of("$block").allow_attributes(["alignment"]),
    );
    schema.register(
        "listItem",
        SchemaItemDefinition::new()
            .allow_where("$block")
            .allow_content_of("$block")
            .allow_attributes(["listType", "listStyleType"]),
    );
    schema.register("image", SchemaItemDefinition::new().allow_where("$block").object());
    schema.extend("$text", SchemaItemDefinition::new().allow_attributes(["bold"]));
    schema
}

/// Parses JSON data, upcasts it and returns the model markup.
fn upcast(dispatcher: &UpcastDispatcher, schema: &Schema, data: &str) -> ConversionResult<String> {
    let mut view = ViewTree::new();
    let fragment = JsonDataProcessor::new().to_view(data, &mut view)?;
    let mut model = ModelTree::new();
    let result = dispatcher.convert(&view, fragment, &mut model, schema, &["$root".to_string()])?;
    Ok(model.stringify_children(result))
}

fn with_paragraphs() -> UpcastDispatcher {
    let mut dispatcher = UpcastDispatcher::new();
    upcast_helpers::element_to_named_element(&mut dispatcher, "p", "paragraph");
    dispatcher
}

#[test]
fn test_paragraphs_and_text() -> ConversionResult<()> {
    let dispatcher = with_paragraphs();
    let result = upcast(&dispatcher, &schema(), r#"[{ "name": "p", "children": ["Hello"] }, { "name": "p" }]"#)?;
    assert_eq!(result, "<paragraph>Hello</paragraph><paragraph></paragraph>");
    Ok(())
}

#[test]
fn test_unknown_elements_are_transparent() -> ConversionResult<()> {
    let dispatcher = with_paragraphs();
    let data = r#"[{ "name": "div", "children": [{ "name": "section", "children": [{ "name": "p", "children": ["x"] }] }] }]"#;
    assert_eq!(upcast(&dispatcher, &schema(), data)?, "<paragraph>x</paragraph>");
    Ok(())
}

#[test]
fn test_text_not_allowed_in_root_is_dropped() -> ConversionResult<()> {
    let dispatcher = with_paragraphs();
    assert_eq!(upcast(&dispatcher, &schema(), r#"["loose", { "name": "p", "children": ["kept"] }]"#)?, "<paragraph>kept</paragraph>");
    Ok(())
}

#[test]
fn test_higher_priority_converter_wins() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    let mut schema = schema();
    schema.register("heading1", SchemaItemDefinition::new().allow_where("$block").allow_content_of("$block"));
    upcast_helpers::element_to_element(&mut dispatcher, "p", Priority::HIGH, |view, item, writer| {
        let is_title = view.element(item).is_some_and(|e| e.has_class("title"));
        is_title.then(|| writer.create_element("heading1", Attributes::new()))
    });

    let data = r#"[{ "name": "p", "attributes": { "class": "title" }, "children": ["A"] }, { "name": "p", "children": ["B"] }]"#;
    assert_eq!(upcast(&dispatcher, &schema, data)?, "<heading1>A</heading1><paragraph>B</paragraph>");
    Ok(())
}

#[test]
fn test_consumed_item_is_skipped_by_lower_priority_converter() -> ConversionResult<()> {
    let mut dispatcher = UpcastDispatcher::new();
    let low_calls = Arc::new(AtomicUsize::new(0));

    dispatcher.on("element:p", Priority::HIGH, |_event, data, api| {
        api.consumable.consume(data.view_item, &["name"]);
        Ok(EventResult::Continue)
    });
    let calls = low_calls.clone();
    dispatcher.on("element:p", Priority::LOW, move |_event, data, api| {
        calls.fetch_add(1, Ordering::SeqCst);
        if !api.consumable.test(data.view_item, &["name"]) {
            return Ok(EventResult::Continue);
        }
        let paragraph = api.writer().create_element("paragraph", Attributes::new());
        api.writer().insert(paragraph, data.model_cursor);
        Ok(EventResult::Continue)
    });

    assert_eq!(upcast(&dispatcher, &schema(), r#"[{ "name": "p", "children": ["gone"] }]"#)?, "");
    assert_eq!(low_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_stop_ends_the_event() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    dispatcher.on("element:p", Priority::HIGHEST, |_event, _data, _api| Ok(EventResult::Stop));
    assert_eq!(upcast(&dispatcher, &schema(), r#"[{ "name": "p", "children": ["x"] }]"#)?, "");
    Ok(())
}

#[test]
fn test_disallowed_element_splits_its_ancestor() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    upcast_helpers::element_to_named_element(&mut dispatcher, "img", "image");

    let data = r#"[{ "name": "p", "children": ["foo", { "name": "img" }, "bar"] }]"#;
    assert_eq!(
        upcast(&dispatcher, &schema(), data)?,
        "<paragraph>foo</paragraph><image></image><paragraph>bar</paragraph>"
    );
    Ok(())
}

#[test]
fn test_empty_split_parts_are_removed() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    upcast_helpers::element_to_named_element(&mut dispatcher, "img", "image");

    let data = r#"[{ "name": "p", "children": [{ "name": "img" }] }, { "name": "p", "children": ["after"] }]"#;
    assert_eq!(upcast(&dispatcher, &schema(), data)?, "<image></image><paragraph>after</paragraph>");
    Ok(())
}

#[test]
fn test_element_without_allowed_parent_is_dropped() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    upcast_helpers::element_to_named_element(&mut dispatcher, "video", "media");

    let data = r#"[{ "name": "p", "children": ["a"] }, { "name": "video" }, { "name": "p", "children": ["b"] }]"#;
    assert_eq!(upcast(&dispatcher, &schema(), data)?, "<paragraph>a</paragraph><paragraph>b</paragraph>");
    Ok(())
}

#[test]
fn test_element_to_attribute_marks_text() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    upcast_helpers::element_to_attribute(&mut dispatcher, "strong", "bold", Priority::NORMAL, |_| Some(Value::Bool(true)));

    let data = r#"[{ "name": "p", "children": [{ "name": "strong", "children": ["b"] }, "c"] }]"#;
    assert_eq!(upcast(&dispatcher, &schema(), data)?, "<paragraph><$text bold=\"true\">b</$text>c</paragraph>");
    Ok(())
}

#[test]
fn test_element_to_attribute_survives_split() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    upcast_helpers::element_to_named_element(&mut dispatcher, "img", "image");
    upcast_helpers::element_to_attribute(&mut dispatcher, "strong", "bold", Priority::NORMAL, |_| Some(Value::Bool(true)));

    let data = r#"[{ "name": "p", "children": [{ "name": "strong", "children": ["a", { "name": "img" }, "b"] }] }]"#;
    assert_eq!(
        upcast(&dispatcher, &schema(), data)?,
        "<paragraph><$text bold=\"true\">a</$text></paragraph><image></image><paragraph><$text bold=\"true\">b</$text></paragraph>"
    );
    Ok(())
}

#[test]
fn test_attribute_to_attribute_reads_style() -> ConversionResult<()> {
    let mut dispatcher = with_paragraphs();
    upcast_helpers::attribute_to_attribute(
        &mut dispatcher,
        Some("p"),
        ViewKey::Style("text-align".to_string()),
        "alignment",
        Priority::LOW,
    );

    let data = r#"[{ "name": "p", "attributes": { "style": "text-align: right" }, "children": ["x"] }]"#;
    assert_eq!(upcast(&dispatcher, &schema(), data)?, "<paragraph alignment=\"right\">x</paragraph>");
    Ok(())
}

/// `<li>` becomes `listItem`; a low-priority catch-all then copies the
/// parent list's `list-style-type` onto the already created item.
#[test]
fn test_catch_all_extends_converted_list_item() -> ConversionResult<()> {
    let mut dispatcher = UpcastDispatcher::new();
    upcast_helpers::element_to_element(&mut dispatcher, "li", Priority::NORMAL, |view, item, writer| {
        let list_type = match view.parent(item).map(|parent| view.name(parent)) {
            Some("ol") => "numbered",
            _ => "bulleted",
        };
        let mut attributes = Attributes::new();
        attributes.insert("listType".to_string(), json!(list_type));
        Some(writer.create_element("listItem", attributes))
    });
    let created = Arc::new(AtomicUsize::new(0));
    let seen = created.clone();
    dispatcher.on("element:li", Priority::LOW, move |_event, data, api| {
        let Some(range) = data.model_range else {
            return Ok(EventResult::Continue);
        };
        seen.fetch_add(1, Ordering::SeqCst);
        let view = api.view;
        let style = view
            .parent(data.view_item)
            .and_then(|list| view.element(list))
            .and_then(|list| list.style("list-style-type"))
            .map(str::to_string);
        let Some(style) = style else {
            return Ok(EventResult::Continue);
        };
        if let Some(list_item) = api.model().node_after(range.start) {
            api.writer().set_attribute("listStyleType", json!(style), list_item);
        }
        Ok(EventResult::Continue)
    });

    let data = r#"[{ "name": "ul", "attributes": { "style": "list-style-type: square" },
        "children": [{ "name": "li", "children": ["One"] }, { "name": "li", "children": ["Two"] }] }]"#;
    assert_eq!(
        upcast(&dispatcher, &schema(), data)?,
        "<listItem listStyleType=\"square\" listType=\"bulleted\">One</listItem>\
         <listItem listStyleType=\"square\" listType=\"bulleted\">Two</listItem>"
    );
    assert_eq!(created.load(Ordering::SeqCst), 2);
    Ok(())
}
