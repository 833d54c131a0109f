use serde_json::{json, Value};

use crate::conversion::downcast::{DowncastConversionApi, DowncastDispatcher};
use crate::conversion::downcast_helpers;
use crate::conversion::error::ConversionError;
use crate::conversion::mapper::Mapper;
use crate::conversion::priority::Priority;
use crate::event::EventResult;
use crate::model::{Attributes, Model};
use crate::tree::{NodeId, Position, Range};
use crate::view::{ViewItem, ViewTree};

struct Fixture {
    model: Model,
    root: NodeId,
    view: ViewTree,
    view_root: NodeId,
    mapper: Mapper,
}

impl Fixture {
    fn new() -> Self {
        let mut model = Model::new();
        let root = model.create_root("main");
        let mut view = ViewTree::new();
        let view_root = view.create(ViewItem::Root { root_name: "main".into() });
        let mut mapper = Mapper::new();
        mapper.bind_elements(root, view_root);
        Self { model, root, view, view_root, mapper }
    }

    fn convert_all(&mut self, dispatcher: &DowncastDispatcher) -> Result<(), ConversionError> {
        let range = Range::flat(self.root, 0, self.model.tree().child_count(self.root));
        let mut api = DowncastConversionApi::new(self.model.tree(), self.model.schema(), &mut self.view, &mut self.mapper);
        dispatcher.convert_insert(range, &mut api)
    }

    fn view_data(&self) -> String {
        self.view.stringify_children(self.view_root)
    }
}

fn attrs(pairs: &[(&str, Value)]) -> Attributes {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn paragraph_with_bold(fixture: &mut Fixture) -> (NodeId, NodeId) {
    let root = fixture.root;
    let nodes = fixture.model.change(|writer| {
        let paragraph = writer.create_element("paragraph", Attributes::new());
        let plain = writer.create_text("a", Attributes::new());
        let bold = writer.create_text("b", attrs(&[("bold", json!(true))]));
        writer.append(plain, paragraph);
        writer.append(bold, paragraph);
        writer.append(paragraph, root);
        (paragraph, bold)
    });
    fixture.model.take_changes();
    nodes
}

#[test]
fn test_insert_wraps_attributed_text() {
    let mut fixture = Fixture::new();
    paragraph_with_bold(&mut fixture);

    let mut dispatcher = DowncastDispatcher::new();
    downcast_helpers::element_to_element(&mut dispatcher, "paragraph", "p");
    downcast_helpers::attribute_to_element(&mut dispatcher, "bold", "strong");

    fixture.convert_all(&dispatcher).unwrap();
    assert_eq!(fixture.view_data(), "<p>a<strong>b</strong></p>");
}

#[test]
fn test_attribute_removal_unwraps() {
    let mut fixture = Fixture::new();
    let (_, bold) = paragraph_with_bold(&mut fixture);

    let mut dispatcher = DowncastDispatcher::new();
    downcast_helpers::element_to_element(&mut dispatcher, "paragraph", "p");
    downcast_helpers::attribute_to_element(&mut dispatcher, "bold", "strong");
    fixture.convert_all(&dispatcher).unwrap();

    fixture.model.change(|writer| writer.remove_attribute("bold", bold));
    fixture.model.take_changes();

    let mut api = DowncastConversionApi::new(fixture.model.tree(), fixture.model.schema(), &mut fixture.view, &mut fixture.mapper);
    dispatcher.convert_attribute(bold, "bold", Some(json!(true)), None, &mut api).unwrap();
    assert_eq!(fixture.view_data(), "<p>ab</p>");
}

#[test]
fn test_attribute_to_attribute() {
    let mut fixture = Fixture::new();
    let root = fixture.root;
    fixture.model.change(|writer| {
        let paragraph = writer.create_element("paragraph", attrs(&[("alignment", json!("center"))]));
        writer.append(paragraph, root);
    });

    let mut dispatcher = DowncastDispatcher::new();
    downcast_helpers::element_to_element(&mut dispatcher, "paragraph", "p");
    downcast_helpers::attribute_to_attribute(&mut dispatcher, "alignment", "align");

    fixture.convert_all(&dispatcher).unwrap();
    assert_eq!(fixture.view_data(), "<p align=\"center\"></p>");
}

#[test]
fn test_consumed_insert_is_skipped_by_lower_priority() {
    let mut fixture = Fixture::new();
    paragraph_with_bold(&mut fixture);

    let mut dispatcher = DowncastDispatcher::new();
    downcast_helpers::element_to_element(&mut dispatcher, "paragraph", "p");
    downcast_helpers::insert_element(&mut dispatcher, "paragraph", Priority::HIGH, |_, _, writer| {
        Some(writer.create_container_element("h1", &[]))
    });

    fixture.convert_all(&dispatcher).unwrap();
    assert_eq!(fixture.view_data(), "<h1>ab</h1>");
}

#[test]
fn test_stop_ends_dispatch() {
    let mut fixture = Fixture::new();
    paragraph_with_bold(&mut fixture);

    let mut dispatcher = DowncastDispatcher::new();
    downcast_helpers::element_to_element(&mut dispatcher, "paragraph", "p");
    dispatcher.on("insert:paragraph", Priority::HIGH, |_, _, _| Ok(EventResult::Stop));

    fixture.convert_all(&dispatcher).unwrap();
    // The paragraph never reached the view, so its text had nowhere to go.
    assert_eq!(fixture.view_data(), "");
}

#[test]
fn test_remove_detaches_view_and_bindings() {
    let mut fixture = Fixture::new();
    let (paragraph, bold) = paragraph_with_bold(&mut fixture);

    let mut dispatcher = DowncastDispatcher::new();
    downcast_helpers::element_to_element(&mut dispatcher, "paragraph", "p");
    fixture.convert_all(&dispatcher).unwrap();
    assert!(fixture.mapper.to_view_element(bold).is_some());

    fixture.model.change(|writer| writer.remove(paragraph));
    fixture.model.take_changes();

    let root = fixture.root;
    let mut api = DowncastConversionApi::new(fixture.model.tree(), fixture.model.schema(), &mut fixture.view, &mut fixture.mapper);
    dispatcher.convert_remove(root, &[paragraph], &mut api).unwrap();

    assert_eq!(fixture.view_data(), "");
    assert!(fixture.mapper.to_view_element(paragraph).is_none());
    assert!(fixture.mapper.to_view_element(bold).is_none());
    assert_eq!(fixture.mapper.len(), 1);
}

fn figure_dispatcher() -> DowncastDispatcher {
    let mut dispatcher = DowncastDispatcher::new();
    downcast_helpers::insert_structure(&mut dispatcher, "figure", Priority::NORMAL, |_, _, writer| {
        let figure = writer.create_container_element("figure", &[]);
        let body = writer.create_container_element("div", &[("data-slot", "body")]);
        let caption = writer.create_container_element("figcaption", &[("data-slot", "caption")]);
        writer.insert(Position::at_start(figure), body);
        writer.insert(Position::new(figure, 1), caption);
        Some(figure)
    });
    dispatcher
}

fn figure_with_slots(fixture: &mut Fixture, slots: &[Option<&str>]) {
    let root = fixture.root;
    fixture.model.change(|writer| {
        let figure = writer.create_element("figure", Attributes::new());
        for slot in slots {
            let attributes = match slot {
                Some(name) => attrs(&[("slotName", json!(name))]),
                None => Attributes::new(),
            };
            let element = writer.create_element("figureSlot", attributes);
            let text = writer.create_text(&slot.unwrap_or("x").to_uppercase(), Attributes::new());
            writer.append(text, element);
            writer.append(element, figure);
        }
        writer.append(figure, root);
    });
    fixture.model.take_changes();
}

#[test]
fn test_structure_fills_slots() {
    let mut fixture = Fixture::new();
    figure_with_slots(&mut fixture, &[Some("body"), Some("caption")]);

    fixture.convert_all(&figure_dispatcher()).unwrap();
    assert_eq!(
        fixture.view_data(),
        "<figure><div data-slot=\"body\">BODY</div><figcaption data-slot=\"caption\">CAPTION</figcaption></figure>"
    );
}

#[test]
fn test_structure_slot_mismatch() {
    let mut fixture = Fixture::new();
    figure_with_slots(&mut fixture, &[Some("body")]);

    let err = fixture.convert_all(&figure_dispatcher()).unwrap_err();
    match err {
        ConversionError::SlotMismatch { template, model } => {
            assert_eq!(template, vec!["body".to_string(), "caption".to_string()]);
            assert_eq!(model, vec!["body".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_structure_rejects_unnamed_children() {
    let mut fixture = Fixture::new();
    figure_with_slots(&mut fixture, &[Some("body"), None]);

    let err = fixture.convert_all(&figure_dispatcher()).unwrap_err();
    assert!(matches!(err, ConversionError::UnexpectedSlotContent { .. }));
}
