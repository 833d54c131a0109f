use crate::controller::{DataProcessor, JsonDataProcessor};
use crate::conversion::consumable::{model_aspect, view_consumable, Consumable, ViewMatch};
use crate::view::ViewTree;

#[test]
fn test_consume_is_all_or_nothing() {
    let mut consumable = Consumable::new();
    consumable.add(1u32, "name");
    consumable.add(1u32, "class:fancy");

    assert!(consumable.consume(1, &["name"]));
    assert!(!consumable.consume(1, &["name", "class:fancy"]));
    // The failed claim left class:fancy untouched.
    assert!(consumable.test(1, &["class:fancy"]));
    assert!(!consumable.test(1, &["style:color"]));
    assert!(!consumable.test(2, &["name"]));
}

#[test]
fn test_revert_and_remaining() {
    let mut consumable = Consumable::new();
    consumable.add(7u32, "name");
    consumable.add(7u32, "attribute:href");
    consumable.consume(7, &["name", "attribute:href"]);
    assert!(consumable.remaining(7).is_empty());

    consumable.revert(7, &["attribute:href", "attribute:unknown"]);
    assert_eq!(consumable.remaining(7), vec!["attribute:href"]);
}

#[test]
fn test_view_consumable_lists_every_aspect() {
    let mut view = ViewTree::new();
    let fragment = JsonDataProcessor::new()
        .to_view(
            r#"[{ "name": "p", "attributes": { "id": "x", "class": "a b", "style": "color: red" }, "children": ["t"] }]"#,
            &mut view,
        )
        .unwrap();
    let paragraph = view.children(fragment)[0];
    let text = view.children(paragraph)[0];

    let consumable = view_consumable(&view, fragment);
    assert_eq!(
        consumable.remaining(paragraph),
        vec!["attribute:id", "class:a", "class:b", "name", "style:color"]
    );
    assert_eq!(consumable.remaining(text), vec!["name"]);
    let matcher = ViewMatch::name().class("a").style("color");
    assert!(consumable.test(paragraph, matcher.aspects()));
}

#[test]
fn test_model_aspect_from_event_name() {
    assert_eq!(model_aspect("insert:paragraph"), "insert");
    assert_eq!(model_aspect("insert:$text"), "insert");
    assert_eq!(model_aspect("attribute:bold:$text"), "attribute:bold");
    assert_eq!(model_aspect("remove:listItem"), "remove");
}
