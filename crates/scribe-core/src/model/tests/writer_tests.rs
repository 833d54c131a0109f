use serde_json::json;

use crate::model::{Attributes, Change, Model};
use crate::tree::Position;

#[test]
fn test_changes_are_recorded_only_for_attached_nodes() {
    let mut model = Model::new();
    let root = model.create_root("main");

    let paragraph = model.change(|writer| {
        let fragment = writer.create_fragment();
        let paragraph = writer.create_element("paragraph", Attributes::new());
        writer.append(paragraph, fragment);
        let text = writer.create_text("foo", Attributes::new());
        writer.append(text, paragraph);
        paragraph
    });
    assert!(!model.has_pending_changes());

    model.change(|writer| {
        writer.insert(paragraph, Position::at_start(root));
        writer.set_attribute("alignment", json!("center"), paragraph);
        writer.set_attribute("alignment", json!("center"), paragraph);
    });

    let changes = model.take_changes();
    assert_eq!(
        changes,
        vec![
            Change::Insert { node: paragraph },
            Change::Attribute {
                node: paragraph,
                key: "alignment".into(),
                old_value: None,
                new_value: Some(json!("center")),
            },
        ]
    );
    assert_eq!(model.tree().stringify_children(root), "<paragraph alignment=\"center\">foo</paragraph>");
}

#[test]
fn test_split_creates_copies_up_to_limit() {
    let mut model = Model::new();
    let outcome = model.change(|writer| {
        let fragment = writer.create_fragment();
        let list = writer.create_element("list", Attributes::new());
        let item = writer.create_element("item", Attributes::new());
        writer.append(list, fragment);
        writer.append(item, list);
        for text in ["a", "b"] {
            let node = writer.create_text(text, Attributes::new());
            writer.append(node, item);
        }
        let outcome = writer.split(Position::new(item, 1), fragment);
        (fragment, list, item, outcome)
    });
    let (fragment, list, item, outcome) = outcome;

    assert_eq!(outcome.position, Position::new(fragment, 1));
    assert_eq!(outcome.pairs.len(), 2);
    assert_eq!(outcome.pairs[0].0, item);
    assert_eq!(outcome.pairs[1].0, list);
    assert_eq!(outcome.cursor_parent, Some(outcome.pairs[0].1));
    assert_eq!(
        model.tree().stringify_children(fragment),
        "<list><item>a</item></list><list><item>b</item></list>"
    );
}

#[test]
fn test_split_at_limit_is_a_no_op() {
    let mut model = Model::new();
    let root = model.create_root("main");
    let outcome = model.change(|writer| writer.split(Position::at_start(root), root));
    assert_eq!(outcome.position, Position::at_start(root));
    assert_eq!(outcome.cursor_parent, None);
    assert!(outcome.pairs.is_empty());
}

#[test]
fn test_clear_records_removal() {
    let mut model = Model::new();
    let root = model.create_root("main");
    let nodes = model.change(|writer| {
        let a = writer.create_element("paragraph", Attributes::new());
        let b = writer.create_element("paragraph", Attributes::new());
        writer.append(a, root);
        writer.append(b, root);
        vec![a, b]
    });
    model.take_changes();

    model.change(|writer| writer.clear(root));
    assert_eq!(model.take_changes(), vec![Change::Remove { parent: root, nodes }]);
    assert_eq!(model.tree().child_count(root), 0);
}
