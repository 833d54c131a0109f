use crate::conversion::mapper::Mapper;
use crate::model::{ModelItem, ModelTree};
use crate::tree::Position;
use crate::view::{ElementKind, ViewElement, ViewItem, ViewTree};

#[test]
fn test_bindings_both_ways() {
    let mut mapper = Mapper::new();
    let mut model = ModelTree::new();
    let mut view = ViewTree::new();
    let paragraph = model.create(ModelItem::element("paragraph"));
    let p = view.create(ViewItem::Element(ViewElement::container("p")));

    mapper.bind_elements(paragraph, p);
    assert_eq!(mapper.to_view_element(paragraph), Some(p));
    assert_eq!(mapper.to_model_element(p), Some(paragraph));
    assert_eq!(mapper.len(), 1);

    mapper.unbind_view_element(p);
    assert!(mapper.to_view_element(paragraph).is_none());
    assert!(mapper.is_empty());
}

#[test]
fn test_rebinding_forgets_old_counterparts() {
    let mut mapper = Mapper::new();
    let mut model = ModelTree::new();
    let mut view = ViewTree::new();
    let paragraph = model.create(ModelItem::element("paragraph"));
    let heading = model.create(ModelItem::element("heading1"));
    let first = view.create(ViewItem::Element(ViewElement::container("p")));
    let second = view.create(ViewItem::Element(ViewElement::container("p")));

    mapper.bind_elements(paragraph, first);
    mapper.bind_elements(paragraph, second);
    assert_eq!(mapper.to_view_element(paragraph), Some(second));
    assert_eq!(mapper.to_model_element(first), None);

    mapper.bind_elements(heading, second);
    assert_eq!(mapper.to_model_element(second), Some(heading));
    assert_eq!(mapper.to_view_element(paragraph), None);
    assert_eq!(mapper.len(), 1);
}

#[test]
fn test_positions_step_over_attribute_elements() {
    // model: root > paragraph > ["a", "b"]
    // view:  root > p > ["a", <strong>"b"</strong>]
    let mut model = ModelTree::new();
    let root = model.create(ModelItem::Root { root_name: "main".into() });
    let paragraph = model.create(ModelItem::element("paragraph"));
    let a = model.create(ModelItem::text("a"));
    let b = model.create(ModelItem::text("b"));
    model.append(root, paragraph);
    model.append(paragraph, a);
    model.append(paragraph, b);

    let mut view = ViewTree::new();
    let view_root = view.create(ViewItem::Root { root_name: "main".into() });
    let p = view.create(ViewItem::Element(ViewElement::container("p")));
    let view_a = view.create(ViewItem::Text("a".into()));
    let strong = view.create(ViewItem::Element(ViewElement::new("strong", ElementKind::Attribute)));
    let view_b = view.create(ViewItem::Text("b".into()));
    view.append(view_root, p);
    view.append(p, view_a);
    view.append(p, strong);
    view.append(strong, view_b);

    let mut mapper = Mapper::new();
    mapper.bind_elements(root, view_root);
    mapper.bind_elements(paragraph, p);
    mapper.bind_elements(a, view_a);
    mapper.bind_elements(b, view_b);

    assert_eq!(mapper.to_view_position(&model, &view, Position::new(root, 1)), Some(Position::new(view_root, 1)));
    assert_eq!(mapper.to_view_position(&model, &view, Position::new(paragraph, 0)), Some(Position::new(p, 0)));
    assert_eq!(mapper.to_view_position(&model, &view, Position::new(paragraph, 2)), Some(Position::new(p, 2)));

    assert_eq!(mapper.to_model_position(&view, &model, Position::new(p, 1)), Some(Position::new(paragraph, 1)));
    assert_eq!(mapper.to_model_position(&view, &model, Position::new(strong, 1)), Some(Position::new(paragraph, 2)));
    assert_eq!(mapper.to_model_position(&view, &model, Position::new(strong, 0)), Some(Position::new(paragraph, 1)));
    assert_eq!(mapper.find_mapped_view_ancestor(&view, view_b), Some(view_b));
    assert_eq!(mapper.find_mapped_view_ancestor(&view, strong), Some(p));
}

#[test]
fn test_unmapped_parent_has_no_view_position() {
    let mut model = ModelTree::new();
    let orphan = model.create(ModelItem::element("paragraph"));
    let view = ViewTree::new();
    assert!(Mapper::new().to_view_position(&model, &view, Position::at_start(orphan)).is_none());
}
