use serde_json::json;

use crate::controller::EditingController;
use crate::conversion::error::ConversionResult;
use crate::conversion::Conversion;
use crate::model::document::MAIN_ROOT;
use crate::model::{Attributes, Model, SchemaItemDefinition};
use crate::tree::{NodeId, Position};

struct Setup {
    model: Model,
    conversion: Conversion,
    editing: EditingController,
}

impl Setup {
    fn new() -> Self {
        let mut model = Model::new();
        model.schema_mut().register("paragraph", SchemaItemDefinition::new().allow_where("$block").allow_content_of("$block"));
        model.create_root(MAIN_ROOT);

        let mut conversion = Conversion::new();
        conversion.element_to_element("paragraph", "p");
        conversion.attribute_to_element("bold", "strong");

        let mut editing = EditingController::new();
        editing.attach_root(&model, MAIN_ROOT);
        Self { model, conversion, editing }
    }

    fn flush(&mut self) -> ConversionResult<()> {
        let changes = self.model.take_changes();
        self.editing.convert_changes(changes, &self.model, self.conversion.editing_downcast())
    }

    fn view_data(&self) -> String {
        let root = self.editing.view_root(MAIN_ROOT).unwrap();
        self.editing.view().stringify_children(root)
    }

    fn insert_paragraph(&mut self, text: &str) -> (NodeId, NodeId) {
        let root = self.model.root(MAIN_ROOT).unwrap();
        self.model.change(|writer| {
            let paragraph = writer.create_element("paragraph", Attributes::new());
            let text = writer.create_text(text, Attributes::new());
            writer.append(text, paragraph);
            writer.append(paragraph, root);
            (paragraph, text)
        })
    }
}

#[test]
fn test_attach_root_is_idempotent() {
    let mut setup = Setup::new();
    let first = setup.editing.view_root(MAIN_ROOT);
    assert_eq!(setup.editing.attach_root(&setup.model, MAIN_ROOT), first);
    assert!(setup.editing.attach_root(&setup.model, "missing").is_none());
}

#[test]
fn test_view_follows_model_changes() -> ConversionResult<()> {
    let mut setup = Setup::new();
    let (_, first_text) = setup.insert_paragraph("one");
    let (second, _) = setup.insert_paragraph("two");
    setup.flush()?;
    assert_eq!(setup.view_data(), "<p>one</p><p>two</p>");

    setup.model.change(|writer| writer.set_attribute("bold", json!(true), first_text));
    setup.flush()?;
    assert_eq!(setup.view_data(), "<p><strong>one</strong></p><p>two</p>");

    setup.model.change(|writer| writer.remove(second));
    setup.flush()?;
    assert_eq!(setup.view_data(), "<p><strong>one</strong></p>");
    Ok(())
}

#[test]
fn test_attributes_set_in_the_same_batch_as_insertion() -> ConversionResult<()> {
    let mut setup = Setup::new();
    let (_, text) = setup.insert_paragraph("x");
    setup.model.change(|writer| writer.set_attribute("bold", json!(true), text));
    setup.flush()?;
    assert_eq!(setup.view_data(), "<p><strong>x</strong></p>");
    Ok(())
}

#[test]
fn test_view_positions_map_back() -> ConversionResult<()> {
    let mut setup = Setup::new();
    let (paragraph, _) = setup.insert_paragraph("one");
    setup.insert_paragraph("two");
    setup.flush()?;

    let view_root = setup.editing.view_root(MAIN_ROOT).unwrap();
    let model_root = setup.model.root(MAIN_ROOT).unwrap();
    assert_eq!(setup.editing.to_model_position(&setup.model, Position::new(view_root, 1)), Some(Position::new(model_root, 1)));

    let view_paragraph = setup.editing.mapper().to_view_element(paragraph).unwrap();
    assert_eq!(
        setup.editing.to_model_position(&setup.model, Position::new(view_paragraph, 1)),
        Some(Position::new(paragraph, 1))
    );
    Ok(())
}

#[test]
fn test_destroy_clears_view() -> ConversionResult<()> {
    let mut setup = Setup::new();
    setup.insert_paragraph("one");
    setup.flush()?;
    setup.editing.destroy();
    assert!(setup.editing.view_root(MAIN_ROOT).is_none());
    assert!(setup.editing.mapper().is_empty());
    Ok(())
}
