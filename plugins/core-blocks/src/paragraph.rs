use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use scribe_core::model::document::MAIN_ROOT;
use scribe_core::model::{Attributes, SchemaItemDefinition};
use scribe_core::{Command, Editor, Plugin, PluginConstructor, Result};

/// `<p>` <-> `paragraph`, plus the `insertParagraph` command.
#[derive(Debug, Default)]
pub struct Paragraph;

#[async_trait]
impl Plugin for Paragraph {
    async fn init(&self, editor: &Editor) -> Result<()> {
        debug!("Registering paragraph schema and converters");
        editor.with_model(|model| {
            model
                .schema_mut()
                .register("paragraph", SchemaItemDefinition::new().allow_where("$block").allow_content_of("$block"));
        });
        editor.with_conversion(|conversion| conversion.element_to_element("paragraph", "p"));
        editor.commands().add("insertParagraph", InsertParagraph);
        Ok(())
    }
}

impl PluginConstructor for Paragraph {
    const PLUGIN_NAME: Option<&'static str> = Some("Paragraph");

    fn create(_editor: &Editor) -> Result<Self> {
        Ok(Paragraph)
    }
}

/// Appends a paragraph to the main root. The first argument, if a string,
/// becomes its text.
struct InsertParagraph;

impl Command for InsertParagraph {
    fn execute(&self, editor: &Editor, args: &[Value]) -> Result<()> {
        let text = args.first().and_then(Value::as_str).unwrap_or_default().to_string();
        let root = editor
            .with_model(|model| model.root(MAIN_ROOT))
            .ok_or("insertParagraph: the editor has no main root")?;
        editor.change(|writer| {
            let paragraph = writer.create_element("paragraph", Attributes::new());
            if !text.is_empty() {
                let text = writer.create_text(&text, Attributes::new());
                writer.append(text, paragraph);
            }
            writer.append(paragraph, root);
        })
    }
}
