use async_trait::async_trait;
use serde_json::{json, Value};

use crate::command::Command;
use crate::config::Config;
use crate::editor::error::{Error, Result};
use crate::editor::{BuildDefaults, Editor, EditorConfig};
use crate::model::document::MAIN_ROOT;
use crate::model::{Attributes, SchemaItemDefinition};
use crate::plugin_system::{Plugin, PluginConstructor, PluginDescriptor, PluginId, PluginInstance};

struct Paragraphs;

#[async_trait]
impl Plugin for Paragraphs {
    async fn init(&self, editor: &Editor) -> Result<()> {
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

impl PluginConstructor for Paragraphs {
    const PLUGIN_NAME: Option<&'static str> = Some("Paragraph");

    fn create(editor: &Editor) -> Result<Self> {
        editor.define_config("paragraph.placeholder", "Type here")?;
        Ok(Paragraphs)
    }
}

struct InsertParagraph;

impl Command for InsertParagraph {
    fn execute(&self, editor: &Editor, args: &[Value]) -> Result<()> {
        let text = args.first().and_then(Value::as_str).unwrap_or_default().to_string();
        let root = editor.with_model(|model| model.root(MAIN_ROOT)).ok_or("the editor has no main root")?;
        editor.change(|writer| {
            let paragraph = writer.create_element("paragraph", Attributes::new());
            let text = writer.create_text(&text, Attributes::new());
            writer.append(text, paragraph);
            writer.append(paragraph, root);
        })
    }
}

struct Inert;

impl Plugin for Inert {}

fn inert(name: &str) -> PluginDescriptor {
    PluginDescriptor::new(PluginId::custom(name), |_| Ok(PluginInstance::new(Inert))).with_name(name)
}

fn defaults() -> BuildDefaults {
    BuildDefaults::new()
        .with_plugin(PluginDescriptor::of::<Paragraphs>())
        .with_plugin(inert("Clipboard"))
        .with_plugin(inert("Undo"))
}

fn editing_markup(editor: &Editor) -> String {
    editor.with_editing(|editing| {
        let root = editing.view_root(MAIN_ROOT).unwrap();
        editing.view().stringify_children(root)
    })
}

const ONE_PARAGRAPH: &str = r#"[{"name":"p","children":["Hi"]}]"#;

#[tokio::test]
async fn test_create_loads_data_into_model_and_view() -> Result<()> {
    let editor = Editor::create_with_defaults(Some(ONE_PARAGRAPH), EditorConfig::new(), defaults()).await?;

    assert_eq!(editor.get_data()?, ONE_PARAGRAPH);
    assert_eq!(editing_markup(&editor), "<p>Hi</p>");
    Ok(())
}

#[tokio::test]
async fn test_initial_data_option() -> Result<()> {
    let config = EditorConfig::new().with_initial_data(ONE_PARAGRAPH);
    let editor = Editor::create_with_defaults(None, config, defaults()).await?;
    assert_eq!(editor.get_data()?, ONE_PARAGRAPH);
    Ok(())
}

#[tokio::test]
async fn test_initial_data_twice_is_rejected() {
    let config = EditorConfig::new().with_initial_data(ONE_PARAGRAPH);
    let err = Editor::create_with_defaults(Some(ONE_PARAGRAPH), config, defaults()).await.unwrap_err();
    assert!(matches!(err, Error::InitialDataConflict));
    assert!(err.to_string().starts_with("editor-create-initial-data"));
}

#[tokio::test]
async fn test_commands_update_data_and_view() -> Result<()> {
    let editor = Editor::create_with_defaults(Some(ONE_PARAGRAPH), EditorConfig::new(), defaults()).await?;

    editor.execute("insertParagraph", &[json!("There")])?;
    assert_eq!(editor.get_data()?, r#"[{"name":"p","children":["Hi"]},{"name":"p","children":["There"]}]"#);
    assert_eq!(editing_markup(&editor), "<p>Hi</p><p>There</p>");
    Ok(())
}

#[tokio::test]
async fn test_missing_command() -> Result<()> {
    let editor = Editor::create_with_defaults(None, EditorConfig::new(), defaults()).await?;
    let err = editor.execute("missingCommand", &[]).unwrap_err();
    assert!(matches!(err, Error::CommandNotFound { ref name } if name == "missingCommand"));
    Ok(())
}

#[tokio::test]
async fn test_set_data_replaces_content() -> Result<()> {
    let editor = Editor::create_with_defaults(Some(ONE_PARAGRAPH), EditorConfig::new(), defaults()).await?;
    editor.set_data(r#"[{"name":"p","children":["A"]},{"name":"p","children":["B"]}]"#)?;

    assert_eq!(editing_markup(&editor), "<p>A</p><p>B</p>");
    assert!(matches!(editor.get_root_data("sidebar"), Err(Error::Conversion(_))));
    Ok(())
}

#[tokio::test]
async fn test_all_defaults_load_without_plugin_list() -> Result<()> {
    let editor = Editor::create_with_defaults(None, EditorConfig::new(), defaults()).await?;
    assert_eq!(editor.plugins().names(), vec!["Paragraph", "Clipboard", "Undo"]);
    assert!(editor.plugins().get::<Paragraphs>().is_some());
    Ok(())
}

#[tokio::test]
async fn test_plugin_names_resolve_against_defaults() -> Result<()> {
    let config = EditorConfig::new().with_plugins(["Undo", "Paragraph"]);
    let editor = Editor::create_with_defaults(None, config, defaults()).await?;
    assert_eq!(editor.plugins().names(), vec!["Undo", "Paragraph"]);
    assert!(!editor.plugins().contains_name("Clipboard"));
    Ok(())
}

#[tokio::test]
async fn test_remove_plugins() -> Result<()> {
    let config = EditorConfig::new().with_removed_plugins(["Clipboard"]);
    let editor = Editor::create_with_defaults(None, config, defaults()).await?;
    assert_eq!(editor.plugins().names(), vec!["Paragraph", "Undo"]);
    Ok(())
}

#[tokio::test]
async fn test_config_defaults_and_plugin_defined_values() -> Result<()> {
    let build_config = Config::from_value(json!({ "toolbar": { "items": ["bold"] }, "paragraph": { "placeholder": "Start" } }))?;
    let config = EditorConfig::new().with_value("toolbar.items", vec!["italic"])?;
    let editor = Editor::create_with_defaults(None, config, defaults().with_config(build_config)).await?;

    assert_eq!(editor.config_get::<Vec<String>>("toolbar.items"), Some(vec!["italic".to_string()]));
    // Build defaults fill in what the editor configuration leaves out, and
    // `define_config` never overrides either.
    assert_eq!(editor.config_value("paragraph.placeholder"), Some(json!("Start")));
    Ok(())
}

#[tokio::test]
async fn test_editor_config_from_file() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::io::Write::write_all(
        &mut file,
        br#"{ "plugins": ["Paragraph"], "initialData": "[{\"name\":\"p\",\"children\":[\"From file\"]}]" }"#,
    )
    .unwrap();

    let config = EditorConfig::from_path(file.path())?;
    let editor = Editor::create_with_defaults(None, config, defaults()).await?;
    assert_eq!(editor.plugins().names(), vec!["Paragraph"]);
    assert_eq!(editing_markup(&editor), "<p>From file</p>");
    Ok(())
}

#[test]
fn test_typed_config_keys() {
    let values = Config::from_value(json!({ "plugins": "Paragraph" })).unwrap();
    assert!(EditorConfig::from_config(values).is_err());

    let values = Config::from_value(json!({ "language": { "ui": "de", "content": "ar" } })).unwrap();
    let config = EditorConfig::from_config(values).unwrap();
    assert_eq!(config.language.as_deref(), Some("de"));
}
