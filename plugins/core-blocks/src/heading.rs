use async_trait::async_trait;

use scribe_core::model::SchemaItemDefinition;
use scribe_core::{Editor, Plugin, PluginConstructor, Result};

pub const DEFAULT_HEADING_LEVELS: u8 = 3;
const MAX_HEADING_LEVEL: u8 = 6;

/// `<hN>` <-> `headingN` for every level up to `heading.levels`.
#[derive(Debug, Default)]
pub struct Heading;

#[async_trait]
impl Plugin for Heading {
    async fn init(&self, editor: &Editor) -> Result<()> {
        let levels = editor
            .config_get::<u8>("heading.levels")
            .unwrap_or(DEFAULT_HEADING_LEVELS)
            .clamp(1, MAX_HEADING_LEVEL);
        log::debug!("Registering {} heading levels", levels);

        editor.with_model(|model| {
            for level in 1..=levels {
                model.schema_mut().register(
                    &format!("heading{}", level),
                    SchemaItemDefinition::new().allow_where("$block").allow_content_of("$block"),
                );
            }
        });
        editor.with_conversion(|conversion| {
            for level in 1..=levels {
                conversion.element_to_element(&format!("heading{}", level), &format!("h{}", level));
            }
        });
        Ok(())
    }
}

impl PluginConstructor for Heading {
    const PLUGIN_NAME: Option<&'static str> = Some("Heading");

    fn create(editor: &Editor) -> Result<Self> {
        editor.define_config("heading.levels", DEFAULT_HEADING_LEVELS)?;
        Ok(Heading)
    }
}
