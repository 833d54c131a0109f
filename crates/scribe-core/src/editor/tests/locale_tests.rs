use serde_json::json;

use crate::config::Config;
use crate::editor::{Editor, EditorConfig, Locale};

#[test]
fn test_placeholders() {
    let locale = Locale::default();
    assert_eq!(locale.t("%0 of %1", &["3", "7"]), "3 of 7");
    assert_eq!(locale.t("%0 and %2", &["a"]), "a and %2");
    assert_eq!(locale.t("100% sure", &[]), "100% sure");
}

#[test]
fn test_translations_and_direction() {
    let config = Config::from_value(json!({
        "language": { "ui": "ar", "content": "en" },
        "translations": { "ar": { "Bold": "غامق" } }
    }))
    .unwrap();
    let locale = Locale::from_config(&config);

    assert_eq!(locale.ui_language(), "ar");
    assert_eq!(locale.content_language(), "en");
    assert_eq!(locale.ui_language_direction(), "rtl");
    assert_eq!(locale.content_language_direction(), "ltr");
    assert_eq!(locale.t("Bold", &[]), "غامق");
    assert_eq!(locale.t("Italic", &[]), "Italic");
}

#[test]
fn test_editor_language_option() {
    let config = EditorConfig::new()
        .with_language("he")
        .with_value("translations.he", json!({ "Undo": "בטל" }))
        .unwrap();
    let editor = Editor::new(config);

    assert_eq!(editor.locale().ui_language(), "he");
    assert_eq!(editor.locale().content_language_direction(), "rtl");
    assert_eq!(editor.t("Undo", &[]), "בטל");
}
