use std::collections::HashMap;

use crate::config::Config;

const RTL_LANGUAGES: [&str; 5] = ["ar", "fa", "he", "ku", "ug"];

/// Languages of an editor and its message translations.
#[derive(Debug, Clone)]
pub struct Locale {
    ui_language: String,
    content_language: String,
    translations: HashMap<String, String>,
}

impl Locale {
    pub fn new(ui_language: &str, content_language: &str) -> Self {
        Self {
            ui_language: ui_language.to_string(),
            content_language: content_language.to_string(),
            translations: HashMap::new(),
        }
    }

    /// `language` is either one code or `{ "ui": .., "content": .. }`.
    /// Messages come from `translations.<ui language>`.
    pub fn from_config(config: &Config) -> Self {
        let (ui, content) = match config.get_value("language") {
            Some(serde_json::Value::String(code)) => (code.clone(), code.clone()),
            Some(serde_json::Value::Object(_)) => {
                let ui = config.get_or("language.ui", "en".to_string());
                let content = config.get_or("language.content", ui.clone());
                (ui, content)
            }
            _ => ("en".to_string(), "en".to_string()),
        };
        let mut locale = Self::new(&ui, &content);
        locale.translations = config
            .get::<HashMap<String, String>>(&format!("translations.{}", ui))
            .unwrap_or_default();
        locale
    }

    pub fn with_translations<I>(mut self, translations: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.translations.extend(translations);
        self
    }

    pub fn ui_language(&self) -> &str {
        &self.ui_language
    }

    pub fn content_language(&self) -> &str {
        &self.content_language
    }

    pub fn ui_language_direction(&self) -> &'static str {
        direction_of(&self.ui_language)
    }

    pub fn content_language_direction(&self) -> &'static str {
        direction_of(&self.content_language)
    }

    /// Translates `message` and fills `%0`, `%1`, .. with `values`.
    /// Placeholders without a value are kept as written.
    pub fn t(&self, message: &str, values: &[&str]) -> String {
        let template = self.translations.get(message).map(String::as_str).unwrap_or(message);
        let mut out = String::with_capacity(template.len());
        let mut chars = template.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            let mut end = start + 1;
            while let Some((i, d)) = chars.peek().copied() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + 1;
                chars.next();
            }
            let substituted = template[start + 1..end]
                .parse::<usize>()
                .ok()
                .and_then(|index| values.get(index));
            match substituted {
                Some(value) => out.push_str(value),
                None => out.push_str(&template[start..end]),
            }
        }
        out
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", "en")
    }
}

fn direction_of(language: &str) -> &'static str {
    if RTL_LANGUAGES.contains(&language) { "rtl" } else { "ltr" }
}
