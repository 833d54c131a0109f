use std::sync::Arc;

use crate::conversion::priority::Priority;
use crate::conversion::registry::ConverterRegistry;

type Label = dyn Fn() -> &'static str + Send + Sync;

fn label(text: &'static str) -> Arc<Label> {
    Arc::new(move || text)
}

fn fired(registry: &ConverterRegistry<Label>, event: &str) -> Vec<&'static str> {
    registry.handlers_for(event).iter().map(|h| h()).collect()
}

#[test]
fn test_namespaced_handlers_merge_by_priority() {
    let mut registry = ConverterRegistry::new();
    registry.on("attribute", Priority::LOWEST, label("any attribute"));
    registry.on("attribute:bold", Priority::NORMAL, label("bold"));
    registry.on("attribute:bold:$text", Priority::HIGH, label("bold text"));
    registry.on("attribute:italic", Priority::HIGHEST, label("italic"));

    assert_eq!(fired(&registry, "attribute:bold:$text"), vec!["bold text", "bold", "any attribute"]);
    assert_eq!(fired(&registry, "attribute:bold:paragraph"), vec!["bold", "any attribute"]);
    assert!(registry.has_handlers("attribute:underline:$text"));
    assert!(!registry.has_handlers("insert:paragraph"));
}

#[test]
fn test_equal_priority_keeps_registration_order() {
    let mut registry = ConverterRegistry::new();
    registry.on("insert", Priority::NORMAL, label("first"));
    registry.on("insert:paragraph", Priority::NORMAL, label("second"));
    registry.on("insert", Priority::NORMAL, label("third"));

    assert_eq!(fired(&registry, "insert:paragraph"), vec!["first", "second", "third"]);
}

#[test]
fn test_off_removes_one_handler() {
    let mut registry = ConverterRegistry::new();
    let keep = registry.on("element:p", Priority::NORMAL, label("keep"));
    let drop = registry.on("element:p", Priority::HIGH, label("drop"));

    assert!(registry.off(drop));
    assert!(!registry.off(drop));
    assert_ne!(keep, drop);
    assert_eq!(fired(&registry, "element:p"), vec!["keep"]);
}

#[test]
fn test_priority_names() {
    assert_eq!("high".parse::<Priority>().unwrap(), Priority::HIGH);
    assert_eq!(" Lowest ".parse::<Priority>().unwrap(), Priority::LOWEST);
    assert_eq!("250".parse::<Priority>().unwrap(), Priority::new(250));
    assert!("urgent".parse::<Priority>().is_err());

    assert_eq!(Priority::LOW.to_string(), "low");
    assert_eq!(Priority::new(-5).to_string(), "-5");
    assert!(Priority::HIGHEST > Priority::HIGH && Priority::NORMAL > Priority::LOW);
    assert_eq!(Priority::default(), Priority::NORMAL);
}
