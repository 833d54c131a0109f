//! Block plugins bundled with Scribe: paragraphs, headings and lists.
mod heading;
mod list;
mod paragraph;

pub use heading::{Heading, DEFAULT_HEADING_LEVELS};
pub use list::{List, ListStyleType};
pub use paragraph::Paragraph;

use scribe_core::{BuildDefaults, PluginDescriptor};

/// Every block plugin, in the order a default build loads them.
pub fn descriptors() -> Vec<PluginDescriptor> {
    vec![
        PluginDescriptor::of::<Paragraph>(),
        PluginDescriptor::of::<Heading>(),
        PluginDescriptor::of::<List>(),
        PluginDescriptor::of::<ListStyleType>(),
    ]
}

/// Adds the block plugins to a set of build defaults.
pub fn with_block_plugins(defaults: BuildDefaults) -> BuildDefaults {
    descriptors().into_iter().fold(defaults, BuildDefaults::with_plugin)
}
