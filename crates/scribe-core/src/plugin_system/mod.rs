//! # Scribe Plugin System
//!
//! Plugins are described by a [`PluginDescriptor`] (identity, optional name,
//! required plugins and a factory) and loaded into a [`PluginCollection`].
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`descriptor`]**: [`PluginId`], [`PluginDescriptor`], [`PluginRef`] and
//!   the constructed [`PluginInstance`].
//! - **[`collection`]**: depth-first resolution of the load plan and the
//!   dual-keyed (identity and name) instance store.
//! - **[`traits`]**: the [`Plugin`] lifecycle trait and [`PluginConstructor`]
//!   for plugin types that describe themselves.
//! - **[`error`]**: [`PluginSystemError`], configuration errors found while
//!   resolving.
pub mod collection;
pub mod descriptor;
pub mod error;
pub mod traits;

pub use collection::PluginCollection;
pub use descriptor::{PluginDescriptor, PluginId, PluginInstance, PluginRef};
pub use error::PluginSystemError;
pub use traits::{Plugin, PluginConstructor};
