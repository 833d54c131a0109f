//! # Conversion
//!
//! Two-way transformation between the model and view trees, driven by
//! prioritized converters registered per event name. Converters cooperate
//! through a per-pass [`Consumable`]: the first one to consume an
//! `(item, aspect)` pair owns it, and later converters for the same event
//! see it as unavailable.
//!
//! Upcast (view -> model) lives in [`upcast`], downcast (model -> view) in
//! [`downcast`]. [`Conversion`] groups the editor's three dispatchers.

pub mod consumable;
pub mod downcast;
pub mod downcast_helpers;
pub mod error;
pub mod groups;
pub mod mapper;
pub mod priority;
pub mod registry;
pub mod slots;
pub mod upcast;
pub mod upcast_helpers;

pub use consumable::{Consumable, ViewMatch};
pub use downcast::{DowncastConversionApi, DowncastData, DowncastDispatcher};
pub use error::{ConversionError, ConversionResult};
pub use groups::{Conversion, DowncastGroup};
pub use mapper::Mapper;
pub use priority::Priority;
pub use registry::{ConverterId, ConverterRegistry};
pub use upcast::{ConvertedChildren, ConvertedItem, SplitResult, UpcastConversionApi, UpcastData, UpcastDispatcher};

#[cfg(test)]
mod tests;
