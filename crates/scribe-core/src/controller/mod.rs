//! # Controllers
//!
//! The data controller turns external data into model content and back;
//! the editing controller keeps the editing view in sync with the model.

pub mod data;
pub mod editing;
pub mod processor;

pub use data::DataController;
pub use editing::EditingController;
pub use processor::{DataProcessor, JsonDataProcessor, JsonNode};

#[cfg(test)]
mod tests;
