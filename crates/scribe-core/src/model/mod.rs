//! # Document Model
//!
//! The abstract document: a [`Tree`](crate::tree::Tree) of [`ModelItem`]s
//! with named roots, a [`Schema`] answering structural questions, and a
//! [`ModelWriter`] through which every mutation goes so changes made to
//! attached roots can be converted to the editing view afterwards.

pub mod document;
pub mod node;
pub mod schema;
pub mod writer;

pub use document::Model;
pub use node::{Attributes, ModelItem, ModelTree};
pub use schema::{Schema, SchemaCheck, SchemaItemDefinition};
pub use writer::{Change, ModelWriter, SplitOutcome};

#[cfg(test)]
mod tests;
