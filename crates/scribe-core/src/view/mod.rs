//! # View Trees
//!
//! The renderable side of conversion: elements carry string attributes,
//! classes and styles the way markup does. The editing controller keeps a
//! long-lived view; the data pipeline builds short-lived ones.

pub mod element;
pub mod writer;

pub use element::{parse_styles, ElementKind, ViewElement, ViewItem, ViewTree};
pub use writer::ViewWriter;
