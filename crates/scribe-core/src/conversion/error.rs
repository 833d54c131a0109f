//! # Scribe Conversion Errors
//!
//! Structural errors abort a whole conversion pass. Content that merely does
//! not fit the schema is not an error; converters drop it and log a warning.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Different set of slots in the template and in the model. Template: {template:?}, model: {model:?}")]
    SlotMismatch { template: Vec<String>, model: Vec<String> },

    #[error("Model element '{element}' must contain only slots, found '{child}'")]
    UnexpectedSlotContent { element: String, child: String },

    #[error("datacontroller-init-non-empty-root: root '{root}' already contains data")]
    NonEmptyRoot { root: String },

    #[error("Root '{root}' does not exist")]
    RootNotFound { root: String },

    #[error("Unknown converter priority '{name}'")]
    UnknownPriority { name: String },

    #[error("Invalid input data: {source}")]
    InvalidData {
        #[from]
        source: serde_json::Error,
    },

    #[error("Converter for '{event}' failed: {message}")]
    ConverterFailed { event: String, message: String },
}

pub type ConversionResult<T> = std::result::Result<T, ConversionError>;
