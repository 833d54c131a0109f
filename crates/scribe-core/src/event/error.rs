//! # Scribe Event System Errors
//!
//! Errors raised while managing editor event handlers.
use crate::event::EventId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Failed to unregister event handler with ID {id}: no such handler")]
    HandlerNotFound { id: EventId },

    #[error("Event dispatch failed for event '{event_name}': {reason}")]
    DispatchError { event_name: String, reason: String },
}
