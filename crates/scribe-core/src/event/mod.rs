pub mod dispatcher;
pub mod error;
pub mod types;

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

/// Type for event handler identifiers
pub type EventId = u64;

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was processed and propagation should continue
    Continue,
    /// Event was processed and propagation should stop
    Stop,
}

/// Core event trait
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// Get the name of this event
    fn name(&self) -> &'static str;

    /// Clone this event
    fn clone_event(&self) -> Box<dyn Event>;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Asynchronous event handler trait
#[async_trait]
pub trait AsyncEventHandler: Send + Sync {
    async fn handle(&self, event: &dyn Event) -> EventResult;
}

/// Event handler type alias
pub type EventHandler = Box<dyn AsyncEventHandler>;

pub use dispatcher::{
    create_dispatcher, sync_event_handler, sync_typed_handler, EventDispatcher,
    SharedEventDispatcher,
};
pub use error::EventSystemError;
pub use types::EditorEvent;
