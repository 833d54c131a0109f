use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::editor::error::Result;
use crate::event::{AsyncEventHandler, Event, EventHandler, EventId, EventResult, EventSystemError};

// An owned future resolving to the handler's verdict
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = EventResult> + Send + 'a>>;

pub type NamedHandlerFn = Box<dyn Fn(&dyn Event) -> BoxFuture<'_> + Send + Sync>;

//--------------------------------------------------
// EventDispatcher (wrapped by SharedEventDispatcher)
//--------------------------------------------------

/// Dispatches editor events to handlers registered by name or by event type.
///
/// Handlers for a name run in registration order, then handlers registered
/// for the concrete event type. A handler returning [`EventResult::Stop`]
/// ends the dispatch.
pub struct EventDispatcher {
    handlers: HashMap<&'static str, Vec<(EventId, EventHandler)>>,
    type_handlers: HashMap<TypeId, Vec<(EventId, EventHandler)>>,
    next_handler_id: EventId,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_handler_count: usize = self.handlers.values().map(|v| v.len()).sum();
        let type_handler_count: usize = self.type_handlers.values().map(|v| v.len()).sum();
        f.debug_struct("EventDispatcher")
            .field("name_handlers_count", &name_handler_count)
            .field("type_handlers_count", &type_handler_count)
            .field("next_handler_id", &self.next_handler_id)
            .finish()
    }
}

struct SimpleHandler {
    handler: NamedHandlerFn,
}

#[async_trait]
impl AsyncEventHandler for SimpleHandler {
    async fn handle(&self, event: &dyn Event) -> EventResult {
        (self.handler)(event).await
    }
}

struct TypedEventHandler<E: Event + 'static> {
    handler: Box<dyn Fn(&E) -> BoxFuture<'_> + Send + Sync>,
}

#[async_trait]
impl<E: Event + 'static> AsyncEventHandler for TypedEventHandler<E> {
    async fn handle(&self, event: &dyn Event) -> EventResult {
        match event.as_any().downcast_ref::<E>() {
            Some(e) => (self.handler)(e).await,
            None => EventResult::Continue,
        }
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            type_handlers: HashMap::new(),
            next_handler_id: 1,
        }
    }

    pub fn register_handler(&mut self, event_name: &'static str, handler: NamedHandlerFn) -> EventId {
        let id = self.next_id();
        self.handlers
            .entry(event_name)
            .or_default()
            .push((id, Box::new(SimpleHandler { handler })));
        id
    }

    pub fn register_type_handler<E: Event + 'static>(
        &mut self,
        handler: Box<dyn Fn(&E) -> BoxFuture<'_> + Send + Sync>,
    ) -> EventId {
        let id = self.next_id();
        self.type_handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push((id, Box::new(TypedEventHandler { handler })));
        id
    }

    pub fn unregister_handler(&mut self, id: EventId) -> std::result::Result<(), EventSystemError> {
        let mut found = false;
        for handlers in self.handlers.values_mut().chain(self.type_handlers.values_mut()) {
            let len_before = handlers.len();
            handlers.retain(|(h_id, _)| *h_id != id);
            found |= handlers.len() < len_before;
        }
        if found {
            Ok(())
        } else {
            Err(EventSystemError::HandlerNotFound { id })
        }
    }

    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers.get(event_name).map_or(0, Vec::len)
    }

    pub async fn dispatch_internal(&self, event: &dyn Event) -> EventResult {
        if let Some(handlers) = self.handlers.get(event.name()) {
            for (_, handler) in handlers {
                if handler.handle(event).await == EventResult::Stop {
                    return EventResult::Stop;
                }
            }
        }
        if let Some(handlers) = self.type_handlers.get(&event.as_any().type_id()) {
            for (_, handler) in handlers {
                if handler.handle(event).await == EventResult::Stop {
                    return EventResult::Stop;
                }
            }
        }
        EventResult::Continue
    }

    fn next_id(&mut self) -> EventId {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        id
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// SharedEventDispatcher (public API)
//--------------------------------------------------

/// Shared event dispatcher behind a Tokio mutex.
///
/// Handlers must not register or unregister handlers on the same dispatcher
/// while being dispatched; the dispatch holds the lock.
#[derive(Clone)]
pub struct SharedEventDispatcher {
    dispatcher: Arc<Mutex<EventDispatcher>>,
}

impl fmt::Debug for SharedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventDispatcher").finish_non_exhaustive()
    }
}

impl SharedEventDispatcher {
    pub fn new() -> Self {
        Self { dispatcher: Arc::new(Mutex::new(EventDispatcher::new())) }
    }

    pub async fn dispatch(&self, event: &dyn Event) -> Result<EventResult> {
        let dispatcher = self.dispatcher.lock().await;
        Ok(dispatcher.dispatch_internal(event).await)
    }

    pub async fn register_handler(&self, event_name: &'static str, handler: NamedHandlerFn) -> Result<EventId> {
        let mut dispatcher = self.dispatcher.lock().await;
        Ok(dispatcher.register_handler(event_name, handler))
    }

    pub async fn register_type_handler<E: Event + 'static>(
        &self,
        handler: Box<dyn Fn(&E) -> BoxFuture<'_> + Send + Sync>,
    ) -> Result<EventId> {
        let mut dispatcher = self.dispatcher.lock().await;
        Ok(dispatcher.register_type_handler::<E>(handler))
    }

    pub async fn unregister_handler(&self, id: EventId) -> Result<()> {
        let mut dispatcher = self.dispatcher.lock().await;
        dispatcher.unregister_handler(id)?;
        Ok(())
    }

    pub async fn handler_count(&self, event_name: &str) -> usize {
        self.dispatcher.lock().await.handler_count(event_name)
    }
}

impl Default for SharedEventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// Helper functions
//--------------------------------------------------

/// Create a new event dispatcher instance
pub fn create_dispatcher() -> SharedEventDispatcher {
    SharedEventDispatcher::new()
}

/// Wraps a synchronous closure as an async name handler
pub fn sync_event_handler<F>(f: F) -> NamedHandlerFn
where
    F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static,
{
    Box::new(move |event| {
        let result = f(event);
        Box::pin(async move { result })
    })
}

/// Wraps a synchronous closure as an async typed handler
pub fn sync_typed_handler<E, F>(f: F) -> Box<dyn Fn(&E) -> BoxFuture<'_> + Send + Sync>
where
    E: Event + 'static,
    F: Fn(&E) -> EventResult + Send + Sync + 'static,
{
    Box::new(move |event| {
        let result = f(event);
        Box::pin(async move { result })
    })
}
