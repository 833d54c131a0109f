use std::any::Any;

use crate::editor::state::EditorState;
use crate::event::Event;

/// Lifecycle events fired by the editor, one per state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    PluginsInitializing,
    PluginsReady,
    DataReady,
    Ready,
    Destroy,
}

impl EditorEvent {
    /// Event names in the order an editor fires them during `create` and `destroy`.
    pub const LIFECYCLE: [&'static str; 5] =
        ["pluginsInitializing", "pluginsReady", "dataReady", "ready", "destroy"];

    /// The event fired when the editor enters `state`.
    pub fn for_state(state: EditorState) -> Option<Self> {
        match state {
            EditorState::Constructed => None,
            EditorState::PluginsInitializing => Some(EditorEvent::PluginsInitializing),
            EditorState::PluginsReady => Some(EditorEvent::PluginsReady),
            EditorState::DataReady => Some(EditorEvent::DataReady),
            EditorState::Ready => Some(EditorEvent::Ready),
            EditorState::Destroyed => Some(EditorEvent::Destroy),
        }
    }
}

impl Event for EditorEvent {
    fn name(&self) -> &'static str {
        match self {
            EditorEvent::PluginsInitializing => "pluginsInitializing",
            EditorEvent::PluginsReady => "pluginsReady",
            EditorEvent::DataReady => "dataReady",
            EditorEvent::Ready => "ready",
            EditorEvent::Destroy => "destroy",
        }
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct TestEvent {
    name: &'static str,
}

#[cfg(test)]
impl TestEvent {
    pub fn new(name: &'static str) -> Self {
        TestEvent { name }
    }
}

#[cfg(test)]
impl Event for TestEvent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
