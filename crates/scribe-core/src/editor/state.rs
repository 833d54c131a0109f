use std::fmt;

/// Lifecycle states of an editor, in the order it moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorState {
    Constructed,
    PluginsInitializing,
    PluginsReady,
    DataReady,
    Ready,
    Destroyed,
}

impl EditorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorState::Constructed => "constructed",
            EditorState::PluginsInitializing => "pluginsInitializing",
            EditorState::PluginsReady => "pluginsReady",
            EditorState::DataReady => "dataReady",
            EditorState::Ready => "ready",
            EditorState::Destroyed => "destroyed",
        }
    }

    /// Forward steps only, one at a time. `Destroyed` is reachable from
    /// every other state and left by none.
    pub fn can_transition_to(&self, next: EditorState) -> bool {
        use EditorState::*;
        matches!(
            (self, next),
            (Constructed, PluginsInitializing)
                | (PluginsInitializing, PluginsReady)
                | (PluginsReady, DataReady)
                | (DataReady, Ready)
                | (Constructed | PluginsInitializing | PluginsReady | DataReady | Ready, Destroyed)
        )
    }

    pub fn is_destroyed(&self) -> bool {
        *self == EditorState::Destroyed
    }
}

impl fmt::Display for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
