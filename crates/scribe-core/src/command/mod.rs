//! # Commands
//!
//! Named editor actions registered by plugins and run through
//! [`Editor::execute`](crate::editor::Editor::execute).
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error};
use serde_json::Value;

use crate::editor::error::{Error, Result};
use crate::editor::Editor;

pub trait Command: Send + Sync {
    fn execute(&self, editor: &Editor, args: &[Value]) -> Result<()>;

    fn is_enabled(&self, _editor: &Editor) -> bool {
        true
    }

    fn destroy(&self) {}
}

/// Commands by name.
#[derive(Default)]
pub struct CommandCollection {
    commands: RwLock<BTreeMap<String, Arc<dyn Command>>>,
}

impl std::fmt::Debug for CommandCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandCollection").field("names", &self.names()).finish()
    }
}

impl CommandCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command`, replacing any command of the same name.
    pub fn add<C: Command + 'static>(&self, name: &str, command: C) {
        debug!("Registering command '{}'", name);
        self.commands
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::new(command));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.commands.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect()
    }

    /// Runs a command. A disabled command does nothing.
    pub fn execute(&self, editor: &Editor, name: &str, args: &[Value]) -> Result<()> {
        let Some(command) = self.get(name) else {
            let err = Error::CommandNotFound { name: name.to_string() };
            error!("{}", err);
            return Err(err);
        };
        if !command.is_enabled(editor) {
            debug!("Command '{}' is disabled, skipping", name);
            return Ok(());
        }
        command.execute(editor, args)
    }

    pub fn destroy(&self) {
        let commands = std::mem::take(&mut *self.commands.write().unwrap_or_else(PoisonError::into_inner));
        for command in commands.values() {
            command.destroy();
        }
    }
}
