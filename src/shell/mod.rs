//! Command table
//!
//! The interactive loop looks commands up here. A table is built once, from
//! a JSON document (`loader`) or from the built-in fallback set (`builtin`),
//! and is read-only afterwards.

mod builtin;
mod loader;

pub use builtin::fallback_table;
pub use loader::{load_or_fallback, CommandDocument, CommandTableError, LoadOutcome, DEFAULT_SITE};

use std::collections::HashMap;

/// Built-in actions a command can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAction {
    Clear,
    Exit,
    Help,
    ToggleSound,
    ToggleVisualEffect,
}

impl BuiltinAction {
    /// Parse the action tag used in command documents.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "clear" => Some(Self::Clear),
            "exit" => Some(Self::Exit),
            "help" => Some(Self::Help),
            "sound" => Some(Self::ToggleSound),
            "matrix" => Some(Self::ToggleVisualEffect),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Exit => "exit",
            Self::Help => "help",
            Self::ToggleSound => "sound",
            Self::ToggleVisualEffect => "matrix",
        }
    }
}

/// What running a command does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Reveal a fixed text
    Static(String),
    Builtin(BuiltinAction),
    /// Show `message`, then open `url` after a short delay
    Redirect { message: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub kind: CommandKind,
}

impl Command {
    pub fn new(name: &str, description: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            description: description.into(),
            kind,
        }
    }
}

/// Commands by lower-cased name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. A later command with the same name replaces the
    /// earlier one but keeps its position.
    pub fn insert(&mut self, command: Command) {
        match self.index.get(&command.name) {
            Some(&pos) => self.commands[pos] = command,
            None => {
                self.index.insert(command.name.clone(), self.commands.len());
                self.commands.push(command);
            }
        }
    }

    /// Look up an already normalized (trimmed, lower-cased) name.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|&pos| &self.commands[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The listing printed by the `help` action.
    pub fn help_text(&self) -> String {
        let mut text = String::from("Available commands:\n\n");
        for command in &self.commands {
            text.push_str(&format!("{} - {}\n", command.name, command.description));
        }
        text
    }
}

impl FromIterator<Command> for CommandTable {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut table = Self::new();
        for command in iter {
            table.insert(command);
        }
        table
    }
}
