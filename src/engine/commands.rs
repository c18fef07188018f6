//! Built-in control phrases
//!
//! Matched case-insensitively against the whole input; no arguments, no
//! prefixes. Anything else is ordinary conversation.

use crate::errors::Result;
use crate::memory::export::LogExporter;
use crate::memory::store::MemoryStore;

/// Control commands intercepted before normal resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShowMemory,
    ClearMemory,
    ExportLog,
    Help,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::ShowMemory,
        Command::ClearMemory,
        Command::ExportLog,
        Command::Help,
    ];

    /// The literal phrase that triggers the command
    pub fn phrase(&self) -> &'static str {
        match self {
            Command::ShowMemory => "show memory",
            Command::ClearMemory => "clear memory",
            Command::ExportLog => "export log",
            Command::Help => "help",
        }
    }

    /// Parse a whole input line
    ///
    /// Complexity: O(1) string matching
    pub fn parse(input: &str) -> Option<Command> {
        let normalized = input.trim().to_lowercase();
        Command::ALL
            .into_iter()
            .find(|command| command.phrase() == normalized)
    }
}

/// Executes commands against the store
#[derive(Debug, Clone)]
pub struct CommandHandler {
    exporter: LogExporter,
    exit_keyword: String,
}

impl CommandHandler {
    pub fn new(exporter: LogExporter, exit_keyword: impl Into<String>) -> Self {
        CommandHandler {
            exporter,
            exit_keyword: exit_keyword.into(),
        }
    }

    /// Execute a command and return the reply text
    pub fn execute(&self, command: Command, store: &mut MemoryStore) -> Result<String> {
        tracing::info!(command = command.phrase(), "command dispatched");
        match command {
            Command::ShowMemory => Ok(show_memory(store)),
            Command::ClearMemory => {
                store.reset_profile();
                Ok("Memory cleared. I've forgotten your name, mood and facts.".to_string())
            }
            Command::ExportLog => self.exporter.export(store),
            Command::Help => Ok(self.help(store)),
        }
    }

    /// Help text built from the configured command descriptions
    fn help(&self, store: &MemoryStore) -> String {
        let mut lines = vec!["Available commands:".to_string()];

        let width = store
            .commands
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0);
        for (name, description) in &store.commands {
            lines.push(format!("  {:<width$}  {}", name, description, width = width));
        }

        lines.push("Teach me with: learn: question = answer".to_string());
        lines.push(format!("Type '{}' to quit.", self.exit_keyword));
        lines.join("\n")
    }
}

/// Dump of name, mood and facts
fn show_memory(store: &MemoryStore) -> String {
    let mut lines = vec![
        format!("Name: {}", store.name().unwrap_or("(unknown)")),
        format!("Mood: {}", store.mood().unwrap_or("(unknown)")),
    ];

    if store.facts.is_empty() {
        lines.push("Facts: none".to_string());
    } else {
        lines.push("Facts:".to_string());
        for (key, value) in &store.facts {
            lines.push(format!("  - {}: {}", key, value));
        }
    }

    lines.join("\n")
}
