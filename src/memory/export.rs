//! Conversation log export
//!
//! Each conversation entry becomes two lines plus a blank separator:
//!
//! ```text
//! 2026-10-18 09:30:00 | You: hello
//! 2026-10-18 09:30:00 | A.v.A: hi!
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::memory::store::{LearnedEntry, MemoryStore};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Written in place of a timestamp for entries taught with `learn:`
const UNTIMED: &str = "----------";

/// Writes the conversation history to a text file, replacing it
#[derive(Debug, Clone)]
pub struct LogExporter {
    target: PathBuf,
    user_label: String,
    bot_label: String,
}

impl LogExporter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        LogExporter {
            target: target.into(),
            user_label: "You".to_string(),
            bot_label: "A.v.A".to_string(),
        }
    }

    pub fn with_labels(mut self, user_label: &str, bot_label: &str) -> Self {
        self.user_label = user_label.to_string();
        self.bot_label = bot_label.to_string();
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Render the full log text
    pub fn render(&self, store: &MemoryStore) -> String {
        store
            .conversation
            .iter()
            .map(|entry| self.render_entry(entry))
            .collect()
    }

    fn render_entry(&self, entry: &LearnedEntry) -> String {
        let stamp = entry
            .timestamp
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| UNTIMED.to_string());
        format!(
            "{stamp} | {}: {}\n{stamp} | {}: {}\n\n",
            self.user_label,
            entry.user,
            self.bot_label,
            entry.displayed()
        )
    }

    /// Write the log and return a confirmation naming the target
    pub fn export(&self, store: &MemoryStore) -> Result<String> {
        if let Some(parent) = self.target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.target, self.render(store))?;

        tracing::info!(
            target_file = %self.target.display(),
            entries = store.conversation.len(),
            "conversation log exported"
        );
        Ok(format!(
            "Conversation log exported to {}.",
            self.target.display()
        ))
    }
}
