//! Line editing for the console loop (rustyline)

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// What came back from one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A trimmed line, possibly empty
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D or closed stdin
    Closed,
}

/// Prompting line reader with optional on-disk history
pub struct LineReader {
    editor: DefaultEditor,
    prompt: String,
    history_file: Option<PathBuf>,
}

impl LineReader {
    pub fn new(user_label: &str) -> Result<Self> {
        Ok(LineReader {
            editor: DefaultEditor::new().context("Failed to initialise line editor")?,
            prompt: format!("{}: ", user_label),
            history_file: None,
        })
    }

    /// Reader that loads `path` now and writes it back on [`LineReader::persist`]
    ///
    /// A missing or unreadable history file is not fatal.
    pub fn with_history(user_label: &str, path: PathBuf) -> Result<Self> {
        let mut reader = Self::new(user_label)?;
        if path.is_file() {
            if let Err(e) = reader.editor.load_history(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not load input history");
            }
        }
        reader.history_file = Some(path);
        Ok(reader)
    }

    pub fn read(&mut self) -> Result<ReadOutcome> {
        match self.editor.readline(&self.prompt) {
            Ok(raw) => {
                let line = raw.trim().to_string();
                self.remember(&line);
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Closed),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }

    /// Non-empty lines go to history; rustyline drops consecutive duplicates
    fn remember(&mut self, line: &str) {
        if !line.is_empty() {
            let _ = self.editor.add_history_entry(line);
        }
    }

    pub fn persist(&mut self) -> Result<()> {
        let Some(path) = self.history_file.as_ref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        self.editor
            .save_history(path)
            .with_context(|| format!("Failed to write history to {}", path.display()))
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}
