//! Console loop
//!
//! Reads one line at a time, hands it to the [`ChatSession`] and prints the
//! result. A turn runs to completion before the next line is read.

pub mod display;
pub mod input;
pub mod session;

use anyhow::Result;

pub use crate::repl::display::DisplayManager;
pub use crate::repl::input::{LineReader, ReadOutcome};
pub use crate::repl::session::{ChatSession, TurnReport};

/// Ties the line reader, the per-turn session and the display together
pub struct ReplSession {
    reader: LineReader,
    display: DisplayManager,
    chat: ChatSession,
}

impl ReplSession {
    pub fn new(chat: ChatSession, reader: LineReader, display: DisplayManager) -> Self {
        ReplSession {
            reader,
            display,
            chat,
        }
    }

    pub fn show_welcome(&self, version: &str) {
        self.display
            .show_banner(version, &self.chat.store_location(), self.chat.exit_keyword());
    }

    /// Run one line through the session and print the outcome
    ///
    /// Returns false once the user has asked to leave.
    pub fn handle_input(&mut self, input: &str) -> bool {
        if input.trim().is_empty() {
            return true;
        }

        let report = self.chat.handle_turn(input);
        match &report {
            TurnReport::Failed { message, .. } => self.display.show_error(message),
            other => self.display.show_reply(other.text()),
        }
        !report.is_exit()
    }

    /// Loop until the exit keyword or end of input, then write history
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.reader.read()? {
                ReadOutcome::Line(line) => {
                    if !self.handle_input(&line) {
                        break;
                    }
                }
                ReadOutcome::Interrupted => self
                    .display
                    .show_info(&format!("Type '{}' to quit.", self.chat.exit_keyword())),
                ReadOutcome::Closed => break,
            }
        }

        if let Err(e) = self.reader.persist() {
            self.display.show_warning(&format!("{:#}", e));
        }
        Ok(())
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }
}
