//! Display manager for the console
//!
//! Color-coded banner, replies and status lines.

use colored::*;

/// Display manager for console output
pub struct DisplayManager {
    bot_label: String,
}

impl DisplayManager {
    pub fn new(bot_label: impl Into<String>) -> Self {
        DisplayManager {
            bot_label: bot_label.into(),
        }
    }

    /// Turn ANSI colors on or off for the whole process
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, store: &str, exit_keyword: &str) {
        let width = 64;
        let rule = "=".repeat(width);
        let title = format!("  {} {} - your terminal companion", self.bot_label, version);
        let info = format!("  Memory: {}", store);

        println!("\n{}", rule.cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "Say hello (or {} for commands, {} to quit)\n",
            "help".green(),
            exit_keyword.green()
        );
    }

    /// Format a reply line
    pub fn reply_line(&self, text: &str) -> String {
        format!("{} {}", format!("{}:", self.bot_label).cyan().bold(), text)
    }

    /// Display an assistant reply
    pub fn show_reply(&self, text: &str) {
        println!("{}", self.reply_line(text));
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{}", info.dimmed());
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new("A.v.A")
    }
}
