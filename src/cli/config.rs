//! Configuration management for A.v.A
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.ava/config.toml

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{AvaError, Result};

/// Complete configuration for A.v.A
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub paths: PathsConfig,
    pub dictionaries: DictionaryConfig,
}

/// Conversation behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub exit_keyword: String,
    pub context_size: usize,
    pub fallback_category: String,
    pub fallback_probability: f64,
    pub enable_alternatives: bool,
    pub enable_context_fallback: bool,
    pub user_label: String,
    pub bot_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
    pub store_file: String,
    pub log_file: String,
    pub error_log: String,
    pub history_file: String,
}

/// Seed tables merged into the memory store at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub spelling_corrections: IndexMap<String, String>,
    pub moods: IndexMap<String, Vec<String>>,
    pub categories: IndexMap<String, Vec<String>>,
    pub commands: IndexMap<String, String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            exit_keyword: "exit".to_string(),
            context_size: 5,
            fallback_category: "motivation".to_string(),
            fallback_probability: 0.5,
            enable_alternatives: true,
            enable_context_fallback: true,
            user_label: "You".to_string(),
            bot_label: "A.v.A".to_string(),
            rng_seed: None,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.ava".to_string(),
            store_file: "databank.json".to_string(),
            log_file: "conversation_log.txt".to_string(),
            error_log: "error_log.txt".to_string(),
            history_file: "history.txt".to_string(),
        }
    }
}

fn table<const N: usize>(pairs: [(&str, &str); N]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        let spelling_corrections = table([
            ("helo", "hello"),
            ("whats", "what is"),
            ("dont", "don't"),
            ("im", "i'm"),
            ("cant", "can't"),
            ("u", "you"),
        ]);

        let mut moods = IndexMap::new();
        moods.insert(
            "happy".to_string(),
            words(&["happy", "great", "good", "fantastic", "fine"]),
        );
        moods.insert(
            "sad".to_string(),
            words(&["sad", "bad", "terrible", "upset", "depressed"]),
        );
        moods.insert(
            "angry".to_string(),
            words(&["angry", "mad", "furious", "pissed"]),
        );

        let mut categories = IndexMap::new();
        categories.insert(
            "motivation".to_string(),
            words(&[
                "Keep going, you're doing better than you think.",
                "Small steps still move you forward.",
                "Feeling {mood}? Whatever it is, you've handled hard days before.",
                "Every day is a fresh start, {name}.",
            ]),
        );

        let commands = table([
            ("show memory", "Show what I remember about you"),
            ("clear memory", "Forget your name, mood and facts (history is kept)"),
            ("export log", "Write the conversation log to a file"),
            ("help", "List the available commands"),
        ]);

        Self {
            spelling_corrections,
            moods,
            categories,
            commands,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AvaError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AvaError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_path();
        if config_path.exists() {
            return Self::load_from_file(&config_path);
        }

        Ok(Config::default())
    }

    /// ~/.ava/config.toml
    pub fn default_path() -> PathBuf {
        Self::expand_path("~/.ava/config.toml")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.agent.context_size == 0 {
            return Err(AvaError::Config(
                "context_size must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.agent.fallback_probability) {
            return Err(AvaError::Config(
                "fallback_probability must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.agent.exit_keyword.trim().is_empty() {
            return Err(AvaError::Config("exit_keyword must not be empty".to_string()));
        }

        if self.agent.fallback_category.trim().is_empty() {
            return Err(AvaError::Config(
                "fallback_category must not be empty".to_string(),
            ));
        }

        for (label, keywords) in &self.dictionaries.moods {
            if keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(AvaError::Config(format!(
                    "mood '{}' has an empty keyword",
                    label
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AvaError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AvaError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AvaError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }

    fn state_file(&self, name: &str) -> PathBuf {
        let path = Self::expand_path(name);
        if path.is_absolute() {
            path
        } else {
            self.state_dir().join(path)
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.state_file(&self.paths.store_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_file(&self.paths.log_file)
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.state_file(&self.paths.error_log)
    }

    pub fn history_path(&self) -> PathBuf {
        self.state_file(&self.paths.history_file)
    }
}
