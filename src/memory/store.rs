//! The memory store: everything A.v.A knows about the user and the conversation
//!
//! A single mutable record passed by `&mut` into every component of a turn.
//! Only [`crate::memory::persistence`] ever touches the disk.

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::cli::config::DictionaryConfig;
use crate::errors::Result;
use crate::memory::context::ContextLedger;

/// A question/answer pair usable for exact or alternative-phrase lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedEntry {
    /// Lookup key, compared case-insensitively
    pub user: String,
    /// Reply template
    pub ava: String,
    /// Extra trigger phrases
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    /// Set for turns logged by the resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Reply as it was displayed, when that differs from `ava`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shown: Option<String>,
}

impl LearnedEntry {
    pub fn new(user: impl Into<String>, ava: impl Into<String>) -> Self {
        LearnedEntry {
            user: user.into(),
            ava: ava.into(),
            alternatives: Vec::new(),
            timestamp: None,
            shown: None,
        }
    }

    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives = alternatives.into_iter().map(Into::into).collect();
        self
    }

    /// Logged by the resolver rather than taught with `learn:`
    pub fn is_logged(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Text the user actually saw for this entry
    pub fn displayed(&self) -> &str {
        self.shown.as_deref().unwrap_or(&self.ava)
    }

    /// Does `input` trigger this entry?
    ///
    /// `input` must already be lowercase.
    pub fn matches(&self, input: &str, use_alternatives: bool) -> bool {
        if self.user.to_lowercase() == input {
            return true;
        }
        use_alternatives
            && self
                .alternatives
                .iter()
                .any(|alt| alt.to_lowercase() == input)
    }
}

impl From<&Turn> for LearnedEntry {
    fn from(turn: &Turn) -> Self {
        LearnedEntry {
            user: turn.user.clone(),
            ava: turn.ava.clone(),
            alternatives: Vec::new(),
            timestamp: Some(turn.timestamp),
            shown: None,
        }
    }
}

/// One complete user-input/agent-reply cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub ava: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, ava: impl Into<String>) -> Self {
        Turn {
            timestamp: Utc::now(),
            user: user.into(),
            ava: ava.into(),
        }
    }
}

/// Persistent memory of the assistant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    /// Last detected user name, capitalized
    pub name: Option<String>,
    /// Last detected mood label, always a key of `moods`
    pub mood: Option<String>,
    pub facts: IndexMap<String, String>,
    /// Learned pairs and logged turns, oldest first
    pub conversation: Vec<LearnedEntry>,
    /// Secondary pool consulted after `conversation`
    pub memory: Vec<LearnedEntry>,
    pub categories: IndexMap<String, Vec<String>>,
    pub context: ContextLedger,
    pub commands: IndexMap<String, String>,
    pub spelling_corrections: IndexMap<String, String>,
    pub moods: IndexMap<String, IndexSet<String>>,
}

impl MemoryStore {
    /// Empty store seeded with the given dictionaries
    pub fn seeded(dictionaries: &DictionaryConfig) -> Self {
        let mut store = MemoryStore::default();
        store.apply_dictionaries(dictionaries);
        store
    }

    /// Merge configured dictionaries into the store
    ///
    /// Configured entries insert or overwrite; entries only present in the
    /// store are kept.
    pub fn apply_dictionaries(&mut self, dictionaries: &DictionaryConfig) {
        for (from, to) in &dictionaries.spelling_corrections {
            self.spelling_corrections
                .insert(from.to_lowercase(), to.clone());
        }
        for (label, keywords) in &dictionaries.moods {
            let set = keywords.iter().map(|k| k.to_lowercase()).collect();
            self.moods.insert(label.clone(), set);
        }
        for (category, templates) in &dictionaries.categories {
            self.categories.insert(category.clone(), templates.clone());
        }
        for (command, description) in &dictionaries.commands {
            self.commands.insert(command.clone(), description.clone());
        }
    }

    /// Display name, if one has been detected
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref().filter(|m| !m.is_empty())
    }

    /// Forget name, mood and facts; history stays intact
    pub fn reset_profile(&mut self) {
        self.name = None;
        self.mood = None;
        self.facts.clear();
    }

    /// Tagged value tree used for dotted-path template lookups
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Record a finished turn in the history and the rolling context
    pub fn log_turn(&mut self, turn: Turn) {
        let answer = turn.ava.clone();
        self.log_answered_turn(turn, answer);
    }

    /// Like [`MemoryStore::log_turn`], but the history entry answers later
    /// lookups with `answer` (the reply before the name prefix) and keeps the
    /// displayed text only for the log
    pub fn log_answered_turn(&mut self, turn: Turn, answer: impl Into<String>) {
        let mut entry = LearnedEntry::from(&turn);
        let answer = answer.into();
        if answer != turn.ava {
            entry.shown = Some(std::mem::replace(&mut entry.ava, answer));
        }
        self.conversation.push(entry);
        self.context.push(turn);
    }

    /// Template pool for `category`, empty if unknown
    pub fn category(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
