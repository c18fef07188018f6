//! Name, mood and fact extractors
//!
//! Each extractor reads the (spell-corrected) input and, on a match, writes the
//! update into the store and returns what it found. They are independent of
//! one another and run on every ordinary turn.

use regex::Regex;

use crate::errors::{AvaError, Result};
use crate::memory::store::MemoryStore;

/// Compiled extraction patterns
#[derive(Debug, Clone)]
pub struct Extractors {
    name: Regex,
    fact: Regex,
}

impl Extractors {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| AvaError::Resolution(format!("extractor pattern: {}", e)))
        };
        Ok(Self {
            name: compile(r"(?i)\b(?:my name is|i am|i'm)\s+([a-z]+)\b")?,
            fact: compile(r"(?i)\bmy favou?rite\s+(\w+)\s+is\s+(\w+)")?,
        })
    }

    /// Run all three extractors
    pub fn apply(&self, text: &str, store: &mut MemoryStore) -> Extracted {
        Extracted {
            name: self.detect_name(text, store),
            mood: detect_mood(text, store),
            fact: self.remember_fact(text, store),
        }
    }

    /// `my name is <word>` / `i am <word>` / `i'm <word>`
    pub fn detect_name(&self, text: &str, store: &mut MemoryStore) -> Option<String> {
        let caps = self.name.captures(text)?;
        let name = capitalize(&caps[1]);
        store.name = Some(name.clone());
        Some(name)
    }

    /// `my favorite <key> is <value>`; the key is stored lowercase
    pub fn remember_fact(&self, text: &str, store: &mut MemoryStore) -> Option<(String, String)> {
        let caps = self.fact.captures(text)?;
        let key = caps[1].to_lowercase();
        let value = caps[2].to_string();
        store.facts.insert(key.clone(), value.clone());
        Some((key, value))
    }
}

/// What one pass of the extractors changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub name: Option<String>,
    pub mood: Option<String>,
    pub fact: Option<(String, String)>,
}

impl Extracted {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.mood.is_none() && self.fact.is_none()
    }
}

/// First mood label (in table order) with a keyword contained in `text`
pub fn detect_mood(text: &str, store: &mut MemoryStore) -> Option<String> {
    let lowered = text.to_lowercase();
    let label = store
        .moods
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
        })
        .map(|(label, _)| label.clone())?;
    store.mood = Some(label.clone());
    Some(label)
}

/// Upper-case the first letter, lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::DictionaryConfig;

    fn extractors() -> Extractors {
        Extractors::new().unwrap()
    }

    fn seeded() -> MemoryStore {
        MemoryStore::seeded(&DictionaryConfig::default())
    }

    #[test]
    fn test_detect_name_variants() {
        let ex = extractors();
        for text in ["my name is alice", "I am ALICE", "hey, i'm alice today"] {
            let mut store = MemoryStore::default();
            assert_eq!(ex.detect_name(text, &mut store).as_deref(), Some("Alice"), "{text}");
            assert_eq!(store.name(), Some("Alice"));
        }
    }

    #[test]
    fn test_detect_name_is_idempotent() {
        let ex = extractors();
        let mut store = MemoryStore::default();
        ex.detect_name("my name is Alice", &mut store);
        assert_eq!(store.name(), Some("Alice"));
        ex.detect_name("my name is Alice", &mut store);
        assert_eq!(store.name(), Some("Alice"));
    }

    #[test]
    fn test_detect_name_no_match_leaves_store() {
        let ex = extractors();
        let mut store = MemoryStore::default();
        store.name = Some("Bob".to_string());
        assert!(ex.detect_name("hello there", &mut store).is_none());
        assert_eq!(store.name(), Some("Bob"));
    }

    #[test]
    fn test_detect_name_requires_alphabetic_token() {
        let ex = extractors();
        let mut store = MemoryStore::default();
        assert!(ex.detect_name("my name is 42", &mut store).is_none());
        assert!(store.name().is_none());
    }

    #[test]
    fn test_detect_mood_first_label_wins() {
        let mut store = seeded();
        // "good" (happy) and "mad" (angry) both present; happy comes first.
        assert_eq!(detect_mood("good but mad", &mut store).as_deref(), Some("happy"));
        assert_eq!(store.mood(), Some("happy"));
    }

    #[test]
    fn test_detect_mood_substring_case_insensitive() {
        let mut store = seeded();
        assert_eq!(detect_mood("I feel TERRIBLE", &mut store).as_deref(), Some("sad"));
    }

    #[test]
    fn test_detect_mood_no_match() {
        let mut store = seeded();
        store.mood = Some("angry".to_string());
        assert!(detect_mood("the weather is cloudy", &mut store).is_none());
        assert_eq!(store.mood(), Some("angry"));
    }

    #[test]
    fn test_remember_fact_overwrites() {
        let ex = extractors();
        let mut store = MemoryStore::default();
        ex.remember_fact("my favorite color is blue", &mut store);
        ex.remember_fact("My Favorite Color is Red", &mut store);
        assert_eq!(store.facts.len(), 1);
        assert_eq!(store.facts.get("color").map(String::as_str), Some("Red"));
    }

    #[test]
    fn test_remember_fact_no_match() {
        let ex = extractors();
        let mut store = MemoryStore::default();
        assert!(ex.remember_fact("my favorite is blue", &mut store).is_none());
        assert!(store.facts.is_empty());
    }

    #[test]
    fn test_apply_runs_all_extractors() {
        let ex = extractors();
        let mut store = seeded();
        let found = ex.apply("i'm sam and my favorite food is pizza, feeling great", &mut store);
        assert_eq!(found.name.as_deref(), Some("Sam"));
        assert_eq!(found.mood.as_deref(), Some("happy"));
        assert_eq!(found.fact, Some(("food".to_string(), "pizza".to_string())));
        assert!(!found.is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("aLICE"), "Alice");
        assert_eq!(capitalize(""), "");
    }
}
