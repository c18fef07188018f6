//! Learning directive: `learn: <question> = <answer>`
//!
//! Parsing and applying are explicit results; the resolver turns either
//! outcome into a reply and never lets bad input end the session.

use regex::Regex;

use crate::errors::{AvaError, Result};
use crate::memory::store::{LearnedEntry, MemoryStore};

/// Shown whenever a directive cannot be parsed
pub const USAGE: &str = "Use this format to teach me: learn: question = answer";

/// Whether a directive added or replaced an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Learned {
    Inserted { question: String },
    Updated { question: String },
}

impl Learned {
    pub fn question(&self) -> &str {
        match self {
            Learned::Inserted { question } | Learned::Updated { question } => question,
        }
    }

    /// Confirmation shown to the user
    pub fn message(&self) -> String {
        match self {
            Learned::Inserted { question } => {
                format!("I've learned how to respond to '{}'.", question)
            }
            Learned::Updated { question } => {
                format!("I've updated my response to '{}'.", question)
            }
        }
    }
}

/// A parsed directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Lowercase lookup key
    pub question: String,
    /// Answer template, original casing
    pub answer: String,
}

/// Parses and applies learning directives
#[derive(Debug, Clone)]
pub struct LearningUpdater {
    trigger: Regex,
    reserved: Vec<String>,
}

impl LearningUpdater {
    /// `reserved` phrases (commands, exit keyword) can never be taught
    pub fn new<I, S>(reserved: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trigger = Regex::new(r"(?i)learn:")
            .map_err(|e| AvaError::Resolution(format!("learning pattern: {}", e)))?;
        Ok(Self {
            trigger,
            reserved: reserved
                .into_iter()
                .map(|r| r.as_ref().trim().to_lowercase())
                .collect(),
        })
    }

    /// Does the input carry a directive?
    pub fn is_directive(&self, input: &str) -> bool {
        self.trigger.is_match(input)
    }

    /// Split the text after the first `learn:` at the first `=`
    ///
    /// Anything after the first `=` belongs to the answer, including further
    /// `=` characters.
    pub fn parse(&self, input: &str) -> Result<Directive> {
        let found = self
            .trigger
            .find(input)
            .ok_or_else(|| AvaError::Format("missing 'learn:' prefix".to_string()))?;
        let body = &input[found.end()..];

        let (question, answer) = body
            .split_once('=')
            .ok_or_else(|| AvaError::Format("missing '=' between question and answer".to_string()))?;

        let question = question.trim().to_lowercase();
        let answer = answer.trim().to_string();

        if question.is_empty() {
            return Err(AvaError::Format("question is empty".to_string()));
        }
        if answer.is_empty() {
            return Err(AvaError::Format("answer is empty".to_string()));
        }

        Ok(Directive { question, answer })
    }

    /// Insert a new entry or update the existing one in place
    pub fn apply(&self, directive: Directive, store: &mut MemoryStore) -> Result<Learned> {
        if self.reserved.contains(&directive.question) {
            return Err(AvaError::Learning(format!(
                "'{}' is a command, so I can't learn a reply for it",
                directive.question
            )));
        }
        if self.is_directive(&directive.question) {
            return Err(AvaError::Learning(
                "a question can't contain another 'learn:' directive".to_string(),
            ));
        }

        let existing = store
            .conversation
            .iter_mut()
            .rev()
            .filter(|entry| !entry.is_logged())
            .find(|entry| entry.user.to_lowercase() == directive.question);

        match existing {
            Some(entry) => {
                entry.ava = directive.answer;
                Ok(Learned::Updated {
                    question: directive.question,
                })
            }
            None => {
                store
                    .conversation
                    .push(LearnedEntry::new(directive.question.clone(), directive.answer));
                Ok(Learned::Inserted {
                    question: directive.question,
                })
            }
        }
    }

    /// Parse and apply
    pub fn learn(&self, input: &str, store: &mut MemoryStore) -> Result<Learned> {
        let directive = self.parse(input)?;
        self.apply(directive, store)
    }

    /// Run a directive and produce the status reply
    pub fn reply(&self, input: &str, store: &mut MemoryStore) -> String {
        match self.learn(input, store) {
            Ok(learned) => {
                tracing::info!(question = learned.question(), "learned response");
                learned.message()
            }
            Err(AvaError::Format(reason)) => {
                tracing::warn!(%reason, "malformed learning directive");
                USAGE.to_string()
            }
            Err(err) => {
                tracing::warn!(error = %err, "learning directive rejected");
                format!("I couldn't learn that: {}", learning_reason(&err))
            }
        }
    }
}

fn learning_reason(err: &AvaError) -> String {
    match err {
        AvaError::Learning(reason) => reason.clone(),
        other => other.to_string(),
    }
}
