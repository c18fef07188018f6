//! Response resolver
//!
//! One turn, strictly ordered, first success wins:
//!
//! 1. exit keyword ends the session (not logged)
//! 2. literal command phrases are dispatched
//! 3. `learn:` directives are applied
//! 4. spelling correction, then name/mood/fact extraction
//! 5. learned-entry lookup: `conversation` newest first, then `memory`
//! 6. topic reference for unanswered questions (optional)
//! 7. random category template or the default reply
//!
//! Replies from steps 5-7 are personalized with the user's name. Every turn
//! except exit is appended to the history and the rolling context.

use regex::Regex;

use crate::cli::config::{AgentConfig, Config};
use crate::engine::commands::{Command, CommandHandler};
use crate::engine::extract::Extractors;
use crate::engine::learning::LearningUpdater;
use crate::engine::random::{RandomSource, StdRandom};
use crate::engine::spelling::correct;
use crate::engine::template::TemplateFormatter;
use crate::errors::{AvaError, Result};
use crate::memory::context::DEFAULT_CONTEXT_SIZE;
use crate::memory::export::LogExporter;
use crate::memory::store::{MemoryStore, Turn};

/// Reply when nothing matched
pub const DEFAULT_REPLY: &str = "I'm not sure how to respond to that yet.";

/// Reply to the exit keyword
pub const FAREWELL: &str = "Goodbye!";

/// Resolver tuning, usually taken from `[agent]`
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub exit_keyword: String,
    pub context_size: usize,
    pub fallback_category: String,
    pub fallback_probability: f64,
    pub enable_alternatives: bool,
    pub enable_context_fallback: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            exit_keyword: "exit".to_string(),
            context_size: DEFAULT_CONTEXT_SIZE,
            fallback_category: "motivation".to_string(),
            fallback_probability: 0.5,
            enable_alternatives: true,
            enable_context_fallback: true,
        }
    }
}

impl From<&AgentConfig> for ResolverSettings {
    fn from(agent: &AgentConfig) -> Self {
        Self {
            exit_keyword: agent.exit_keyword.trim().to_lowercase(),
            context_size: agent.context_size,
            fallback_category: agent.fallback_category.clone(),
            fallback_probability: agent.fallback_probability,
            enable_alternatives: agent.enable_alternatives,
            enable_context_fallback: agent.enable_context_fallback,
        }
    }
}

/// Which pipeline step produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Command(Command),
    Learning,
    Learned,
    ContextTopic,
    Category,
    Default,
}

/// Final reply for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Reply {
            text: text.into(),
            source,
        }
    }
}

/// Result of resolving one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The user asked to leave
    Exit { farewell: String },
    Reply(Reply),
}

impl TurnOutcome {
    /// Text to show the user
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Exit { farewell } => farewell,
            TurnOutcome::Reply(reply) => &reply.text,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, TurnOutcome::Exit { .. })
    }
}

/// Orchestrates the per-turn pipeline over a borrowed store
pub struct Resolver<R = StdRandom> {
    settings: ResolverSettings,
    formatter: TemplateFormatter,
    extractors: Extractors,
    learning: LearningUpdater,
    commands: CommandHandler,
    question: Regex,
    rng: R,
}

impl Resolver<StdRandom> {
    /// Resolver wired from a full configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_config_with_rng(config, StdRandom::from_seed(config.agent.rng_seed))
    }
}

impl<R: RandomSource> Resolver<R> {
    pub fn new(settings: ResolverSettings, commands: CommandHandler, rng: R) -> Result<Self> {
        let reserved = Command::ALL
            .iter()
            .map(|c| c.phrase().to_string())
            .chain(std::iter::once(settings.exit_keyword.clone()))
            .collect::<Vec<_>>();

        let question = Regex::new(r"(?i)^(?:what|who|whom|whose|when|where|why|which|how)\b")
            .map_err(|e| AvaError::Resolution(format!("question pattern: {}", e)))?;

        Ok(Self {
            formatter: TemplateFormatter::new()?,
            extractors: Extractors::new()?,
            learning: LearningUpdater::new(reserved)?,
            commands,
            question,
            settings,
            rng,
        })
    }

    pub fn from_config_with_rng(config: &Config, rng: R) -> Result<Self> {
        let exporter = LogExporter::new(config.log_path())
            .with_labels(&config.agent.user_label, &config.agent.bot_label);
        let settings = ResolverSettings::from(&config.agent);
        let commands = CommandHandler::new(exporter, settings.exit_keyword.clone());
        Self::new(settings, commands, rng)
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve one raw input line, mutating `store`
    pub fn respond(&mut self, store: &mut MemoryStore, raw: &str) -> Result<TurnOutcome> {
        let input = raw.trim();
        store.context.set_capacity(self.settings.context_size);

        if input.to_lowercase() == self.settings.exit_keyword {
            tracing::debug!("exit keyword received");
            return Ok(TurnOutcome::Exit {
                farewell: FAREWELL.to_string(),
            });
        }

        if let Some(command) = Command::parse(input) {
            let text = self.commands.execute(command, store)?;
            let reply = Reply::new(text, ReplySource::Command(command));
            return Ok(self.finish(store, input, reply, false));
        }

        if self.learning.is_directive(input) {
            let text = self.learning.reply(input, store);
            let reply = Reply::new(text, ReplySource::Learning);
            return Ok(self.finish(store, input, reply, false));
        }

        let corrected = correct(input, &store.spelling_corrections);
        let extracted = self.extractors.apply(&corrected, store);
        if !extracted.is_empty() {
            tracing::info!(
                name = ?extracted.name,
                mood = ?extracted.mood,
                fact = ?extracted.fact,
                "profile updated"
            );
        }

        let reply = match self.lookup(store, &corrected)? {
            Some(reply) => reply,
            None => match self.topic_reference(store, &corrected) {
                Some(reply) => reply,
                None => self.fallback(store)?,
            },
        };

        Ok(self.finish(store, input, reply, true))
    }

    /// Newest-first scan of `conversation`, then of `memory`
    fn lookup(&self, store: &MemoryStore, corrected: &str) -> Result<Option<Reply>> {
        let key = corrected.to_lowercase();
        let use_alternatives = self.settings.enable_alternatives;

        let hit = store
            .conversation
            .iter()
            .rev()
            .chain(store.memory.iter().rev())
            .find(|entry| entry.matches(&key, use_alternatives));

        match hit {
            Some(entry) => {
                let text = self.formatter.format(&entry.ava, store)?;
                Ok(Some(Reply::new(text, ReplySource::Learned)))
            }
            None => Ok(None),
        }
    }

    /// Point back at the previous topic when an unanswered question comes in
    fn topic_reference(&self, store: &MemoryStore, corrected: &str) -> Option<Reply> {
        if !self.settings.enable_context_fallback || !self.is_question(corrected) {
            return None;
        }
        let topic = store.context.last_topic()?;
        Some(Reply::new(
            format!(
                "I don't know that yet. Are we still talking about \"{}\"?",
                topic
            ),
            ReplySource::ContextTopic,
        ))
    }

    fn is_question(&self, text: &str) -> bool {
        text.trim_end().ends_with('?') || self.question.is_match(text.trim_start())
    }

    fn fallback(&mut self, store: &MemoryStore) -> Result<Reply> {
        let pool = store.category(&self.settings.fallback_category);
        if !pool.is_empty() && self.rng.chance(self.settings.fallback_probability) {
            let template = &pool[self.rng.pick(pool.len())];
            let text = self.formatter.format(template, store)?;
            return Ok(Reply::new(text, ReplySource::Category));
        }
        Ok(Reply::new(DEFAULT_REPLY, ReplySource::Default))
    }

    /// Log the turn and hand back the displayed reply
    ///
    /// History keeps the unprefixed answer so later lookups are personalised
    /// with whatever name is current then.
    fn finish(
        &self,
        store: &mut MemoryStore,
        input: &str,
        reply: Reply,
        personalized: bool,
    ) -> TurnOutcome {
        tracing::debug!(source = ?reply.source, "turn resolved");
        let shown = if personalized {
            personalize(store, &reply.text)
        } else {
            reply.text.clone()
        };
        store.log_answered_turn(Turn::new(input, shown.clone()), reply.text);
        TurnOutcome::Reply(Reply::new(shown, reply.source))
    }
}

/// Prefix `<Name>, ` once
fn personalize(store: &MemoryStore, text: &str) -> String {
    match store.name() {
        Some(name) => {
            let prefix = format!("{}, ", name);
            if text.starts_with(&prefix) {
                text.to_string()
            } else {
                format!("{}{}", prefix, text)
            }
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::DictionaryConfig;
    use crate::engine::random::ScriptedRandom;
    use crate::memory::store::LearnedEntry;
    use tempfile::TempDir;

    struct Fixture {
        resolver: Resolver<ScriptedRandom>,
        store: MemoryStore,
        _temp: TempDir,
    }

    fn fixture_with(settings: ResolverSettings, rng: ScriptedRandom) -> Fixture {
        let temp = TempDir::new().unwrap();
        let commands = CommandHandler::new(
            LogExporter::new(temp.path().join("log.txt")),
            settings.exit_keyword.clone(),
        );
        Fixture {
            resolver: Resolver::new(settings, commands, rng).unwrap(),
            store: MemoryStore::seeded(&DictionaryConfig::default()),
            _temp: temp,
        }
    }

    fn fixture(rng: ScriptedRandom) -> Fixture {
        fixture_with(ResolverSettings::default(), rng)
    }

    fn reply(f: &mut Fixture, input: &str) -> Reply {
        match f.resolver.respond(&mut f.store, input).unwrap() {
            TurnOutcome::Reply(reply) => reply,
            TurnOutcome::Exit { .. } => panic!("unexpected exit for {:?}", input),
        }
    }

    #[test]
    fn test_exit_is_case_insensitive_and_not_logged() {
        let mut f = fixture(ScriptedRandom::default());
        let outcome = f.resolver.respond(&mut f.store, "  EXIT ").unwrap();
        assert!(outcome.is_exit());
        assert_eq!(outcome.text(), FAREWELL);
        assert!(f.store.conversation.is_empty());
    }

    #[test]
    fn test_command_short_circuits_and_is_logged() {
        let mut f = fixture(ScriptedRandom::default());
        f.store.name = Some("Alice".to_string());

        let r = reply(&mut f, "Show Memory");

        assert_eq!(r.source, ReplySource::Command(Command::ShowMemory));
        assert!(r.text.starts_with("Name: Alice"));
        assert_eq!(f.store.conversation.len(), 1);
        assert_eq!(f.store.context.last_topic(), Some("Show Memory"));
    }

    #[test]
    fn test_command_skips_extractors() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "help");
        assert!(f.store.mood().is_none());
    }

    #[test]
    fn test_learning_directive_short_circuits() {
        let mut f = fixture(ScriptedRandom::default());
        let r = reply(&mut f, "learn: I am great = noted");
        assert_eq!(r.source, ReplySource::Learning);
        assert_eq!(r.text, "I've learned how to respond to 'i am great'.");
        // extractors did not run on the directive
        assert!(f.store.name().is_none());
        assert!(f.store.mood().is_none());
    }

    #[test]
    fn test_malformed_learning_directive_recovered() {
        let mut f = fixture(ScriptedRandom::default());
        let before = f.store.conversation.len();
        let r = reply(&mut f, "learn: onlyquestion");
        assert_eq!(r.text, crate::engine::learning::USAGE);
        // only the logged turn was added
        assert_eq!(f.store.conversation.len(), before + 1);
        assert!(f.store.conversation.iter().all(|e| e.user != "onlyquestion"));
    }

    #[test]
    fn test_learned_reply_is_used() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "learn: what is rust = a language");
        let r = reply(&mut f, "What is Rust");
        assert_eq!(r.source, ReplySource::Learned);
        assert_eq!(r.text, "a language");
    }

    #[test]
    fn test_conversation_wins_over_memory() {
        let mut f = fixture(ScriptedRandom::default());
        f.store.conversation.push(LearnedEntry::new("hello", "hi!"));
        f.store.memory.push(LearnedEntry::new("hello", "greetings"));

        assert_eq!(reply(&mut f, "hello").text, "hi!");
    }

    #[test]
    fn test_memory_pool_consulted_second() {
        let mut f = fixture(ScriptedRandom::default());
        f.store.memory.push(LearnedEntry::new("good night", "sleep well"));
        assert_eq!(reply(&mut f, "Good Night").text, "sleep well");
    }

    #[test]
    fn test_most_recent_entry_shadows_older() {
        let mut f = fixture(ScriptedRandom::default());
        f.store.conversation.push(LearnedEntry::new("ping", "old"));
        f.store.conversation.push(LearnedEntry::new("ping", "new"));
        assert_eq!(reply(&mut f, "ping").text, "new");
    }

    #[test]
    fn test_alternatives_match_when_enabled() {
        let mut f = fixture(ScriptedRandom::default());
        f.store
            .memory
            .push(LearnedEntry::new("hello", "hi there").with_alternatives(["hey"]));
        assert_eq!(reply(&mut f, "Hey").text, "hi there");
    }

    #[test]
    fn test_alternatives_ignored_when_disabled() {
        let settings = ResolverSettings {
            enable_alternatives: false,
            ..Default::default()
        };
        let mut f = fixture_with(settings, ScriptedRandom::default());
        f.store
            .memory
            .push(LearnedEntry::new("hello", "hi there").with_alternatives(["hey"]));
        assert_eq!(reply(&mut f, "hey").text, DEFAULT_REPLY);
    }

    #[test]
    fn test_lookup_uses_corrected_input() {
        let mut f = fixture(ScriptedRandom::default());
        f.store.memory.push(LearnedEntry::new("hello", "hi!"));
        assert_eq!(reply(&mut f, "helo").text, "hi!");
    }

    #[test]
    fn test_learned_reply_is_formatted() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "my favorite color is blue");
        reply(&mut f, "learn: color = You like {facts.color}");
        assert_eq!(reply(&mut f, "color").text, "You like blue");
    }

    #[test]
    fn test_empty_pool_always_default() {
        let mut f = fixture(ScriptedRandom::always(true, 0));
        f.store.categories.insert("motivation".to_string(), Vec::new());
        for i in 0..5 {
            let r = reply(&mut f, &format!("random words {}", i));
            assert_eq!(r.text, DEFAULT_REPLY);
            assert_eq!(r.source, ReplySource::Default);
        }
    }

    #[test]
    fn test_missing_pool_always_default() {
        let mut f = fixture(ScriptedRandom::always(true, 0));
        f.store.categories.clear();
        assert_eq!(reply(&mut f, "zzz").text, DEFAULT_REPLY);
    }

    #[test]
    fn test_fallback_category_branch() {
        let mut f = fixture(ScriptedRandom::new([true], [1]));
        let r = reply(&mut f, "zzz");
        assert_eq!(r.source, ReplySource::Category);
        assert_eq!(r.text, "Small steps still move you forward.");
    }

    #[test]
    fn test_fallback_default_branch() {
        let mut f = fixture(ScriptedRandom::new([false], []));
        let r = reply(&mut f, "zzz");
        assert_eq!(r.source, ReplySource::Default);
        assert_eq!(r.text, DEFAULT_REPLY);
    }

    #[test]
    fn test_category_template_is_formatted() {
        let mut f = fixture(ScriptedRandom::new([true], [3]));
        let r = reply(&mut f, "zzz");
        assert_eq!(r.text, "Every day is a fresh start, friend.");
    }

    #[test]
    fn test_personalization_prefix() {
        let mut f = fixture(ScriptedRandom::default());
        let r = reply(&mut f, "my name is alice");
        assert_eq!(r.text, format!("Alice, {}", DEFAULT_REPLY));
    }

    #[test]
    fn test_personalization_not_doubled() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "my name is alice");
        // matches the logged turn, which is stored without the prefix
        let r = reply(&mut f, "my name is alice");
        assert_eq!(r.source, ReplySource::Learned);
        assert_eq!(r.text, format!("Alice, {}", DEFAULT_REPLY));
    }

    #[test]
    fn test_cleared_name_not_replayed() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "learn: hello = hi");
        reply(&mut f, "my name is alice");
        assert_eq!(reply(&mut f, "hello").text, "Alice, hi");

        reply(&mut f, "clear memory");
        assert_eq!(reply(&mut f, "hello").text, "hi");
    }

    #[test]
    fn test_renamed_user_gets_single_prefix() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "learn: hello = hi");
        reply(&mut f, "my name is alice");
        assert_eq!(reply(&mut f, "hello").text, "Alice, hi");

        reply(&mut f, "my name is bob");
        assert_eq!(reply(&mut f, "hello").text, "Bob, hi");
    }

    #[test]
    fn test_logged_turn_keeps_displayed_reply() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "my name is alice");

        let last = f.store.conversation.last().unwrap();
        assert_eq!(last.ava, DEFAULT_REPLY);
        assert_eq!(last.displayed(), format!("Alice, {}", DEFAULT_REPLY));
        assert_eq!(
            f.store.context.iter().last().unwrap().ava,
            format!("Alice, {}", DEFAULT_REPLY)
        );
    }

    #[test]
    fn test_learning_after_logged_turn_inserts() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "hello");

        let r = reply(&mut f, "learn: hello = hi");
        assert_eq!(r.text, "I've learned how to respond to 'hello'.");
        assert_eq!(f.store.conversation[0].ava, DEFAULT_REPLY);
        assert_eq!(reply(&mut f, "hello").text, "hi");
    }

    #[test]
    fn test_commands_not_personalized() {
        let mut f = fixture(ScriptedRandom::default());
        f.store.name = Some("Alice".to_string());
        let r = reply(&mut f, "clear memory");
        assert!(r.text.starts_with("Memory cleared"));
    }

    #[test]
    fn test_extractors_update_store() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "im feeling sad, my favorite song is yesterday");
        assert_eq!(f.store.mood(), Some("sad"));
        assert_eq!(f.store.facts.get("song").map(String::as_str), Some("yesterday"));
        // "im" corrected to "i'm" so the name pattern fires on the next word
        assert_eq!(f.store.name(), Some("Feeling"));
    }

    #[test]
    fn test_topic_reference_for_questions() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "learn: rust = a language");
        reply(&mut f, "rust");
        let r = reply(&mut f, "why is it fast");
        assert_eq!(r.source, ReplySource::ContextTopic);
        assert!(r.text.contains("\"rust\""));
    }

    #[test]
    fn test_topic_reference_question_mark() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "pizza");
        let r = reply(&mut f, "really?");
        assert_eq!(r.source, ReplySource::ContextTopic);
    }

    #[test]
    fn test_topic_reference_disabled() {
        let settings = ResolverSettings {
            enable_context_fallback: false,
            ..Default::default()
        };
        let mut f = fixture_with(settings, ScriptedRandom::default());
        reply(&mut f, "pizza");
        assert_eq!(reply(&mut f, "why?").source, ReplySource::Default);
    }

    #[test]
    fn test_topic_reference_needs_history() {
        let mut f = fixture(ScriptedRandom::default());
        assert_eq!(reply(&mut f, "how?").source, ReplySource::Default);
    }

    #[test]
    fn test_every_turn_logged_to_context_bound() {
        let settings = ResolverSettings {
            context_size: 3,
            ..Default::default()
        };
        let mut f = fixture_with(settings, ScriptedRandom::default());
        for i in 0..6 {
            reply(&mut f, &format!("message {}", i));
        }
        assert_eq!(f.store.context.len(), 3);
        assert_eq!(f.store.conversation.len(), 6);
        assert_eq!(f.store.context.last_topic(), Some("message 5"));
    }

    #[test]
    fn test_logged_turn_keeps_raw_input() {
        let mut f = fixture(ScriptedRandom::default());
        reply(&mut f, "helo friend");
        let last = f.store.conversation.last().unwrap();
        assert_eq!(last.user, "helo friend");
        assert!(last.timestamp.is_some());
    }

    #[test]
    fn test_settings_from_agent_config() {
        let mut agent = AgentConfig::default();
        agent.exit_keyword = " Quit ".to_string();
        agent.context_size = 9;
        let settings = ResolverSettings::from(&agent);
        assert_eq!(settings.exit_keyword, "quit");
        assert_eq!(settings.context_size, 9);
    }
}
