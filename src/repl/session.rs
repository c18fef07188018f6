//! Chat session: one load, one resolve, one save per turn
//!
//! Owns the storage handle so no other component ever opens the store. Any
//! fault during a turn is journaled under an error code and turned into an
//! apology; the session itself always survives.

use crate::cli::config::{Config, DictionaryConfig};
use crate::engine::random::{RandomSource, StdRandom};
use crate::engine::resolver::{Reply, Resolver, TurnOutcome};
use crate::errors::{AvaError, Result};
use crate::memory::persistence::{JsonFileStore, StoreBackend};
use crate::memory::store::MemoryStore;
use crate::telemetry::ErrorJournal;

/// What the console should show for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReport {
    Reply(Reply),
    Exit { farewell: String },
    Failed {
        code: String,
        message: String,
        persistence: bool,
    },
}

impl TurnReport {
    pub fn text(&self) -> &str {
        match self {
            TurnReport::Reply(reply) => &reply.text,
            TurnReport::Exit { farewell } => farewell,
            TurnReport::Failed { message, .. } => message,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, TurnReport::Exit { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TurnReport::Failed { .. })
    }
}

/// Per-turn driver around the resolver and the store backend
pub struct ChatSession {
    backend: Box<dyn StoreBackend>,
    resolver: Resolver<Box<dyn RandomSource>>,
    journal: ErrorJournal,
    turns: usize,
}

impl ChatSession {
    pub fn new(
        backend: Box<dyn StoreBackend>,
        resolver: Resolver<Box<dyn RandomSource>>,
        journal: ErrorJournal,
    ) -> Self {
        ChatSession {
            backend,
            resolver,
            journal,
            turns: 0,
        }
    }

    /// Session backed by the configured JSON store
    pub fn from_config(config: &Config) -> Result<Self> {
        let rng: Box<dyn RandomSource> = Box::new(StdRandom::from_seed(config.agent.rng_seed));
        let resolver = Resolver::from_config_with_rng(config, rng)?;
        let backend = Box::new(JsonFileStore::new(config.store_path()));
        let session = Self::new(backend, resolver, ErrorJournal::new(config.error_log_path()));
        session.seed(&config.dictionaries)?;
        Ok(session)
    }

    /// Merge configured dictionaries into the stored state
    pub fn seed(&self, dictionaries: &DictionaryConfig) -> Result<()> {
        let mut store = self.backend.load()?;
        store.apply_dictionaries(dictionaries);
        self.backend.save(&store)?;
        tracing::debug!(store = %self.backend.describe(), "dictionaries applied");
        Ok(())
    }

    /// Run one turn, never failing
    pub fn handle_turn(&mut self, input: &str) -> TurnReport {
        match self.try_turn(input) {
            Ok(TurnOutcome::Reply(reply)) => {
                self.turns += 1;
                TurnReport::Reply(reply)
            }
            Ok(TurnOutcome::Exit { farewell }) => TurnReport::Exit { farewell },
            Err(err) => self.report_failure(err),
        }
    }

    /// One load, one resolve, one save
    pub fn try_turn(&mut self, input: &str) -> Result<TurnOutcome> {
        let mut store = self.backend.load()?;
        let outcome = self.resolver.respond(&mut store, input)?;
        self.backend.save(&store)?;
        Ok(outcome)
    }

    fn report_failure(&self, err: AvaError) -> TurnReport {
        let code = self.journal.record(&err);
        let persistence = err.is_persistence();
        let message = if persistence {
            format!(
                "I couldn't save my memory, so that turn was not recorded (error code {}).",
                code
            )
        } else {
            format!(
                "Sorry, something went wrong on my side (error code {}).",
                code
            )
        };
        TurnReport::Failed {
            code,
            message,
            persistence,
        }
    }

    /// Current stored state
    pub fn snapshot(&self) -> Result<MemoryStore> {
        self.backend.load()
    }

    /// Turns answered in this process
    pub fn turn_count(&self) -> usize {
        self.turns
    }

    pub fn exit_keyword(&self) -> &str {
        &self.resolver.settings().exit_keyword
    }

    pub fn store_location(&self) -> String {
        self.backend.describe()
    }
}
