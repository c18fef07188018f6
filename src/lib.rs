//! A.v.A - a rule-based terminal companion
//!
//! Remembers the user's name, mood and favorite things, learns replies with
//! `learn: question = answer`, and answers through a fixed pipeline of exact
//! matchers and template substitution.
//!
//! # Architecture
//!
//! - **memory**: the persisted store, rolling context, log export
//! - **engine**: formatter, extractors, learning, commands, resolver
//! - **repl**: per-turn session driver and the console loop
//! - **cli** / **telemetry**: arguments, configuration, logging

pub mod cli;
pub mod engine;
pub mod errors;
pub mod memory;
pub mod repl;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{AvaError, Result};
pub use memory::{LearnedEntry, MemoryStore, Turn};
pub use engine::{Resolver, TurnOutcome};
