//! Memory layer: the store record, rolling context, persistence and log export
//!
//! The store is loaded once at the start of a turn and saved once at its end;
//! components in between only ever see `&mut MemoryStore`.

pub mod context;
pub mod export;
pub mod persistence;
pub mod store;

pub use context::{ContextLedger, DEFAULT_CONTEXT_SIZE};
pub use export::LogExporter;
pub use persistence::{InMemoryStore, JsonFileStore, StoreBackend};
pub use store::{LearnedEntry, MemoryStore, Turn};
