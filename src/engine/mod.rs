//! Response engine
//!
//! Stateless matchers and formatters plus the [`Resolver`] that runs them in
//! order for one turn. Nothing here touches storage directly.

pub mod commands;
pub mod extract;
pub mod learning;
pub mod random;
pub mod resolver;
pub mod spelling;
pub mod template;

pub use commands::{Command, CommandHandler};
pub use extract::{Extracted, Extractors};
pub use learning::{Learned, LearningUpdater};
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use resolver::{Reply, ReplySource, Resolver, ResolverSettings, TurnOutcome, DEFAULT_REPLY, FAREWELL};
pub use spelling::correct;
pub use template::TemplateFormatter;
