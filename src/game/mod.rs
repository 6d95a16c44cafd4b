//! Game Logic Module
//!
//! Round engine for one table. Everything here is synchronous and
//! deterministic for a given seed.
//!
//! ## Module Structure
//!
//! - `config`: Game configuration, timers, optional roles
//! - `roster`: Players seated between games
//! - `state`: Player, role and phase types
//! - `roles`: Role assignment
//! - `words`: Word pairs and distribution
//! - `round`: Phase transitions
//! - `vote`: Ballot tally and elimination target
//! - `win`: Win evaluation
//! - `events`: Game events and feedback cues
//! - `session`: The game session aggregate
//! - `error`: Error types

pub mod config;
pub mod error;
pub mod events;
pub mod roles;
pub mod roster;
pub mod round;
pub mod session;
pub mod state;
pub mod vote;
pub mod win;
pub mod words;

// Re-export key types
pub use config::{GameConfig, GameMode, PlayerSeed, RoleOptions, Timers};
pub use error::{GameError, GameResult};
pub use events::{FeedbackCue, GameEvent, GameEventData};
pub use roles::{assign_roles, RoleAssignment, RoleSkipped};
pub use roster::Roster;
pub use round::{next_phase, Trigger};
pub use session::{Card, GameSession, Resolution, RevealEntry, SessionId};
pub use state::{Alignment, Phase, Player, PlayerId, Role};
pub use vote::{choose_target, tally, Ballots, EliminationTarget, TargetReason, VoteTally};
pub use win::{evaluate, Outcome, Winner};
pub use words::{distribute_words, DealtWords, WordPair, WordPairProvider, WordPool};
