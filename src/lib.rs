//! # Undercover Engine
//!
//! Round engine for the Undercover party game: deals hidden roles and
//! secret words, runs the reveal/discussion/vote cycle, resolves
//! eliminations and decides the winner.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    UNDERCOVER ENGINE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── config.rs   - Game configuration                        │
//! │  ├── roster.rs   - Players seated between games              │
//! │  ├── state.rs    - Player, role and phase types              │
//! │  ├── roles.rs    - Role assignment                           │
//! │  ├── words.rs    - Word pairs and distribution               │
//! │  ├── round.rs    - Phase transitions                         │
//! │  ├── vote.rs     - Vote tally and elimination target         │
//! │  ├── win.rs      - Win evaluation                            │
//! │  ├── events.rs   - Game events and feedback cues             │
//! │  └── session.rs  - Game session aggregate                    │
//! │                                                              │
//! │  storage/        - Saved config and roster (I/O)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules never read the clock or the OS
//! random source once a session has its seed:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - All randomness from seeded Xorshift128+
//!
//! Given the same seed, configuration, word provider and calls, a
//! session deals and resolves identically.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod storage;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use game::config::{GameConfig, PlayerSeed, RoleOptions};
pub use game::error::{GameError, GameResult};
pub use game::session::GameSession;
pub use game::state::{Phase, Player, PlayerId, Role};
pub use game::win::{Outcome, Winner};
pub use game::words::{WordPair, WordPairProvider, WordPool};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest table a game can start with.
pub const MIN_PLAYERS: usize = 3;

/// Roster size from which a Blank is dealt.
pub const BLANK_MIN_PLAYERS: usize = 6;

/// Recently used word pairs a `WordPool` avoids repeating.
pub const RECENT_PAIR_MEMORY: usize = 5;
