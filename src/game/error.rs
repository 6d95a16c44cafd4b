//! Game errors.

use crate::game::state::{Phase, PlayerId};

/// Errors returned by session and engine operations.
///
/// Every variant is raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Roster below the minimum size at game start.
    #[error("Not enough players: {count} (need at least {min})")]
    InsufficientPlayers {
        /// Roster size given.
        count: usize,
        /// Minimum roster size.
        min: usize,
    },

    /// Player is already out of the game.
    #[error("Player {0} is already eliminated")]
    AlreadyEliminated(PlayerId),

    /// Player id is not part of the roster.
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// Operation requested out of sequence.
    #[error("Cannot {operation} during {phase:?}")]
    InvalidPhaseTransition {
        /// What the caller tried to do.
        operation: &'static str,
        /// Phase the session was in.
        phase: Phase,
    },

    /// Reveal acknowledged by someone other than the current revealer.
    #[error("It is {expected}'s turn to reveal, not {actual}'s")]
    OutOfTurn {
        /// Player whose card is up.
        expected: PlayerId,
        /// Player who acknowledged.
        actual: PlayerId,
    },

    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Player name empty after trimming.
    #[error("Player name cannot be empty")]
    EmptyPlayerName,

    /// Same player id listed twice.
    #[error("Player {0} appears twice in the roster")]
    DuplicatePlayer(PlayerId),
}

/// Result alias for game operations.
pub type GameResult<T> = Result<T, GameError>;
