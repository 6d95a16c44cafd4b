//! Round State Machine
//!
//! ```text
//!  Reveal{0} -> Reveal{1} -> ... -> Discussion -> Vote -> Resolve
//!                                      ^                    |
//!                                      +---- Continue ------+
//!                                                           |
//!  Reveal{0} <------------- Restart ------ Result <-- Ended-+
//! ```
//!
//! A manual elimination during Discussion or Vote is also followed by a
//! `Resolved` trigger: the phase stays put on `Continue` and jumps to
//! Result on `Ended`.
//!
//! Transitions are pure; the session applies them and does the side
//! effects (round counter, vote reset, events).

use serde::{Serialize, Deserialize};

use crate::game::error::{GameError, GameResult};
use crate::game::state::Phase;
use crate::game::win::Outcome;

/// Caller-driven triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The current revealer has seen their card.
    RevealAcknowledged,
    /// Discussion over; start collecting votes.
    OpenVote,
    /// Stop collecting votes.
    CloseVote,
    /// Elimination applied and the table evaluated.
    Resolved(Outcome),
    /// Deal a new game to the same table.
    Restart,
}

impl Trigger {
    /// Operation name used in errors.
    pub fn operation(self) -> &'static str {
        match self {
            Trigger::RevealAcknowledged => "acknowledge a reveal",
            Trigger::OpenVote => "open the vote",
            Trigger::CloseVote => "close the vote",
            Trigger::Resolved(_) => "resolve the round",
            Trigger::Restart => "play again",
        }
    }
}

/// Compute the phase after `trigger`.
///
/// `roster_len` is the number of players who must see their card.
pub fn next_phase(phase: Phase, trigger: Trigger, roster_len: usize) -> GameResult<Phase> {
    let next = match (phase, trigger) {
        (Phase::Reveal { turn }, Trigger::RevealAcknowledged) => {
            if turn + 1 >= roster_len {
                Phase::Discussion
            } else {
                Phase::Reveal { turn: turn + 1 }
            }
        }
        (Phase::Discussion, Trigger::OpenVote) => Phase::Vote,
        (Phase::Vote, Trigger::CloseVote) => Phase::Resolve,
        (Phase::Resolve, Trigger::Resolved(Outcome::Continue)) => Phase::Discussion,
        (Phase::Resolve, Trigger::Resolved(Outcome::Ended { .. })) => Phase::Result,
        (Phase::Discussion | Phase::Vote, Trigger::Resolved(Outcome::Continue)) => phase,
        (Phase::Discussion | Phase::Vote, Trigger::Resolved(Outcome::Ended { .. })) => {
            Phase::Result
        }
        (Phase::Result, Trigger::Restart) => Phase::Reveal { turn: 0 },
        (phase, trigger) => {
            return Err(GameError::InvalidPhaseTransition {
                operation: trigger.operation(),
                phase,
            })
        }
    };

    Ok(next)
}
