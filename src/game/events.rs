//! Game Events
//!
//! Every state change is recorded as a `GameEvent`. The session keeps
//! them in an append-only history and in a pending queue the
//! presentation layer drains to play sounds and haptics. The engine
//! never waits on that queue.

use serde::{Serialize, Deserialize};

use crate::game::roles::RoleSkipped;
use crate::game::state::{Phase, PlayerId, Role};
use crate::game::vote::TargetReason;
use crate::game::win::Winner;

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventData {
    /// Roles and words dealt.
    GameStarted {
        /// Roster size.
        players: usize,
    },

    /// An enabled optional role found no free player.
    RoleSkipped(RoleSkipped),

    /// A player has seen their card.
    CardRevealed {
        /// Revealer.
        player_id: PlayerId,
    },

    /// Phase changed.
    PhaseChanged {
        /// Previous phase.
        from: Phase,
        /// New phase.
        to: Phase,
    },

    /// A ballot was cast or replaced.
    VoteCast {
        /// Voter.
        voter: PlayerId,
        /// Nominee, `None` for an abstention.
        nominee: Option<PlayerId>,
    },

    /// Votes counted.
    VoteClosed {
        /// Highest count.
        max_count: u32,
        /// Nominees sharing the highest count.
        top_nominees: Vec<PlayerId>,
    },

    /// A player left the table.
    PlayerEliminated {
        /// Eliminated player.
        player_id: PlayerId,
        /// Their role, now public.
        role: Role,
        /// How they were picked.
        reason: TargetReason,
    },

    /// Game over.
    GameEnded {
        /// Winning side.
        winner: Winner,
    },

    /// Same table, new deal.
    GameRestarted,
}

/// A recorded event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Game number within the session (1, then +1 per restart).
    pub game: u32,

    /// Round the event happened in.
    pub round: u32,

    /// Event data.
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(game: u32, round: u32, data: GameEventData) -> Self {
        Self { game, round, data }
    }

    /// Player the event is about, if any.
    pub fn player_id(&self) -> Option<PlayerId> {
        match &self.data {
            GameEventData::CardRevealed { player_id } => Some(*player_id),
            GameEventData::VoteCast { voter, .. } => Some(*voter),
            GameEventData::PlayerEliminated { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }

    /// Sound/haptic cue for this event.
    pub fn cue(&self) -> Option<FeedbackCue> {
        match &self.data {
            GameEventData::GameStarted { .. } | GameEventData::GameRestarted => {
                Some(FeedbackCue::Launch)
            }
            GameEventData::CardRevealed { .. } => Some(FeedbackCue::Flip),
            GameEventData::PhaseChanged {
                from: Phase::Resolve,
                to: Phase::Discussion,
            } => Some(FeedbackCue::Event),
            GameEventData::PhaseChanged { to: Phase::Result, .. } => None,
            GameEventData::PhaseChanged { .. } | GameEventData::VoteCast { .. } => {
                Some(FeedbackCue::Click)
            }
            GameEventData::PlayerEliminated { .. } => Some(FeedbackCue::Eliminate),
            GameEventData::GameEnded { winner: Winner::Civilians } => Some(FeedbackCue::Win),
            GameEventData::GameEnded { winner: Winner::Impostors } => Some(FeedbackCue::Lose),
            GameEventData::RoleSkipped(_) | GameEventData::VoteClosed { .. } => None,
        }
    }
}

/// Fire-and-forget cue names understood by the sound/haptics layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCue {
    /// Button press.
    Click,
    /// Card flipped.
    Flip,
    /// Player eliminated.
    Eliminate,
    /// Game launched.
    Launch,
    /// New round.
    Event,
    /// Civilians won.
    Win,
    /// Impostors won.
    Lose,
}

impl FeedbackCue {
    /// Cue name.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackCue::Click => "click",
            FeedbackCue::Flip => "flip",
            FeedbackCue::Eliminate => "eliminate",
            FeedbackCue::Launch => "launch",
            FeedbackCue::Event => "event",
            FeedbackCue::Win => "win",
            FeedbackCue::Lose => "lose",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues() {
        let id = PlayerId::new([1; 16]);
        let cue = |data| GameEvent::new(1, 1, data).cue();

        assert_eq!(
            cue(GameEventData::GameStarted { players: 4 }),
            Some(FeedbackCue::Launch)
        );
        assert_eq!(
            cue(GameEventData::CardRevealed { player_id: id }),
            Some(FeedbackCue::Flip)
        );
        assert_eq!(
            cue(GameEventData::PhaseChanged {
                from: Phase::Resolve,
                to: Phase::Discussion,
            }),
            Some(FeedbackCue::Event)
        );
        assert_eq!(
            cue(GameEventData::PhaseChanged {
                from: Phase::Discussion,
                to: Phase::Vote,
            }),
            Some(FeedbackCue::Click)
        );
        assert_eq!(
            cue(GameEventData::GameEnded { winner: Winner::Civilians }),
            Some(FeedbackCue::Win)
        );
        assert_eq!(
            cue(GameEventData::GameEnded { winner: Winner::Impostors }),
            Some(FeedbackCue::Lose)
        );
        assert_eq!(
            cue(GameEventData::PlayerEliminated {
                player_id: id,
                role: Role::Civilian,
                reason: TargetReason::Majority,
            }),
            Some(FeedbackCue::Eliminate)
        );
    }

    #[test]
    fn test_event_subject() {
        let id = PlayerId::new([2; 16]);
        let voter = PlayerId::new([3; 16]);

        let revealed = GameEvent::new(1, 1, GameEventData::CardRevealed { player_id: id });
        assert_eq!(revealed.player_id(), Some(id));

        let vote = GameEvent::new(
            1,
            1,
            GameEventData::VoteCast {
                voter,
                nominee: Some(id),
            },
        );
        assert_eq!(vote.player_id(), Some(voter));

        let ended = GameEvent::new(1, 3, GameEventData::GameEnded { winner: Winner::Civilians });
        assert_eq!(ended.player_id(), None);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::new(1, 2, GameEventData::GameEnded { winner: Winner::Impostors });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["data"]["type"], "game_ended");
        assert_eq!(json["data"]["winner"], "impostors");
        assert_eq!(json["round"], 2);
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(FeedbackCue::Eliminate.as_str(), "eliminate");
        assert_eq!(FeedbackCue::Launch.as_str(), "launch");
    }
}
