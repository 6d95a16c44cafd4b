//! Vote Tally
//!
//! Counts one round of ballots and picks who leaves the table.
//!
//! Tie-break: when the top count is shared, or nobody voted at all, the
//! target is drawn uniformly from **every living player**, not only from
//! the tied nominees. Tied nominees get no better odds than anyone else.
//! This matches how the table game has always been resolved and is
//! tested as such; do not narrow it to the tied set.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::state::PlayerId;

/// Ballots for one round: voter -> nominee, `None` for an abstention.
pub type Ballots = BTreeMap<PlayerId, Option<PlayerId>>;

/// Counted votes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    /// Votes per nominee; nominees with no votes are absent.
    pub counts: BTreeMap<PlayerId, u32>,
    /// Nominees sharing the highest count; empty when nobody voted.
    pub top_nominees: BTreeSet<PlayerId>,
    /// Highest count, 0 when nobody voted.
    pub max_count: u32,
}

impl VoteTally {
    /// Single nominee with the most votes, if there is one.
    pub fn leader(&self) -> Option<PlayerId> {
        if self.max_count > 0 && self.top_nominees.len() == 1 {
            self.top_nominees.iter().next().copied()
        } else {
            None
        }
    }

    /// Votes received by a player.
    pub fn count_for(&self, id: &PlayerId) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }
}

/// Count ballots. Abstentions are ignored.
pub fn tally(ballots: &Ballots) -> VoteTally {
    let mut counts: BTreeMap<PlayerId, u32> = BTreeMap::new();
    for nominee in ballots.values().flatten() {
        *counts.entry(*nominee).or_insert(0) += 1;
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    let top_nominees = counts
        .iter()
        .filter(|(_, c)| **c == max_count && max_count > 0)
        .map(|(id, _)| *id)
        .collect();

    VoteTally {
        counts,
        top_nominees,
        max_count,
    }
}

/// Why a player was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetReason {
    /// Clear leader.
    Majority,
    /// Top count shared; drawn from all living players.
    Tie,
    /// Nobody voted; drawn from all living players.
    NoVotes,
    /// Removed by the table outside a vote count.
    Manual,
}

/// The player to eliminate this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationTarget {
    /// Player to remove.
    pub player_id: PlayerId,
    /// How the choice was made.
    pub reason: TargetReason,
}

/// Pick the elimination target.
///
/// `living` must be the living players in roster order. Returns `None`
/// only when nobody is alive.
pub fn choose_target(
    tally: &VoteTally,
    living: &[PlayerId],
    rng: &mut DeterministicRng,
) -> Option<EliminationTarget> {
    if let Some(player_id) = tally.leader() {
        return Some(EliminationTarget {
            player_id,
            reason: TargetReason::Majority,
        });
    }

    let reason = if tally.max_count == 0 {
        TargetReason::NoVotes
    } else {
        TargetReason::Tie
    };

    rng.choose(living).map(|player_id| EliminationTarget {
        player_id: *player_id,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> PlayerId {
        PlayerId::new([n; 16])
    }

    #[test]
    fn test_tally_with_abstention() {
        let (a, b, c, d) = (id(1), id(2), id(3), id(4));
        let ballots: Ballots = [(a, Some(b)), (c, Some(b)), (d, None)].into_iter().collect();

        let result = tally(&ballots);
        assert_eq!(result.counts, [(b, 2)].into_iter().collect());
        assert_eq!(result.top_nominees, [b].into_iter().collect());
        assert_eq!(result.max_count, 2);
        assert_eq!(result.leader(), Some(b));
    }

    #[test]
    fn test_tally_tie() {
        let (a, b, c, d) = (id(1), id(2), id(3), id(4));
        let ballots: Ballots = [(a, Some(b)), (c, Some(d))].into_iter().collect();

        let result = tally(&ballots);
        assert_eq!(result.top_nominees, [b, d].into_iter().collect());
        assert_eq!(result.max_count, 1);
        assert_eq!(result.leader(), None);
    }

    #[test]
    fn test_tally_empty() {
        let result = tally(&Ballots::new());
        assert!(result.counts.is_empty());
        assert!(result.top_nominees.is_empty());
        assert_eq!(result.max_count, 0);
    }

    #[test]
    fn test_majority_target() {
        let (a, b, c) = (id(1), id(2), id(3));
        let ballots: Ballots = [(a, Some(b)), (c, Some(b))].into_iter().collect();
        let mut rng = DeterministicRng::new(1);

        let target = choose_target(&tally(&ballots), &[a, b, c], &mut rng).unwrap();
        assert_eq!(target, EliminationTarget { player_id: b, reason: TargetReason::Majority });
    }

    #[test]
    fn test_tie_draws_from_all_living() {
        // b and d tie; a and c must also be drawn sometimes
        let (a, b, c, d) = (id(1), id(2), id(3), id(4));
        let living = [a, b, c, d];
        let ballots: Ballots = [(a, Some(b)), (c, Some(d))].into_iter().collect();
        let result = tally(&ballots);
        let mut rng = DeterministicRng::new(2);

        let mut hits: BTreeMap<PlayerId, u32> = BTreeMap::new();
        for _ in 0..400 {
            let target = choose_target(&result, &living, &mut rng).unwrap();
            assert_eq!(target.reason, TargetReason::Tie);
            *hits.entry(target.player_id).or_insert(0) += 1;
        }

        for p in living {
            let n = hits.get(&p).copied().unwrap_or(0);
            assert!(n > 50, "{} drawn only {} times", p, n);
        }
    }

    #[test]
    fn test_no_votes_draws_from_living() {
        let living = [id(1), id(2), id(3)];
        let mut rng = DeterministicRng::new(3);

        let target = choose_target(&tally(&Ballots::new()), &living, &mut rng).unwrap();
        assert_eq!(target.reason, TargetReason::NoVotes);
        assert!(living.contains(&target.player_id));
    }

    #[test]
    fn test_nobody_alive() {
        let mut rng = DeterministicRng::new(4);
        assert_eq!(choose_target(&VoteTally::default(), &[], &mut rng), None);
    }
}
