//! Win-Condition Evaluator
//!
//! Checked after every elimination, over living players only:
//! - no living Impostor-aligned player: Civilians win
//! - Impostor-aligned count >= everyone else: Impostors win
//! - otherwise the game goes on
//!
//! The Blank counts as Impostor-aligned.

use serde::{Serialize, Deserialize};

use crate::game::state::{Alignment, Player};

/// Winning side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// Every Impostor-aligned player is out.
    Civilians,
    /// Impostors reached parity.
    Impostors,
}

impl Winner {
    /// Result screen message.
    pub fn message(self) -> &'static str {
        match self {
            Winner::Civilians => "Les Civils ont gagné ! Tous les Undercover ont été éliminés.",
            Winner::Impostors => "Les Undercover ont gagné ! Ils sont maintenant majoritaires.",
        }
    }
}

/// Verdict of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Keep playing.
    Continue,
    /// Game over.
    Ended {
        /// Winning side.
        winner: Winner,
    },
}

impl Outcome {
    /// Did the game end?
    pub fn is_ended(self) -> bool {
        matches!(self, Outcome::Ended { .. })
    }

    /// Winner, if the game ended.
    pub fn winner(self) -> Option<Winner> {
        match self {
            Outcome::Ended { winner } => Some(winner),
            Outcome::Continue => None,
        }
    }
}

/// Living head count per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LivingCounts {
    /// Impostor-aligned players alive.
    pub impostors: usize,
    /// Everyone else alive.
    pub civilians: usize,
}

impl LivingCounts {
    /// Count living players by alignment.
    pub fn of(players: &[Player]) -> Self {
        players
            .iter()
            .filter(|p| p.is_alive())
            .fold(Self::default(), |mut acc, p| {
                match p.effective_role().alignment() {
                    Alignment::Impostors => acc.impostors += 1,
                    Alignment::Civilians => acc.civilians += 1,
                }
                acc
            })
    }
}

/// Evaluate the table.
pub fn evaluate(players: &[Player]) -> Outcome {
    let counts = LivingCounts::of(players);

    if counts.impostors == 0 {
        Outcome::Ended { winner: Winner::Civilians }
    } else if counts.impostors >= counts.civilians {
        Outcome::Ended { winner: Winner::Impostors }
    } else {
        Outcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::PlayerSeed;
    use crate::game::state::{PlayerId, Role};

    fn table(roles: &[Role]) -> Vec<Player> {
        roles
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let seed = PlayerSeed::new(PlayerId::new([i as u8; 16]), format!("p{}", i));
                let mut p = Player::new(&seed);
                p.role = Some(*role);
                p
            })
            .collect()
    }

    fn five_seat_table() -> Vec<Player> {
        table(&[
            Role::Impostor,
            Role::Civilian,
            Role::Civilian,
            Role::Civilian,
            Role::Civilian,
        ])
    }

    #[test]
    fn test_fresh_table_continues() {
        let outcome = evaluate(&five_seat_table());
        assert_eq!(outcome, Outcome::Continue);
        assert!(!outcome.is_ended());
        assert_eq!(outcome.winner(), None);
    }

    #[test]
    fn test_parity_gives_impostors_the_win() {
        let mut players = five_seat_table();
        for p in players.iter_mut().skip(1).take(3) {
            p.eliminated = true;
        }
        let outcome = evaluate(&players);
        assert_eq!(outcome, Outcome::Ended { winner: Winner::Impostors });
        assert!(outcome.is_ended());
    }

    #[test]
    fn test_impostor_out_civilians_win() {
        let mut players = table(&[Role::Impostor, Role::Civilian, Role::Civilian, Role::Civilian]);
        players[0].eliminated = true;
        assert_eq!(evaluate(&players), Outcome::Ended { winner: Winner::Civilians });
    }

    #[test]
    fn test_blank_keeps_impostors_alive() {
        let mut players = table(&[
            Role::Impostor,
            Role::Blank,
            Role::Civilian,
            Role::Civilian,
            Role::Civilian,
            Role::Civilian,
        ]);
        players[0].eliminated = true;
        assert_eq!(evaluate(&players), Outcome::Continue);

        // Blank + 2 Civilians alive is still not parity
        players[2].eliminated = true;
        players[3].eliminated = true;
        assert_eq!(evaluate(&players), Outcome::Continue);

        players[4].eliminated = true;
        assert_eq!(evaluate(&players), Outcome::Ended { winner: Winner::Impostors });
    }

    #[test]
    fn test_optional_roles_count_as_civilians() {
        let mut players = table(&[Role::Impostor, Role::Saboteur, Role::Oracle]);
        assert_eq!(evaluate(&players), Outcome::Continue);
        players[2].eliminated = true;
        assert_eq!(evaluate(&players), Outcome::Ended { winner: Winner::Impostors });
    }

    #[test]
    fn test_messages() {
        assert!(Winner::Civilians.message().starts_with("Les Civils"));
        assert!(Winner::Impostors.message().starts_with("Les Undercover"));
    }
}
