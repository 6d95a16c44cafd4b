//! Table roster.
//!
//! The list of people at the table between games. A session takes a
//! copy of it through `GameConfig::players`.

use serde::{Serialize, Deserialize};

use crate::game::config::PlayerSeed;
use crate::game::error::{GameError, GameResult};
use crate::game::state::{avatar_initial, PlayerId};

/// Ordered list of players, in seating (and reveal) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<PlayerSeed>,
}

impl Roster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from saved seeds.
    pub fn from_seeds(players: Vec<PlayerSeed>) -> Self {
        Self { players }
    }

    /// Add a player; the name is trimmed and must not be empty.
    pub fn add(&mut self, name: &str) -> GameResult<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }

        let id = PlayerId::random();
        self.players.push(PlayerSeed::new(id, name));
        Ok(id)
    }

    /// Remove a player. Returns false if the id was not seated.
    pub fn remove(&mut self, id: &PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != *id);
        self.players.len() != before
    }

    /// Remove everyone.
    pub fn clear(&mut self) {
        self.players.clear();
    }

    /// Look up a player.
    pub fn get(&self, id: &PlayerId) -> Option<&PlayerSeed> {
        self.players.iter().find(|p| p.id == *id)
    }

    /// Avatar initial for a seated player.
    pub fn avatar(&self, id: &PlayerId) -> Option<char> {
        self.get(id).map(|p| avatar_initial(&p.name))
    }

    /// Seeds in seating order.
    pub fn seeds(&self) -> &[PlayerSeed] {
        &self.players
    }

    /// Number of seated players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Nobody seated?
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_name() {
        let mut roster = Roster::new();
        let id = roster.add("  Alice ").unwrap();
        assert_eq!(roster.get(&id).unwrap().name, "Alice");
        assert_eq!(roster.avatar(&id), Some('A'));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut roster = Roster::new();
        assert_eq!(roster.add("   "), Err(GameError::EmptyPlayerName));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut roster = Roster::new();
        let a = roster.add("a").unwrap();
        let b = roster.add("b").unwrap();

        assert!(roster.remove(&a));
        assert!(!roster.remove(&a));
        assert_eq!(roster.seeds().len(), 1);
        assert_eq!(roster.seeds()[0].id, b);

        roster.clear();
        assert_eq!(roster.len(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut roster = Roster::new();
        let a = roster.add("same").unwrap();
        let b = roster.add("same").unwrap();
        assert_ne!(a, b);
    }
}
