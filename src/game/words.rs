//! Secret words.
//!
//! A session draws one `WordPair` per game. `distribute_words` flips a
//! coin to decide which half is the civilian word, hands the other half
//! to the Impostor, and leaves the Blank without a word.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::error::{GameError, GameResult};
use crate::game::roles::RoleAssignment;
use crate::game::state::{Player, Role};
use crate::RECENT_PAIR_MEMORY;

/// Two related but distinct words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    /// First word.
    pub first: String,
    /// Second word.
    pub second: String,
}

impl WordPair {
    /// Create a pair.
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Source of word pairs.
///
/// Providers take the session RNG so a seeded session draws the same
/// pairs on replay.
pub trait WordPairProvider {
    /// Draw the pair for the next game.
    fn next_pair(&mut self, rng: &mut DeterministicRng) -> WordPair;
}

/// A fixed pair always hands out itself.
impl WordPairProvider for WordPair {
    fn next_pair(&mut self, _rng: &mut DeterministicRng) -> WordPair {
        self.clone()
    }
}

const BUILTIN_PAIRS: &[(&str, &str)] = &[
    ("Chat", "Chien"),
    ("Café", "Thé"),
    ("Plage", "Piscine"),
    ("Guitare", "Violon"),
    ("Pizza", "Tarte"),
    ("Train", "Métro"),
    ("Soleil", "Lune"),
    ("Pomme", "Poire"),
    ("Vélo", "Trottinette"),
    ("Montagne", "Colline"),
    ("Livre", "Magazine"),
    ("Cinéma", "Théâtre"),
    ("Neige", "Glace"),
    ("Médecin", "Infirmier"),
    ("Croissant", "Brioche"),
    ("Football", "Rugby"),
    ("Avion", "Hélicoptère"),
    ("Stylo", "Crayon"),
    ("Océan", "Lac"),
    ("Château", "Palais"),
    ("Fromage", "Beurre"),
    ("Piano", "Orgue"),
    ("Lion", "Tigre"),
    ("Hiver", "Automne"),
];

/// Pool of pairs that avoids handing out a recently used one.
#[derive(Debug, Clone)]
pub struct WordPool {
    pairs: Vec<WordPair>,
    recent: VecDeque<usize>,
    memory: usize,
}

impl WordPool {
    /// Pool over the given pairs, remembering the last `RECENT_PAIR_MEMORY`.
    pub fn new(pairs: Vec<WordPair>) -> GameResult<Self> {
        if pairs.is_empty() {
            return Err(GameError::InvalidConfig("word pool is empty".into()));
        }
        Ok(Self {
            pairs,
            recent: VecDeque::new(),
            memory: RECENT_PAIR_MEMORY,
        })
    }

    /// Built-in French word list.
    pub fn builtin() -> Self {
        Self {
            pairs: BUILTIN_PAIRS
                .iter()
                .map(|(a, b)| WordPair::new(*a, *b))
                .collect(),
            recent: VecDeque::new(),
            memory: RECENT_PAIR_MEMORY,
        }
    }

    /// Override how many recent pairs are avoided.
    pub fn with_memory(mut self, memory: usize) -> Self {
        self.memory = memory;
        self.recent.truncate(memory);
        self
    }

    /// Number of pairs in the pool.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Is the pool empty? Never true for a constructed pool.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn remember(&mut self, index: usize) {
        if self.memory == 0 {
            return;
        }
        if self.recent.len() == self.memory {
            self.recent.pop_back();
        }
        self.recent.push_front(index);
    }
}

impl WordPairProvider for WordPool {
    fn next_pair(&mut self, rng: &mut DeterministicRng) -> WordPair {
        let fresh: Vec<usize> = (0..self.pairs.len())
            .filter(|i| !self.recent.contains(i))
            .collect();

        // Small pools can be fully "recent"; fall back to the whole list
        let index = if fresh.is_empty() {
            rng.next_index(self.pairs.len())
        } else {
            fresh[rng.next_index(fresh.len())]
        };

        self.remember(index);
        self.pairs[index].clone()
    }
}

/// The pair as oriented for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtWords {
    /// Word held by Civilians and optional roles.
    pub civilian: String,
    /// Word held by the Impostor.
    pub impostor: String,
}

impl DealtWords {
    /// Word for a role; `None` for the Blank.
    pub fn word_for(&self, role: Role) -> Option<&str> {
        match role {
            Role::Blank => None,
            Role::Impostor => Some(&self.impostor),
            _ => Some(&self.civilian),
        }
    }
}

/// Orient the pair with a fair coin flip and write each player's word.
pub fn distribute_words(
    players: &mut [Player],
    roles: &RoleAssignment,
    pair: WordPair,
    rng: &mut DeterministicRng,
) -> DealtWords {
    let dealt = if rng.coin_flip() {
        DealtWords { civilian: pair.first, impostor: pair.second }
    } else {
        DealtWords { civilian: pair.second, impostor: pair.first }
    };

    for player in players.iter_mut() {
        let role = roles.role_of(&player.id);
        player.word = dealt.word_for(role).map(str::to_owned);
    }

    dealt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::{PlayerSeed, RoleOptions};
    use crate::game::roles::assign_roles;
    use crate::game::state::PlayerId;

    fn players(n: u8) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(&PlayerSeed::new(PlayerId::new([i; 16]), format!("p{}", i))))
            .collect()
    }

    #[test]
    fn test_impostor_gets_other_word() {
        let mut rng = DeterministicRng::new(10);
        let mut table = players(6);
        let ids: Vec<_> = table.iter().map(|p| p.id).collect();
        let roles = assign_roles(&ids, &RoleOptions::default(), &mut rng).unwrap();

        let dealt = distribute_words(&mut table, &roles, WordPair::new("Chat", "Chien"), &mut rng);
        assert_ne!(dealt.civilian, dealt.impostor);

        for player in &table {
            match roles.role_of(&player.id) {
                Role::Impostor => assert_eq!(player.word.as_deref(), Some(dealt.impostor.as_str())),
                Role::Blank => assert_eq!(player.word, None),
                _ => assert_eq!(player.word.as_deref(), Some(dealt.civilian.as_str())),
            }
        }
    }

    #[test]
    fn test_orientation_is_random() {
        let mut rng = DeterministicRng::new(11);
        let mut table = players(3);
        let ids: Vec<_> = table.iter().map(|p| p.id).collect();
        let roles = assign_roles(&ids, &RoleOptions::default(), &mut rng).unwrap();

        let mut civilian_first = 0;
        for _ in 0..200 {
            let dealt = distribute_words(&mut table, &roles, WordPair::new("A", "B"), &mut rng);
            if dealt.civilian == "A" {
                civilian_first += 1;
            }
        }
        assert!(civilian_first > 60 && civilian_first < 140, "{}", civilian_first);
    }

    #[test]
    fn test_pool_avoids_recent_pairs() {
        let pairs: Vec<WordPair> = (0..4)
            .map(|i| WordPair::new(format!("a{}", i), format!("b{}", i)))
            .collect();
        let mut pool = WordPool::new(pairs).unwrap().with_memory(3);
        let mut rng = DeterministicRng::new(12);

        let mut last = Vec::new();
        for _ in 0..20 {
            let pair = pool.next_pair(&mut rng);
            assert!(!last.contains(&pair), "{:?} drawn again too soon", pair);
            last.push(pair);
            if last.len() > 3 {
                last.remove(0);
            }
        }
    }

    #[test]
    fn test_pool_smaller_than_memory_still_draws() {
        let mut pool = WordPool::new(vec![WordPair::new("x", "y")]).unwrap();
        let mut rng = DeterministicRng::new(13);
        for _ in 0..5 {
            assert_eq!(pool.next_pair(&mut rng), WordPair::new("x", "y"));
        }
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(WordPool::new(Vec::new()), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_builtin_pairs_are_distinct() {
        let pool = WordPool::builtin();
        assert!(pool.len() > RECENT_PAIR_MEMORY);
        for (a, b) in BUILTIN_PAIRS {
            assert_ne!(a, b);
        }
    }
}
