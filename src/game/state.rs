//! Game State Definitions
//!
//! Players, roles and phases. The session aggregate that owns them lives
//! in `session.rs`.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::game::config::PlayerSeed;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord so it can key a BTreeMap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().into_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s)
            .ok()
            .map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..4]))
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Hidden role dealt to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    /// Holds the minority word and tries to blend in.
    Impostor = 0,
    /// Impostor-aligned, receives no word at all.
    Blank = 1,
    /// Optional role.
    Saboteur = 2,
    /// Optional role.
    Oracle = 3,
    /// Optional role.
    Guardian = 4,
    /// Optional role.
    Chameleon = 5,
    /// Default role, holds the majority word.
    Civilian = 6,
}

/// Optional roles in the order they are dealt.
pub const OPTIONAL_ROLE_ORDER: [Role; 4] = [
    Role::Saboteur,
    Role::Oracle,
    Role::Guardian,
    Role::Chameleon,
];

impl Role {
    /// Team this role counts for in the majority check.
    pub fn alignment(self) -> Alignment {
        match self {
            Role::Impostor | Role::Blank => Alignment::Impostors,
            Role::Saboteur
            | Role::Oracle
            | Role::Guardian
            | Role::Chameleon
            | Role::Civilian => Alignment::Civilians,
        }
    }

    /// Does this role get a word on its card?
    pub fn receives_word(self) -> bool {
        self != Role::Blank
    }

    /// Name shown on the player's card.
    pub fn label(self) -> &'static str {
        match self {
            Role::Impostor => "Undercover",
            Role::Blank => "Mr. White",
            Role::Saboteur => "Saboteur",
            Role::Oracle => "Oracle",
            Role::Guardian => "Gardien",
            Role::Chameleon => "Caméléon",
            Role::Civilian => "Civil",
        }
    }
}

/// Side a role plays for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Civilians and every optional role.
    Civilians,
    /// Impostor and Blank.
    Impostors,
}

// =============================================================================
// PLAYER
// =============================================================================

/// A player at the table.
///
/// Players are never removed mid-game; elimination only flips
/// `eliminated` so the final reveal still lists everyone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player ID
    pub id: PlayerId,

    /// Display name (trimmed, non-empty)
    pub name: String,

    /// Role, `None` until roles are dealt
    pub role: Option<Role>,

    /// Secret word, `None` until dealt and always `None` for Blank
    pub word: Option<String>,

    /// Out of play?
    pub eliminated: bool,

    /// Votes received in the current voting phase
    pub vote_count: u32,
}

impl Player {
    /// Create an undealt player from a roster seed.
    pub fn new(seed: &PlayerSeed) -> Self {
        Self {
            id: seed.id,
            name: seed.name.clone(),
            role: None,
            word: None,
            eliminated: false,
            vote_count: 0,
        }
    }

    /// Still in play?
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.eliminated
    }

    /// Role with the undealt case folded into Civilian.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::Civilian)
    }

    /// Avatar initial for the card.
    pub fn avatar(&self) -> char {
        avatar_initial(&self.name)
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_uuid(&self.id.0);
        hasher.update_str(&self.name);
        hasher.update_u8(self.role.map_or(u8::MAX, |r| r as u8));
        hasher.update_opt_str(self.word.as_deref());
        hasher.update_bool(self.eliminated);
        hasher.update_u32(self.vote_count);
    }
}

/// First character of a name, upper-cased.
pub fn avatar_initial(name: &str) -> char {
    name.chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

// =============================================================================
// PHASE
// =============================================================================

/// Current phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Players look at their cards one by one, in roster order.
    Reveal {
        /// Roster index of the player whose card is up.
        turn: usize,
    },
    /// Players give clues.
    Discussion,
    /// Votes are being collected.
    Vote,
    /// Votes closed; elimination and win check in progress.
    Resolve,
    /// Game over.
    Result,
}

impl Phase {
    /// Short name for logs and hashing.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Reveal { .. } => "reveal",
            Phase::Discussion => "discussion",
            Phase::Vote => "vote",
            Phase::Resolve => "resolve",
            Phase::Result => "result",
        }
    }

    /// Has the game ended?
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_uuid_roundtrip() {
        let id = PlayerId::random();
        assert_eq!(PlayerId::from_uuid_str(&id.to_uuid_string()), Some(id));
        assert_eq!(PlayerId::new(*id.as_bytes()), id);
        assert_eq!(PlayerId::from_uuid_str("not-a-uuid"), None);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(Role::Impostor.alignment(), Alignment::Impostors);
        assert_eq!(Role::Blank.alignment(), Alignment::Impostors);
        assert_eq!(Role::Civilian.alignment(), Alignment::Civilians);
        for role in OPTIONAL_ROLE_ORDER {
            assert_eq!(role.alignment(), Alignment::Civilians);
        }
    }

    #[test]
    fn test_only_blank_is_wordless() {
        assert!(!Role::Blank.receives_word());
        assert!(Role::Impostor.receives_word());
        assert!(Role::Chameleon.receives_word());
    }

    #[test]
    fn test_undealt_player_counts_as_civilian() {
        let seed = PlayerSeed::new(PlayerId::new([1; 16]), "alice");
        let player = Player::new(&seed);
        assert_eq!(player.role, None);
        assert_eq!(player.effective_role(), Role::Civilian);
        assert!(player.is_alive());
    }

    #[test]
    fn test_avatar_initial() {
        assert_eq!(avatar_initial("élodie"), 'É');
        assert_eq!(avatar_initial("bob"), 'B');
        assert_eq!(avatar_initial(""), '?');
    }
}
