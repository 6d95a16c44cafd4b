//! Game configuration.
//!
//! A session copies its `GameConfig` at creation; later edits to the
//! caller's copy never reach a running game.

use serde::{Serialize, Deserialize};

use crate::game::error::{GameError, GameResult};
use crate::game::state::{PlayerId, Role, OPTIONAL_ROLE_ORDER};

/// Default clue countdown (seconds).
pub const DEFAULT_CLUE_TIME_SECONDS: u32 = 45;

/// Default vote countdown (seconds).
pub const DEFAULT_VOTE_TIME_SECONDS: u32 = 30;

/// Game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One word pair, one impostor, vote until a side wins.
    #[default]
    Classic,
}

/// A roster entry before the game deals anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSeed {
    /// Player identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
}

impl PlayerSeed {
    /// Create a seed.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Countdown lengths the presentation layer runs.
///
/// The engine never reads a clock; on expiry the UI calls the same
/// operation a button press would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timers {
    /// Clue (discussion) countdown.
    pub clue_time_seconds: u32,
    /// Vote countdown.
    pub vote_time_seconds: u32,
}

/// Which optional roles are dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleOptions {
    /// Deal a Saboteur.
    pub enable_saboteur: bool,
    /// Deal an Oracle.
    pub enable_oracle: bool,
    /// Deal a Guardian.
    pub enable_guardian: bool,
    /// Deal a Chameleon.
    pub enable_chameleon: bool,
}

impl RoleOptions {
    /// Is this optional role switched on? Base roles always answer false.
    pub fn is_enabled(&self, role: Role) -> bool {
        match role {
            Role::Saboteur => self.enable_saboteur,
            Role::Oracle => self.enable_oracle,
            Role::Guardian => self.enable_guardian,
            Role::Chameleon => self.enable_chameleon,
            Role::Impostor | Role::Blank | Role::Civilian => false,
        }
    }

    /// Enabled optional roles, in dealing order.
    pub fn enabled(&self) -> impl Iterator<Item = Role> + '_ {
        OPTIONAL_ROLE_ORDER.into_iter().filter(|r| self.is_enabled(*r))
    }

    /// Every optional role on.
    pub fn all() -> Self {
        Self {
            enable_saboteur: true,
            enable_oracle: true,
            enable_guardian: true,
            enable_chameleon: true,
        }
    }
}

/// Everything needed to start a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game mode.
    pub mode: GameMode,
    /// Clue countdown (seconds, > 0).
    pub clue_time_seconds: u32,
    /// Vote countdown (seconds, > 0).
    pub vote_time_seconds: u32,
    /// Optional roles.
    pub roles: RoleOptions,
    /// Roster, in reveal order.
    pub players: Vec<PlayerSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            clue_time_seconds: DEFAULT_CLUE_TIME_SECONDS,
            vote_time_seconds: DEFAULT_VOTE_TIME_SECONDS,
            roles: RoleOptions::default(),
            players: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Default config over the given roster.
    pub fn with_players(players: Vec<PlayerSeed>) -> Self {
        Self { players, ..Self::default() }
    }

    /// Countdown lengths.
    pub fn timers(&self) -> Timers {
        Timers {
            clue_time_seconds: self.clue_time_seconds,
            vote_time_seconds: self.vote_time_seconds,
        }
    }

    /// Check timers and roster ids. Roster size is checked at game start.
    pub fn validate(&self) -> GameResult<()> {
        if self.clue_time_seconds == 0 {
            return Err(GameError::InvalidConfig("clue time must be positive".into()));
        }
        if self.vote_time_seconds == 0 {
            return Err(GameError::InvalidConfig("vote time must be positive".into()));
        }

        for (i, seed) in self.players.iter().enumerate() {
            if seed.name.trim().is_empty() {
                return Err(GameError::EmptyPlayerName);
            }
            if self.players[..i].iter().any(|p| p.id == seed.id) {
                return Err(GameError::DuplicatePlayer(seed.id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_last_config() {
        let config = GameConfig::default();
        assert_eq!(config.mode, GameMode::Classic);
        assert_eq!(config.timers(), Timers { clue_time_seconds: 45, vote_time_seconds: 30 });
        assert_eq!(config.roles.enabled().count(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timer_rejected() {
        let config = GameConfig { vote_time_seconds: 0, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let id = PlayerId::new([7; 16]);
        let config = GameConfig::with_players(vec![
            PlayerSeed::new(id, "a"),
            PlayerSeed::new(id, "b"),
        ]);
        assert_eq!(config.validate(), Err(GameError::DuplicatePlayer(id)));
    }

    #[test]
    fn test_enabled_roles_keep_dealing_order() {
        let options = RoleOptions {
            enable_chameleon: true,
            enable_saboteur: true,
            ..RoleOptions::default()
        };
        let roles: Vec<Role> = options.enabled().collect();
        assert_eq!(roles, vec![Role::Saboteur, Role::Chameleon]);
    }

    #[test]
    fn test_json_shape() {
        let config = GameConfig {
            roles: RoleOptions { enable_oracle: true, ..RoleOptions::default() },
            ..GameConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["roles"]["enable_oracle"], true);
        assert_eq!(json["mode"], "classic");

        let back: GameConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
