//! Role Assignment
//!
//! Deals hidden roles over a shuffled roster:
//!
//! 1. slot 0 is always the Impostor
//! 2. slot 1 is the Blank when the roster has at least
//!    `BLANK_MIN_PLAYERS` players
//! 3. each enabled optional role takes the next free slot, in
//!    `OPTIONAL_ROLE_ORDER`
//! 4. everyone else is a Civilian
//!
//! When the roster runs out of free slots an optional role is skipped
//! and reported in `RoleAssignment::skipped`. A player never holds two
//! roles.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::config::RoleOptions;
use crate::game::error::{GameError, GameResult};
use crate::game::state::{PlayerId, Role};
use crate::{BLANK_MIN_PLAYERS, MIN_PLAYERS};

/// An optional role that could not be dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSkipped {
    /// Role left out.
    pub role: Role,
    /// Roster size at the time.
    pub roster_size: usize,
}

/// Result of dealing roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Role of every roster player, Civilians included.
    pub roles: BTreeMap<PlayerId, Role>,
    /// Optional roles that found no free player.
    pub skipped: Vec<RoleSkipped>,
}

impl RoleAssignment {
    /// Role of a player; Civilian for ids outside the roster.
    pub fn role_of(&self, id: &PlayerId) -> Role {
        self.roles.get(id).copied().unwrap_or(Role::Civilian)
    }

    /// Players holding a given role.
    pub fn holders(&self, role: Role) -> impl Iterator<Item = PlayerId> + '_ {
        self.roles
            .iter()
            .filter(move |(_, r)| **r == role)
            .map(|(id, _)| *id)
    }
}

/// Deal roles over a roster.
///
/// Fails with `InsufficientPlayers` below `MIN_PLAYERS`.
pub fn assign_roles(
    roster: &[PlayerId],
    options: &RoleOptions,
    rng: &mut DeterministicRng,
) -> GameResult<RoleAssignment> {
    if roster.len() < MIN_PLAYERS {
        return Err(GameError::InsufficientPlayers {
            count: roster.len(),
            min: MIN_PLAYERS,
        });
    }

    let mut order = roster.to_vec();
    rng.shuffle(&mut order);

    let mut roles: BTreeMap<PlayerId, Role> =
        roster.iter().map(|id| (*id, Role::Civilian)).collect();
    let mut next_slot = 0;

    roles.insert(order[next_slot], Role::Impostor);
    next_slot += 1;

    if order.len() >= BLANK_MIN_PLAYERS {
        roles.insert(order[next_slot], Role::Blank);
        next_slot += 1;
    }

    let mut skipped = Vec::new();
    for role in options.enabled() {
        match order.get(next_slot) {
            Some(id) => {
                roles.insert(*id, role);
                next_slot += 1;
            }
            None => skipped.push(RoleSkipped {
                role,
                roster_size: order.len(),
            }),
        }
    }

    Ok(RoleAssignment { roles, skipped })
}
