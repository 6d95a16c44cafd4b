//! Undercover demo
//!
//! Plays a seeded game with scripted votes, saves the table, then
//! replays the same seed and checks both runs hash identically.

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use undercover::{
    VERSION,
    game::{
        config::{GameConfig, RoleOptions},
        events::GameEventData,
        roster::Roster,
        session::GameSession,
        state::PlayerId,
        words::WordPool,
    },
    storage::{FeedbackSettings, MemoryStore, SavedState, Store},
};

const DEMO_SEED: u64 = 12345;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Undercover Engine v{}", VERSION);

    let mut roster = Roster::new();
    for name in ["Alice", "Bastien", "Chloé", "David", "Emma", "Farid", "Gaëlle"] {
        roster.add(name)?;
    }

    let mut config = GameConfig::with_players(roster.seeds().to_vec());
    config.roles = RoleOptions {
        enable_oracle: true,
        enable_saboteur: true,
        ..RoleOptions::default()
    };

    let mut store = MemoryStore::new();
    store.save(&SavedState::new(config.clone(), roster, FeedbackSettings::default())?)?;
    let saved = store.load()?.context("save slot empty after save")?;
    info!("Saved table of {} players ({})", saved.roster.len(), &saved.checksum[..16]);

    // The configuration carries its own copy of the seats
    if Roster::from_seeds(saved.config.players.clone()) != saved.roster {
        bail!("saved configuration and roster disagree");
    }

    info!("=== Starting Demo Game ===");
    let hash = play(saved.config.clone())?;
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Determinism ===");
    let replay_hash = play(saved.config)?;
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("replay diverged");
    }
    info!("✓ Determinism verified - hashes match!");

    Ok(())
}

/// Play one game to the end and return the final state hash.
fn play(config: GameConfig) -> Result<[u8; 32]> {
    let mut pool = WordPool::builtin();
    let mut session = GameSession::with_seed(config, &mut pool, DEMO_SEED)?;
    info!(
        "Words: civilians '{}', impostor '{}'",
        session.words().civilian,
        session.words().impostor
    );

    while let Some(id) = session.current_revealer().map(|p| p.id) {
        let card = session.card(&id)?;
        info!("{} reveals {} ({:?})", card.name, card.role.label(), card.word);
        session.acknowledge_reveal(&id)?;
    }

    while !session.phase().is_terminal() {
        session.open_vote()?;

        // Everyone votes for the next living player; every third round
        // the last voter abstains
        let living: Vec<PlayerId> = session.living_players().map(|p| p.id).collect();
        for (i, voter) in living.iter().enumerate() {
            let nominee = if session.round() % 3 == 0 && i + 1 == living.len() {
                None
            } else {
                Some(living[(i + 1) % living.len()])
            };
            session.cast_vote(voter, nominee.as_ref())?;
        }

        let resolution = session.close_vote()?;
        let target_votes = resolution
            .target
            .map_or(0, |t| resolution.tally.count_for(&t.player_id));
        info!(
            "Round {}: top count {}, target had {}, {:?}",
            resolution.round, resolution.tally.max_count, target_votes, resolution.outcome
        );
    }

    for event in session.take_events() {
        match &event.data {
            GameEventData::PlayerEliminated { player_id, role, reason } => {
                info!(
                    "Round {}: player {} ({}) eliminated by {:?}",
                    event.round,
                    hex::encode(&player_id.as_bytes()[..4]),
                    role.label(),
                    reason
                );
            }
            GameEventData::GameEnded { winner } => info!("{}", winner.message()),
            data => {
                if let Some(id) = event.player_id() {
                    debug!("Round {}: {} {:?}", event.round, id, data);
                }
            }
        }
    }

    info!("=== Final Reveal ===");
    for entry in session.final_reveal()? {
        info!(
            "{}: {} {:?}{}",
            entry.name,
            entry.role.label(),
            entry.word,
            if entry.eliminated { " (eliminated)" } else { "" }
        );
    }

    Ok(session.compute_hash())
}
