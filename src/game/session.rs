//! Game Session
//!
//! The aggregate the presentation layer owns for one table. Every
//! operation is synchronous, validates before it mutates, and records
//! what happened as `GameEvent`s.
//!
//! Typical flow:
//!
//! ```text
//! new -> acknowledge_reveal x N -> open_vote -> cast_vote* -> close_vote
//!                                     ^                          |
//!                                     +------ (continue) --------+
//!                                                                |
//!                     play_again <- final_reveal <- (ended) -----+
//! ```

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::{derive_session_seed, DeterministicRng};
use crate::game::config::{GameConfig, RoleOptions, Timers};
use crate::game::error::{GameError, GameResult};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::roles::{assign_roles, RoleAssignment};
use crate::game::round::{next_phase, Trigger};
use crate::game::state::{Phase, Player, PlayerId, Role};
use crate::game::vote::{choose_target, tally, Ballots, EliminationTarget, TargetReason, VoteTally};
use crate::game::win::{evaluate, Outcome, Winner};
use crate::game::words::{distribute_words, DealtWords, WordPairProvider};
use crate::MIN_PLAYERS;

/// Unique session identifier.
pub type SessionId = [u8; 16];

/// What a player sees when their card is turned over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Card owner.
    pub player_id: PlayerId,
    /// Owner's name.
    pub name: String,
    /// Dealt role.
    pub role: Role,
    /// Secret word; `None` for the Blank.
    pub word: Option<String>,
}

/// Outcome of closing a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Round the vote belonged to.
    pub round: u32,
    /// Counted ballots.
    pub tally: VoteTally,
    /// Who was eliminated and why.
    pub target: Option<EliminationTarget>,
    /// Role of the eliminated player.
    pub eliminated_role: Option<Role>,
    /// Win check after the elimination.
    pub outcome: Outcome,
}

/// One line of the end-of-game reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealEntry {
    /// Player.
    pub player_id: PlayerId,
    /// Name.
    pub name: String,
    /// Role held this game.
    pub role: Role,
    /// Word held this game.
    pub word: Option<String>,
    /// Out before the end?
    pub eliminated: bool,
}

/// A game in progress at one table.
pub struct GameSession {
    /// Unique session identifier.
    id: SessionId,
    /// Copy of the configuration the session started from.
    config: GameConfig,
    /// Players, in roster order.
    players: Vec<Player>,
    /// Dealt role per player, Civilians included.
    roles: BTreeMap<PlayerId, Role>,
    /// The pair as oriented for this game.
    words: DealtWords,
    /// Current phase.
    phase: Phase,
    /// Current round, starting at 1.
    round: u32,
    /// Game number, +1 per `play_again`.
    game: u32,
    /// Elimination order for this game.
    eliminated_order: Vec<PlayerId>,
    /// Ballots of the open vote.
    ballots: Ballots,
    /// Last closed vote.
    last_resolution: Option<Resolution>,
    /// Every event since the session was created.
    history: Vec<GameEvent>,
    /// Events not yet taken by the presentation layer.
    pending_events: Vec<GameEvent>,
    /// RNG seed (for verification).
    rng_seed: u64,
    /// Deterministic RNG state.
    rng: DeterministicRng,
}

impl GameSession {
    /// Start a game with a seed derived from a fresh session id.
    pub fn new<P: WordPairProvider>(config: GameConfig, provider: &mut P) -> GameResult<Self> {
        let id = uuid::Uuid::new_v4().into_bytes();
        let player_ids: Vec<[u8; 16]> = config.players.iter().map(|p| p.id.0).collect();
        let seed = derive_session_seed(&id, &player_ids);
        Self::create(id, config, provider, seed)
    }

    /// Start a game from an explicit seed. Same seed, config and
    /// provider give the same deal.
    pub fn with_seed<P: WordPairProvider>(
        config: GameConfig,
        provider: &mut P,
        seed: u64,
    ) -> GameResult<Self> {
        Self::create(uuid::Uuid::new_v4().into_bytes(), config, provider, seed)
    }

    fn create<P: WordPairProvider>(
        id: SessionId,
        config: GameConfig,
        provider: &mut P,
        seed: u64,
    ) -> GameResult<Self> {
        if config.players.len() < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                count: config.players.len(),
                min: MIN_PLAYERS,
            });
        }
        config.validate()?;

        let mut rng = DeterministicRng::new(seed);
        let mut players: Vec<Player> = config.players.iter().map(Player::new).collect();
        let (assignment, words) = deal(&mut players, &config.roles, provider, &mut rng)?;

        let mut session = Self {
            id,
            config,
            players,
            roles: assignment.roles.clone(),
            words,
            phase: Phase::Reveal { turn: 0 },
            round: 1,
            game: 1,
            eliminated_order: Vec::new(),
            ballots: Ballots::new(),
            last_resolution: None,
            history: Vec::new(),
            pending_events: Vec::new(),
            rng_seed: seed,
            rng,
        };

        session.record_deal(&assignment);
        info!(
            "Session {} started with {} players",
            hex::encode(&session.id[..4]),
            session.players.len()
        );

        Ok(session)
    }

    // =========================================================================
    // REVEAL
    // =========================================================================

    /// Player whose card is up, while revealing.
    pub fn current_revealer(&self) -> Option<&Player> {
        match self.phase {
            Phase::Reveal { turn } => self.players.get(turn),
            _ => None,
        }
    }

    /// A player's card.
    pub fn card(&self, id: &PlayerId) -> GameResult<Card> {
        let player = self.player(id).ok_or(GameError::UnknownPlayer(*id))?;
        Ok(Card {
            player_id: player.id,
            name: player.name.clone(),
            role: player.effective_role(),
            word: player.word.clone(),
        })
    }

    /// The current revealer has seen their card; pass the device on.
    ///
    /// After the last player the session moves to Discussion.
    pub fn acknowledge_reveal(&mut self, id: &PlayerId) -> GameResult<Phase> {
        let turn = match self.phase {
            Phase::Reveal { turn } => turn,
            phase => {
                return Err(GameError::InvalidPhaseTransition {
                    operation: Trigger::RevealAcknowledged.operation(),
                    phase,
                })
            }
        };

        self.index_of(id)?;
        let expected = self.players[turn].id;
        if expected != *id {
            return Err(GameError::OutOfTurn { expected, actual: *id });
        }

        self.push_event(GameEventData::CardRevealed { player_id: *id });
        self.apply(Trigger::RevealAcknowledged)
    }

    // =========================================================================
    // VOTE
    // =========================================================================

    /// End the discussion and start collecting votes.
    pub fn open_vote(&mut self) -> GameResult<()> {
        self.apply(Trigger::OpenVote)?;
        self.clear_votes();
        Ok(())
    }

    /// Cast or replace a ballot. `None` abstains.
    ///
    /// Voter and nominee must both be alive.
    pub fn cast_vote(&mut self, voter: &PlayerId, nominee: Option<&PlayerId>) -> GameResult<()> {
        if self.phase != Phase::Vote {
            return Err(GameError::InvalidPhaseTransition {
                operation: "cast a vote",
                phase: self.phase,
            });
        }

        self.require_alive(voter)?;
        if let Some(nominee) = nominee {
            self.require_alive(nominee)?;
        }

        if let Some(Some(previous)) = self.ballots.insert(*voter, nominee.copied()) {
            if let Some(p) = self.player_mut(&previous) {
                p.vote_count = p.vote_count.saturating_sub(1);
            }
        }
        if let Some(nominee) = nominee {
            if let Some(p) = self.player_mut(nominee) {
                p.vote_count += 1;
            }
        }

        debug!("Vote {} -> {:?}", voter, nominee.map(|n| n.to_string()));
        self.push_event(GameEventData::VoteCast {
            voter: *voter,
            nominee: nominee.copied(),
        });
        Ok(())
    }

    /// Count the open vote without closing it.
    pub fn current_tally(&self) -> VoteTally {
        tally(&self.ballots)
    }

    /// Close the vote: count, eliminate, check for a winner.
    ///
    /// Ties and empty votes eliminate a player drawn from everyone still
    /// alive (see `vote::choose_target`). The session leaves Resolve
    /// before returning: back to Discussion with the round incremented,
    /// or on to Result.
    pub fn close_vote(&mut self) -> GameResult<Resolution> {
        self.apply(Trigger::CloseVote)?;

        let round = self.round;
        let counted = tally(&self.ballots);
        self.push_event(GameEventData::VoteClosed {
            max_count: counted.max_count,
            top_nominees: counted.top_nominees.iter().copied().collect(),
        });

        let living = self.living_ids();
        let target = choose_target(&counted, &living, &mut self.rng);
        let mut eliminated_role = None;
        if let Some(target) = target {
            let index = self.index_of(&target.player_id)?;
            eliminated_role = Some(self.players[index].effective_role());
            self.remove_from_play(index, target.reason);
        }

        let outcome = evaluate(&self.players);
        self.clear_votes();
        if !outcome.is_ended() {
            self.round += 1;
        }
        self.apply(Trigger::Resolved(outcome))?;
        if let Outcome::Ended { winner } = outcome {
            self.finish(winner);
        }

        let resolution = Resolution {
            round,
            tally: counted,
            target,
            eliminated_role,
            outcome,
        };
        self.last_resolution = Some(resolution.clone());
        Ok(resolution)
    }

    // =========================================================================
    // ELIMINATION
    // =========================================================================

    /// Remove a player outside a vote count (Discussion or Vote), then
    /// run the win check.
    ///
    /// Eliminating someone already out is a no-op and returns `Ok(None)`;
    /// neither the elimination order nor the history change.
    pub fn eliminate(&mut self, id: &PlayerId) -> GameResult<Option<Outcome>> {
        let index = self.index_of(id)?;
        if self.players[index].eliminated {
            debug!("Player {} already eliminated, ignoring", id);
            return Ok(None);
        }

        if !matches!(self.phase, Phase::Discussion | Phase::Vote) {
            return Err(GameError::InvalidPhaseTransition {
                operation: "eliminate a player",
                phase: self.phase,
            });
        }

        self.drop_ballots_involving(id);
        self.remove_from_play(index, TargetReason::Manual);

        let outcome = evaluate(&self.players);
        self.apply(Trigger::Resolved(outcome))?;
        if let Outcome::Ended { winner } = outcome {
            self.finish(winner);
        }
        Ok(Some(outcome))
    }

    /// Win check over the current table.
    pub fn evaluate(&self) -> Outcome {
        evaluate(&self.players)
    }

    // =========================================================================
    // RESULT / RESTART
    // =========================================================================

    /// Winner, once the game is over.
    pub fn winner(&self) -> Option<Winner> {
        if self.phase.is_terminal() {
            evaluate(&self.players).winner()
        } else {
            None
        }
    }

    /// Every player's role and word. Only available once the game is over.
    pub fn final_reveal(&self) -> GameResult<Vec<RevealEntry>> {
        if !self.phase.is_terminal() {
            return Err(GameError::InvalidPhaseTransition {
                operation: "reveal all cards",
                phase: self.phase,
            });
        }

        Ok(self
            .players
            .iter()
            .map(|p| RevealEntry {
                player_id: p.id,
                name: p.name.clone(),
                role: p.effective_role(),
                word: p.word.clone(),
                eliminated: p.eliminated,
            })
            .collect())
    }

    /// Deal a new game to the same table, reusing the roster and id.
    ///
    /// Only valid once the current game is over.
    pub fn play_again<P: WordPairProvider>(&mut self, provider: &mut P) -> GameResult<()> {
        let to = next_phase(self.phase, Trigger::Restart, self.players.len())?;

        for player in &mut self.players {
            player.eliminated = false;
            player.vote_count = 0;
            player.role = None;
            player.word = None;
        }
        let (assignment, words) =
            deal(&mut self.players, &self.config.roles, provider, &mut self.rng)?;

        let from = self.phase;
        self.game += 1;
        self.round = 1;
        self.eliminated_order.clear();
        self.ballots.clear();
        self.last_resolution = None;
        self.roles = assignment.roles.clone();
        self.words = words;
        self.phase = to;

        self.push_event(GameEventData::PhaseChanged { from, to });
        self.push_event(GameEventData::GameRestarted);
        self.record_deal(&assignment);
        info!("Session {} restarted (game {})", hex::encode(&self.id[..4]), self.game);
        Ok(())
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Configuration copy.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Countdown lengths for the presentation layer.
    pub fn timers(&self) -> Timers {
        self.config.timers()
    }

    /// Players in roster order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by ID.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    /// Players still in play, in roster order.
    pub fn living_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    /// Dealt roles.
    pub fn roles(&self) -> &BTreeMap<PlayerId, Role> {
        &self.roles
    }

    /// The oriented word pair.
    pub fn words(&self) -> &DealtWords {
        &self.words
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round (1-based).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Game number within the session.
    pub fn game_number(&self) -> u32 {
        self.game
    }

    /// Elimination order of the current game.
    pub fn eliminated_order(&self) -> &[PlayerId] {
        &self.eliminated_order
    }

    /// Ballots of the open vote.
    pub fn ballots(&self) -> &Ballots {
        &self.ballots
    }

    /// Last closed vote of the current game.
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    /// Every event since the session started.
    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Seed the session was created with.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Fingerprint of the table for replay checks.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.round, self.rng_seed, |hasher| {
            hasher.update_u32(self.game);
            hasher.update_str(self.phase.name());
            if let Phase::Reveal { turn } = self.phase {
                hasher.update_u32(turn as u32);
            }

            for player in &self.players {
                player.hash_into(hasher);
            }

            hasher.update_str(&self.words.civilian);
            hasher.update_str(&self.words.impostor);

            for id in &self.eliminated_order {
                hasher.update_uuid(id.as_bytes());
            }

            for (voter, nominee) in &self.ballots {
                hasher.update_uuid(voter.as_bytes());
                match nominee {
                    Some(n) => hasher.update_uuid(n.as_bytes()),
                    None => hasher.update_u8(0),
                }
            }
        })
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn index_of(&self, id: &PlayerId) -> GameResult<usize> {
        self.players
            .iter()
            .position(|p| p.id == *id)
            .ok_or(GameError::UnknownPlayer(*id))
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == *id)
    }

    fn require_alive(&self, id: &PlayerId) -> GameResult<()> {
        let index = self.index_of(id)?;
        if self.players[index].eliminated {
            return Err(GameError::AlreadyEliminated(*id));
        }
        Ok(())
    }

    fn living_ids(&self) -> Vec<PlayerId> {
        self.living_players().map(|p| p.id).collect()
    }

    fn apply(&mut self, trigger: Trigger) -> GameResult<Phase> {
        let from = self.phase;
        let to = next_phase(from, trigger, self.players.len())?;
        if to != from {
            self.phase = to;
            debug!("Phase {} -> {} (round {})", from.name(), to.name(), self.round);
            self.push_event(GameEventData::PhaseChanged { from, to });
        }
        Ok(to)
    }

    fn clear_votes(&mut self) {
        self.ballots.clear();
        for player in &mut self.players {
            player.vote_count = 0;
        }
    }

    fn drop_ballots_involving(&mut self, id: &PlayerId) {
        if let Some(Some(nominee)) = self.ballots.remove(id) {
            if let Some(p) = self.player_mut(&nominee) {
                p.vote_count = p.vote_count.saturating_sub(1);
            }
        }
        for nominee in self.ballots.values_mut() {
            if nominee.as_ref() == Some(id) {
                *nominee = None;
            }
        }
        if let Some(p) = self.player_mut(id) {
            p.vote_count = 0;
        }
    }

    fn remove_from_play(&mut self, index: usize, reason: TargetReason) {
        let player = &mut self.players[index];
        player.eliminated = true;
        player.vote_count = 0;
        let (player_id, role) = (player.id, player.effective_role());

        self.eliminated_order.push(player_id);
        info!("Player {} eliminated in round {} ({:?})", player_id, self.round, reason);
        self.push_event(GameEventData::PlayerEliminated { player_id, role, reason });
    }

    fn finish(&mut self, winner: Winner) {
        info!("Game {} over after {} rounds: {:?} win", self.game, self.round, winner);
        self.push_event(GameEventData::GameEnded { winner });
    }

    fn record_deal(&mut self, assignment: &RoleAssignment) {
        for skipped in &assignment.skipped {
            warn!(
                "No free player for {:?} with {} players, role skipped",
                skipped.role, skipped.roster_size
            );
            self.push_event(GameEventData::RoleSkipped(*skipped));
        }
        self.push_event(GameEventData::GameStarted {
            players: self.players.len(),
        });
    }

    fn push_event(&mut self, data: GameEventData) {
        let event = GameEvent::new(self.game, self.round, data);
        self.history.push(event.clone());
        self.pending_events.push(event);
    }
}

/// Deal roles and words onto undealt players.
fn deal<P: WordPairProvider>(
    players: &mut [Player],
    options: &RoleOptions,
    provider: &mut P,
    rng: &mut DeterministicRng,
) -> GameResult<(RoleAssignment, DealtWords)> {
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let assignment = assign_roles(&ids, options, rng)?;

    for player in players.iter_mut() {
        player.role = Some(assignment.role_of(&player.id));
    }

    let pair = provider.next_pair(rng);
    let words = distribute_words(players, &assignment, pair, rng);
    Ok((assignment, words))
}

// =============================================================================
// TESTS
// =============================================================================
