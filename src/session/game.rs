//! One match: state machine, decks, connections and timers.
//!
//! `GameSession` is synchronous and owns everything about a match. The
//! async `SessionManager` keeps each session behind its own mutex and
//! drives the round pacing; every rule decision happens here.
//!
//! ## Key Types
//!
//! - `GameSession`: the match itself
//! - `Decks`: one shared deck (classic) or one deck per player (token)
//! - `LeaveOutcome` / `VoteOutcome`: what a removal or vote changed

use rustc_hash::FxHashMap;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::ai::{plan_registers, AiConfig, Difficulty};
use crate::board::{presets, Board, Direction, Position};
use crate::cards::{create_deck, create_personal_deck, Card, CardId, Deck, PERSONAL_DECK_SIZE};
use crate::core::{
    ConnectionId, GameConfig, GameError, GameRng, GameState, Phase, Player, PlayerId, Result, Robot,
    Ruleset, ServerConfig, REGISTER_COUNT,
};
use crate::events::{AnimationEvent, AnimationLog};
use crate::rules::{check_winner, execute_register, respawn_destroyed, MatchOutcome, RegisterReport};

/// Robot colours handed out in seating order.
pub const PLAYER_COLORS: [&str; 8] = [
    "red", "blue", "green", "yellow", "purple", "orange", "cyan", "pink",
];

/// Card storage for the active ruleset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decks {
    /// Not dealt yet (lobby).
    Unset,
    Shared(Deck),
    Personal(FxHashMap<PlayerId, Deck>),
}

impl Decks {
    fn deck_for(&mut self, player: PlayerId) -> Option<&mut Deck> {
        match self {
            Decks::Unset => None,
            Decks::Shared(deck) => Some(deck),
            Decks::Personal(decks) => decks.get_mut(&player),
        }
    }

    /// Cards held in draw and discard piles across all decks.
    #[must_use]
    pub fn total(&self) -> usize {
        match self {
            Decks::Unset => 0,
            Decks::Shared(deck) => deck.total(),
            Decks::Personal(decks) => decks.values().map(Deck::total).sum(),
        }
    }

    /// Every card id held in draw and discard piles.
    #[must_use]
    pub fn card_ids(&self) -> Vec<CardId> {
        match self {
            Decks::Unset => Vec::new(),
            Decks::Shared(deck) => deck.card_ids().collect(),
            Decks::Personal(decks) => decks.values().flat_map(Deck::card_ids).collect(),
        }
    }
}

/// A pending removal of a disconnected player.
#[derive(Debug)]
struct DisconnectTimer {
    generation: u64,
    handle: AbortHandle,
}

/// Result of removing a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub removed: PlayerId,
    /// The connection the player was bound to, if any.
    pub connection: Option<ConnectionId>,
    /// Set when the host left and someone else took over.
    pub new_host: Option<PlayerId>,
    /// No human players remain; the session should be dropped.
    pub abandoned: bool,
}

/// Result of a disconnect vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    Pending { kick_votes: usize, needed: usize },
    Kicked(LeaveOutcome),
}

/// A single match.
#[derive(Debug)]
pub struct GameSession {
    pub state: GameState,
    rng: GameRng,
    decks: Decks,
    connections: FxHashMap<ConnectionId, PlayerId>,
    player_connections: FxHashMap<PlayerId, ConnectionId>,
    timers: FxHashMap<PlayerId, DisconnectTimer>,
    timer_generation: u64,
    /// target -> voter -> kick?
    votes: FxHashMap<PlayerId, FxHashMap<PlayerId, bool>>,
    log: AnimationLog,
    /// Events already handed out by `drain_animation`.
    log_cursor: usize,
    next_player_id: u32,
    next_card_id: u32,
    min_players: usize,
    ai: AiConfig,
    closed: bool,
}

/// Spawn facing: towards the far side of the board.
fn spawn_direction(board: &Board, at: Position) -> Direction {
    if at.y * 2 >= board.height {
        Direction::North
    } else {
        Direction::South
    }
}

impl GameSession {
    /// Create a session in the lobby with `host_name` seated as host.
    pub fn create(
        code: impl Into<String>,
        host_conn: ConnectionId,
        host_name: impl Into<String>,
        config: &ServerConfig,
        game: GameConfig,
        rng: GameRng,
    ) -> Result<Self> {
        let board = presets::by_name(&game.board).ok_or_else(|| GameError::UnknownBoard(game.board.clone()))?;
        let max_players = config.max_players.min(board.spawn_points.len()).max(1);
        let host_id = PlayerId::new(1);
        let robot = Self::robot_for_seat(&board, &game, 0);
        let host = Player::new(host_id, host_name, PLAYER_COLORS[0], robot);
        let state = GameState::new(code, board, game, host, max_players);

        let mut session = Self {
            state,
            rng,
            decks: Decks::Unset,
            connections: FxHashMap::default(),
            player_connections: FxHashMap::default(),
            timers: FxHashMap::default(),
            timer_generation: 0,
            votes: FxHashMap::default(),
            log: AnimationLog::new(),
            log_cursor: 0,
            next_player_id: 2,
            next_card_id: 1,
            min_players: config.min_players,
            ai: config.ai.clone(),
            closed: false,
        };
        session.bind(host_conn, host_id);
        info!(code = %session.state.id, host = %host_id, "session created");
        Ok(session)
    }

    fn robot_for_seat(board: &Board, game: &GameConfig, seat: usize) -> Robot {
        let at = board
            .spawn_points
            .get(seat)
            .copied()
            .unwrap_or_else(|| Position::new(seat as i32 % board.width.max(1), 0));
        Robot::new(at, spawn_direction(board, at), game.starting_lives)
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.state.id
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn decks(&self) -> &Decks {
        &self.decks
    }

    /// Marked once the manager has dropped the session.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }

    // ------------------------------------------------------------------
    // Connections
    // ------------------------------------------------------------------

    fn bind(&mut self, conn: ConnectionId, player: PlayerId) {
        if let Some(old) = self.player_connections.insert(player, conn) {
            self.connections.remove(&old);
        }
        self.connections.insert(conn, player);
    }

    fn unbind_player(&mut self, player: PlayerId) -> Option<ConnectionId> {
        let conn = self.player_connections.remove(&player)?;
        self.connections.remove(&conn);
        Some(conn)
    }

    #[must_use]
    pub fn player_for(&self, conn: ConnectionId) -> Option<PlayerId> {
        self.connections.get(&conn).copied()
    }

    #[must_use]
    pub fn connection_of(&self, player: PlayerId) -> Option<ConnectionId> {
        self.player_connections.get(&player).copied()
    }

    /// Connections of every connected player, in seating order.
    #[must_use]
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.state
            .players
            .iter()
            .filter_map(|p| self.player_connections.get(&p.id).copied())
            .collect()
    }

    #[must_use]
    pub fn has_humans(&self) -> bool {
        self.state.players.iter().any(|p| !p.is_ai)
    }

    fn connected_humans(&self) -> usize {
        self.state
            .players
            .iter()
            .filter(|p| !p.is_ai && p.is_connected)
            .count()
    }

    // ------------------------------------------------------------------
    // Lobby
    // ------------------------------------------------------------------

    fn seat_player(&mut self, name: String, difficulty: Option<Difficulty>) -> Result<PlayerId> {
        if self.state.phase != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.state.is_full() {
            return Err(GameError::GameFull);
        }
        let seat = self.state.players.len();
        let id = PlayerId::new(self.next_player_id);
        self.next_player_id += 1;

        let robot = Self::robot_for_seat(&self.state.board, &self.state.config, seat);
        let color = PLAYER_COLORS[seat % PLAYER_COLORS.len()];
        let player = match difficulty {
            Some(difficulty) => Player::ai(id, name, color, robot, difficulty),
            None => Player::new(id, name, color, robot),
        };
        self.state.players.push(player);
        Ok(id)
    }

    /// Seat a new human player.
    pub fn join(&mut self, conn: ConnectionId, name: impl Into<String>) -> Result<PlayerId> {
        let id = self.seat_player(name.into(), None)?;
        self.bind(conn, id);
        info!(code = %self.state.id, player = %id, "player joined");
        Ok(id)
    }

    fn require_host(&self, by: PlayerId, action: &'static str) -> Result<()> {
        if self.state.is_host(by) {
            Ok(())
        } else {
            Err(GameError::NotHost { action })
        }
    }

    fn require_phase(&self, phase: Phase, action: &'static str) -> Result<()> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                action,
                phase: self.state.phase,
            })
        }
    }

    pub fn add_ai(&mut self, by: PlayerId, difficulty: Difficulty) -> Result<PlayerId> {
        self.require_host(by, "add AI players")?;
        self.require_phase(Phase::Lobby, "add AI players")?;
        let number = self.state.players.iter().filter(|p| p.is_ai).count() + 1;
        let id = self.seat_player(format!("Bot {number} ({difficulty})"), Some(difficulty))?;
        info!(code = %self.state.id, player = %id, %difficulty, "ai added");
        Ok(id)
    }

    pub fn remove_ai(&mut self, by: PlayerId, target: PlayerId) -> Result<()> {
        self.require_host(by, "remove AI players")?;
        self.require_phase(Phase::Lobby, "remove AI players")?;
        let player = self.state.player(target).ok_or(GameError::PlayerNotFound)?;
        if !player.is_ai {
            return Err(GameError::NotAnAi(target));
        }
        self.remove_player(target);
        Ok(())
    }

    pub fn set_theme(&mut self, by: PlayerId, theme: impl Into<String>) -> Result<()> {
        self.require_host(by, "change the theme")?;
        self.state.theme = theme.into();
        Ok(())
    }

    /// Leave the lobby and deal the first round.
    pub fn start(&mut self, by: PlayerId) -> Result<()> {
        self.require_host(by, "start the game")?;
        if self.state.phase != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.state.players.len() < self.min_players {
            return Err(GameError::NotEnoughPlayers {
                min: self.min_players,
            });
        }

        self.decks = match self.state.config.ruleset {
            Ruleset::Classic => {
                let cards = create_deck(&mut self.rng);
                self.next_card_id = cards.len() as u32 + 1;
                Decks::Shared(Deck::new(cards))
            }
            Ruleset::PriorityToken => {
                let mut decks = FxHashMap::default();
                for player in &self.state.players {
                    let cards = create_personal_deck(&mut self.rng, self.next_card_id);
                    self.next_card_id += PERSONAL_DECK_SIZE;
                    decks.insert(player.id, Deck::new(cards));
                }
                self.state.priority_player_id = Some(self.state.host_id);
                Decks::Personal(decks)
            }
        };

        self.state.transition(Phase::Programming);
        self.state.turn = 1;
        self.deal_round();
        info!(code = %self.state.id, players = self.state.players.len(), "match started");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Programming
    // ------------------------------------------------------------------

    /// Deal hands, auto-ready players with nothing to program, and let AI
    /// players plan and submit.
    fn deal_round(&mut self) {
        let config = self.state.config.clone();
        for idx in 0..self.state.players.len() {
            let id = self.state.players[idx].id;
            let player = &mut self.state.players[idx];
            player.is_ready = false;
            player.hand.clear();
            if player.robot.is_eliminated() || player.is_powered_down {
                player.is_ready = true;
                continue;
            }
            let n = config.hand_size(player.robot.damage);
            let hand = match self.decks.deck_for(id) {
                Some(deck) => deck.draw(n, &mut self.rng),
                None => Vec::new(),
            };
            let player = &mut self.state.players[idx];
            player.hand = hand;
            if player.hand.is_empty() {
                player.is_ready = true;
            }
        }

        let ai_players: Vec<PlayerId> = self
            .state
            .players
            .iter()
            .filter(|p| p.is_ai && !p.is_ready)
            .map(|p| p.id)
            .collect();
        for id in ai_players {
            self.run_ai(id);
        }
    }

    fn run_ai(&mut self, id: PlayerId) {
        let mut rng = self.rng.fork();
        let Ok(decision) = plan_registers(&self.state, id, &mut rng, &self.ai) else {
            return;
        };
        let Some(player) = self.state.player_mut(id) else {
            return;
        };
        for (slot, card) in decision.registers.iter().enumerate() {
            if player.is_register_locked(slot) || player.registers[slot].is_some() {
                continue;
            }
            if let Some(card) = card {
                if let Some(taken) = player.take_from_hand(card.id) {
                    player.registers[slot] = Some(taken);
                }
            }
        }
        player.power_down_announced = decision.power_down;
        player.is_ready = true;
        debug!(player = %id, evaluations = decision.stats.evaluations, "ai submitted");
    }

    /// Place `card_id` in `register`, or clear the register with `None`.
    /// A card already in the register goes back to the hand.
    pub fn program_register(&mut self, player_id: PlayerId, register: usize, card_id: Option<CardId>) -> Result<()> {
        self.require_phase(Phase::Programming, "program registers")?;
        let player = self.state.player_mut(player_id).ok_or(GameError::PlayerNotFound)?;
        if register >= REGISTER_COUNT {
            return Err(GameError::InvalidRegister(register));
        }
        if player.is_ready {
            return Err(GameError::AlreadyReady);
        }
        if player.is_register_locked(register) {
            return Err(GameError::RegisterLocked(register));
        }

        let incoming = match card_id {
            Some(id) => Some(player.take_from_hand(id).ok_or(GameError::CardNotInHand)?),
            None => None,
        };
        if let Some(previous) = std::mem::replace(&mut player.registers[register], incoming) {
            player.hand.push(previous);
        }
        Ok(())
    }

    /// Lock in the program. Returns true once every player is ready.
    pub fn submit_program(&mut self, player_id: PlayerId) -> Result<bool> {
        self.require_phase(Phase::Programming, "submit a program")?;
        let player = self.state.player_mut(player_id).ok_or(GameError::PlayerNotFound)?;
        if player.is_ready {
            return Err(GameError::AlreadyReady);
        }
        if !player.program_complete() {
            return Err(GameError::RegistersIncomplete);
        }
        player.is_ready = true;
        Ok(self.state.all_ready())
    }

    /// Flip the power-down announcement for next round. Returns the new value.
    pub fn toggle_power_down(&mut self, player_id: PlayerId) -> Result<bool> {
        self.require_phase(Phase::Programming, "announce a power down")?;
        let player = self.state.player_mut(player_id).ok_or(GameError::PlayerNotFound)?;
        player.power_down_announced = !player.power_down_announced;
        Ok(player.power_down_announced)
    }

    #[must_use]
    pub fn ready_to_execute(&self) -> bool {
        self.state.phase == Phase::Programming && self.state.all_ready()
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Enter the executing phase. False if the round cannot start.
    pub fn begin_round(&mut self) -> bool {
        if !self.ready_to_execute() || !self.state.transition(Phase::Executing) {
            return false;
        }
        self.log.clear();
        self.log_cursor = 0;
        info!(code = %self.state.id, turn = self.state.turn, "round started");
        true
    }

    pub fn run_register(&mut self, register: usize) -> RegisterReport {
        execute_register(&mut self.state, register, &mut self.log)
    }

    /// Animation events not yet handed out.
    pub fn drain_animation(&mut self) -> Vec<AnimationEvent> {
        let fresh = self.log.since(self.log_cursor).to_vec();
        self.log_cursor = self.log.len();
        fresh
    }

    /// Every event of the current round so far.
    #[must_use]
    pub fn animation_log(&self) -> &AnimationLog {
        &self.log
    }

    /// Close the round: finish the match, or clean up and deal the next one.
    pub fn finish_round(&mut self, outcome: MatchOutcome) {
        if self.state.phase != Phase::Executing {
            return;
        }
        if outcome.is_over() {
            self.finish_match(outcome);
            return;
        }
        self.state.transition(Phase::Cleanup);
        self.cleanup();

        // Cleanup respawns can never decide the match, but an elimination
        // in the last register can.
        let outcome = check_winner(&self.state);
        if outcome.is_over() {
            self.finish_match(outcome);
            return;
        }
        self.state.transition(Phase::Programming);
        self.state.turn += 1;
        self.deal_round();
    }

    fn finish_match(&mut self, outcome: MatchOutcome) {
        if let MatchOutcome::Winner(id) = outcome {
            self.state.winner_id = Some(id);
        }
        self.state.transition(Phase::Finished);
        info!(code = %self.state.id, winner = ?self.state.winner_id, "match finished");
    }

    /// Respawn destroyed robots, then discard and lock registers from the
    /// resulting damage and pass the priority token.
    fn cleanup(&mut self) {
        let config = self.state.config.clone();
        // Locks depend on post-respawn damage.
        respawn_destroyed(&mut self.state, &mut self.log);
        for idx in 0..self.state.players.len() {
            let id = self.state.players[idx].id;
            let player = &mut self.state.players[idx];

            player.robot.rebooted = false;
            player.is_powered_down = false;
            if player.power_down_announced && !player.robot.is_eliminated() {
                player.power_down_announced = false;
                player.is_powered_down = true;
                player.robot.damage = 0;
            }

            let locked_from = if !player.robot.is_on_board() {
                REGISTER_COUNT
            } else {
                config.locked_from(player.robot.damage)
            };
            player.locked_from = locked_from;

            let mut discards: Vec<Card> = player.hand.drain(..).collect();
            for slot in 0..REGISTER_COUNT {
                if slot < locked_from {
                    if let Some(card) = player.registers[slot].take() {
                        discards.push(card);
                    }
                }
            }
            if let Some(deck) = self.decks.deck_for(id) {
                deck.discard(discards);
            }
        }

        if let Some(holder) = self.state.priority_player_id {
            self.state.priority_player_id = self.state.next_player_after(holder);
        }
    }

    // ------------------------------------------------------------------
    // Leaving, disconnects and reconnects
    // ------------------------------------------------------------------

    fn remove_player(&mut self, id: PlayerId) -> Option<LeaveOutcome> {
        let index = self.state.player_index(id)?;
        let successor = self.state.next_player_after(id).filter(|&next| next != id);
        let was_host = self.state.host_id == id;

        let player = self.state.players.remove(index);
        let cards: Vec<Card> = player
            .hand
            .into_iter()
            .chain(player.registers.into_iter().flatten())
            .collect();
        match &mut self.decks {
            Decks::Shared(deck) => deck.discard(cards),
            Decks::Personal(decks) => {
                decks.remove(&id);
            }
            Decks::Unset => {}
        }

        let connection = self.unbind_player(id);
        if let Some(timer) = self.timers.remove(&id) {
            timer.handle.abort();
        }
        self.votes.remove(&id);
        for ballots in self.votes.values_mut() {
            ballots.remove(&id);
        }

        if self.state.priority_player_id == Some(id) {
            self.state.priority_player_id = successor;
        }

        let mut new_host = None;
        if was_host {
            // Prefer the next human clockwise; fall back to anyone.
            let next_human = self
                .state
                .seating_from(successor)
                .into_iter()
                .map(|i| &self.state.players[i])
                .find(|p| !p.is_ai)
                .map(|p| p.id);
            if let Some(host) = next_human.or(successor) {
                self.state.host_id = host;
                new_host = Some(host);
            }
        }

        info!(code = %self.state.id, player = %id, new_host = ?new_host, "player removed");
        Some(LeaveOutcome {
            removed: id,
            connection,
            new_host,
            abandoned: !self.has_humans(),
        })
    }

    /// Remove a player voluntarily.
    pub fn leave(&mut self, id: PlayerId) -> Result<LeaveOutcome> {
        self.remove_player(id).ok_or(GameError::PlayerNotFound)
    }

    /// Mark the player behind `conn` disconnected. Returns that player.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Option<PlayerId> {
        let id = self.connections.remove(&conn)?;
        self.player_connections.remove(&id);
        if let Some(player) = self.state.player_mut(id) {
            player.is_connected = false;
        }
        info!(code = %self.state.id, player = %id, "player disconnected");
        Some(id)
    }

    /// Rebind `conn` to an existing player and cancel its removal timer.
    pub fn reconnect(&mut self, conn: ConnectionId, id: PlayerId) -> Result<()> {
        let player = self.state.player_mut(id).ok_or(GameError::PlayerNotFound)?;
        player.is_connected = true;
        self.cancel_timer(id);
        self.votes.remove(&id);
        self.bind(conn, id);
        info!(code = %self.state.id, player = %id, "player reconnected");
        Ok(())
    }

    /// Next timer generation; pass it to the removal task.
    pub fn next_timer_generation(&mut self) -> u64 {
        self.timer_generation += 1;
        self.timer_generation
    }

    /// Store a scheduled removal, aborting any older one for the player.
    pub fn arm_timer(&mut self, id: PlayerId, generation: u64, handle: AbortHandle) {
        if let Some(old) = self.timers.insert(id, DisconnectTimer { generation, handle }) {
            old.handle.abort();
        }
    }

    pub fn cancel_timer(&mut self, id: PlayerId) -> bool {
        match self.timers.remove(&id) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn has_timer(&self, id: PlayerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Consume the timer if `generation` is still current. A stale or
    /// cancelled timer returns false and must not act.
    pub fn take_expired_timer(&mut self, id: PlayerId, generation: u64) -> bool {
        match self.timers.get(&id) {
            Some(timer) if timer.generation == generation => {
                self.timers.remove(&id);
                true
            }
            _ => false,
        }
    }

    /// Record a vote about a disconnected player. A strict majority of
    /// connected humans voting to kick removes them.
    pub fn vote_disconnect(&mut self, voter: PlayerId, target: PlayerId, kick: bool) -> Result<VoteOutcome> {
        self.state.player(voter).ok_or(GameError::PlayerNotFound)?;
        let target_player = self.state.player(target).ok_or(GameError::PlayerNotFound)?;
        if target_player.is_connected {
            return Err(GameError::TargetConnected(target));
        }

        self.votes.entry(target).or_default().insert(voter, kick);

        let eligible = self.connected_humans();
        let needed = eligible / 2 + 1;
        let kick_votes = self.votes.get(&target).map_or(0, |ballots| {
            ballots
                .iter()
                .filter(|&(id, &kick)| {
                    kick && self
                        .state
                        .player(*id)
                        .is_some_and(|p| p.is_connected && !p.is_ai)
                })
                .count()
        });

        if kick_votes >= needed {
            let outcome = self.leave(target)?;
            return Ok(VoteOutcome::Kicked(outcome));
        }
        Ok(VoteOutcome::Pending { kick_votes, needed })
    }

    // ------------------------------------------------------------------
    // Restart
    // ------------------------------------------------------------------

    /// Return a finished match to the lobby with fresh robots.
    pub fn restart(&mut self, by: PlayerId) -> Result<()> {
        self.require_host(by, "restart the game")?;
        self.require_phase(Phase::Finished, "restart")?;

        let board = self.state.board.clone();
        let config = self.state.config.clone();
        for (seat, player) in self.state.players.iter_mut().enumerate() {
            player.robot = Self::robot_for_seat(&board, &config, seat);
            player.hand.clear();
            player.registers = [None; REGISTER_COUNT];
            player.locked_from = REGISTER_COUNT;
            player.is_ready = false;
            player.power_down_announced = false;
            player.is_powered_down = false;
        }
        self.decks = Decks::Unset;
        self.next_card_id = 1;
        self.state.turn = 0;
        self.state.current_register = 0;
        self.state.winner_id = None;
        self.state.priority_player_id = None;
        self.log.clear();
        self.log_cursor = 0;
        self.state.transition(Phase::Lobby);
        info!(code = %self.state.id, "match restarted");
        Ok(())
    }

    /// Cards held anywhere in the session: decks, hands and registers.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.decks.total() + self.state.players.iter().map(Player::card_count).sum::<usize>()
    }
}
