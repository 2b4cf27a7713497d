//! Async session registry and round pacing.
//!
//! ## Locking
//!
//! The registry (code -> session, connection -> code, code RNG) sits in one
//! `tokio::sync::RwLock`. Each session has its own `tokio::sync::Mutex`, so
//! sessions never contend with each other. Lock order is always session
//! first, registry second; nothing awaits a session lock while holding the
//! registry.
//!
//! Rounds run in a spawned task that re-locks the session for every
//! register and sleeps between registers without holding it, so intents
//! from other players keep flowing while clients animate.
//!
//! Disconnect removal is a spawned sleeper whose `AbortHandle` and
//! generation are stored in the session. Reconnecting aborts it under the
//! session lock; a sleeper that wakes anyway re-checks its generation
//! before acting.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::code::{generate_code, normalize_code};
use super::game::{GameSession, LeaveOutcome, VoteOutcome};
use super::outbound::Outbound;
use super::protocol::{ClientIntent, Codec, ServerMessage};
use crate::ai::Difficulty;
use crate::cards::CardId;
use crate::core::{
    ConnectionId, GameError, GameRng, Phase, PlayerId, Result, Ruleset, ServerConfig, REGISTER_COUNT,
};
use crate::rules::MatchOutcome;

type SharedSession = Arc<Mutex<GameSession>>;

struct Registry {
    sessions: FxHashMap<String, SharedSession>,
    connections: FxHashMap<ConnectionId, String>,
    rng: GameRng,
}

struct Inner<O> {
    config: ServerConfig,
    outbound: O,
    registry: RwLock<Registry>,
}

/// Owns every live session.
pub struct SessionManager<O: Outbound> {
    inner: Arc<Inner<O>>,
}

impl<O: Outbound> Clone for SessionManager<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Outbound> SessionManager<O> {
    pub fn new(config: ServerConfig, outbound: O) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self {
            inner: Arc::new(Inner {
                config,
                outbound,
                registry: RwLock::new(Registry {
                    sessions: FxHashMap::default(),
                    connections: FxHashMap::default(),
                    rng,
                }),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn outbound(&self) -> &O {
        &self.inner.outbound
    }

    pub async fn session_count(&self) -> usize {
        self.inner.registry.read().await.sessions.len()
    }

    /// Look up a session by code.
    pub async fn session(&self, code: &str) -> Option<SharedSession> {
        let registry = self.inner.registry.read().await;
        registry.sessions.get(&normalize_code(code)).cloned()
    }

    /// Code of the session `conn` is bound to.
    pub async fn code_for(&self, conn: ConnectionId) -> Option<String> {
        self.inner.registry.read().await.connections.get(&conn).cloned()
    }

    async fn session_of(&self, conn: ConnectionId) -> Result<(String, SharedSession)> {
        let registry = self.inner.registry.read().await;
        let code = registry.connections.get(&conn).ok_or(GameError::NotInGame)?;
        let session = registry.sessions.get(code).ok_or(GameError::GameNotFound)?;
        Ok((code.clone(), Arc::clone(session)))
    }

    async fn map_connection(&self, conn: ConnectionId, code: &str) {
        let mut registry = self.inner.registry.write().await;
        registry.connections.insert(conn, code.to_string());
    }

    async fn unmap_connection(&self, conn: ConnectionId) {
        let mut registry = self.inner.registry.write().await;
        registry.connections.remove(&conn);
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    fn send(&self, conn: ConnectionId, message: ServerMessage) {
        self.inner.outbound.send(conn, message);
    }

    fn broadcast(&self, session: &GameSession, message: &ServerMessage) {
        self.inner.outbound.send_all(&session.connections(), message);
    }

    fn broadcast_state(&self, session: &GameSession) {
        self.broadcast(session, &ServerMessage::state(&session.state));
    }

    /// Unicast an error, unless it is a silent reject.
    fn report(&self, conn: ConnectionId, err: &GameError) {
        if err.is_silent() {
            debug!(%conn, %err, "silently rejected");
            return;
        }
        debug!(%conn, %err, kind = ?err.kind(), "rejected");
        self.send(conn, ServerMessage::error(err));
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Apply one client intent, replying with an error on failure.
    pub async fn handle(&self, conn: ConnectionId, intent: ClientIntent) {
        let result = match intent {
            ClientIntent::Create { name, board, ruleset } => {
                self.create_game(conn, name, board, ruleset).await.map(|_| ())
            }
            ClientIntent::Join { code, name } => self.join_game(conn, &code, name).await.map(|_| ()),
            ClientIntent::Reconnect { code, player_id } => self.reconnect(conn, &code, player_id).await,
            ClientIntent::Leave => self.leave_game(conn).await,
            ClientIntent::Start => self.start_game(conn).await,
            ClientIntent::Program { register, card_id } => {
                self.program_register(conn, register, card_id).await
            }
            ClientIntent::Submit => self.submit_program(conn).await,
            ClientIntent::TogglePowerDown => self.toggle_power_down(conn).await.map(|_| ()),
            ClientIntent::VoteDisconnect { target, kick } => {
                self.vote_disconnect(conn, target, kick).await.map(|_| ())
            }
            ClientIntent::SetTheme { theme } => self.set_theme(conn, theme).await,
            ClientIntent::AddAi { difficulty } => self.add_ai(conn, difficulty).await.map(|_| ()),
            ClientIntent::RemoveAi { player_id } => self.remove_ai(conn, player_id).await,
            ClientIntent::Restart => self.restart(conn).await,
        };
        if let Err(err) = result {
            self.report(conn, &err);
        }
    }

    /// Decode a raw frame and apply it.
    pub async fn handle_frame(&self, conn: ConnectionId, codec: Codec, bytes: &[u8]) {
        match codec.decode_intent(bytes) {
            Ok(intent) => self.handle(conn, intent).await,
            Err(err) => self.report(conn, &err),
        }
    }

    /// Run `op` as the player bound to `conn`, broadcast the new state and
    /// start the round if everyone is ready.
    async fn mutate<T>(
        &self,
        conn: ConnectionId,
        op: impl FnOnce(&mut GameSession, PlayerId) -> Result<T>,
    ) -> Result<T> {
        let (code, session) = self.session_of(conn).await?;
        let mut guard = session.lock().await;
        let player = guard.player_for(conn).ok_or(GameError::NotInGame)?;
        let value = op(&mut *guard, player)?;
        self.broadcast_state(&guard);
        if guard.ready_to_execute() {
            self.spawn_round(code, Arc::clone(&session));
        }
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub async fn create_game(
        &self,
        conn: ConnectionId,
        name: impl Into<String>,
        board: Option<String>,
        ruleset: Option<Ruleset>,
    ) -> Result<(String, PlayerId)> {
        let config = &self.inner.config;
        let mut game = config.game.clone();
        if let Some(board) = board {
            game = game.with_board(board);
        }
        if let Some(ruleset) = ruleset {
            game = game.with_ruleset(ruleset);
        }

        let mut registry = self.inner.registry.write().await;
        if registry.connections.contains_key(&conn) {
            return Err(GameError::AlreadyInGame);
        }
        let Registry { sessions, rng, .. } = &mut *registry;
        let code = generate_code(rng, config.code_length, |c| sessions.contains_key(c))?;
        let session = GameSession::create(code.clone(), conn, name, config, game, rng.fork())?;
        let host = session.state.host_id;
        let state = ServerMessage::state(&session.state);

        registry
            .sessions
            .insert(code.clone(), Arc::new(Mutex::new(session)));
        registry.connections.insert(conn, code.clone());
        drop(registry);

        self.send(
            conn,
            ServerMessage::Created {
                code: code.clone(),
                player_id: host,
            },
        );
        self.send(conn, state);
        Ok((code, host))
    }

    pub async fn join_game(&self, conn: ConnectionId, code: &str, name: impl Into<String>) -> Result<PlayerId> {
        let code = normalize_code(code);
        if self.code_for(conn).await.is_some() {
            return Err(GameError::AlreadyInGame);
        }
        let session = self.session(&code).await.ok_or(GameError::GameNotFound)?;
        let mut guard = session.lock().await;
        let player_id = guard.join(conn, name)?;
        self.map_connection(conn, &code).await;

        self.send(
            conn,
            ServerMessage::Joined {
                code: code.clone(),
                player_id,
            },
        );
        self.broadcast_state(&guard);
        Ok(player_id)
    }

    pub async fn reconnect(&self, conn: ConnectionId, code: &str, player_id: PlayerId) -> Result<()> {
        let code = normalize_code(code);
        if self.code_for(conn).await.is_some_and(|current| current != code) {
            return Err(GameError::AlreadyInGame);
        }
        let session = self.session(&code).await.ok_or(GameError::GameNotFound)?;
        let mut guard = session.lock().await;
        let previous = guard.connection_of(player_id);
        guard.reconnect(conn, player_id)?;
        if let Some(stale) = previous.filter(|&old| old != conn) {
            self.unmap_connection(stale).await;
        }
        self.map_connection(conn, &code).await;

        self.send(
            conn,
            ServerMessage::Reconnected {
                code: code.clone(),
                player_id,
            },
        );
        self.broadcast_state(&guard);
        Ok(())
    }

    pub async fn leave_game(&self, conn: ConnectionId) -> Result<()> {
        let (code, session) = self.session_of(conn).await?;
        let mut guard = session.lock().await;
        let player = guard.player_for(conn).ok_or(GameError::NotInGame)?;
        let outcome = guard.leave(player)?;
        self.after_removal(&code, &session, &mut guard, outcome).await;
        Ok(())
    }

    /// Follow-up after a player left the session for any reason.
    async fn after_removal(&self, code: &str, session: &SharedSession, guard: &mut GameSession, outcome: LeaveOutcome) {
        if let Some(conn) = outcome.connection {
            self.unmap_connection(conn).await;
        }
        if outcome.abandoned {
            guard.close();
            let mut registry = self.inner.registry.write().await;
            registry.sessions.remove(code);
            registry.connections.retain(|_, c| c.as_str() != code);
            info!(%code, "session closed");
            return;
        }
        self.broadcast_state(guard);
        if guard.ready_to_execute() {
            self.spawn_round(code.to_string(), Arc::clone(session));
        }
    }

    /// Transport closed: mark the player disconnected and schedule removal.
    pub async fn handle_disconnect(&self, conn: ConnectionId) {
        let Ok((code, session)) = self.session_of(conn).await else {
            return;
        };
        let mut guard = session.lock().await;
        let Some(player) = guard.disconnect(conn) else {
            return;
        };

        let generation = guard.next_timer_generation();
        let timeout = self.inner.config.disconnect_timeout();
        let manager = self.clone();
        let timer_code = code.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            manager.expire_disconnect(&timer_code, player, generation).await;
        });
        guard.arm_timer(player, generation, task.abort_handle());
        self.broadcast_state(&guard);
        drop(guard);

        self.unmap_connection(conn).await;
    }

    async fn expire_disconnect(&self, code: &str, player: PlayerId, generation: u64) {
        let Some(session) = self.session(code).await else {
            warn!(%code, %player, "disconnect timer fired for a closed session");
            return;
        };
        let mut guard = session.lock().await;
        if !guard.take_expired_timer(player, generation) {
            warn!(%code, %player, generation, "stale disconnect timer");
            return;
        }
        match guard.leave(player) {
            Ok(outcome) => {
                info!(%code, %player, "disconnected player timed out");
                self.after_removal(code, &session, &mut guard, outcome).await;
            }
            Err(err) => warn!(%code, %player, %err, "disconnect timer for missing player"),
        }
    }

    // ------------------------------------------------------------------
    // In-session operations
    // ------------------------------------------------------------------

    pub async fn start_game(&self, conn: ConnectionId) -> Result<()> {
        self.mutate(conn, |s, p| s.start(p)).await
    }

    pub async fn program_register(&self, conn: ConnectionId, register: usize, card_id: Option<CardId>) -> Result<()> {
        self.mutate(conn, |s, p| s.program_register(p, register, card_id)).await
    }

    pub async fn submit_program(&self, conn: ConnectionId) -> Result<()> {
        self.mutate(conn, |s, p| s.submit_program(p).map(|_| ())).await
    }

    pub async fn toggle_power_down(&self, conn: ConnectionId) -> Result<bool> {
        self.mutate(conn, |s, p| s.toggle_power_down(p)).await
    }

    pub async fn set_theme(&self, conn: ConnectionId, theme: String) -> Result<()> {
        self.mutate(conn, |s, p| s.set_theme(p, theme)).await
    }

    pub async fn add_ai(&self, conn: ConnectionId, difficulty: Difficulty) -> Result<PlayerId> {
        self.mutate(conn, |s, p| s.add_ai(p, difficulty)).await
    }

    pub async fn remove_ai(&self, conn: ConnectionId, target: PlayerId) -> Result<()> {
        self.mutate(conn, |s, p| s.remove_ai(p, target)).await
    }

    pub async fn restart(&self, conn: ConnectionId) -> Result<()> {
        self.mutate(conn, |s, p| s.restart(p)).await
    }

    pub async fn vote_disconnect(&self, conn: ConnectionId, target: PlayerId, kick: bool) -> Result<VoteOutcome> {
        let (code, session) = self.session_of(conn).await?;
        let mut guard = session.lock().await;
        let voter = guard.player_for(conn).ok_or(GameError::NotInGame)?;
        let outcome = guard.vote_disconnect(voter, target, kick)?;
        match outcome {
            VoteOutcome::Kicked(left) => {
                info!(%code, player = %target, "player voted out");
                self.after_removal(&code, &session, &mut guard, left).await;
            }
            VoteOutcome::Pending { .. } => self.broadcast_state(&guard),
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Rounds
    // ------------------------------------------------------------------

    fn spawn_round(&self, code: String, session: SharedSession) {
        let manager = self.clone();
        tokio::spawn(async move {
            manager.run_rounds(&code, &session).await;
        });
    }

    /// Resolve rounds until a human needs to act or the match ends.
    async fn run_rounds(&self, code: &str, session: &SharedSession) {
        let delay = self.inner.config.register_delay();
        loop {
            {
                let mut guard = session.lock().await;
                if guard.is_closed() || !guard.begin_round() {
                    return;
                }
                self.broadcast_state(&guard);
            }

            let mut outcome = MatchOutcome::Continue;
            for register in 0..REGISTER_COUNT {
                {
                    let mut guard = session.lock().await;
                    if guard.is_closed() || guard.phase() != Phase::Executing {
                        return;
                    }
                    outcome = guard.run_register(register).outcome;
                    let events = guard.drain_animation();
                    self.broadcast_state(&guard);
                    self.broadcast(&guard, &ServerMessage::Animation { events });
                }
                if outcome.is_over() {
                    break;
                }
                tokio::time::sleep(delay).await;
            }

            let mut guard = session.lock().await;
            if guard.is_closed() {
                return;
            }
            guard.finish_round(outcome);
            let events = guard.drain_animation();
            if !events.is_empty() {
                self.broadcast(&guard, &ServerMessage::Animation { events });
            }
            self.broadcast_state(&guard);

            if guard.phase() == Phase::Finished {
                info!(%code, winner = ?guard.state.winner_id, "match over");
                return;
            }
            if !guard.ready_to_execute() {
                return;
            }
        }
    }
}
