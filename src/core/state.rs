//! Match state shared by the session, the round executor and the AI.
//!
//! `GameState` is the complete, serializable snapshot broadcast to clients
//! after every mutating operation. It is mutated in place by the session
//! and the executor; the AI only ever reads it.

use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::player::{Player, PlayerId};
use crate::board::Board;

/// Session phase.
///
/// ```text
/// Lobby -> Programming -> Executing -> Cleanup -> Programming
///                              |
///                              +-> Finished -> Lobby (restart)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Programming,
    Executing,
    Cleanup,
    Finished,
}

impl Phase {
    /// Whether the state machine allows moving to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Lobby, Phase::Programming)
                | (Phase::Programming, Phase::Executing)
                | (Phase::Executing, Phase::Cleanup)
                | (Phase::Executing, Phase::Finished)
                | (Phase::Cleanup, Phase::Programming)
                | (Phase::Cleanup, Phase::Finished)
                | (Phase::Finished, Phase::Lobby)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Lobby => "in the lobby",
            Phase::Programming => "programming",
            Phase::Executing => "executing",
            Phase::Cleanup => "cleaning up",
            Phase::Finished => "finished",
        };
        write!(f, "{}", label)
    }
}

/// Complete state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Session code.
    pub id: String,
    pub phase: Phase,
    pub board: Board,
    /// Seating order is clockwise.
    pub players: Vec<Player>,
    pub current_register: usize,
    /// Round number, starting at 1 once the match starts.
    pub turn: u32,
    pub host_id: PlayerId,
    pub max_players: usize,
    pub winner_id: Option<PlayerId>,
    /// Holder of the priority token (token ruleset only).
    pub priority_player_id: Option<PlayerId>,
    /// Opaque presentation theme chosen by the host.
    pub theme: String,
    pub config: GameConfig,
}

impl GameState {
    #[must_use]
    pub fn new(id: impl Into<String>, board: Board, config: GameConfig, host: Player, max_players: usize) -> Self {
        Self {
            id: id.into(),
            phase: Phase::Lobby,
            board,
            host_id: host.id,
            players: vec![host],
            current_register: 0,
            turn: 0,
            max_players,
            winner_id: None,
            priority_player_id: None,
            theme: "default".to_string(),
            config,
        }
    }

    /// Move to `next`, returning false (and changing nothing) if the state
    /// machine does not allow it.
    pub fn transition(&mut self, next: Phase) -> bool {
        if !self.phase.can_transition_to(next) {
            return false;
        }
        self.phase = next;
        true
    }

    #[must_use]
    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    #[must_use]
    pub fn is_host(&self, id: PlayerId) -> bool {
        self.host_id == id
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    /// Every player has submitted.
    #[must_use]
    pub fn all_ready(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.is_ready)
    }

    /// Seat indices clockwise, starting at `start` (or seat 0 if absent).
    #[must_use]
    pub fn seating_from(&self, start: Option<PlayerId>) -> Vec<usize> {
        let n = self.players.len();
        let first = start.and_then(|id| self.player_index(id)).unwrap_or(0);
        (0..n).map(|offset| (first + offset) % n).collect()
    }

    /// The next seated player clockwise after `id`.
    #[must_use]
    pub fn next_player_after(&self, id: PlayerId) -> Option<PlayerId> {
        let index = self.player_index(id)?;
        let next = (index + 1) % self.players.len();
        Some(self.players[next].id)
    }

    /// Players whose robots still have lives.
    pub fn contenders(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.robot.is_eliminated())
    }
}
