//! Rule and server configuration.
//!
//! - `GameConfig`: rules of one match (ruleset, hand size, damage limits)
//! - `ServerConfig`: session-manager parameters (capacity, pacing, timeouts)
//!
//! Both use plain defaults plus `with_*` builders and are serde-friendly so
//! hosts can load them from whatever format they like.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::AiConfig;

/// Which deck and ordering rules a match uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// One shared deck; cards resolve by descending priority.
    #[default]
    Classic,
    /// Personal decks; resolution order follows a rotating priority token.
    PriorityToken,
}

/// Rules of a single match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub ruleset: Ruleset,

    /// Cards dealt to an undamaged robot. Each damage point costs one card.
    pub base_hand_size: u8,

    pub starting_lives: u8,

    /// Damage at which a robot is destroyed.
    pub max_damage: u8,

    /// Damage a robot carries after respawning.
    pub respawn_damage: u8,

    /// Keep cards in the last registers of heavily damaged robots.
    pub lock_damaged_registers: bool,

    /// Preset board name (see `board::presets`).
    pub board: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::Classic,
            base_hand_size: 9,
            starting_lives: 3,
            max_damage: 10,
            respawn_damage: 2,
            lock_damaged_registers: true,
            board: "training_ground".to_string(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    #[must_use]
    pub fn with_board(mut self, board: impl Into<String>) -> Self {
        self.board = board.into();
        self
    }

    #[must_use]
    pub fn with_register_locking(mut self, enabled: bool) -> Self {
        self.lock_damaged_registers = enabled;
        self
    }

    /// Cards dealt to a robot with `damage`, clamped at zero.
    #[must_use]
    pub fn hand_size(&self, damage: u8) -> usize {
        usize::from(self.base_hand_size.saturating_sub(damage))
    }

    /// First locked register index for a robot with `damage`.
    ///
    /// Registers lock from the back once the hand would no longer cover all
    /// five: with the default hand of nine, damage 5 locks register 4 and
    /// damage 9 locks all of them.
    #[must_use]
    pub fn locked_from(&self, damage: u8) -> usize {
        let register_count = crate::core::player::REGISTER_COUNT;
        if !self.lock_damaged_registers {
            return register_count;
        }
        self.hand_size(damage).min(register_count)
    }
}

/// Session manager parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Seats per session (bounded by the board's spawn points).
    pub max_players: usize,

    /// Players needed to start.
    pub min_players: usize,

    pub code_length: usize,

    /// Pause between registers so clients can play animations.
    pub register_delay_ms: u64,

    /// Grace period before a disconnected player is removed.
    pub disconnect_timeout_ms: u64,

    /// Seed for codes and session RNGs. `None` seeds from entropy.
    pub seed: Option<u64>,

    pub game: GameConfig,

    pub ai: AiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_players: 8,
            min_players: 2,
            code_length: 6,
            register_delay_ms: 1_500,
            disconnect_timeout_ms: 60_000,
            seed: None,
            game: GameConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    #[must_use]
    pub fn with_register_delay(mut self, delay: Duration) -> Self {
        self.register_delay_ms = delay.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_disconnect_timeout(mut self, timeout: Duration) -> Self {
        self.disconnect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    #[must_use]
    pub fn register_delay(&self) -> Duration {
        Duration::from_millis(self.register_delay_ms)
    }

    #[must_use]
    pub fn disconnect_timeout(&self) -> Duration {
        Duration::from_millis(self.disconnect_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_size_clamps() {
        let config = GameConfig::default();
        assert_eq!(config.hand_size(0), 9);
        assert_eq!(config.hand_size(4), 5);
        assert_eq!(config.hand_size(9), 0);
        assert_eq!(config.hand_size(10), 0);
    }

    #[test]
    fn test_locked_from() {
        let config = GameConfig::default();
        assert_eq!(config.locked_from(0), 5);
        assert_eq!(config.locked_from(4), 5);
        assert_eq!(config.locked_from(5), 4);
        assert_eq!(config.locked_from(9), 0);

        let unlocked = GameConfig::default().with_register_locking(false);
        assert_eq!(unlocked.locked_from(9), 5);
    }

    #[test]
    fn test_server_builders() {
        let config = ServerConfig::default()
            .with_seed(7)
            .with_max_players(4)
            .with_register_delay(Duration::from_millis(20));

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_players, 4);
        assert_eq!(config.register_delay(), Duration::from_millis(20));
        assert_eq!(config.disconnect_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_serialization() {
        let config = ServerConfig::default().with_game(GameConfig::default().with_ruleset(Ruleset::PriorityToken));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("priority_token"));
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
