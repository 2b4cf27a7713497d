//! Core engine types: players, robots, state, configuration, errors, RNG.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{GameConfig, Ruleset, ServerConfig};
pub use error::{ErrorKind, GameError, Result};
pub use player::{ConnectionId, Player, PlayerId, Robot, REGISTER_COUNT};
pub use rng::GameRng;
pub use state::{GameState, Phase};
