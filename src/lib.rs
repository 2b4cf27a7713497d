//! # rally-engine
//!
//! Authoritative engine for a simultaneous-programming robot race.
//!
//! Every player secretly programs five registers from a dealt hand of
//! movement cards. Once all programs are in, registers resolve one at a
//! time: cards in priority order, then conveyors, gears, lasers and
//! checkpoints. The first robot to touch every checkpoint in order wins.
//!
//! ## Design Principles
//!
//! 1. **Server Authority**: clients send intents; the engine validates them
//!    and broadcasts the resulting state.
//!
//! 2. **One Rule Path**: the round executor and the AI simulation share the
//!    same movement and board-effect code.
//!
//! 3. **Deterministic When Seeded**: all randomness flows from `GameRng`,
//!    so a seeded server replays identically.
//!
//! ## Modules
//!
//! - `core`: players, robots, game state, configuration, errors, RNG
//! - `board`: grid geometry, tiles, walls, lasers, preset boards
//! - `cards`: card types and decks
//! - `events`: animation log emitted while resolving registers
//! - `rules`: movement, board effects, register and round execution
//! - `ai`: easy, medium and hard computer players
//! - `session`: lobby, programming and the async session manager

pub mod ai;
pub mod board;
pub mod cards;
pub mod core;
pub mod events;
pub mod rules;
pub mod session;

pub use crate::core::{GameError, GameState, Phase, PlayerId, Result};
pub use session::{GameSession, SessionManager};
