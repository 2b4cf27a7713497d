//! Computer players.
//!
//! ## Overview
//!
//! The AI plans a full five-register program for one player from a
//! read-only view of the game state. Three tiers trade strength for speed:
//!
//! - **Easy**: static card ranking with random mistakes
//! - **Medium**: per-register greedy choice with short lookahead
//! - **Hard**: bounded exhaustive search over card orderings
//!
//! Programs are scored by simulating them on a one-robot copy of the board
//! with the same movement and board-effect rules the round executor uses.
//!
//! ## Usage
//!
//! ```rust
//! use rally_engine::ai::{plan_registers, AiConfig, Difficulty};
//! use rally_engine::board::{presets, Direction, Position};
//! use rally_engine::cards::create_deck;
//! use rally_engine::core::{GameConfig, GameRng, GameState, Player, PlayerId, Robot};
//!
//! let mut rng = GameRng::new(7);
//! let robot = Robot::new(Position::new(1, 10), Direction::North, 3);
//! let mut bot = Player::ai(PlayerId::new(1), "Bot", "red", robot, Difficulty::Hard);
//! bot.hand = create_deck(&mut rng).into_iter().take(9).collect();
//! let state = GameState::new("DEMO01", presets::training_ground(), GameConfig::default(), bot, 8);
//!
//! let decision = plan_registers(&state, PlayerId::new(1), &mut rng, &AiConfig::default()).unwrap();
//! assert_eq!(decision.registers.iter().flatten().count(), 5);
//! ```

pub mod config;
pub mod evaluate;
pub mod permutations;
pub mod simulate;
pub mod stats;
pub mod strategy;

pub use config::{AiConfig, Difficulty};
pub use evaluate::{distance_to_next_checkpoint, evaluate};
pub use permutations::KPermutations;
pub use simulate::{simulate_card_sequence, SimulationResult};
pub use stats::SearchStats;
pub use strategy::{plan_registers, AiDecision};
