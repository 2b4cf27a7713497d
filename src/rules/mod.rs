//! Game rules: movement, board effects and register resolution.
//!
//! ## Key Types
//!
//! - `Field`: the board plus the robots in play; every movement rule runs on it
//! - `RegisterReport`: cards resolved in a register and the match outcome
//! - `MatchOutcome`: continue, a winner, or no survivors
//!
//! The executor and the AI's simulation both go through `Field`, so a
//! simulated program and a resolved one always agree.

pub mod effects;
pub mod executor;
pub mod movement;

pub use effects::{fire_lasers, resolve_tiles, run_board_effects, run_conveyors, run_gears};
pub use executor::{
    apply_card, check_winner, execute_register, execute_round, register_order, respawn_destroyed,
    MatchOutcome, PlayedCard, RegisterReport,
};
pub use movement::Field;
