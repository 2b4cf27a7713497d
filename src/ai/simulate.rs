//! Single-robot program simulation.
//!
//! Runs a card sequence through the same `Field` rules the executor uses,
//! on a field holding only the simulated robot. Empty registers still apply
//! the board's passive effects. Simulation stops once the robot is
//! destroyed, as a destroyed robot plays no further cards that round.

use crate::board::Board;
use crate::cards::CardType;
use crate::core::{PlayerId, Robot};
use crate::events::AnimationLog;
use crate::rules::{apply_card, run_board_effects, Field};

/// Final robot state after a simulated program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationResult {
    pub robot: Robot,
    /// Checkpoints captured during the sequence.
    pub checkpoints_captured: u8,
    pub destroyed: bool,
    /// Registers actually resolved before the sequence ended.
    pub registers_run: usize,
}

/// Simulate `cards`, one entry per register, starting from `robot`.
#[must_use]
pub fn simulate_card_sequence(board: &Board, robot: &Robot, cards: &[Option<CardType>], max_damage: u8) -> SimulationResult {
    let start_checkpoint = robot.last_checkpoint;
    let mut robots = [robot.clone()];
    let owners = [PlayerId::new(0)];
    let mut log = AnimationLog::disabled();
    let mut registers_run = 0;

    if robot.is_on_board() {
        let mut field = Field::new(board, &mut robots, &owners, max_damage, &mut log);
        let mut previous = None;
        for &card in cards {
            if let Some(card_type) = card {
                apply_card(&mut field, 0, card_type, previous);
            }
            run_board_effects(&mut field);
            registers_run += 1;
            previous = card;
            if !field.robots[0].is_on_board() {
                break;
            }
        }
    }

    let [robot] = robots;
    SimulationResult {
        checkpoints_captured: robot.last_checkpoint.saturating_sub(start_checkpoint),
        destroyed: !robot.is_on_board(),
        robot,
        registers_run,
    }
}
