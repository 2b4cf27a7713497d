//! Heuristic scoring of a simulated program.

use super::simulate::SimulationResult;
use crate::board::{Board, Tile};

pub const DESTROYED_SCORE: i32 = -1000;
pub const CHECKPOINT_BONUS: i32 = 500;
pub const DISTANCE_PENALTY: i32 = 10;
pub const LASER_LINE_PENALTY: i32 = 50;
pub const DAMAGE_PENALTY: i32 = 5;
pub const REPAIR_BONUS: i32 = 30;

/// Manhattan distance from the robot to its next required checkpoint, or
/// zero once every checkpoint is captured.
#[must_use]
pub fn distance_to_next_checkpoint(board: &Board, robot: &crate::core::Robot) -> u32 {
    board
        .checkpoint(robot.last_checkpoint.saturating_add(1))
        .map_or(0, |c| robot.position.manhattan(c.position))
}

/// Score a simulation outcome. Higher is better.
#[must_use]
pub fn evaluate(board: &Board, result: &SimulationResult) -> i32 {
    if result.destroyed {
        return DESTROYED_SCORE;
    }
    let robot = &result.robot;
    let mut score = CHECKPOINT_BONUS * i32::from(result.checkpoints_captured);

    let distance = i32::try_from(distance_to_next_checkpoint(board, robot)).unwrap_or(i32::MAX / 2);
    score -= DISTANCE_PENALTY * distance;

    if board.is_in_laser_line(robot.position) {
        score -= LASER_LINE_PENALTY;
    }
    score -= DAMAGE_PENALTY * i32::from(robot.damage);

    if robot.damage > 0 && board.tile_at(robot.position) == Some(Tile::Repair) {
        score += REPAIR_BONUS;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::simulate::simulate_card_sequence;
    use crate::board::{BoardBuilder, Direction, Position};
    use crate::cards::CardType;
    use crate::core::Robot;

    fn result_at(board: &Board, x: i32, y: i32, damage: u8) -> SimulationResult {
        let mut robot = Robot::new(Position::new(x, y), Direction::North, 3);
        robot.damage = damage;
        simulate_card_sequence(board, &robot, &[], 10)
    }

    #[test]
    fn test_destroyed_is_worst() {
        let board = Board::empty(3, 3);
        let robot = Robot::new(Position::new(0, 0), Direction::North, 3);
        let result = simulate_card_sequence(&board, &robot, &[Some(CardType::Move1)], 10);
        assert_eq!(evaluate(&board, &result), DESTROYED_SCORE);
    }

    #[test]
    fn test_distance_and_damage() {
        let board = BoardBuilder::new(10, 10).checkpoint(5, 0, 1).build();
        let near = result_at(&board, 5, 2, 0);
        let far = result_at(&board, 5, 6, 0);
        let hurt = result_at(&board, 5, 2, 2);

        assert_eq!(evaluate(&board, &near), -20);
        assert_eq!(evaluate(&board, &far), -60);
        assert_eq!(evaluate(&board, &hurt), -30);
    }

    #[test]
    fn test_checkpoint_capture_bonus() {
        let board = BoardBuilder::new(10, 10)
            .checkpoint(5, 4, 1)
            .checkpoint(5, 0, 2)
            .build();
        let robot = Robot::new(Position::new(5, 5), Direction::North, 3);
        let result = simulate_card_sequence(&board, &robot, &[Some(CardType::Move1)], 10);

        assert_eq!(evaluate(&board, &result), 500 - 40);
    }

    #[test]
    fn test_laser_line_and_repair() {
        let board = BoardBuilder::new(5, 5)
            .laser(0, 2, Direction::East, 1)
            .tile(3, 4, Tile::Repair)
            .build();
        let in_line = result_at(&board, 2, 2, 0);
        let repairing = result_at(&board, 3, 4, 2);

        assert_eq!(evaluate(&board, &in_line), -50);
        // Empty program: no board effects ran, damage is still 2.
        assert_eq!(evaluate(&board, &repairing), -10 + 30);
    }
}
