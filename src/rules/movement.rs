//! Robot movement, rotation, push chains and destruction.
//!
//! All functions operate on a `Field`: the board plus a slice of robots.
//! The round executor builds a field from every player's robot; the AI
//! builds one holding only its own robot, so both share these exact rules.
//!
//! Movement is stepped one tile at a time. Each step checks, in order:
//! 1. walls (exit side of the source tile, entry side of the destination)
//! 2. board bounds (leaving the board destroys the robot)
//! 3. occupancy (an occupied destination starts a push chain)
//! 4. pits (entering a pit destroys the robot)

use smallvec::SmallVec;

use crate::board::{Board, Direction, Position, Rotation};
use crate::core::{PlayerId, Robot};
use crate::events::{AnimationKind, AnimationLog};

/// The board and the robots currently in play.
pub struct Field<'a> {
    pub board: &'a Board,
    pub robots: &'a mut [Robot],
    /// `owners[i]` owns `robots[i]`.
    pub owners: &'a [PlayerId],
    pub max_damage: u8,
    pub log: &'a mut AnimationLog,
}

impl<'a> Field<'a> {
    pub fn new(
        board: &'a Board,
        robots: &'a mut [Robot],
        owners: &'a [PlayerId],
        max_damage: u8,
        log: &'a mut AnimationLog,
    ) -> Self {
        debug_assert_eq!(robots.len(), owners.len());
        Self {
            board,
            robots,
            owners,
            max_damage,
            log,
        }
    }

    /// Index of the on-board robot standing on `pos`.
    #[must_use]
    pub fn occupant(&self, pos: Position) -> Option<usize> {
        self.robots
            .iter()
            .position(|r| r.is_on_board() && r.position == pos)
    }

    /// Destroy a robot, logging it once.
    pub fn destroy(&mut self, idx: usize) {
        let at = self.robots[idx].position;
        if self.robots[idx].destroy() {
            self.log.push(AnimationKind::RobotDestroyed {
                player: self.owners[idx],
                at,
            });
        }
    }

    pub fn rotate(&mut self, idx: usize, rotation: Rotation) {
        let robot = &mut self.robots[idx];
        let from = robot.direction;
        robot.direction = from.rotate(rotation);
        self.log.push(AnimationKind::RobotRotate {
            player: self.owners[idx],
            from,
            to: robot.direction,
        });
    }

    /// Apply damage; reaching the limit destroys the robot.
    pub fn damage(&mut self, idx: usize, amount: u8) {
        if amount == 0 || !self.robots[idx].is_on_board() {
            return;
        }
        let robot = &mut self.robots[idx];
        robot.damage = robot.damage.saturating_add(amount).min(self.max_damage);
        let total = robot.damage;
        self.log.push(AnimationKind::RobotDamaged {
            player: self.owners[idx],
            amount,
            total,
        });
        if total >= self.max_damage {
            self.destroy(idx);
        }
    }

    /// Destroy the robot if it is off the board or in a pit.
    pub fn check_hazard(&mut self, idx: usize) {
        let pos = self.robots[idx].position;
        if self.robots[idx].is_on_board() && self.board.is_hazard(pos) {
            self.destroy(idx);
        }
    }

    /// Move up to `steps` tiles. Returns the number of tiles actually moved.
    pub fn move_robot(&mut self, idx: usize, direction: Direction, steps: u8) -> u8 {
        let mut moved = 0;
        for _ in 0..steps {
            if !self.robots[idx].is_on_board() || !self.step(idx, direction) {
                break;
            }
            moved += 1;
        }
        moved
    }

    /// Take one step. Returns false if the robot stopped (blocked or destroyed).
    pub fn step(&mut self, idx: usize, direction: Direction) -> bool {
        let from = self.robots[idx].position;
        let to = from.step(direction);

        if self.board.is_wall_blocking(from, direction) {
            return false;
        }

        if !self.board.in_bounds(to) {
            self.relocate(idx, to);
            self.destroy(idx);
            return false;
        }

        if let Some(blocker) = self.occupant(to) {
            let mover = self.owners[idx];
            if !self.push_chain(blocker, direction, mover) {
                return false;
            }
        }

        self.relocate(idx, to);
        self.log.push(AnimationKind::RobotMove {
            player: self.owners[idx],
            from,
            to,
        });

        if self.board.is_hazard(to) {
            self.destroy(idx);
            return false;
        }
        true
    }

    fn relocate(&mut self, idx: usize, to: Position) {
        self.robots[idx].position = to;
    }

    /// Push `first` and every robot lined up behind it one tile.
    ///
    /// The whole chain is computed before anything moves: a wall anywhere in
    /// the chain fails the push and leaves every robot where it was. A robot
    /// pushed off the board or into a pit is destroyed, and the push still
    /// succeeds.
    pub fn push_chain(&mut self, first: usize, direction: Direction, pusher: PlayerId) -> bool {
        let mut chain: SmallVec<[usize; 8]> = SmallVec::new();
        let mut current = first;

        loop {
            chain.push(current);
            let pos = self.robots[current].position;
            if self.board.is_wall_blocking(pos, direction) {
                return false;
            }
            let next = pos.step(direction);
            if !self.board.in_bounds(next) {
                break;
            }
            match self.occupant(next) {
                Some(behind) => current = behind,
                None => break,
            }
        }

        // Move the far end first so every destination is free.
        for link in (0..chain.len()).rev() {
            let idx = chain[link];
            let by = if link == 0 {
                pusher
            } else {
                self.owners[chain[link - 1]]
            };
            let from = self.robots[idx].position;
            let to = from.step(direction);
            self.relocate(idx, to);
            self.log.push(AnimationKind::RobotPushed {
                player: self.owners[idx],
                by,
                from,
                to,
            });
            self.check_hazard(idx);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, Tile};

    fn robot(x: i32, y: i32, dir: Direction) -> Robot {
        Robot::new(Position::new(x, y), dir, 3)
    }

    fn owners(n: u32) -> Vec<PlayerId> {
        (1..=n).map(PlayerId::new).collect()
    }

    #[test]
    fn test_simple_move() {
        let board = Board::empty(10, 10);
        let mut robots = vec![robot(5, 5, Direction::North)];
        let ids = owners(1);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::North, 3), 3);
        assert_eq!(robots[0].position, Position::new(5, 2));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_wall_blocks_move() {
        let board = BoardBuilder::new(5, 5).wall(2, 2, Direction::North).build();
        let mut robots = vec![robot(2, 3, Direction::North)];
        let ids = owners(1);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::North, 3), 1);
        assert_eq!(robots[0].position, Position::new(2, 2));
    }

    #[test]
    fn test_entry_side_wall_blocks_move() {
        // Wall on the south side of (2, 1) blocks entering it from (2, 2).
        let board = BoardBuilder::new(5, 5).wall(2, 1, Direction::South).build();
        let mut robots = vec![robot(2, 2, Direction::North)];
        let ids = owners(1);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::North, 1), 0);
        assert_eq!(robots[0].position, Position::new(2, 2));
    }

    #[test]
    fn test_off_board_destroys() {
        let board = Board::empty(5, 5);
        let mut robots = vec![robot(0, 0, Direction::North)];
        let ids = owners(1);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::North, 2), 0);
        assert!(robots[0].is_destroyed);
        assert_eq!(robots[0].lives, 2);
    }

    #[test]
    fn test_pit_destroys() {
        let board = BoardBuilder::new(5, 5).tile(2, 1, Tile::Pit).build();
        let mut robots = vec![robot(2, 3, Direction::North)];
        let ids = owners(1);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::North, 3), 1);
        assert!(robots[0].is_destroyed);
        assert_eq!(robots[0].position, Position::new(2, 1));
    }

    #[test]
    fn test_push_chain() {
        let board = Board::empty(10, 10);
        let mut robots = vec![
            robot(2, 5, Direction::East),
            robot(3, 5, Direction::North),
            robot(4, 5, Direction::South),
        ];
        let ids = owners(3);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::East, 2), 2);
        assert_eq!(robots[0].position, Position::new(4, 5));
        assert_eq!(robots[1].position, Position::new(5, 5));
        assert_eq!(robots[2].position, Position::new(6, 5));
        // Pushing never changes facing.
        assert_eq!(robots[1].direction, Direction::North);
    }

    #[test]
    fn test_push_chain_blocked_by_wall_moves_nobody() {
        let board = BoardBuilder::new(10, 10).wall(4, 5, Direction::East).build();
        let mut robots = vec![
            robot(2, 5, Direction::East),
            robot(3, 5, Direction::North),
            robot(4, 5, Direction::North),
        ];
        let ids = owners(3);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::East, 1), 0);
        assert_eq!(robots[0].position, Position::new(2, 5));
        assert_eq!(robots[1].position, Position::new(3, 5));
        assert_eq!(robots[2].position, Position::new(4, 5));
        assert!(log.is_empty());
    }

    #[test]
    fn test_push_off_board_destroys_pushed_robot() {
        let board = Board::empty(5, 5);
        let mut robots = vec![robot(3, 2, Direction::East), robot(4, 2, Direction::West)];
        let ids = owners(2);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::East, 1), 1);
        assert_eq!(robots[0].position, Position::new(4, 2));
        assert!(robots[1].is_destroyed);
        assert_eq!(robots[1].lives, 2);
    }

    #[test]
    fn test_destroyed_robots_do_not_block() {
        let board = Board::empty(5, 5);
        let mut robots = vec![robot(1, 1, Direction::East), robot(2, 1, Direction::East)];
        robots[1].destroy();
        let ids = owners(2);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        assert_eq!(field.move_robot(0, Direction::East, 1), 1);
        assert_eq!(robots[1].position, Position::new(2, 1));
    }

    #[test]
    fn test_damage_destroys_at_limit() {
        let board = Board::empty(5, 5);
        let mut robots = vec![robot(1, 1, Direction::East)];
        robots[0].damage = 8;
        let ids = owners(1);
        let mut log = AnimationLog::new();
        let mut field = Field::new(&board, &mut robots, &ids, 10, &mut log);

        field.damage(0, 1);
        assert!(field.robots[0].is_on_board());
        field.damage(0, 3);
        assert!(robots[0].is_destroyed);
        assert_eq!(robots[0].damage, 10);
    }
}
