//! Players, their robots and connection identities.
//!
//! ## PlayerId
//!
//! Session-scoped identifier allocated on join and never reused within a
//! session. Seating order is the order of `GameState::players`.
//!
//! ## ConnectionId
//!
//! Opaque transport handle. A player keeps its `PlayerId` across
//! reconnects while its `ConnectionId` changes.

use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::board::{Direction, Position};
use crate::cards::{Card, CardId};

/// Number of program registers per player.
pub const REGISTER_COUNT: usize = 5;

/// Session-scoped player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Transport connection identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Conn({})", self.0)
    }
}

/// A player's robot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub position: Position,
    pub direction: Direction,
    /// 0..=max damage; reaching the limit destroys the robot.
    pub damage: u8,
    /// Remaining lives; zero means out of the match.
    pub lives: u8,
    /// Highest checkpoint order captured so far.
    pub last_checkpoint: u8,
    /// Where the robot returns after destruction.
    pub spawn_position: Position,
    pub spawn_direction: Direction,
    /// Off the board, waiting for respawn (or eliminated).
    pub is_destroyed: bool,
    /// Destroyed earlier in the current round; plays no further cards.
    pub rebooted: bool,
    pub energy: u8,
}

impl Robot {
    #[must_use]
    pub fn new(position: Position, direction: Direction, lives: u8) -> Self {
        Self {
            position,
            direction,
            damage: 0,
            lives,
            last_checkpoint: 0,
            spawn_position: position,
            spawn_direction: direction,
            is_destroyed: false,
            rebooted: false,
            energy: 0,
        }
    }

    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.lives == 0
    }

    /// On the board and able to be hit, pushed and moved.
    #[must_use]
    pub fn is_on_board(&self) -> bool {
        !self.is_destroyed && !self.is_eliminated()
    }

    /// Remove the robot from play and spend a life.
    ///
    /// A no-op for robots that are already off the board.
    pub fn destroy(&mut self) -> bool {
        if !self.is_on_board() {
            return false;
        }
        self.is_destroyed = true;
        self.rebooted = true;
        self.lives = self.lives.saturating_sub(1);
        true
    }

    /// Put a destroyed robot back on the board.
    pub fn respawn(&mut self, at: Position, damage: u8) {
        self.position = at;
        self.direction = self.spawn_direction;
        self.damage = damage;
        self.is_destroyed = false;
    }

    /// Record a checkpoint capture. Only `last_checkpoint + 1` counts.
    pub fn capture_checkpoint(&mut self, order: u8, at: Position) -> bool {
        if order != self.last_checkpoint + 1 {
            return false;
        }
        self.last_checkpoint = order;
        self.spawn_position = at;
        true
    }
}

/// A participant in a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub is_ai: bool,
    pub difficulty: Option<Difficulty>,
    pub hand: Vec<Card>,
    pub registers: [Option<Card>; REGISTER_COUNT],
    /// Registers at or after this index are locked.
    pub locked_from: usize,
    pub is_ready: bool,
    pub is_connected: bool,
    /// Power down at the start of next round.
    pub power_down_announced: bool,
    /// Powered down for the current round.
    pub is_powered_down: bool,
    pub robot: Robot,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>, robot: Robot) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            is_ai: false,
            difficulty: None,
            hand: Vec::new(),
            registers: [None; REGISTER_COUNT],
            locked_from: REGISTER_COUNT,
            is_ready: false,
            is_connected: true,
            power_down_announced: false,
            is_powered_down: false,
            robot,
        }
    }

    /// Create a computer-controlled player.
    #[must_use]
    pub fn ai(id: PlayerId, name: impl Into<String>, color: impl Into<String>, robot: Robot, difficulty: Difficulty) -> Self {
        let mut player = Self::new(id, name, color, robot);
        player.is_ai = true;
        player.difficulty = Some(difficulty);
        player
    }

    #[must_use]
    pub fn is_register_locked(&self, index: usize) -> bool {
        index >= self.locked_from
    }

    #[must_use]
    pub fn registers_filled(&self) -> usize {
        self.registers.iter().filter(|r| r.is_some()).count()
    }

    /// Ready to submit: every register filled, or nothing left to place.
    #[must_use]
    pub fn program_complete(&self) -> bool {
        self.registers_filled() == REGISTER_COUNT || self.hand.is_empty()
    }

    /// Remove a card from the hand by id.
    pub fn take_from_hand(&mut self, id: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|c| c.id == id)?;
        Some(self.hand.remove(index))
    }

    /// Ids of every card this player holds (hand and registers).
    pub fn card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.hand
            .iter()
            .chain(self.registers.iter().flatten())
            .map(|c| c.id)
    }

    /// Cards currently in play for this player.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.registers_filled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;

    fn robot() -> Robot {
        Robot::new(Position::new(2, 2), Direction::North, 3)
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(format!("{}", PlayerId::new(4)), "Player 4");
        assert_eq!(format!("{}", ConnectionId(9)), "Conn(9)");
    }

    #[test]
    fn test_destroy_and_respawn() {
        let mut r = robot();
        r.damage = 7;
        r.direction = Direction::East;

        assert!(r.destroy());
        assert!(r.is_destroyed);
        assert!(r.rebooted);
        assert_eq!(r.lives, 2);
        assert!(!r.destroy(), "already destroyed robots cannot be destroyed twice");
        assert_eq!(r.lives, 2);

        r.respawn(Position::new(0, 0), 2);
        assert!(r.is_on_board());
        assert_eq!(r.damage, 2);
        assert_eq!(r.direction, Direction::North);
        assert!(r.rebooted, "reboot flag lasts until the round ends");
    }

    #[test]
    fn test_elimination() {
        let mut r = Robot::new(Position::new(0, 0), Direction::South, 1);
        r.destroy();
        assert!(r.is_eliminated());
        assert!(!r.is_on_board());
    }

    #[test]
    fn test_checkpoint_capture_in_order() {
        let mut r = robot();
        assert!(!r.capture_checkpoint(2, Position::new(5, 5)));
        assert_eq!(r.last_checkpoint, 0);

        assert!(r.capture_checkpoint(1, Position::new(3, 3)));
        assert_eq!(r.last_checkpoint, 1);
        assert_eq!(r.spawn_position, Position::new(3, 3));

        assert!(!r.capture_checkpoint(1, Position::new(3, 3)));
        assert_eq!(r.last_checkpoint, 1);
    }

    #[test]
    fn test_player_hand_and_registers() {
        let mut p = Player::new(PlayerId::new(1), "Ada", "red", robot());
        p.hand = vec![
            Card::new(CardId::new(1), CardType::Move1, 500),
            Card::new(CardId::new(2), CardType::UTurn, 10),
        ];

        let card = p.take_from_hand(CardId::new(2)).unwrap();
        p.registers[0] = Some(card);

        assert_eq!(p.hand.len(), 1);
        assert_eq!(p.registers_filled(), 1);
        assert_eq!(p.card_count(), 2);
        assert!(p.take_from_hand(CardId::new(2)).is_none());
        assert!(!p.program_complete());

        let ids: Vec<_> = p.card_ids().collect();
        assert_eq!(ids, vec![CardId::new(1), CardId::new(2)]);
    }

    #[test]
    fn test_locked_registers() {
        let mut p = Player::new(PlayerId::new(1), "Ada", "red", robot());
        assert!(!p.is_register_locked(4));
        p.locked_from = 3;
        assert!(!p.is_register_locked(2));
        assert!(p.is_register_locked(3));
        assert!(p.is_register_locked(4));
    }
}
