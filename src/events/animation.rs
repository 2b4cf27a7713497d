//! Animation events emitted while a round resolves.
//!
//! The executor appends one event per visible consequence as it happens.
//! Each event starts where the previous one ended, so `at_ms` is the sum of
//! the fixed durations of every earlier event in the round. Presentation
//! layers replay the log; nothing in the engine reads it back.

use serde::{Deserialize, Serialize};

use crate::board::{Direction, Position, Rotation};
use crate::cards::Card;
use crate::core::PlayerId;

/// Where a laser beam came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaserSource {
    Board,
    Robot { player: PlayerId },
}

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationKind {
    RegisterStart { register: usize },
    CardPlayed { player: PlayerId, card: Card },
    RobotMove { player: PlayerId, from: Position, to: Position },
    RobotRotate { player: PlayerId, from: Direction, to: Direction },
    RobotPushed { player: PlayerId, by: PlayerId, from: Position, to: Position },
    ConveyorMove { player: PlayerId, from: Position, to: Position },
    GearRotate { player: PlayerId, rotation: Rotation },
    LaserFire {
        source: LaserSource,
        from: Position,
        to: Position,
        direction: Direction,
        hit: Option<PlayerId>,
    },
    RobotDamaged { player: PlayerId, amount: u8, total: u8 },
    RobotDestroyed { player: PlayerId, at: Position },
    RobotRespawn { player: PlayerId, at: Position },
    CheckpointReached { player: PlayerId, order: u8 },
    Repair { player: PlayerId, damage: u8 },
    EnergyGained { player: PlayerId, energy: u8 },
}

impl AnimationKind {
    /// Fixed client playback duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        match self {
            AnimationKind::RegisterStart { .. } => 200,
            AnimationKind::CardPlayed { .. } => 300,
            AnimationKind::RobotMove { .. }
            | AnimationKind::RobotPushed { .. }
            | AnimationKind::ConveyorMove { .. } => 300,
            AnimationKind::RobotRotate { .. } | AnimationKind::GearRotate { .. } => 250,
            AnimationKind::LaserFire { .. } => 400,
            AnimationKind::RobotDamaged { .. } | AnimationKind::EnergyGained { .. } => 150,
            AnimationKind::RobotDestroyed { .. } => 500,
            AnimationKind::RobotRespawn { .. } | AnimationKind::CheckpointReached { .. } => 400,
            AnimationKind::Repair { .. } => 200,
        }
    }
}

/// One timestamped event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEvent {
    /// Offset from the start of the round.
    pub at_ms: u64,
    pub duration_ms: u64,
    pub register: usize,
    pub kind: AnimationKind,
}

/// Append-only event log for one round.
///
/// A disabled log drops everything; the AI simulates with one so that its
/// search never allocates events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationLog {
    events: Vec<AnimationEvent>,
    clock_ms: u64,
    register: usize,
    disabled: bool,
}

impl AnimationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Mark the start of a register.
    pub fn begin_register(&mut self, register: usize) {
        self.register = register;
        self.push(AnimationKind::RegisterStart { register });
    }

    pub fn push(&mut self, kind: AnimationKind) {
        if self.disabled {
            return;
        }
        let duration_ms = kind.duration_ms();
        self.events.push(AnimationEvent {
            at_ms: self.clock_ms,
            duration_ms,
            register: self.register,
            kind,
        });
        self.clock_ms += duration_ms;
    }

    #[must_use]
    pub fn events(&self) -> &[AnimationEvent] {
        &self.events
    }

    /// Events appended after `cursor` (an earlier `len()`).
    #[must_use]
    pub fn since(&self, cursor: usize) -> &[AnimationEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total playback time so far.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Start a fresh round.
    pub fn clear(&mut self) {
        self.events.clear();
        self.clock_ms = 0;
        self.register = 0;
    }
}
