//! Tile, wall, laser and checkpoint definitions.

use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Position, Rotation};

/// A board tile. Each variant carries the data its passive effect needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tile {
    #[default]
    Floor,
    Pit,
    /// Removes one point of damage per register.
    Repair,
    /// Grants one energy per register.
    Battery,
    /// Moves the occupying robot one tile in `direction` per activation.
    ///
    /// Express belts activate twice per register. A belt with a `turn`
    /// rotates any robot carried onto it.
    Conveyor {
        direction: Direction,
        express: bool,
        turn: Option<Rotation>,
    },
    /// Rotates the occupying robot once per register.
    Gear { rotation: Rotation },
}

impl Tile {
    #[must_use]
    pub const fn conveyor(direction: Direction) -> Self {
        Tile::Conveyor {
            direction,
            express: false,
            turn: None,
        }
    }

    #[must_use]
    pub const fn express(direction: Direction) -> Self {
        Tile::Conveyor {
            direction,
            express: true,
            turn: None,
        }
    }

    #[must_use]
    pub const fn corner(direction: Direction, express: bool, turn: Rotation) -> Self {
        Tile::Conveyor {
            direction,
            express,
            turn: Some(turn),
        }
    }

    #[must_use]
    pub const fn is_pit(self) -> bool {
        matches!(self, Tile::Pit)
    }
}

/// A wall on one side of one tile.
///
/// Walls are per tile-side: a wall on the east side of `(1, 1)` is a
/// different wall from one on the west side of `(2, 1)`, although both
/// block movement between the two tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub position: Position,
    pub side: Direction,
}

/// A board-mounted laser. Fires from `origin` (inclusive) along `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Laser {
    pub origin: Position,
    pub direction: Direction,
    pub strength: u8,
}

/// A checkpoint. Orders start at 1 and must be captured in sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    pub position: Position,
    pub order: u8,
}
