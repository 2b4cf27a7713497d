//! Immutable board data and query helpers.
//!
//! A `Board` is fixed for the lifetime of a match. Every query is total:
//! out-of-bounds coordinates are answered rather than rejected.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Position};
use super::tile::{Checkpoint, Laser, Tile, Wall};

/// Result of tracing a beam across the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeamTrace {
    /// Tiles the beam passed through, in order, including the hit tile.
    pub path: Vec<Position>,
    /// First tile on which the blocker predicate matched.
    pub hit: Option<Position>,
}

/// Static board: tiles, walls, lasers, checkpoints and spawn points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// Row-major: `tiles[y][x]`.
    pub tiles: Vec<Vec<Tile>>,
    pub walls: Vec<Wall>,
    pub lasers: Vec<Laser>,
    pub checkpoints: Vec<Checkpoint>,
    pub spawn_points: Vec<Position>,
    #[serde(skip)]
    wall_index: FxHashSet<Wall>,
}

impl Board {
    /// Create a board. Checkpoints are kept sorted by order.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        tiles: Vec<Vec<Tile>>,
        walls: Vec<Wall>,
        lasers: Vec<Laser>,
        mut checkpoints: Vec<Checkpoint>,
        spawn_points: Vec<Position>,
    ) -> Self {
        let height = tiles.len() as i32;
        let width = tiles.first().map_or(0, |row| row.len()) as i32;
        checkpoints.sort_by_key(|c| c.order);
        let wall_index = walls.iter().copied().collect();

        Self {
            name: name.into(),
            width,
            height,
            tiles,
            walls,
            lasers,
            checkpoints,
            spawn_points,
            wall_index,
        }
    }

    /// An all-floor board with no features.
    #[must_use]
    pub fn empty(width: i32, height: i32) -> Self {
        let tiles = vec![vec![Tile::Floor; width as usize]; height as usize];
        Self::new("empty", tiles, Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    /// Rebuild derived lookup tables after deserialization.
    pub fn reindex(&mut self) {
        self.wall_index = self.walls.iter().copied().collect();
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Tile at a position, `None` when off the board.
    #[must_use]
    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[pos.y as usize][pos.x as usize])
    }

    /// True if the position is off the board or a pit.
    #[must_use]
    pub fn is_hazard(&self, pos: Position) -> bool {
        self.tile_at(pos).map_or(true, Tile::is_pit)
    }

    fn has_wall(&self, pos: Position, side: Direction) -> bool {
        !self.wall_index.is_empty() && self.wall_index.contains(&Wall { position: pos, side })
    }

    /// True if leaving `pos` towards `direction` is blocked by a wall.
    ///
    /// Checks the exit side of the source tile and the entry side of the
    /// destination tile.
    #[must_use]
    pub fn is_wall_blocking(&self, pos: Position, direction: Direction) -> bool {
        self.has_wall(pos, direction) || self.has_wall(pos.step(direction), direction.opposite())
    }

    #[must_use]
    pub fn checkpoint_count(&self) -> u8 {
        self.checkpoints.len() as u8
    }

    /// Checkpoint with the given order.
    #[must_use]
    pub fn checkpoint(&self, order: u8) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.order == order)
    }

    /// Checkpoint located on a tile.
    #[must_use]
    pub fn checkpoint_at(&self, pos: Position) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.position == pos)
    }

    /// Trace a beam from `start` along `direction`.
    ///
    /// The beam stops at the first tile where `blocker` returns true, at a
    /// blocking wall, or at the board edge. `start` itself is tested.
    pub fn trace_beam(
        &self,
        start: Position,
        direction: Direction,
        mut blocker: impl FnMut(Position) -> bool,
    ) -> BeamTrace {
        let mut path = Vec::new();
        let mut current = start;

        while self.in_bounds(current) {
            path.push(current);
            if blocker(current) {
                return BeamTrace { path, hit: Some(current) };
            }
            if self.is_wall_blocking(current, direction) {
                break;
            }
            current = current.step(direction);
        }

        BeamTrace { path, hit: None }
    }

    /// True if any board laser would reach `pos`, ignoring robots.
    #[must_use]
    pub fn is_in_laser_line(&self, pos: Position) -> bool {
        self.lasers.iter().any(|laser| {
            self.trace_beam(laser.origin, laser.direction, |p| p == pos)
                .hit
                .is_some()
        })
    }
}
