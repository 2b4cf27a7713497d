//! Board construction and the built-in boards.

use super::geometry::{Direction, Position, Rotation};
use super::grid::Board;
use super::tile::{Checkpoint, Laser, Tile, Wall};

/// Builder for assembling a `Board` tile by tile.
///
/// ```
/// use rally_engine::board::{BoardBuilder, Direction, Tile};
///
/// let board = BoardBuilder::new(8, 8)
///     .named("example")
///     .tile(3, 3, Tile::Pit)
///     .wall(1, 1, Direction::North)
///     .checkpoint(7, 0, 1)
///     .spawn(0, 7)
///     .build();
///
/// assert_eq!(board.checkpoint_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    name: String,
    tiles: Vec<Vec<Tile>>,
    walls: Vec<Wall>,
    lasers: Vec<Laser>,
    checkpoints: Vec<Checkpoint>,
    spawn_points: Vec<Position>,
}

impl BoardBuilder {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Board must have positive dimensions");
        Self {
            name: "custom".to_string(),
            tiles: vec![vec![Tile::Floor; width as usize]; height as usize],
            walls: Vec::new(),
            lasers: Vec::new(),
            checkpoints: Vec::new(),
            spawn_points: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn tile(mut self, x: i32, y: i32, tile: Tile) -> Self {
        self.tiles[y as usize][x as usize] = tile;
        self
    }

    #[must_use]
    pub fn wall(mut self, x: i32, y: i32, side: Direction) -> Self {
        self.walls.push(Wall {
            position: Position::new(x, y),
            side,
        });
        self
    }

    #[must_use]
    pub fn laser(mut self, x: i32, y: i32, direction: Direction, strength: u8) -> Self {
        self.lasers.push(Laser {
            origin: Position::new(x, y),
            direction,
            strength,
        });
        self
    }

    #[must_use]
    pub fn checkpoint(mut self, x: i32, y: i32, order: u8) -> Self {
        self.checkpoints.push(Checkpoint {
            position: Position::new(x, y),
            order,
        });
        self
    }

    #[must_use]
    pub fn spawn(mut self, x: i32, y: i32) -> Self {
        self.spawn_points.push(Position::new(x, y));
        self
    }

    #[must_use]
    pub fn build(self) -> Board {
        Board::new(
            self.name,
            self.tiles,
            self.walls,
            self.lasers,
            self.checkpoints,
            self.spawn_points,
        )
    }
}

/// Boards shipped with the engine.
pub mod presets {
    use super::*;

    /// 12x12 board with every tile type, three checkpoints and eight spawns.
    #[must_use]
    pub fn training_ground() -> Board {
        let mut builder = BoardBuilder::new(12, 12).named("training_ground");

        // Express belt along row 5 heading east, turning south at the end.
        for x in 2..8 {
            builder = builder.tile(x, 5, Tile::express(Direction::East));
        }
        builder = builder.tile(8, 5, Tile::corner(Direction::South, true, Rotation::Clockwise));

        // Ordinary belt down column 3.
        for y in 7..11 {
            builder = builder.tile(3, y, Tile::conveyor(Direction::South));
        }

        builder
            .tile(1, 2, Tile::Pit)
            .tile(6, 8, Tile::Pit)
            .tile(9, 9, Tile::Pit)
            .tile(5, 2, Tile::Gear { rotation: Rotation::Clockwise })
            .tile(9, 3, Tile::Gear { rotation: Rotation::CounterClockwise })
            .tile(0, 0, Tile::Repair)
            .tile(11, 6, Tile::Repair)
            .tile(6, 10, Tile::Battery)
            .wall(4, 3, Direction::East)
            .wall(4, 4, Direction::East)
            .wall(7, 7, Direction::North)
            .wall(10, 1, Direction::South)
            .laser(0, 3, Direction::East, 1)
            .laser(11, 8, Direction::West, 2)
            .checkpoint(10, 2, 1)
            .checkpoint(2, 8, 2)
            .checkpoint(9, 10, 3)
            .spawn(0, 11)
            .spawn(1, 11)
            .spawn(2, 11)
            .spawn(4, 11)
            .spawn(5, 11)
            .spawn(7, 11)
            .spawn(8, 11)
            .spawn(10, 11)
            .build()
    }

    /// 10x10 board built around a conveyor loop with two checkpoints.
    #[must_use]
    pub fn conveyor_loop() -> Board {
        let mut builder = BoardBuilder::new(10, 10).named("conveyor_loop");

        for x in 2..7 {
            builder = builder.tile(x, 2, Tile::conveyor(Direction::East));
            builder = builder.tile(x + 1, 7, Tile::conveyor(Direction::West));
        }
        for y in 2..7 {
            builder = builder.tile(7, y, Tile::conveyor(Direction::South));
            builder = builder.tile(2, y + 1, Tile::conveyor(Direction::North));
        }
        builder = builder
            .tile(7, 2, Tile::corner(Direction::South, false, Rotation::Clockwise))
            .tile(7, 7, Tile::corner(Direction::West, false, Rotation::Clockwise))
            .tile(2, 7, Tile::corner(Direction::North, false, Rotation::Clockwise))
            .tile(2, 2, Tile::corner(Direction::East, false, Rotation::Clockwise));

        builder
            .tile(4, 4, Tile::Pit)
            .tile(5, 5, Tile::Repair)
            .laser(9, 4, Direction::West, 1)
            .wall(8, 4, Direction::West)
            .checkpoint(8, 1, 1)
            .checkpoint(1, 8, 2)
            .spawn(0, 9)
            .spawn(1, 9)
            .spawn(3, 9)
            .spawn(5, 9)
            .spawn(7, 9)
            .spawn(9, 9)
            .spawn(9, 0)
            .spawn(0, 0)
            .build()
    }

    /// Look up a preset by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Board> {
        match name {
            "training_ground" => Some(training_ground()),
            "conveyor_loop" => Some(conveyor_loop()),
            _ => None,
        }
    }
}
