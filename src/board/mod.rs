//! Board model: static grid data and pure query helpers.
//!
//! ## Key Types
//!
//! - `Position`, `Direction`, `Rotation`: grid geometry
//! - `Tile`: floor, pit, repair, battery, conveyor, gear
//! - `Wall`, `Laser`, `Checkpoint`: per-side walls and board features
//! - `Board`: the immutable board with wall/hazard/laser queries
//! - `BoardBuilder`, `presets`: construction and shipped boards

pub mod builder;
pub mod geometry;
pub mod grid;
pub mod tile;

pub use builder::{presets, BoardBuilder};
pub use geometry::{Direction, Position, Rotation};
pub use grid::{BeamTrace, Board};
pub use tile::{Checkpoint, Laser, Tile, Wall};
