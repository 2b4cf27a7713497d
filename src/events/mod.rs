//! Write-only animation log produced by the round executor.

pub mod animation;

pub use animation::{AnimationEvent, AnimationKind, AnimationLog, LaserSource};
