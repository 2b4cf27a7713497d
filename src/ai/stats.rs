//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected while planning one program.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Complete or partial programs scored.
    pub evaluations: u32,

    /// Card plays simulated, counting board effects as part of the card.
    pub simulated_registers: u32,

    /// Search stopped at the combination cap before exhausting the hand.
    pub truncated: bool,

    /// Score of the chosen program.
    pub best_score: i32,

    /// Total time spent planning (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate evaluations per second.
    #[must_use]
    pub fn evaluations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.evaluations) / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Average simulated registers per evaluation.
    #[must_use]
    pub fn avg_registers_per_evaluation(&self) -> f64 {
        if self.evaluations == 0 {
            0.0
        } else {
            f64::from(self.simulated_registers) / f64::from(self.evaluations)
        }
    }
}
