//! AI tuning parameters.

use serde::{Deserialize, Serialize};

/// Strength of a computer player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// AI configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Chance that Easy fills a register with a random card instead of its
    /// best-ranked one.
    pub easy_random_chance: f64,

    /// Chance that Medium swaps its best card for a random other one.
    pub medium_substitute_chance: f64,

    /// Registers simulated past the candidate when Medium scores a card.
    pub medium_lookahead: usize,

    /// Damage at which Medium starts considering a power down.
    pub medium_power_down_damage: u8,

    /// Chance that Medium powers down once over the damage threshold.
    pub medium_power_down_chance: f64,

    /// Damage at which Hard considers a power down.
    pub hard_power_down_damage: u8,

    /// Hard only powers down when the next checkpoint is further than this.
    pub hard_power_down_distance: u32,

    /// Maximum programs Hard evaluates per decision.
    pub max_combinations: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            easy_random_chance: 0.4,
            medium_substitute_chance: 0.15,
            medium_lookahead: 3,
            medium_power_down_damage: 5,
            medium_power_down_chance: 0.3,
            hard_power_down_damage: 6,
            hard_power_down_distance: 4,
            max_combinations: 1000,
        }
    }
}

impl AiConfig {
    #[must_use]
    pub fn with_max_combinations(mut self, cap: usize) -> Self {
        self.max_combinations = cap;
        self
    }

    #[must_use]
    pub fn with_lookahead(mut self, registers: usize) -> Self {
        self.medium_lookahead = registers;
        self
    }

    /// Make Easy and Medium fully greedy.
    #[must_use]
    pub fn deterministic(mut self) -> Self {
        self.easy_random_chance = 0.0;
        self.medium_substitute_chance = 0.0;
        self.medium_power_down_chance = 0.0;
        self
    }
}
