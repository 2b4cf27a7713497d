//! Program cards.

use serde::{Deserialize, Serialize};

/// Unique identifier of one physical card within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Closed set of card effects.
///
/// `Again` and `PowerUp` only appear in personal decks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Move1,
    Move2,
    Move3,
    BackUp,
    RotateLeft,
    RotateRight,
    UTurn,
    /// Repeats the effect of the previous register's card.
    Again,
    /// Gains one energy.
    PowerUp,
}

impl CardType {
    /// Forward distance for movement cards.
    #[must_use]
    pub const fn forward_steps(self) -> Option<u8> {
        match self {
            CardType::Move1 => Some(1),
            CardType::Move2 => Some(2),
            CardType::Move3 => Some(3),
            _ => None,
        }
    }

    /// Static preference used by the simpler AI tiers: forward movement,
    /// then back-up, then everything else.
    #[must_use]
    pub const fn preference(self) -> u8 {
        match self {
            CardType::Move3 => 6,
            CardType::Move2 => 5,
            CardType::Move1 => 4,
            CardType::BackUp => 3,
            CardType::RotateLeft | CardType::RotateRight => 2,
            CardType::UTurn | CardType::Again => 1,
            CardType::PowerUp => 0,
        }
    }
}

/// A program card instance.
///
/// `priority` orders resolution under the classic ruleset and is zero in
/// personal decks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub card_type: CardType,
    pub priority: u16,
}

impl Card {
    #[must_use]
    pub const fn new(id: CardId, card_type: CardType, priority: u16) -> Self {
        Self {
            id,
            card_type,
            priority,
        }
    }
}
