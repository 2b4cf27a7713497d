//! Card system: card taxonomy, deck construction and dealing.
//!
//! ## Key Types
//!
//! - `CardId`: identity of one physical card within a match
//! - `CardType`: closed set of card effects
//! - `Card`: id + type + priority
//! - `Deck`: draw pile and discard pile with exhaustion fallback

pub mod card;
pub mod deck;

pub use card::{Card, CardId, CardType};
pub use deck::{
    create_deck, create_personal_deck, deal_cards, shuffled, Deck, Distribution,
    CLASSIC_DISTRIBUTION, PERSONAL_DECK_SIZE, PERSONAL_DISTRIBUTION,
};
