//! Deck construction, shuffling and dealing.
//!
//! Two deck flavours exist:
//! - the classic shared deck, where every card carries a distinct
//!   priority interpolated across its type's range;
//! - personal decks, one per player, with fixed counts and no priority.
//!
//! A `Deck` owns a draw pile and a discard pile. When the draw pile runs
//! out mid-deal the discard pile is shuffled back in; if both are empty
//! the deal comes up short and callers work with a smaller hand.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, CardType};
use crate::core::rng::GameRng;

/// Distribution row: how many cards of a type and their priority range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Distribution {
    pub card_type: CardType,
    pub count: u16,
    pub min_priority: u16,
    pub max_priority: u16,
}

const fn row(card_type: CardType, count: u16, min_priority: u16, max_priority: u16) -> Distribution {
    Distribution {
        card_type,
        count,
        min_priority,
        max_priority,
    }
}

/// Shared deck distribution (84 cards).
pub const CLASSIC_DISTRIBUTION: [Distribution; 7] = [
    row(CardType::UTurn, 6, 10, 60),
    row(CardType::RotateLeft, 18, 70, 410),
    row(CardType::RotateRight, 18, 80, 420),
    row(CardType::BackUp, 6, 430, 480),
    row(CardType::Move1, 18, 490, 650),
    row(CardType::Move2, 12, 670, 780),
    row(CardType::Move3, 6, 790, 840),
];

/// Personal deck distribution (20 cards, priority unused).
pub const PERSONAL_DISTRIBUTION: [(CardType, u16); 9] = [
    (CardType::Move1, 5),
    (CardType::Move2, 3),
    (CardType::Move3, 1),
    (CardType::BackUp, 1),
    (CardType::RotateRight, 3),
    (CardType::RotateLeft, 3),
    (CardType::UTurn, 1),
    (CardType::Again, 2),
    (CardType::PowerUp, 1),
];

/// Number of cards in a personal deck.
pub const PERSONAL_DECK_SIZE: u32 = 20;

/// Priority of the `index`-th card of a row, rounded to the nearest integer.
fn interpolate_priority(dist: &Distribution, index: u16) -> u16 {
    if dist.count <= 1 {
        return dist.min_priority;
    }
    let span = u32::from(dist.max_priority - dist.min_priority);
    let steps = u32::from(dist.count - 1);
    let offset = (u32::from(index) * span + steps / 2) / steps;
    dist.min_priority + offset as u16
}

/// Return a shuffled copy, leaving the input untouched.
#[must_use]
pub fn shuffled(cards: &[Card], rng: &mut GameRng) -> Vec<Card> {
    let mut copy = cards.to_vec();
    rng.shuffle(&mut copy);
    copy
}

/// Build the classic shared deck, ids starting at 1, shuffled.
#[must_use]
pub fn create_deck(rng: &mut GameRng) -> Vec<Card> {
    let mut cards = Vec::with_capacity(84);
    let mut next_id = 1;

    for dist in &CLASSIC_DISTRIBUTION {
        for i in 0..dist.count {
            cards.push(Card::new(
                CardId::new(next_id),
                dist.card_type,
                interpolate_priority(dist, i),
            ));
            next_id += 1;
        }
    }

    shuffled(&cards, rng)
}

/// Build one player's personal deck with ids `first_id..first_id + 20`.
#[must_use]
pub fn create_personal_deck(rng: &mut GameRng, first_id: u32) -> Vec<Card> {
    let mut cards = Vec::with_capacity(PERSONAL_DECK_SIZE as usize);
    let mut next_id = first_id;

    for &(card_type, count) in &PERSONAL_DISTRIBUTION {
        for _ in 0..count {
            cards.push(Card::new(CardId::new(next_id), card_type, 0));
            next_id += 1;
        }
    }

    rng.shuffle(&mut cards);
    cards
}

/// Remove and return up to `n` cards from the front of `deck`.
pub fn deal_cards(deck: &mut Vec<Card>, n: usize) -> Vec<Card> {
    let take = n.min(deck.len());
    deck.drain(..take).collect()
}

/// Draw pile plus discard pile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard: Vec<Card>,
}

impl Deck {
    /// Wrap an already shuffled draw pile.
    #[must_use]
    pub fn new(draw_pile: Vec<Card>) -> Self {
        Self {
            draw_pile,
            discard: Vec::new(),
        }
    }

    /// Deal up to `n` cards, recycling the discard pile when the draw pile
    /// is exhausted.
    pub fn draw(&mut self, n: usize, rng: &mut GameRng) -> Vec<Card> {
        let mut hand = deal_cards(&mut self.draw_pile, n);

        if hand.len() < n && !self.discard.is_empty() {
            self.recycle_discard(rng);
            hand.extend(deal_cards(&mut self.draw_pile, n - hand.len()));
        }

        hand
    }

    /// Put cards on the discard pile.
    pub fn discard(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard.extend(cards);
    }

    /// Shuffle the discard pile underneath the remaining draw pile.
    pub fn recycle_discard(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.discard);
        self.draw_pile.append(&mut self.discard);
    }

    #[must_use]
    pub fn draw_len(&self) -> usize {
        self.draw_pile.len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Cards held by this deck in either pile.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw_pile.len() + self.discard.len()
    }

    /// All card ids in either pile.
    pub fn card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.draw_pile.iter().chain(self.discard.iter()).map(|c| c.id)
    }
}
