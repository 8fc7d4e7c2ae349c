//! The pool of cards not currently on the table.

use crate::CardId;
use rand::seq::SliceRandom;
use rand::Rng;

/// The dealer's deck. Cards leave through [`Deck::draw`] and only return via
/// [`Deck::return_card`] when the table is swept between rounds; matched
/// cards are discarded permanently and never come back.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    /// A full deck covering the card universe `0..universe`.
    pub fn new(universe: usize) -> Self {
        Self {
            cards: (0..universe).collect(),
        }
    }

    /// A deck holding exactly the given cards, in order. Used by tests to
    /// stage known layouts.
    pub fn from_cards(cards: Vec<CardId>) -> Self {
        Self { cards }
    }

    /// Draw the top card, if any.
    pub fn draw(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Return a swept card to the bottom of the deck.
    pub fn return_card(&mut self, card: CardId) {
        self.cards.push(card);
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The undrawn cards, top last.
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }
}
