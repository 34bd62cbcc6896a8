use crate::card::types::{Card, Suit};
use crate::rng::GameRng;

/// An ordered stack of cards; the top of the deck is the front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Full 52 card deck in rank-major order
    pub fn standard() -> Self {
        let cards = (1..=13)
            .flat_map(|rank| Suit::ALL.iter().map(move |&suit| Card::new(rank, suit)))
            .collect();
        Deck { cards }
    }

    /// Remove every listed card still present in the deck
    pub fn remove(&mut self, cards: &[Card]) {
        self.cards.retain(|c| !cards.contains(c));
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Deal `count` cards off the top, or None if the deck runs short
    pub fn deal(&mut self, count: usize) -> Option<Vec<Card>> {
        if count > self.cards.len() {
            return None;
        }
        Some(self.cards.drain(0..count).collect())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
