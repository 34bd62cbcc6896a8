//! Contracts the decision procedures consume. The game engine implements
//! them; the selectors never reach past these traits.

use crate::card::{Card, Deck};
use crate::game::scoring::ScoreBreakdown;

/// Rule-derived hand scoring for a fixed set of cards
pub trait ScoringOracle {
    /// Points for `cards` shown with the optional starter; `is_crib` applies
    /// the crib-only rules
    fn score(&self, cards: &[Card], turn: Option<&Card>, is_crib: bool) -> (u32, ScoreBreakdown);
}

/// Enumerates the ways of choosing discard positions from a dealt hand
pub trait ThrowIndices {
    fn cards_dealt(&self) -> usize;

    fn cards_kept(&self) -> usize;

    fn discard_count(&self) -> usize {
        self.cards_dealt().saturating_sub(self.cards_kept())
    }

    /// Every subset of hand positions that may be discarded
    fn throw_indices(&self) -> Vec<Vec<usize>>;
}

/// Source of a fresh, complete deck
pub trait DeckModel {
    fn deck(&self) -> Deck;
}

/// Read-only view of the pegging count in progress
pub trait PlayHistory {
    /// Points `player` would peg by playing `card`, or None if the play is illegal
    fn score(&self, card: &Card, player: usize) -> Option<u32>;

    /// Running total of the current count
    fn total(&self) -> u32;
}
