//! Baseline policies: take the most points visible right now.

use crate::card::Card;
use crate::game::GameConfig;
use crate::policy::error::PolicyError;
use crate::policy::pegging::player_index;
use crate::policy::throw::{dealer_sign, Partition};
use crate::policy::traits::{PlayHistory, ScoringOracle, ThrowIndices};
use crate::policy::{Pegger, Thrower};
use crate::rng::GameRng;

/// Keeps the split with the best hand plus signed crib score, ignoring the starter
#[derive(Debug, Clone)]
pub struct GreedyThrower {
    config: GameConfig,
}

impl GreedyThrower {
    pub fn new(config: GameConfig) -> Self {
        GreedyThrower { config }
    }
}

impl Thrower for GreedyThrower {
    fn keep(&self, hand: &[Card], _scores: [u32; 2], am_dealer: bool, _rng: &mut GameRng) -> Result<(Vec<Card>, Vec<Card>), PolicyError> {
        if hand.is_empty() {
            return Err(PolicyError::EmptyHand);
        }
        if hand.len() != self.config.cards_dealt() {
            return Err(PolicyError::HandSizeMismatch {
                expected: self.config.cards_dealt(),
                actual: hand.len(),
            });
        }

        let sign = dealer_sign(am_dealer);
        let mut best: Option<(Partition, i64)> = None;
        for indices in self.config.throw_indices() {
            let partition = Partition::split(hand, &indices, self.config.discard_count())?;
            let (keep_points, _) = self.config.score(&partition.keep, None, false);
            let (crib_points, _) = self.config.score(&partition.throw, None, true);
            let value = i64::from(keep_points) + sign * i64::from(crib_points);
            if best.as_ref().map_or(true, |(_, v)| value > *v) {
                best = Some((partition, value));
            }
        }

        let (partition, _) = best.ok_or_else(|| PolicyError::InvalidPartition {
            indices: Vec::new(),
            reason: "no discard subsets to evaluate".to_string(),
        })?;
        Ok((partition.keep, partition.throw))
    }
}

/// Plays the card pegging the most points now; first in hand order on ties
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPegger;

impl Pegger for GreedyPegger {
    fn peg(&self, cards: &[Card], history: &dyn PlayHistory, _turn: &Card, _scores: [u32; 2], am_dealer: bool) -> Option<Card> {
        let player = player_index(am_dealer);
        let mut best: Option<(Card, u32)> = None;
        for card in cards {
            if let Some(score) = history.score(card, player) {
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((*card, score));
                }
            }
        }
        best.map(|(card, _)| card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_cards;
    use crate::game::PeggingHistory;

    fn card(code: &str) -> Card {
        code.parse().expect("valid card code")
    }

    #[test]
    fn test_greedy_thrower_keeps_visible_points() {
        let thrower = GreedyThrower::new(GameConfig::default());
        let hand = parse_cards("5S 5H 5D JC 2H 9S").unwrap();
        let (keep, throw) = thrower.keep(&hand, [0, 0], false, &mut GameRng::new(Some(0))).unwrap();

        assert_eq!(keep, parse_cards("5S 5H 5D JC").unwrap());
        assert_eq!(throw, parse_cards("2H 9S").unwrap());
    }

    #[test]
    fn test_greedy_thrower_rejects_short_hand() {
        let thrower = GreedyThrower::new(GameConfig::default());
        let hand = parse_cards("5S 5H").unwrap();
        let result = thrower.keep(&hand, [0, 0], true, &mut GameRng::new(Some(0)));
        assert!(matches!(result, Err(PolicyError::HandSizeMismatch { .. })));
    }

    #[test]
    fn test_greedy_pegger_takes_most_points() {
        let mut history = PeggingHistory::new(31);
        history.play(card("5S"), 0).unwrap();
        history.play(card("5H"), 1).unwrap();

        // 5 makes fifteen and a pair royal, 4 nothing
        let hand = parse_cards("4D 5D").unwrap();
        assert_eq!(GreedyPegger.peg(&hand, &history, &card("KS"), [0, 0], true), Some(card("5D")));
    }

    #[test]
    fn test_greedy_pegger_goes_when_stuck() {
        let mut history = PeggingHistory::new(31);
        for (i, code) in ["10S", "KH", "QD"].iter().enumerate() {
            history.play(card(code), i % 2).unwrap();
        }
        let hand = parse_cards("2D 9C").unwrap();
        assert_eq!(GreedyPegger.peg(&hand, &history, &card("KS"), [0, 0], false), None);
    }
}
