//! Throw selection: choose which cards go to the crib.
//!
//! Each way of discarding is scored against one representative starter per
//! rank, weighted by how many suits of that rank the player has not seen.
//! Suits of the representative are fixed, so flush and nobs sensitivity to
//! the starter's suit is deliberately approximated away.

use crate::card::{format_cards, Card, Suit};
use crate::policy::distribution::RankDistribution;
use crate::policy::error::PolicyError;
use crate::game::GameConfig;
use crate::policy::traits::{DeckModel, ScoringOracle, ThrowIndices};
use crate::policy::Thrower;
use crate::rng::GameRng;

/// How to choose among partitions with equal expected value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Lexicographically smallest discard positions; reproducible
    #[default]
    FirstIndices,
    /// Uniform among the tied partitions, drawn from the injected RNG
    Random,
}

/// One way of splitting a hand into kept cards and crib discards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub keep: Vec<Card>,
    pub throw: Vec<Card>,
    pub discard_indices: Vec<usize>,
}

impl Partition {
    /// Split `hand` by discard positions, rejecting subsets that do not
    /// describe exactly `discard_count` distinct positions of the hand
    pub fn split(hand: &[Card], indices: &[usize], discard_count: usize) -> Result<Self, PolicyError> {
        let invalid = |reason: String| PolicyError::InvalidPartition {
            indices: indices.to_vec(),
            reason,
        };

        if indices.len() != discard_count {
            return Err(invalid(format!("expected {} discards", discard_count)));
        }
        if let Some(&i) = indices.iter().find(|&&i| i >= hand.len()) {
            return Err(invalid(format!("index {} outside a {} card hand", i, hand.len())));
        }
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(invalid("duplicate index".to_string()));
        }

        let mut keep = Vec::with_capacity(hand.len() - sorted.len());
        let mut throw = Vec::with_capacity(sorted.len());
        for (i, card) in hand.iter().enumerate() {
            if sorted.binary_search(&i).is_ok() {
                throw.push(*card);
            } else {
                keep.push(*card);
            }
        }

        Ok(Partition {
            keep,
            throw,
            discard_indices: sorted,
        })
    }
}

/// A partition with its expected value in quarter units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPartition {
    pub partition: Partition,
    pub quarters: i64,
}

impl ScoredPartition {
    /// Scaled expectation: weights are relative, not normalized
    pub fn expected_score(&self) -> f64 {
        self.quarters as f64 / 4.0
    }
}

/// Result of a throw decision
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowChoice {
    pub keep: Vec<Card>,
    pub throw: Vec<Card>,
    pub discard_indices: Vec<usize>,
    pub expected_score: f64,
}

impl From<ScoredPartition> for ThrowChoice {
    fn from(scored: ScoredPartition) -> Self {
        let expected_score = scored.expected_score();
        let Partition {
            keep,
            throw,
            discard_indices,
        } = scored.partition;
        ThrowChoice {
            keep,
            throw,
            discard_indices,
            expected_score,
        }
    }
}

/// +1 when the crib is ours, -1 when it feeds the opponent
pub fn dealer_sign(am_dealer: bool) -> i64 {
    if am_dealer {
        1
    } else {
        -1
    }
}

/// Representative starter of a rank; the suit is arbitrary but fixed
pub fn representative_starter(rank: u8) -> Card {
    Card::new(rank, Suit::Spades)
}

/// Expected keep score plus signed crib score, in quarter units
pub fn expected_quarters<O: ScoringOracle + ?Sized>(
    oracle: &O,
    partition: &Partition,
    distribution: &RankDistribution,
    crib_sign: i64,
) -> i64 {
    distribution
        .iter()
        .map(|(rank, quarters)| {
            let starter = representative_starter(rank);
            let (hand_points, _) = oracle.score(&partition.keep, Some(&starter), false);
            let (crib_points, _) = oracle.score(&partition.throw, Some(&starter), true);
            let combined = i64::from(hand_points) + crib_sign * i64::from(crib_points);
            combined * i64::from(quarters)
        })
        .sum()
}

/// Expectation-maximizing throw selection
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowSelector {
    tie_break: TieBreak,
}

impl ThrowSelector {
    pub fn new(tie_break: TieBreak) -> Self {
        ThrowSelector { tie_break }
    }

    /// Score every valid partition of the hand, in generator order
    pub fn evaluate<G>(&self, game: &G, hand: &[Card], am_dealer: bool) -> Result<Vec<ScoredPartition>, PolicyError>
    where
        G: ScoringOracle + ThrowIndices + DeckModel,
    {
        if hand.is_empty() {
            return Err(PolicyError::EmptyHand);
        }
        if hand.len() != game.cards_dealt() {
            return Err(PolicyError::HandSizeMismatch {
                expected: game.cards_dealt(),
                actual: hand.len(),
            });
        }

        let distribution = RankDistribution::from_hand(hand)?;

        let mut unseen = game.deck();
        unseen.remove(hand);

        let subsets = game.throw_indices();
        if subsets.is_empty() {
            return Err(PolicyError::InvalidPartition {
                indices: Vec::new(),
                reason: "no discard subsets to evaluate".to_string(),
            });
        }
        log::debug!(
            "evaluating {} throws against {} unseen cards (weight {:.2})",
            subsets.len(),
            unseen.len(),
            distribution.total_weight()
        );

        let sign = dealer_sign(am_dealer);
        subsets
            .iter()
            .map(|indices| {
                let partition = Partition::split(hand, indices, game.discard_count())?;
                let quarters = expected_quarters(game, &partition, &distribution, sign);
                Ok(ScoredPartition { partition, quarters })
            })
            .collect()
    }

    /// Every partition, best first; equal values keep generator order
    pub fn ranked<G>(&self, game: &G, hand: &[Card], am_dealer: bool) -> Result<Vec<ScoredPartition>, PolicyError>
    where
        G: ScoringOracle + ThrowIndices + DeckModel,
    {
        let mut scored = self.evaluate(game, hand, am_dealer)?;
        scored.sort_by(|a, b| b.quarters.cmp(&a.quarters));
        Ok(scored)
    }

    /// Pick the partition with the highest expected value
    pub fn select<G>(&self, game: &G, hand: &[Card], am_dealer: bool, rng: &mut GameRng) -> Result<ThrowChoice, PolicyError>
    where
        G: ScoringOracle + ThrowIndices + DeckModel,
    {
        let scored = self.evaluate(game, hand, am_dealer)?;
        let best = scored.iter().map(|s| s.quarters).max().unwrap_or(i64::MIN);
        let mut tied: Vec<ScoredPartition> = scored.into_iter().filter(|s| s.quarters == best).collect();

        let pick = match self.tie_break {
            TieBreak::FirstIndices => {
                tied.sort_by(|a, b| a.partition.discard_indices.cmp(&b.partition.discard_indices));
                0
            }
            TieBreak::Random => rng.index(tied.len()),
        };
        let choice = ThrowChoice::from(tied.swap_remove(pick));

        log::debug!(
            "throw [{}] from [{}] ({} tied, expected {:.2})",
            format_cards(&choice.throw),
            format_cards(hand),
            tied.len() + 1,
            choice.expected_score
        );
        Ok(choice)
    }
}

/// Thrower backed by the expected-value selector
#[derive(Debug, Clone)]
pub struct ExpectedValueThrower {
    config: GameConfig,
    selector: ThrowSelector,
}

impl ExpectedValueThrower {
    pub fn new(config: GameConfig, tie_break: TieBreak) -> Self {
        ExpectedValueThrower {
            config,
            selector: ThrowSelector::new(tie_break),
        }
    }
}

impl Thrower for ExpectedValueThrower {
    fn keep(&self, hand: &[Card], _scores: [u32; 2], am_dealer: bool, rng: &mut GameRng) -> Result<(Vec<Card>, Vec<Card>), PolicyError> {
        let choice = self.selector.select(&self.config, hand, am_dealer, rng)?;
        Ok((choice.keep, choice.throw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_cards;
    use crate::game::GameConfig;
    use crate::card::Deck;
    use crate::game::ScoreBreakdown;

    fn hand(codes: &str) -> Vec<Card> {
        parse_cards(codes).expect("valid card codes")
    }

    /// Brute-force expectation over every starter rank, in points
    fn brute_force(config: &GameConfig, hand: &[Card], indices: &[usize], am_dealer: bool) -> f64 {
        let sign = if am_dealer { 1.0 } else { -1.0 };
        let partition = Partition::split(hand, indices, 2).unwrap();
        (1..=13u8)
            .map(|rank| {
                let copies = hand.iter().filter(|c| c.rank() == rank).count() as f64;
                let weight = 1.0 - 0.25 * copies;
                let starter = Card::new(rank, Suit::Spades);
                let (keep, _) = config.score(&partition.keep, Some(&starter), false);
                let (crib, _) = config.score(&partition.throw, Some(&starter), true);
                weight * (keep as f64 + sign * crib as f64)
            })
            .sum()
    }

    #[test]
    fn test_partition_is_permutation_of_hand() {
        let config = GameConfig::default();
        let cards = hand("5S 5H JD 4C 6C QH");
        let mut rng = GameRng::new(Some(3));

        let choice = ThrowSelector::default().select(&config, &cards, true, &mut rng).unwrap();
        assert_eq!(choice.keep.len(), 4);
        assert_eq!(choice.throw.len(), 2);

        let mut rejoined: Vec<Card> = choice.keep.iter().chain(choice.throw.iter()).copied().collect();
        let mut original = cards.clone();
        rejoined.sort();
        original.sort();
        assert_eq!(rejoined, original, "keep + throw should be the dealt hand");
    }

    #[test]
    fn test_choice_beats_every_partition_by_brute_force() {
        let config = GameConfig::default();
        let mut rng = GameRng::new(Some(11));

        for codes in ["5S 5H JD 4C 6C QH", "AS 2H 3D 9C 10C KH", "7S 8S 9H 7D KC 2C"] {
            let cards = hand(codes);
            for am_dealer in [true, false] {
                let choice = ThrowSelector::default()
                    .select(&config, &cards, am_dealer, &mut rng)
                    .unwrap();
                let chosen = brute_force(&config, &cards, &choice.discard_indices, am_dealer);
                assert!((chosen - choice.expected_score).abs() < 1e-9);

                for indices in config.throw_indices() {
                    let other = brute_force(&config, &cards, &indices, am_dealer);
                    assert!(
                        choice.expected_score >= other - 1e-9,
                        "{:?} beats chosen {:?} for {}",
                        indices,
                        choice.discard_indices,
                        codes
                    );
                }
            }
        }
    }

    #[test]
    fn test_crib_value_depends_on_dealer() {
        // A pair of fives is worth more in our own crib than in the opponent's
        let config = GameConfig::default();
        let cards = hand("5S 5H KD QC 9H 2D");
        let selector = ThrowSelector::default();
        let scored = selector.evaluate(&config, &cards, true).unwrap();
        let scored_pone = selector.evaluate(&config, &cards, false).unwrap();

        let fives = scored.iter().find(|s| s.partition.discard_indices == vec![0, 1]).unwrap();
        let fives_pone = scored_pone.iter().find(|s| s.partition.discard_indices == vec![0, 1]).unwrap();
        assert!(fives.quarters > fives_pone.quarters);
    }

    #[test]
    fn test_value_is_deterministic_across_seeds() {
        let config = GameConfig::default();
        let cards = hand("2S 4H 6D 8C 10S QH");
        let selector = ThrowSelector::new(TieBreak::Random);

        let values: Vec<f64> = (0..10)
            .map(|seed| {
                let mut rng = GameRng::new(Some(seed));
                selector.select(&config, &cards, false, &mut rng).unwrap().expected_score
            })
            .collect();
        assert!(values.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_first_indices_tie_break_is_reproducible() {
        let config = GameConfig::default();
        let cards = hand("2S 4H 6D 8C 10S QH");
        let selector = ThrowSelector::default();

        let a = selector.select(&config, &cards, true, &mut GameRng::new(Some(1))).unwrap();
        let b = selector.select(&config, &cards, true, &mut GameRng::new(Some(2))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_tie_break_stays_among_maxima() {
        let config = GameConfig::default();
        let cards = hand("2S 4H 6D 8C 10S QH");
        let selector = ThrowSelector::new(TieBreak::Random);
        let scored = selector.evaluate(&config, &cards, true).unwrap();
        let best = scored.iter().map(|s| s.quarters).max().unwrap();

        for seed in 0..20 {
            let choice = selector.select(&config, &cards, true, &mut GameRng::new(Some(seed))).unwrap();
            let picked = scored
                .iter()
                .find(|s| s.partition.discard_indices == choice.discard_indices)
                .unwrap();
            assert_eq!(picked.quarters, best);
        }
    }

    #[test]
    fn test_ranked_leads_with_the_selected_throw() {
        let config = GameConfig::default();
        let cards = hand("5S 5H JD 4C 6C QH");
        let selector = ThrowSelector::default();

        let ranked = selector.ranked(&config, &cards, false).unwrap();
        assert_eq!(ranked.len(), 15);
        assert!(ranked.windows(2).all(|w| w[0].quarters >= w[1].quarters));

        let choice = selector.select(&config, &cards, false, &mut GameRng::new(Some(0))).unwrap();
        assert_eq!(ranked[0].partition.discard_indices, choice.discard_indices);
    }

    #[test]
    fn test_ranked_reports_bad_hand() {
        let config = GameConfig::default();
        let result = ThrowSelector::default().ranked(&config, &hand("5S 5H"), true);
        assert!(matches!(result, Err(PolicyError::HandSizeMismatch { .. })));
    }

    #[test]
    fn test_empty_hand_fails() {
        let config = GameConfig::default();
        let result = ThrowSelector::default().select(&config, &[], true, &mut GameRng::new(Some(0)));
        assert_eq!(result, Err(PolicyError::EmptyHand));
    }

    #[test]
    fn test_wrong_hand_size_fails() {
        let config = GameConfig::default();
        let cards = hand("5S 5H JD 4C");
        let result = ThrowSelector::default().select(&config, &cards, true, &mut GameRng::new(Some(0)));
        assert_eq!(
            result,
            Err(PolicyError::HandSizeMismatch {
                expected: 6,
                actual: 4
            })
        );
    }

    /// Rules whose partition generator hands out bad subsets
    struct BrokenIndices(Vec<Vec<usize>>);

    impl ScoringOracle for BrokenIndices {
        fn score(&self, _: &[Card], _: Option<&Card>, _: bool) -> (u32, ScoreBreakdown) {
            (0, ScoreBreakdown::default())
        }
    }

    impl ThrowIndices for BrokenIndices {
        fn cards_dealt(&self) -> usize {
            6
        }

        fn cards_kept(&self) -> usize {
            4
        }

        fn throw_indices(&self) -> Vec<Vec<usize>> {
            self.0.clone()
        }
    }

    impl DeckModel for BrokenIndices {
        fn deck(&self) -> Deck {
            Deck::standard()
        }
    }

    #[test]
    fn test_inconsistent_subsets_fail() {
        let cards = hand("5S 5H JD 4C 6C QH");
        let mut rng = GameRng::new(Some(0));

        for bad in [vec![vec![0, 6]], vec![vec![1, 1]], vec![vec![0, 1, 2]], vec![]] {
            let result = ThrowSelector::default().select(&BrokenIndices(bad), &cards, true, &mut rng);
            assert!(matches!(result, Err(PolicyError::InvalidPartition { .. })));
        }
    }

    #[test]
    fn test_split_orders_indices() {
        let cards = hand("5S 5H JD 4C 6C QH");
        let partition = Partition::split(&cards, &[4, 1], 2).unwrap();
        assert_eq!(partition.discard_indices, vec![1, 4]);
        assert_eq!(partition.throw, hand("5H 6C"));
        assert_eq!(partition.keep, hand("5S JD 4C QH"));
    }
}
