use crate::card::{Card, ACE, KING};
use crate::policy::error::PolicyError;

const SUITS_PER_RANK: u8 = 4;

/// Relative likelihood of each starter rank given only the player's own hand.
///
/// Every rank starts with all four suits unseen; each card of that rank in
/// hand removes one. Opponent cards and the rest of the deal are not tracked,
/// so weights are relative counts rather than normalized probabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankDistribution {
    unseen: [u8; 13],
}

impl RankDistribution {
    /// Fails if a rank occurs more than four times, which no real deck allows
    pub fn from_hand(hand: &[Card]) -> Result<Self, PolicyError> {
        let mut unseen = [SUITS_PER_RANK; 13];
        for card in hand {
            let slot = &mut unseen[usize::from(card.rank() - 1)];
            *slot = slot
                .checked_sub(1)
                .ok_or(PolicyError::RankExhausted { rank: card.rank() })?;
        }
        Ok(RankDistribution { unseen })
    }

    /// Unseen suits of the rank, i.e. the weight in quarter units
    pub fn quarters(&self, rank: u8) -> u8 {
        match rank {
            ACE..=KING => self.unseen[usize::from(rank - 1)],
            _ => 0,
        }
    }

    /// Weight of the rank: 1.0 when untouched, minus 0.25 per copy in hand
    pub fn weight(&self, rank: u8) -> f64 {
        f64::from(self.quarters(rank)) / f64::from(SUITS_PER_RANK)
    }

    pub fn total_weight(&self) -> f64 {
        (ACE..=KING).map(|r| self.weight(r)).sum()
    }

    /// Ranks with their quarter weights, skipping exhausted ranks
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (ACE..=KING)
            .map(move |rank| (rank, self.quarters(rank)))
            .filter(|&(_, q)| q > 0)
    }
}
