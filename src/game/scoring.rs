use crate::card::{Card, JACK};
use serde::{Deserialize, Serialize};

/// Points per scoring category for one counted hand or crib
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub fifteens: u32,
    pub pairs: u32,
    pub runs: u32,
    pub flush: u32,
    pub nobs: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.fifteens + self.pairs + self.runs + self.flush + self.nobs
    }
}

/// Score a hand or crib together with the optional starter card
pub fn score_hand(cards: &[Card], turn: Option<&Card>, is_crib: bool) -> ScoreBreakdown {
    let mut all: Vec<Card> = cards.to_vec();
    if let Some(t) = turn {
        all.push(*t);
    }

    ScoreBreakdown {
        fifteens: score_fifteens(&all),
        pairs: score_pairs(&all),
        runs: score_runs(&all),
        flush: score_flush(cards, turn, is_crib),
        nobs: score_nobs(cards, turn),
    }
}

/// Two points for every subset summing to fifteen
fn score_fifteens(cards: &[Card]) -> u32 {
    let n = cards.len();
    let mut count = 0;
    for mask in 1u32..(1 << n) {
        let sum: u32 = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| cards[i].value())
            .sum();
        if sum == 15 {
            count += 1;
        }
    }
    count * 2
}

fn score_pairs(cards: &[Card]) -> u32 {
    let mut points = 0;
    for (i, a) in cards.iter().enumerate() {
        for b in &cards[i + 1..] {
            if a.same_rank(b) {
                points += 2;
            }
        }
    }
    points
}

/// Each maximal run of three or more ranks scores its length once per
/// distinct combination of duplicated ranks
fn score_runs(cards: &[Card]) -> u32 {
    let mut counts = [0u32; 15];
    for card in cards {
        counts[card.rank() as usize] += 1;
    }

    let mut points = 0;
    let mut rank = 1;
    while rank <= 13 {
        if counts[rank] == 0 {
            rank += 1;
            continue;
        }
        let start = rank;
        let mut combos = 1;
        while rank <= 13 && counts[rank] > 0 {
            combos *= counts[rank];
            rank += 1;
        }
        let length = (rank - start) as u32;
        if length >= 3 {
            points += length * combos;
        }
    }
    points
}

/// A hand flush needs every hand card in one suit; a crib flush also needs the starter
fn score_flush(cards: &[Card], turn: Option<&Card>, is_crib: bool) -> u32 {
    let Some(first) = cards.first() else {
        return 0;
    };
    if cards.len() < 4 || cards.iter().any(|c| c.suit() != first.suit()) {
        return 0;
    }

    let size = cards.len() as u32;
    match turn {
        Some(t) if t.suit() == first.suit() => size + 1,
        _ if is_crib => 0,
        _ => size,
    }
}

/// One for the jack of the starter's suit
fn score_nobs(cards: &[Card], turn: Option<&Card>) -> u32 {
    match turn {
        Some(t) if cards.iter().any(|c| c.rank() == JACK && c.suit() == t.suit()) => 1,
        _ => 0,
    }
}
