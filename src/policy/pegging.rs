//! Pegging selection: take points when they are on offer, otherwise leave a
//! count the opponent is unlikely to score from.

use crate::card::Card;
use crate::policy::traits::PlayHistory;
use crate::policy::Pegger;

/// Zero-point plays that keep the count below this are safe
pub const SAFE_LOW_LIMIT: u32 = 5;
/// Zero-point plays that push the count above this are safe, except `EXPOSED_TOTAL`
pub const SAFE_HIGH_FLOOR: u32 = 15;
/// Count above the floor that is still never treated as safe
pub const EXPOSED_TOTAL: u32 = 21;

/// Defensive class of a zero-point play by the count it leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defense {
    SafeLow,
    SafeHigh,
    Exposed,
}

impl Defense {
    pub fn classify(projected: u32) -> Defense {
        if projected < SAFE_LOW_LIMIT {
            Defense::SafeLow
        } else if projected > SAFE_HIGH_FLOOR && projected != EXPOSED_TOTAL {
            Defense::SafeHigh
        } else {
            Defense::Exposed
        }
    }
}

/// Why a card was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PegReason {
    Scoring(u32),
    SafeLow(u32),
    SafeHigh(u32),
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PegChoice {
    pub card: Card,
    pub reason: PegReason,
}

/// History index of the player: 0 for the dealer, 1 otherwise
pub fn player_index(am_dealer: bool) -> usize {
    if am_dealer {
        0
    } else {
        1
    }
}

/// Choose the next card and report why.
///
/// Priority is fixed: best scoring play, then the highest safe-low count,
/// then the highest safe-high count, then the first legal card in hand
/// order. Illegal cards are never returned; None means the player must go.
/// The defensive count is the running total plus the card's rank.
pub fn choose_peg<H: PlayHistory + ?Sized>(cards: &[Card], history: &H, am_dealer: bool) -> Option<PegChoice> {
    let player = player_index(am_dealer);

    let mut best: Option<(Card, u32)> = None;
    let mut safe_low: Option<(Card, u32)> = None;
    let mut safe_high: Option<(Card, u32)> = None;

    for card in cards {
        let Some(score) = history.score(card, player) else {
            continue;
        };

        if best.map_or(true, |(_, s)| score > s) {
            best = Some((*card, score));
        }

        if score == 0 {
            let projected = history.total() + u32::from(card.rank());
            let slot = match Defense::classify(projected) {
                Defense::SafeLow => &mut safe_low,
                Defense::SafeHigh => &mut safe_high,
                Defense::Exposed => continue,
            };
            if slot.map_or(true, |(_, t)| projected > t) {
                *slot = Some((*card, projected));
            }
        }
    }

    let choice = match (best, safe_low, safe_high) {
        (Some((card, score)), _, _) if score > 0 => PegChoice {
            card,
            reason: PegReason::Scoring(score),
        },
        (_, Some((card, total)), _) => PegChoice {
            card,
            reason: PegReason::SafeLow(total),
        },
        (_, _, Some((card, total))) => PegChoice {
            card,
            reason: PegReason::SafeHigh(total),
        },
        (Some((card, _)), _, _) => PegChoice {
            card,
            reason: PegReason::Fallback,
        },
        (None, _, _) => return None,
    };

    log::debug!("peg {} ({:?}) at count {}", choice.card, choice.reason, history.total());
    Some(choice)
}

/// Card to play next, or None when nothing is playable
pub fn select_peg<H: PlayHistory + ?Sized>(cards: &[Card], history: &H, am_dealer: bool) -> Option<Card> {
    choose_peg(cards, history, am_dealer).map(|c| c.card)
}

/// Pegger that scores first and defends otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct DefensivePegger;

impl Pegger for DefensivePegger {
    fn peg(&self, cards: &[Card], history: &dyn PlayHistory, _turn: &Card, _scores: [u32; 2], am_dealer: bool) -> Option<Card> {
        select_peg(cards, history, am_dealer)
    }
}
