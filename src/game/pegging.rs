use crate::card::Card;
use crate::policy::traits::PlayHistory;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PegError {
    #[error("Playing {card} would take the count from {total} past {limit}")]
    OverLimit { card: Card, total: u32, limit: u32 },
    #[error("Player {0} already said go this count")]
    AlreadyPassed(usize),
    #[error("Unknown player index {0}")]
    UnknownPlayer(usize),
}

/// A card laid during pegging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub player: usize,
    pub card: Card,
}

/// The count in progress: plays since the last reset, running total and go state.
/// Player 0 is the dealer, player 1 the non-dealer.
#[derive(Debug, Clone)]
pub struct PeggingHistory {
    plays: Vec<Play>,
    total: u32,
    passed: [bool; 2],
    limit: u32,
}

impl PeggingHistory {
    pub fn new(limit: u32) -> Self {
        PeggingHistory {
            plays: Vec::new(),
            total: 0,
            passed: [false; 2],
            limit,
        }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn has_passed(&self, player: usize) -> bool {
        self.passed.get(player).copied().unwrap_or(false)
    }

    /// Lay a card and return the points it pegs
    pub fn play(&mut self, card: Card, player: usize) -> Result<u32, PegError> {
        if player >= self.passed.len() {
            return Err(PegError::UnknownPlayer(player));
        }
        if self.passed[player] {
            return Err(PegError::AlreadyPassed(player));
        }
        let points = self.points_for(&card).ok_or(PegError::OverLimit {
            card,
            total: self.total,
            limit: self.limit,
        })?;

        self.plays.push(Play { player, card });
        self.total += card.value();
        Ok(points)
    }

    /// Record that the player cannot play again this count
    pub fn go(&mut self, player: usize) {
        if let Some(flag) = self.passed.get_mut(player) {
            *flag = true;
        }
    }

    /// Start a new count after 31 or when neither player can continue
    pub fn reset(&mut self) {
        self.plays.clear();
        self.total = 0;
        self.passed = [false; 2];
    }

    /// Pegging points for laying `card` now, ignoring go state
    fn points_for(&self, card: &Card) -> Option<u32> {
        let total = self.total + card.value();
        if total > self.limit {
            return None;
        }

        let mut points = 0;
        if total == 15 {
            points += 2;
        }
        if total == self.limit {
            points += 2;
        }
        points += self.pair_points(card);
        points += self.run_points(card);
        Some(points)
    }

    /// 2, 6 or 12 for a pair, pair royal or double pair royal
    fn pair_points(&self, card: &Card) -> u32 {
        let matching = self
            .plays
            .iter()
            .rev()
            .take_while(|p| p.card.same_rank(card))
            .count() as u32;
        matching * (matching + 1)
    }

    /// Longest run formed by the new card and the cards just before it
    fn run_points(&self, card: &Card) -> u32 {
        let mut ranks: Vec<u8> = self.plays.iter().map(|p| p.card.rank()).collect();
        ranks.push(card.rank());

        for length in (3..=ranks.len()).rev() {
            let mut tail = ranks[ranks.len() - length..].to_vec();
            tail.sort_unstable();
            let consecutive = tail.windows(2).all(|w| w[1] == w[0] + 1);
            if consecutive {
                return length as u32;
            }
        }
        0
    }
}

impl PlayHistory for PeggingHistory {
    fn score(&self, card: &Card, player: usize) -> Option<u32> {
        if self.has_passed(player) || player >= self.passed.len() {
            return None;
        }
        self.points_for(card)
    }

    fn total(&self) -> u32 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(code: &str) -> Card {
        code.parse().expect("valid card code")
    }

    fn history_of(codes: &[&str]) -> PeggingHistory {
        let mut history = PeggingHistory::new(31);
        for (i, code) in codes.iter().enumerate() {
            history.play(card(code), i % 2).expect("legal play");
        }
        history
    }

    #[test]
    fn test_fifteen_and_thirty_one() {
        let history = history_of(&["10S", "KH"]);
        assert_eq!(history.total(), 20);
        assert_eq!(history.score(&card("AS"), 0), Some(0));

        let history = history_of(&["10S", "5H"]);
        assert_eq!(history.total(), 15);

        let history = history_of(&["10S"]);
        assert_eq!(history.score(&card("5D"), 1), Some(2));

        let history = history_of(&["10S", "KH", "QD"]);
        assert_eq!(history.score(&card("AC"), 1), Some(2), "31 should score two");
    }

    #[test]
    fn test_pairs_and_royals() {
        assert_eq!(history_of(&["7S"]).score(&card("7H"), 1), Some(2));
        assert_eq!(history_of(&["7S", "7H"]).score(&card("7D"), 0), Some(6));
        assert_eq!(history_of(&["2S", "2H", "2D"]).score(&card("2C"), 1), Some(12));
        // An intervening card breaks the pair
        assert_eq!(history_of(&["7S", "8H"]).score(&card("7D"), 0), Some(0));
    }

    #[test]
    fn test_runs_in_any_order() {
        assert_eq!(history_of(&["3S", "5H"]).score(&card("4D"), 0), Some(3));
        assert_eq!(history_of(&["AS", "3H", "2D"]).score(&card("4C"), 1), Some(4));
        // 9-8 then 9 is not a run
        assert_eq!(history_of(&["9S", "8H"]).score(&card("9D"), 0), Some(0));
    }

    #[test]
    fn test_over_limit_is_illegal() {
        let mut history = history_of(&["10S", "KH", "5D"]);
        assert_eq!(history.score(&card("7C"), 1), None);
        assert!(matches!(
            history.play(card("7C"), 1),
            Err(PegError::OverLimit { total: 25, .. })
        ));
    }

    #[test]
    fn test_go_blocks_player() {
        let mut history = history_of(&["10S", "KH", "QD"]);
        history.go(0);
        assert!(history.has_passed(0));
        assert_eq!(history.score(&card("AC"), 0), None);
        assert_eq!(history.score(&card("AC"), 1), Some(2));
        assert_eq!(history.play(card("AC"), 0), Err(PegError::AlreadyPassed(0)));
    }

    #[test]
    fn test_reset_starts_new_count() {
        let mut history = history_of(&["10S", "KH"]);
        history.go(1);
        history.reset();
        assert_eq!(history.total(), 0);
        assert!(history.plays().is_empty());
        assert!(!history.has_passed(1));
    }

    #[test]
    fn test_unknown_player() {
        let mut history = PeggingHistory::new(31);
        assert_eq!(history.score(&card("AC"), 2), None);
        assert_eq!(history.play(card("AC"), 2), Err(PegError::UnknownPlayer(2)));
    }
}
