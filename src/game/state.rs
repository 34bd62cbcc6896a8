use serde::{Deserialize, Serialize};

/// Where a seat's points came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub pegging: u32,
    pub hand: u32,
    pub crib: u32,
    /// Two for the dealer when the starter is a jack
    pub heels: u32,
}

impl PointsBreakdown {
    pub fn total(&self) -> u32 {
        self.pegging + self.hand + self.crib + self.heels
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    Pegging,
    Hand,
    Crib,
    Heels,
}

/// Scoreboard for a two-seat game
#[derive(Debug, Clone)]
pub struct GameState {
    pub scores: [u32; 2],
    pub points: [PointsBreakdown; 2],
    /// Seat currently dealing
    pub dealer: usize,
    pub hands_played: u32,
    pub winning_score: u32,
}

impl GameState {
    pub fn new(first_dealer: usize, winning_score: u32) -> Self {
        GameState {
            scores: [0; 2],
            points: [PointsBreakdown::default(); 2],
            dealer: first_dealer,
            hands_played: 0,
            winning_score,
        }
    }

    pub fn pone(&self) -> usize {
        1 - self.dealer
    }

    /// Pegging role of a seat: 0 for the dealer, 1 for the non-dealer
    pub fn role(&self, seat: usize) -> usize {
        if seat == self.dealer {
            0
        } else {
            1
        }
    }

    /// Scores from the seat's own perspective: [own, opponent]
    pub fn scores_for(&self, seat: usize) -> [u32; 2] {
        [self.scores[seat], self.scores[1 - seat]]
    }

    /// Add points and report whether the seat has reached the target.
    /// Points past the target are not recorded.
    pub fn award(&mut self, seat: usize, points: u32, source: PointSource) -> bool {
        if points > 0 && !self.is_over() {
            let capped = points.min(self.winning_score - self.scores[seat]);
            self.scores[seat] += capped;
            let bucket = &mut self.points[seat];
            match source {
                PointSource::Pegging => bucket.pegging += capped,
                PointSource::Hand => bucket.hand += capped,
                PointSource::Crib => bucket.crib += capped,
                PointSource::Heels => bucket.heels += capped,
            }
        }
        self.scores[seat] >= self.winning_score
    }

    pub fn winner(&self) -> Option<usize> {
        (0..2).find(|&seat| self.scores[seat] >= self.winning_score)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Pass the deal at the end of a hand
    pub fn rotate_dealer(&mut self) {
        self.dealer = self.pone();
        self.hands_played += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_follow_dealer() {
        let mut state = GameState::new(1, 121);
        assert_eq!(state.role(1), 0);
        assert_eq!(state.role(0), 1);

        state.rotate_dealer();
        assert_eq!(state.dealer, 0);
        assert_eq!(state.pone(), 1);
        assert_eq!(state.hands_played, 1);
    }

    #[test]
    fn test_award_caps_at_target() {
        let mut state = GameState::new(0, 121);
        assert!(!state.award(0, 118, PointSource::Hand));
        assert!(state.award(0, 12, PointSource::Crib));
        assert_eq!(state.scores[0], 121);
        assert_eq!(state.points[0].crib, 3);
        assert_eq!(state.winner(), Some(0));

        // No scoring after the game is decided
        assert!(!state.award(1, 5, PointSource::Pegging));
        assert_eq!(state.scores[1], 0);
    }

    #[test]
    fn test_scores_for_perspective() {
        let mut state = GameState::new(0, 121);
        state.award(1, 7, PointSource::Pegging);
        assert_eq!(state.scores_for(1), [7, 0]);
        assert_eq!(state.scores_for(0), [0, 7]);
    }
}
