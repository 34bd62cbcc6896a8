use crate::card::{Card, Deck};
use crate::game::scoring::{score_hand, ScoreBreakdown};
use crate::policy::traits::{DeckModel, ScoringOracle, ThrowIndices};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Table rules for a two-player game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cards dealt to each player before the throw
    pub cards_dealt: usize,
    /// Cards each player keeps; the crib is filled from the deck to this size
    pub cards_kept: usize,
    pub winning_score: u32,
    /// Ceiling of the pegging count
    pub count_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            cards_dealt: 6,
            cards_kept: 4,
            winning_score: 121,
            count_limit: 31,
        }
    }
}

impl GameConfig {
    /// Load rules from a JSON file; missing fields take the standard values
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cards_kept == 0 {
            return Err(ConfigError::Invalid("cards_kept must be positive".to_string()));
        }
        if self.cards_kept > self.cards_dealt {
            return Err(ConfigError::Invalid(format!(
                "cards_kept ({}) exceeds cards_dealt ({})",
                self.cards_kept, self.cards_dealt
            )));
        }
        // Two hands, the crib top-up and the starter must come out of one deck
        if self.cards_dealt > 8 {
            return Err(ConfigError::Invalid(format!(
                "cards_dealt ({}) leaves too few cards in the deck",
                self.cards_dealt
            )));
        }
        if self.winning_score == 0 {
            return Err(ConfigError::Invalid("winning_score must be positive".to_string()));
        }
        if self.count_limit < 10 {
            return Err(ConfigError::Invalid(format!(
                "count_limit ({}) cannot fit a ten-value card",
                self.count_limit
            )));
        }
        Ok(())
    }
}

impl ThrowIndices for GameConfig {
    fn cards_dealt(&self) -> usize {
        self.cards_dealt
    }

    fn cards_kept(&self) -> usize {
        self.cards_kept
    }

    /// All discard-sized subsets of hand positions, in lexicographic order
    fn throw_indices(&self) -> Vec<Vec<usize>> {
        combinations(self.cards_dealt, self.discard_count())
    }
}

impl DeckModel for GameConfig {
    fn deck(&self) -> Deck {
        Deck::standard()
    }
}

impl ScoringOracle for GameConfig {
    fn score(&self, cards: &[Card], turn: Option<&Card>, is_crib: bool) -> (u32, ScoreBreakdown) {
        let breakdown = score_hand(cards, turn, is_crib);
        (breakdown.total(), breakdown)
    }
}

/// k-subsets of 0..n in lexicographic order
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        result.push(current.clone());

        // Find the rightmost position that can still advance
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return result;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}
