pub mod distribution;
pub mod error;
pub mod greedy;
pub mod pegging;
pub mod throw;
pub mod traits;

pub use distribution::RankDistribution;
pub use error::PolicyError;
pub use greedy::{GreedyPegger, GreedyThrower};
pub use pegging::{choose_peg, select_peg, DefensivePegger, PegChoice, PegReason};
pub use throw::{ExpectedValueThrower, Partition, ThrowChoice, ThrowSelector, TieBreak};
pub use traits::{DeckModel, PlayHistory, ScoringOracle, ThrowIndices};

use crate::card::Card;
use crate::game::GameConfig;
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};

/// Decides the throw phase
pub trait Thrower: Send + Sync {
    /// Split the dealt hand into (keep, throw). `scores` is [own, opponent].
    fn keep(&self, hand: &[Card], scores: [u32; 2], am_dealer: bool, rng: &mut GameRng) -> Result<(Vec<Card>, Vec<Card>), PolicyError>;
}

/// Decides pegging plays
pub trait Pegger: Send + Sync {
    /// Next card to lay, or None to say go
    fn peg(&self, cards: &[Card], history: &dyn PlayHistory, turn: &Card, scores: [u32; 2], am_dealer: bool) -> Option<Card>;
}

/// A complete player
pub trait CribbagePolicy: Send + Sync {
    fn name(&self) -> &str;

    fn keep(&self, hand: &[Card], scores: [u32; 2], am_dealer: bool, rng: &mut GameRng) -> Result<(Vec<Card>, Vec<Card>), PolicyError>;

    fn peg(&self, cards: &[Card], history: &dyn PlayHistory, turn: &Card, scores: [u32; 2], am_dealer: bool) -> Option<Card>;
}

/// A policy assembled from independent throw and pegging strategies
pub struct CompositePolicy {
    name: String,
    thrower: Box<dyn Thrower>,
    pegger: Box<dyn Pegger>,
}

impl CompositePolicy {
    pub fn new(name: impl Into<String>, thrower: Box<dyn Thrower>, pegger: Box<dyn Pegger>) -> Self {
        CompositePolicy {
            name: name.into(),
            thrower,
            pegger,
        }
    }
}

impl CribbagePolicy for CompositePolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn keep(&self, hand: &[Card], scores: [u32; 2], am_dealer: bool, rng: &mut GameRng) -> Result<(Vec<Card>, Vec<Card>), PolicyError> {
        self.thrower.keep(hand, scores, am_dealer, rng)
    }

    fn peg(&self, cards: &[Card], history: &dyn PlayHistory, turn: &Card, scores: [u32; 2], am_dealer: bool) -> Option<Card> {
        self.pegger.peg(cards, history, turn, scores, am_dealer)
    }
}

/// Built-in policies selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Best visible score when throwing and pegging
    Greedy,
    /// Expected-value throws and defensive pegging
    Expected,
}

impl PolicyKind {
    pub fn build(self, config: &GameConfig) -> CompositePolicy {
        match self {
            PolicyKind::Greedy => CompositePolicy::new(
                "greedy",
                Box::new(GreedyThrower::new(config.clone())),
                Box::new(GreedyPegger),
            ),
            PolicyKind::Expected => CompositePolicy::new(
                "expected",
                Box::new(ExpectedValueThrower::new(config.clone(), TieBreak::Random)),
                Box::new(DefensivePegger),
            ),
        }
    }
}
