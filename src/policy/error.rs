use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Cannot choose a throw from an empty hand")]
    EmptyHand,
    #[error("Hand has {actual} cards, expected {expected}")]
    HandSizeMismatch { expected: usize, actual: usize },
    #[error("Invalid discard indices {indices:?}: {reason}")]
    InvalidPartition { indices: Vec<usize>, reason: String },
    #[error("Rank {rank} appears more than four times in hand")]
    RankExhausted { rank: u8 },
}
