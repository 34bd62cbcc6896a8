pub mod engine;
pub mod matchup;

pub use engine::{play_game, play_hand, EngineError, GameResult};
pub use matchup::{run_match, AveragePoints, MatchSummary, ReportError};
