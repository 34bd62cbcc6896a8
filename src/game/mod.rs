pub mod config;
pub mod pegging;
pub mod scoring;
pub mod state;

pub use config::{ConfigError, GameConfig};
pub use pegging::{PegError, PeggingHistory, Play};
pub use scoring::{score_hand, ScoreBreakdown};
pub use state::{GameState, PointSource, PointsBreakdown};
