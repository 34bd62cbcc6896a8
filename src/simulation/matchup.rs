use crate::game::{GameConfig, PointsBreakdown};
use crate::policy::CribbagePolicy;
use crate::simulation::engine::{play_game, EngineError, GameResult};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Mean points per game from each source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AveragePoints {
    pub pegging: f64,
    pub hand: f64,
    pub crib: f64,
    pub heels: f64,
}

/// Aggregate of a head-to-head series between two seats
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub players: [String; 2],
    pub games: usize,
    pub seed: u64,
    pub wins: [usize; 2],
    /// Mean of seat 0's final score minus seat 1's
    pub average_margin: f64,
    pub average_hands: f64,
    pub average_points: [AveragePoints; 2],
    /// Games lost without reaching half the winning score
    pub skunks: [usize; 2],
}

impl MatchSummary {
    pub fn from_results(players: [String; 2], seed: u64, results: &[GameResult], winning_score: u32) -> Self {
        let games = results.len();
        let mut wins = [0; 2];
        let mut skunks = [0; 2];
        let mut margin = 0i64;
        let mut hands = 0u64;
        let mut totals = [PointsBreakdown::default(); 2];

        for result in results {
            wins[result.winner] += 1;
            let loser = 1 - result.winner;
            if result.scores[loser] * 2 < winning_score {
                skunks[loser] += 1;
            }
            margin += i64::from(result.scores[0]) - i64::from(result.scores[1]);
            hands += u64::from(result.hands_played);
            for seat in 0..2 {
                totals[seat].pegging += result.points[seat].pegging;
                totals[seat].hand += result.points[seat].hand;
                totals[seat].crib += result.points[seat].crib;
                totals[seat].heels += result.points[seat].heels;
            }
        }

        let per_game = |sum: f64| if games == 0 { 0.0 } else { sum / games as f64 };
        let average_points = totals.map(|t| AveragePoints {
            pegging: per_game(f64::from(t.pegging)),
            hand: per_game(f64::from(t.hand)),
            crib: per_game(f64::from(t.crib)),
            heels: per_game(f64::from(t.heels)),
        });

        MatchSummary {
            players,
            games,
            seed,
            wins,
            average_margin: per_game(margin as f64),
            average_hands: per_game(hands as f64),
            average_points,
            skunks,
        }
    }

    pub fn win_rate(&self, seat: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins[seat] as f64 / self.games as f64
        }
    }

    /// Write the summary as pretty JSON into `dir`, named after the players
    /// and the current local time. Returns the written path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("match_{}_vs_{}_{}.json", self.players[0], self.players[1], stamp));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

/// Play `games` games in parallel, game `i` seeded with `seed + i`.
/// Any engine error aborts the whole series.
pub fn run_match(
    policies: [&dyn CribbagePolicy; 2],
    config: &GameConfig,
    games: usize,
    seed: u64,
    progress: Option<&ProgressBar>,
) -> Result<MatchSummary, EngineError> {
    log::info!(
        "running {} games: {} vs {} (seed {})",
        games,
        policies[0].name(),
        policies[1].name(),
        seed
    );

    let results = (0..games)
        .into_par_iter()
        .map(|i| {
            let result = play_game(policies, config, seed.wrapping_add(i as u64));
            if let Some(bar) = progress {
                bar.inc(1);
            }
            result
        })
        .collect::<Result<Vec<_>, _>>()?;

    let players = [policies[0].name().to_string(), policies[1].name().to_string()];
    Ok(MatchSummary::from_results(players, seed, &results, config.winning_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyKind;

    fn result(winner: usize, scores: [u32; 2], hands: u32) -> GameResult {
        let mut points = [PointsBreakdown::default(); 2];
        points[0].hand = scores[0];
        points[1].pegging = scores[1];
        GameResult {
            winner,
            scores,
            hands_played: hands,
            first_dealer: 0,
            points,
        }
    }

    #[test]
    fn test_summary_aggregates() {
        let results = vec![result(0, [121, 100], 10), result(1, [50, 121], 8)];
        let summary = MatchSummary::from_results(["a".to_string(), "b".to_string()], 0, &results, 121);

        assert_eq!(summary.games, 2);
        assert_eq!(summary.wins, [1, 1]);
        assert_eq!(summary.skunks, [1, 0]);
        assert!((summary.average_margin - (21.0 - 71.0) / 2.0).abs() < 1e-9);
        assert!((summary.average_hands - 9.0).abs() < 1e-9);
        assert!((summary.average_points[0].hand - 85.5).abs() < 1e-9);
        assert!((summary.average_points[1].pegging - 110.5).abs() < 1e-9);
        assert!((summary.win_rate(0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = MatchSummary::from_results(["a".to_string(), "b".to_string()], 0, &[], 121);
        assert_eq!(summary.win_rate(0), 0.0);
        assert_eq!(summary.average_margin, 0.0);
    }

    #[test]
    fn test_run_match_counts_every_game() {
        let config = GameConfig::default();
        let a = PolicyKind::Greedy.build(&config);
        let b = PolicyKind::Expected.build(&config);
        let bar = ProgressBar::hidden();

        let summary = run_match([&a, &b], &config, 4, 11, Some(&bar)).unwrap();
        assert_eq!(summary.games, 4);
        assert_eq!(summary.wins[0] + summary.wins[1], 4);
        assert_eq!(bar.position(), 4);
        assert_eq!(summary.players, ["greedy".to_string(), "expected".to_string()]);
    }

    #[test]
    fn test_run_match_is_reproducible() {
        let config = GameConfig::default();
        let a = PolicyKind::Greedy.build(&config);
        let b = PolicyKind::Expected.build(&config);

        let first = run_match([&a, &b], &config, 3, 99, None).unwrap();
        let second = run_match([&a, &b], &config, 3, 99, None).unwrap();
        assert_eq!(first.wins, second.wins);
        assert_eq!(first.average_margin, second.average_margin);
    }

    #[test]
    fn test_save_writes_json() {
        let dir = std::env::temp_dir().join(format!("cribbage_agent_test_{}", std::process::id()));
        let summary = MatchSummary::from_results(["a".to_string(), "b".to_string()], 5, &[result(0, [121, 90], 9)], 121);

        let path = summary.save(&dir).unwrap();
        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["wins"][0], 1);
        assert_eq!(written["seed"], 5);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
