use clap::{Parser, Subcommand};
use cribbage_agent::card::{format_cards, parse_cards, Card};
use cribbage_agent::game::{GameConfig, PeggingHistory};
use cribbage_agent::policy::{choose_peg, CribbagePolicy, PlayHistory, PolicyKind, ThrowSelector, TieBreak};
use cribbage_agent::rng::GameRng;
use cribbage_agent::simulation::run_match;
use indicatif::{ProgressBar, ProgressStyle};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::Path;

#[derive(Parser)]
#[command(name = "cribbage-agent")]
#[command(about = "Cribbage throw and pegging advisor with a head-to-head simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with table rules (defaults to the standard game)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log every decision
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick the cards to keep from a dealt hand
    Throw {
        /// Dealt cards, e.g. "5S 5H JD 4C 6C QH"
        cards: String,

        /// Evaluate as the dealer (the crib is yours)
        #[arg(short, long)]
        dealer: bool,

        /// Break ties randomly with this seed instead of taking the first split
        #[arg(short, long)]
        seed: Option<u64>,

        /// Also list the best N splits
        #[arg(short, long, default_value = "0")]
        top: usize,
    },

    /// Pick the next pegging card
    Peg {
        /// Cards still in hand
        cards: String,

        /// Cards already played this count, oldest first, alternating from the dealer
        #[arg(long, default_value = "")]
        history: String,

        /// Play as the dealer
        #[arg(short, long)]
        dealer: bool,
    },

    /// Simulate games between two policies
    Run {
        /// Number of games to simulate
        #[arg(short, long, default_value = "1000")]
        games: usize,

        /// Seed for the first game; game i uses seed + i
        #[arg(short, long)]
        seed: Option<u64>,

        /// Policy in seat 0
        #[arg(long, value_enum, default_value = "expected")]
        player_a: PolicyKind,

        /// Policy in seat 1
        #[arg(long, value_enum, default_value = "greedy")]
        player_b: PolicyKind,

        /// Write the summary as JSON into this directory
        #[arg(long, num_args = 0..=1, default_missing_value = "results")]
        save: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let log_config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    if let Err(e) = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("✗ Failed to initialize logging: {}", e);
    }

    let config = match &cli.config {
        Some(path) => match GameConfig::from_file(path) {
            Ok(config) => {
                log::info!("loaded rules from {}", path);
                config
            }
            Err(e) => {
                eprintln!("✗ Failed to load config '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    match cli.command {
        Commands::Throw {
            cards,
            dealer,
            seed,
            top,
        } => advise_throw(&config, &cards, dealer, seed, top),
        Commands::Peg { cards, history, dealer } => advise_peg(&config, &cards, &history, dealer),
        Commands::Run {
            games,
            seed,
            player_a,
            player_b,
            save,
        } => run_simulation(&config, games, seed, [player_a, player_b], save.as_deref()),
    }
}

fn parse_or_exit(input: &str, what: &str) -> Vec<Card> {
    match parse_cards(input) {
        Ok(cards) => cards,
        Err(e) => {
            eprintln!("✗ Failed to parse {} '{}': {}", what, input, e);
            std::process::exit(1);
        }
    }
}

fn advise_throw(config: &GameConfig, input: &str, dealer: bool, seed: Option<u64>, top: usize) {
    let hand = parse_or_exit(input, "hand");
    let tie_break = if seed.is_some() { TieBreak::Random } else { TieBreak::FirstIndices };
    let selector = ThrowSelector::new(tie_break);
    let mut rng = GameRng::new(seed);

    let choice = match selector.select(config, &hand, dealer, &mut rng) {
        Ok(choice) => choice,
        Err(e) => {
            eprintln!("✗ Cannot choose a throw: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n=== Throw ({}) ===\n", if dealer { "dealer" } else { "pone" });
    println!("Hand:     {}", format_cards(&hand));
    println!("Keep:     {}", format_cards(&choice.keep));
    println!("Throw:    {}", format_cards(&choice.throw));
    println!("Expected: {:.2}", choice.expected_score);

    if top > 0 {
        let ranked = match selector.ranked(config, &hand, dealer) {
            Ok(ranked) => ranked,
            Err(e) => {
                eprintln!("✗ Cannot rank throws: {}", e);
                std::process::exit(1);
            }
        };
        println!("\nBest {} splits:", top.min(ranked.len()));
        for scored in ranked.iter().take(top) {
            println!(
                "  {:>6.2}  keep {:<14} throw {}",
                scored.expected_score(),
                format_cards(&scored.partition.keep),
                format_cards(&scored.partition.throw)
            );
        }
    }
}

fn advise_peg(config: &GameConfig, input: &str, history_input: &str, dealer: bool) {
    let hand = parse_or_exit(input, "hand");
    let played = parse_or_exit(history_input, "history");

    let mut history = PeggingHistory::new(config.count_limit);
    for (i, card) in played.into_iter().enumerate() {
        if let Err(e) = history.play(card, i % 2) {
            eprintln!("✗ Invalid history: {}", e);
            std::process::exit(1);
        }
    }

    println!("\n=== Peg (count {}) ===\n", history.total());
    println!("Hand: {}", format_cards(&hand));
    match choose_peg(&hand, &history, dealer) {
        Some(choice) => println!("Play: {} ({:?})", choice.card, choice.reason),
        None => println!("Play: go"),
    }
}

fn run_simulation(config: &GameConfig, games: usize, seed: Option<u64>, kinds: [PolicyKind; 2], save: Option<&str>) {
    let seed = seed.unwrap_or_else(|| GameRng::new(None).seed());
    let policies = kinds.map(|kind| kind.build(config));

    println!("\n=== Cribbage Simulator ===\n");
    println!("Seat 0: {}", policies[0].name());
    println!("Seat 1: {}", policies[1].name());
    println!("Games: {}", games);
    println!("Seed: {}", seed);
    println!();

    let bar = ProgressBar::new(games as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} games ({eta})") {
        bar.set_style(style);
    }

    let start = std::time::Instant::now();
    let summary = match run_match([&policies[0], &policies[1]], config, games, seed, Some(&bar)) {
        Ok(summary) => summary,
        Err(e) => {
            bar.abandon();
            eprintln!("✗ Simulation failed: {}", e);
            std::process::exit(1);
        }
    };
    bar.finish_and_clear();
    let elapsed = start.elapsed();

    println!("=== Results ===\n");
    for seat in 0..2 {
        let points = &summary.average_points[seat];
        println!(
            "{:<10} wins {:5.1}% ({}/{})  skunked {}",
            summary.players[seat],
            summary.win_rate(seat) * 100.0,
            summary.wins[seat],
            summary.games,
            summary.skunks[seat]
        );
        println!(
            "           avg pegging {:5.2}  hand {:5.2}  crib {:5.2}  heels {:4.2}",
            points.pegging, points.hand, points.crib, points.heels
        );
    }
    println!();
    println!("Average margin (seat 0): {:+.2}", summary.average_margin);
    println!("Average hands per game: {:.2}", summary.average_hands);
    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} games/sec)",
        elapsed,
        games as f64 / elapsed.as_secs_f64()
    );

    if let Some(dir) = save {
        match summary.save(Path::new(dir)) {
            Ok(path) => println!("✓ Saved summary to {}", path.display()),
            Err(e) => {
                eprintln!("✗ Failed to save summary: {}", e);
                std::process::exit(1);
            }
        }
    }
}
