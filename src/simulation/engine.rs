use crate::card::{format_cards, Card, JACK};
use crate::game::{
    score_hand, ConfigError, GameConfig, GameState, PegError, PeggingHistory, PointSource, PointsBreakdown,
};
use crate::policy::{CribbagePolicy, DeckModel, PlayHistory, PolicyError};
use crate::rng::GameRng;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Seat {seat} policy failed: {source}")]
    Policy {
        seat: usize,
        #[source]
        source: PolicyError,
    },
    #[error("Seat {seat} returned an invalid throw: {reason}")]
    InvalidThrow { seat: usize, reason: String },
    #[error("Seat {seat} played {card}, which is not in its hand")]
    CardNotInHand { seat: usize, card: Card },
    #[error("Seat {seat} said go while holding a playable card")]
    IllegalGo { seat: usize },
    #[error("Pegging error: {0}")]
    Peg(#[from] PegError),
    #[error("Deck ran out while dealing")]
    DeckExhausted,
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result of a single game
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub winner: usize,
    pub scores: [u32; 2],
    pub hands_played: u32,
    pub first_dealer: usize,
    pub points: [PointsBreakdown; 2],
}

/// Play one game to the winning score. Seat 0 and seat 1 keep their policies
/// for the whole game; the deal alternates starting from a random seat.
pub fn play_game(policies: [&dyn CribbagePolicy; 2], config: &GameConfig, seed: u64) -> Result<GameResult, EngineError> {
    config.validate()?;

    let mut rng = GameRng::new(Some(seed));
    let first_dealer = if rng.coin() { 0 } else { 1 };
    let mut state = GameState::new(first_dealer, config.winning_score);

    log::debug!(
        "game {}: {} vs {}, seat {} deals first",
        seed,
        policies[0].name(),
        policies[1].name(),
        first_dealer
    );

    while !state.is_over() {
        play_hand(&mut state, policies, config, &mut rng)?;
        state.rotate_dealer();
    }

    let winner = state.winner().unwrap_or(0);
    log::debug!(
        "game {}: seat {} wins {}-{} after {} hands",
        seed,
        winner,
        state.scores[winner],
        state.scores[1 - winner],
        state.hands_played
    );

    Ok(GameResult {
        winner,
        scores: state.scores,
        hands_played: state.hands_played,
        first_dealer,
        points: state.points,
    })
}

/// Deal, throw, cut, peg and show one hand. Stops early once a seat wins.
pub fn play_hand(
    state: &mut GameState,
    policies: [&dyn CribbagePolicy; 2],
    config: &GameConfig,
    rng: &mut GameRng,
) -> Result<(), EngineError> {
    let mut deck = config.deck();
    deck.shuffle(rng);

    let mut hands = [
        deck.deal(config.cards_dealt).ok_or(EngineError::DeckExhausted)?,
        deck.deal(config.cards_dealt).ok_or(EngineError::DeckExhausted)?,
    ];

    let mut crib = Vec::with_capacity(config.cards_kept);
    for seat in [state.pone(), state.dealer] {
        let am_dealer = seat == state.dealer;
        let (keep, throw) = policies[seat]
            .keep(&hands[seat], state.scores_for(seat), am_dealer, rng)
            .map_err(|source| EngineError::Policy { seat, source })?;
        check_throw(&hands[seat], &keep, &throw, config).map_err(|reason| EngineError::InvalidThrow { seat, reason })?;

        log::trace!("seat {} keeps [{}] throws [{}]", seat, format_cards(&keep), format_cards(&throw));
        hands[seat] = keep;
        crib.extend(throw);
    }
    while crib.len() < config.cards_kept {
        crib.push(deck.draw().ok_or(EngineError::DeckExhausted)?);
    }

    let starter = deck.draw().ok_or(EngineError::DeckExhausted)?;
    if starter.rank() == JACK && state.award(state.dealer, 2, PointSource::Heels) {
        return Ok(());
    }

    if peg_hands(state, policies, &hands, &starter, config)? {
        return Ok(());
    }

    let (pone, dealer) = (state.pone(), state.dealer);
    let shows = [
        (pone, &hands[pone], false, PointSource::Hand),
        (dealer, &hands[dealer], false, PointSource::Hand),
        (dealer, &crib, true, PointSource::Crib),
    ];
    for (seat, cards, is_crib, source) in shows {
        let score = score_hand(cards, Some(&starter), is_crib);
        log::trace!(
            "seat {} shows [{}] with {}: {} ({:?})",
            seat,
            format_cards(cards),
            starter,
            score.total(),
            source
        );
        if state.award(seat, score.total(), source) {
            return Ok(());
        }
    }

    Ok(())
}

/// The throw must split the dealt hand into the configured sizes
fn check_throw(hand: &[Card], keep: &[Card], throw: &[Card], config: &GameConfig) -> Result<(), String> {
    if keep.len() != config.cards_kept || keep.len() + throw.len() != hand.len() {
        return Err(format!(
            "kept {} and threw {} from {} cards",
            keep.len(),
            throw.len(),
            hand.len()
        ));
    }
    let mut returned: Vec<Card> = keep.iter().chain(throw).copied().collect();
    let mut dealt = hand.to_vec();
    returned.sort();
    dealt.sort();
    if returned != dealt {
        return Err(format!("[{}] is not the dealt hand", format_cards(&returned)));
    }
    Ok(())
}

/// Play out both hands. Returns true if a seat reached the winning score.
fn peg_hands(
    state: &mut GameState,
    policies: [&dyn CribbagePolicy; 2],
    hands: &[Vec<Card>; 2],
    starter: &Card,
    config: &GameConfig,
) -> Result<bool, EngineError> {
    let mut remaining = hands.clone();
    let mut history = PeggingHistory::new(config.count_limit);
    let mut current = state.pone();
    let mut last: Option<usize> = None;

    while remaining.iter().any(|h| !h.is_empty()) {
        let role = state.role(current);
        let can_play = remaining[current].iter().any(|c| history.score(c, role).is_some());

        if can_play {
            let card = policies[current]
                .peg(
                    &remaining[current],
                    &history,
                    starter,
                    state.scores_for(current),
                    current == state.dealer,
                )
                .ok_or(EngineError::IllegalGo { seat: current })?;
            let pos = remaining[current]
                .iter()
                .position(|c| *c == card)
                .ok_or(EngineError::CardNotInHand { seat: current, card })?;

            let points = history.play(card, role)?;
            remaining[current].remove(pos);
            last = Some(current);
            log::trace!("seat {} pegs {} for {} (count {})", current, card, points, history.total());

            if state.award(current, points, PointSource::Pegging) {
                return Ok(true);
            }
        } else {
            history.go(role);
        }

        let both_stuck = (0..2).all(|seat| {
            let role = state.role(seat);
            !remaining[seat].iter().any(|c| history.score(c, role).is_some())
        });
        if !both_stuck {
            current = 1 - current;
            continue;
        }

        // Go or last card, unless the count closed on the limit
        if let Some(seat) = last {
            if history.total() != config.count_limit && state.award(seat, 1, PointSource::Pegging) {
                return Ok(true);
            }
        }
        history.reset();
        current = last.map_or(1 - current, |seat| 1 - seat);
        last = None;
    }

    Ok(false)
}
