use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ACE: u8 = 1;
pub const JACK: u8 = 11;
pub const KING: u8 = 13;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Empty card code")]
    Empty,
    #[error("Invalid rank in '{0}'")]
    InvalidRank(String),
    #[error("Invalid suit in '{0}'")]
    InvalidSuit(String),
}

/// Card suits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "C")]
    Clubs,
    #[serde(rename = "D")]
    Diamonds,
    #[serde(rename = "H")]
    Hearts,
    #[serde(rename = "S")]
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Convert to the single character representation
    pub fn to_char(&self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_uppercase() {
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            'H' => Some(Suit::Hearts),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// A playing card. Rank runs 1 (ace) to 13 (king).
/// Serialized as its short code ("10H") so files never carry an invalid rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    /// Rank must be in 1..=13; outside callers go through `Card::try_new` or `FromStr`
    pub(crate) fn new(rank: u8, suit: Suit) -> Self {
        assert!((ACE..=KING).contains(&rank), "rank {} out of range", rank);
        Card { rank, suit }
    }

    pub fn try_new(rank: u8, suit: Suit) -> Option<Self> {
        (ACE..=KING).contains(&rank).then_some(Card { rank, suit })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Counting value: face cards count ten
    pub fn value(&self) -> u32 {
        u32::from(self.rank.min(10))
    }

    pub fn same_rank(&self, other: &Card) -> bool {
        self.rank == other.rank
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        };
        write!(f, "{}{}", rank, self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parse codes like "AS", "10H", "TD", "kc"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let suit_char = code.chars().last().ok_or(CardParseError::Empty)?;
        let suit = Suit::from_char(suit_char)
            .ok_or_else(|| CardParseError::InvalidSuit(code.to_string()))?;

        let rank_part = &code[..code.len() - suit_char.len_utf8()];
        let rank = match rank_part.to_ascii_uppercase().as_str() {
            "A" => ACE,
            "T" => 10,
            "J" => JACK,
            "Q" => 12,
            "K" => KING,
            digits => digits
                .parse::<u8>()
                .ok()
                .filter(|r| (2..=10).contains(r))
                .ok_or_else(|| CardParseError::InvalidRank(code.to_string()))?,
        };

        Card::try_new(rank, suit).ok_or_else(|| CardParseError::InvalidRank(code.to_string()))
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parse a whitespace or comma separated list of card codes
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Format cards as space separated codes
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
