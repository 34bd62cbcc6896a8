pub mod deck;
pub mod types;

pub use deck::Deck;
pub use types::{format_cards, parse_cards, Card, CardParseError, Suit, ACE, JACK, KING};
