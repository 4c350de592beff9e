use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const RANKS_STR: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];

/// A card rank. Suits never matter to the engine, so a card is just its rank.
/// J, Q and K share the value of 10 but stay distinct for shoe bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// Parses a single card token. Case-insensitive; `T` is accepted for 10.
    pub fn parse(token: &str) -> EngineResult<Rank> {
        let normalized = token.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "2" => Ok(Rank::Two),
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" | "T" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            _ => Err(EngineError::InvalidCard(token.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        RANKS_STR[self.index()]
    }

    /// Position in `ALL_RANKS`, used to index per-rank tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Blackjack value with the Ace at its high value of 11.
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }

    /// Blackjack value with the Ace at its low value of 1.
    pub fn hard_value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            other => other.value(),
        }
    }

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::parse(s)
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

pub fn parse_card(notation: &str) -> EngineResult<Rank> {
    Rank::parse(notation)
}

/// Parses a list of cards separated by commas and/or whitespace, e.g. `"A, 10 k"`.
/// Compact notation without separators (`"AK"`, `"T9"`) is also accepted as long
/// as it contains no `10`.
pub fn parse_cards(notation: &str) -> EngineResult<Vec<Rank>> {
    let tokens: Vec<&str> = notation
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() == 1 && tokens[0].len() > 1 && !tokens[0].contains('1') {
        return tokens[0]
            .chars()
            .map(|c| Rank::parse(&c.to_string()))
            .collect();
    }

    tokens.into_iter().map(Rank::parse).collect()
}

pub fn format_cards(cards: &[Rank]) -> String {
    cards
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
