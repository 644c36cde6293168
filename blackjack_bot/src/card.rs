use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use thiserror::Error;

/// A card rank as it shows on the table. Suits play no part in basic strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Card {
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

impl Card {
    /// Ace counts 11 here. Hands demote aces to 1 when they would bust.
    pub fn blackjack_value(&self) -> u8 {
        match self {
            Card::Two => 2,
            Card::Three => 3,
            Card::Four => 4,
            Card::Five => 5,
            Card::Six => 6,
            Card::Seven => 7,
            Card::Eight => 8,
            Card::Nine => 9,
            Card::Ten | Card::Jack | Card::Queen | Card::King => 10,
            Card::Ace => 11,
        }
    }

    pub fn is_ace(&self) -> bool {
        *self == Card::Ace
    }

    pub fn is_ten_valued(&self) -> bool {
        matches!(self, Card::Ten | Card::Jack | Card::Queen | Card::King)
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Card::Two => "2",
            Card::Three => "3",
            Card::Four => "4",
            Card::Five => "5",
            Card::Six => "6",
            Card::Seven => "7",
            Card::Eight => "8",
            Card::Nine => "9",
            Card::Ten => "10",
            Card::Jack => "J",
            Card::Queen => "Q",
            Card::King => "K",
            Card::Ace => "A",
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized card glyph {0:?}")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let card = match s.trim().to_ascii_uppercase().as_str() {
            "2" => Card::Two,
            "3" => Card::Three,
            "4" => Card::Four,
            "5" => Card::Five,
            "6" => Card::Six,
            "7" => Card::Seven,
            "8" => Card::Eight,
            "9" => Card::Nine,
            "10" => Card::Ten,
            "J" => Card::Jack,
            "Q" => Card::Queen,
            "K" => Card::King,
            "A" => Card::Ace,
            _ => return Err(ParseCardError(s.to_string())),
        };
        Ok(card)
    }
}
