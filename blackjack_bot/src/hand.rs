use crate::Card;

/// Row key of the strategy charts. A soft total counts one ace as 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandTotal {
    Hard(u16),
    Soft(u16),
}

/// The value of a hand together with its soft flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandValue {
    pub total: u16,
    pub soft: bool,
}

impl HandValue {
    pub fn of(cards: &[Card]) -> Self {
        let total = value_of(cards);
        HandValue {
            total,
            soft: is_soft(cards, total),
        }
    }

    /// Soft hands are looked up with the ace counted back as 11.
    pub fn chart_total(&self) -> HandTotal {
        if self.soft {
            HandTotal::Soft(self.total + 10)
        } else {
            HandTotal::Hard(self.total)
        }
    }

    pub fn bust(&self) -> bool {
        self.total > 21
    }
}

/// Sums the hand with every ace at 11, then demotes aces to 1 one at a time
/// while the total is over 21.
///
/// The result may still exceed 21 once every ace has been demoted.
pub fn value_of(cards: &[Card]) -> u16 {
    let mut total: u16 = 0;
    let mut aces = 0;
    for card in cards {
        total += card.blackjack_value() as u16;
        if card.is_ace() {
            aces += 1;
        }
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    total
}

/// A hand is soft when it holds an ace and `value + 10` does not bust.
///
/// `value` is the already reduced total from [`value_of`], so in practice
/// this only holds for hands worth 11 or less.
pub fn is_soft(cards: &[Card], value: u16) -> bool {
    cards.iter().any(Card::is_ace) && value + 10 <= 21
}

/// Two-card 21.
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && value_of(cards) == 21
}

/// Returns the paired rank when the hand is exactly two cards of the same
/// rank. Any two ten-valued cards pair as tens.
pub fn pair_of(cards: &[Card]) -> Option<Card> {
    match cards {
        [first, second] if first == second => Some(*first),
        [first, second] if first.is_ten_valued() && second.is_ten_valued() => Some(Card::Ten),
        _ => None,
    }
}
