use crate::{hand::pair_of, Card, HandTotal, PlayAction, Rule};

pub trait Strategy {
    /// Whether a pair of `pair` should be split against the dealer's upcard value.
    fn should_split(&self, pair: Card, dealer_value: u8) -> bool;
    /// The move for a hand that is neither split nor a natural.
    fn play(&self, total: HandTotal, dealer_value: u8) -> PlayAction;

    fn split_eligible(&self, cards: &[Card], dealer_value: u8) -> bool {
        match pair_of(cards) {
            Some(pair) => self.should_split(pair, dealer_value),
            None => false,
        }
    }
}

/// Chart columns run over the dealer's upcard value: 2, 3, ..., 10, then Ace (11).
const COLUMNS: usize = 10;

/// Basic strategy for a single-deck style table, driven by fixed charts.
#[derive(Debug, Clone)]
pub struct BasicStrategy {
    hard_charts: [[PlayAction; COLUMNS]; 10],
    soft_charts: [[PlayAction; COLUMNS]; 7],
    pair_charts: [[bool; COLUMNS]; 10],
}

impl BasicStrategy {
    pub fn new(rule: &Rule) -> BasicStrategy {
        const H: PlayAction = PlayAction::Hit;
        const S: PlayAction = PlayAction::Stand;
        const D: PlayAction = PlayAction::DoubleDown;
        const P: bool = true;
        const X: bool = false;

        let mut strategy = BasicStrategy {
            hard_charts: [
                [H, H, H, H, H, H, H, H, H, H], // 8 or less
                [H, D, D, D, D, H, H, H, H, H], // 9
                [D, D, D, D, D, D, D, D, H, H], // 10
                [D, D, D, D, D, D, D, D, D, D], // 11
                [H, H, S, S, S, H, H, H, H, H], // 12
                [S, S, S, S, S, H, H, H, H, H],
                [S, S, S, S, S, H, H, H, H, H],
                [S, S, S, S, S, H, H, H, H, H],
                [S, S, S, S, S, H, H, H, H, H], // 16
                [S, S, S, S, S, S, S, S, S, S], // 17 or more
            ],
            soft_charts: [
                [H, H, H, D, D, H, H, H, H, H], // Soft 13
                [H, H, H, D, D, H, H, H, H, H],
                [H, H, D, D, D, H, H, H, H, H],
                [H, H, D, D, D, H, H, H, H, H],
                [H, D, D, D, D, H, H, H, H, H], // Soft 17
                [S, D, D, D, D, S, S, H, H, H], // Soft 18
                [S, S, S, S, S, S, S, S, S, S], // Soft 19 or more
            ],
            pair_charts: [
                [X, X, P, P, P, P, X, X, X, X], // Double 2
                [X, X, P, P, P, P, X, X, X, X],
                [X, X, X, P, P, X, X, X, X, X],
                [X, X, X, X, X, X, X, X, X, X],
                [P, P, P, P, P, X, X, X, X, X],
                [P, P, P, P, P, P, X, X, X, X],
                [P, P, P, P, P, P, P, P, P, P],
                [P, P, P, P, P, X, P, P, X, X], // Double 9
                [X, X, X, X, X, X, X, X, X, X], // Double 10
                [P, P, P, P, P, P, P, P, P, P], // Double Ace
            ],
        };

        if !rule.double_hard_eleven_vs_ace {
            strategy.hard_charts[3][COLUMNS - 1] = H;
        }

        strategy
    }

    fn column(dealer_value: u8) -> usize {
        (dealer_value.clamp(2, 11) - 2) as usize
    }
}

impl Default for BasicStrategy {
    fn default() -> Self {
        BasicStrategy::new(&Rule::default())
    }
}

impl Strategy for BasicStrategy {
    fn should_split(&self, pair: Card, dealer_value: u8) -> bool {
        let row = (pair.blackjack_value() - 2) as usize;
        self.pair_charts[row][Self::column(dealer_value)]
    }

    fn play(&self, total: HandTotal, dealer_value: u8) -> PlayAction {
        let col = Self::column(dealer_value);
        match total {
            HandTotal::Hard(total) => {
                let row = (total.clamp(8, 17) - 8) as usize;
                self.hard_charts[row][col]
            }
            HandTotal::Soft(total) => {
                // Soft totals under 13 are not charted and stand.
                let row = if total < 13 {
                    6
                } else {
                    (total.min(19) - 13) as usize
                };
                self.soft_charts[row][col]
            }
        }
    }
}
