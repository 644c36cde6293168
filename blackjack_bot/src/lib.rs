pub mod card;
pub mod engine;
pub mod hand;
pub mod session;
pub mod strategy;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;

pub use card::{Card, ParseCardError};
pub use engine::{DecisionEngine, DecisionError, Observation, RawHand};
pub use hand::{HandTotal, HandValue};
pub use session::SessionGuard;
pub use strategy::{BasicStrategy, Strategy};

/// The knobs of basic strategy that are not fixed by the charts themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    /// Double a hard 11 against a dealer Ace. When false, hit instead.
    pub double_hard_eleven_vs_ace: bool,
    /// Number of double downs allowed in a row before the next one is played as a hit.
    pub max_consecutive_doubles: u8,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            double_hard_eleven_vs_ace: true,
            max_consecutive_doubles: 3,
        }
    }
}

/// A move that is played on a single hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayAction {
    Stand,
    Hit,
    DoubleDown,
}

/// The calibrated buttons on the game page. `None` is the "Play" button that
/// starts a new round, `Insurance` doubles as the "Split" button.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum Button {
    None,
    Insurance,
    Stand,
    Hit,
    DoubleDown,
}

impl Button {
    /// The caption of the button as it reads on the page.
    pub fn label(&self) -> &'static str {
        match self {
            Button::None => "Play",
            Button::Insurance => "Split",
            Button::Stand => "Stand",
            Button::Hit => "Hit",
            Button::DoubleDown => "Double Down",
        }
    }
}

impl From<PlayAction> for Button {
    fn from(action: PlayAction) -> Self {
        match action {
            PlayAction::Stand => Button::Stand,
            PlayAction::Hit => Button::Hit,
            PlayAction::DoubleDown => Button::DoubleDown,
        }
    }
}

/// Why a decision ended without a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Idle {
    /// No cards could be read from the table.
    NoHand,
    /// The table does not currently accept a move.
    MoveUnavailable,
    /// Two-card 21. The hand is already settled.
    Natural,
    /// The observed hand could not be evaluated.
    Malformed(String),
}

/// The outcome of one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    InsuranceOffered,
    SplitRecommended,
    SplitResult {
        left: Box<Decision>,
        right: Box<Decision>,
    },
    Play(PlayAction),
    NoAction(Idle),
}

impl Decision {
    /// The button that carries out this decision. A split hand is played
    /// left first, so the left hand's button is the one to press.
    pub fn button(&self) -> Button {
        match self {
            Decision::InsuranceOffered | Decision::SplitRecommended => Button::Insurance,
            Decision::SplitResult { left, .. } => left.button(),
            Decision::Play(action) => Button::from(*action),
            Decision::NoAction(_) => Button::None,
        }
    }

    pub fn is_no_action(&self) -> bool {
        matches!(self, Decision::NoAction(_))
    }
}
