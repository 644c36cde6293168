use log::debug;
use thiserror::Error;

use crate::{
    hand::HandValue, session::SessionGuard, strategy::BasicStrategy, Card, Decision, Idle,
    ParseCardError, Rule, Strategy,
};

/// Card glyphs as they were read off the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawHand {
    Single {
        dealer: String,
        player: Vec<String>,
    },
    /// A hand that has already been split into a left and a right hand.
    Split {
        dealer: String,
        left: Vec<String>,
        right: Vec<String>,
    },
}

/// Everything the engine needs to know about the table at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Observation {
    pub insurance_offered: bool,
    pub move_available: bool,
    pub hand: Option<RawHand>,
}

impl Observation {
    pub fn single(dealer: &str, player: &[&str]) -> Self {
        Observation {
            insurance_offered: false,
            move_available: true,
            hand: Some(RawHand::Single {
                dealer: dealer.to_string(),
                player: player.iter().map(|card| card.to_string()).collect(),
            }),
        }
    }

    pub fn split(dealer: &str, left: &[&str], right: &[&str]) -> Self {
        Observation {
            insurance_offered: false,
            move_available: true,
            hand: Some(RawHand::Split {
                dealer: dealer.to_string(),
                left: left.iter().map(|card| card.to_string()).collect(),
                right: right.iter().map(|card| card.to_string()).collect(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error(transparent)]
    Card(#[from] ParseCardError),
    #[error("player hand has no cards")]
    EmptyHand,
}

/// Turns observations into decisions, remembering the run of double downs
/// between calls.
#[derive(Debug, Clone)]
pub struct DecisionEngine<S: Strategy = BasicStrategy> {
    strategy: S,
    guard: SessionGuard,
}

impl DecisionEngine<BasicStrategy> {
    pub fn new(rule: &Rule) -> Self {
        DecisionEngine {
            strategy: BasicStrategy::new(rule),
            guard: SessionGuard::new(rule.max_consecutive_doubles),
        }
    }
}

impl<S: Strategy> DecisionEngine<S> {
    pub fn with_guard(strategy: S, guard: SessionGuard) -> Self {
        DecisionEngine { strategy, guard }
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Never fails. Anything that keeps a move from being chosen comes back
    /// as [`Decision::NoAction`] and ends the run of double downs.
    pub fn decide(&mut self, observation: &Observation) -> Decision {
        if observation.insurance_offered {
            self.guard.reset();
            return Decision::InsuranceOffered;
        }

        let decision = match &observation.hand {
            None => self.idle(Idle::NoHand),
            Some(RawHand::Single { dealer, player }) => {
                self.decide_hand(observation.move_available, dealer, player)
            }
            Some(RawHand::Split {
                dealer,
                left,
                right,
            }) => {
                let left = self.decide_hand(observation.move_available, dealer, left);
                let right = self.decide_hand(observation.move_available, dealer, right);
                Decision::SplitResult {
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        };
        debug!(
            "decided {:?} ({} double downs in a row)",
            decision,
            self.guard.consecutive_doubles()
        );
        decision
    }

    fn decide_hand(&mut self, move_available: bool, dealer: &str, player: &[String]) -> Decision {
        if !move_available {
            return self.idle(Idle::MoveUnavailable);
        }
        match self.evaluate(dealer, player) {
            Ok(decision) => decision,
            Err(err) => {
                debug!("cannot evaluate {:?} against {:?}: {}", player, dealer, err);
                self.idle(Idle::Malformed(err.to_string()))
            }
        }
    }

    fn evaluate(&mut self, dealer: &str, player: &[String]) -> Result<Decision, DecisionError> {
        let dealer: Card = dealer.parse()?;
        let player = player
            .iter()
            .map(|glyph| glyph.parse())
            .collect::<Result<Vec<Card>, _>>()?;
        if player.is_empty() {
            return Err(DecisionError::EmptyHand);
        }

        let dealer_value = HandValue::of(&[dealer]).total as u8;
        if self.strategy.split_eligible(&player, dealer_value) {
            self.guard.reset();
            return Ok(Decision::SplitRecommended);
        }

        let value = HandValue::of(&player);
        if player.len() == 2 && value.total == 21 {
            return Ok(self.idle(Idle::Natural));
        }

        let action = self.strategy.play(value.chart_total(), dealer_value);
        Ok(Decision::Play(self.guard.apply(action)))
    }

    fn idle(&mut self, reason: Idle) -> Decision {
        self.guard.reset();
        Decision::NoAction(reason)
    }
}

impl Default for DecisionEngine<BasicStrategy> {
    fn default() -> Self {
        DecisionEngine::new(&Rule::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayAction::*;
    use strum::IntoEnumIterator;

    fn engine_with_count(count: u8) -> DecisionEngine {
        DecisionEngine::with_guard(BasicStrategy::default(), SessionGuard::with_count(3, count))
    }

    #[test]
    fn insurance_offer_wins_over_everything() {
        let mut engine = engine_with_count(2);
        let observation = Observation {
            insurance_offered: true,
            move_available: false,
            hand: None,
        };
        assert_eq!(engine.decide(&observation), Decision::InsuranceOffered);
        assert_eq!(engine.guard().consecutive_doubles(), 0);

        let mut observation = Observation::single("A", &["8", "8"]);
        observation.insurance_offered = true;
        assert_eq!(engine.decide(&observation), Decision::InsuranceOffered);
    }

    #[test]
    fn missing_hand_is_idle_and_resets() {
        let mut engine = engine_with_count(2);
        let observation = Observation {
            move_available: true,
            ..Default::default()
        };
        for _ in 0..3 {
            assert_eq!(engine.decide(&observation), Decision::NoAction(Idle::NoHand));
            assert_eq!(engine.guard().consecutive_doubles(), 0);
        }
    }

    #[test]
    fn unavailable_move_is_idle_and_resets() {
        let mut engine = engine_with_count(2);
        let mut observation = Observation::single("6", &["5", "6"]);
        observation.move_available = false;
        for _ in 0..3 {
            assert_eq!(
                engine.decide(&observation),
                Decision::NoAction(Idle::MoveUnavailable)
            );
            assert_eq!(engine.guard().consecutive_doubles(), 0);
        }
    }

    #[test]
    fn naturals_need_no_click() {
        let mut engine = DecisionEngine::default();
        for dealer in Card::iter() {
            for ten in ["10", "J", "Q", "K"] {
                let observation = Observation::single(dealer.glyph(), &["A", ten]);
                assert_eq!(engine.decide(&observation), Decision::NoAction(Idle::Natural));
            }
        }
    }

    #[test]
    fn three_card_twenty_one_stands() {
        let mut engine = DecisionEngine::default();
        let observation = Observation::single("10", &["7", "7", "7"]);
        assert_eq!(engine.decide(&observation), Decision::Play(Stand));
    }

    #[test]
    fn hard_eleven_doubles() {
        let mut engine = DecisionEngine::default();
        assert_eq!(
            engine.decide(&Observation::single("2", &["5", "6"])),
            Decision::Play(DoubleDown)
        );
        let mut engine = DecisionEngine::default();
        assert_eq!(
            engine.decide(&Observation::single("A", &["9", "2"])),
            Decision::Play(DoubleDown)
        );
    }

    #[test]
    fn hard_eleven_against_ace_follows_rule() {
        let rule = Rule {
            double_hard_eleven_vs_ace: false,
            ..Rule::default()
        };
        let mut engine = DecisionEngine::new(&rule);
        assert_eq!(
            engine.decide(&Observation::single("A", &["9", "2"])),
            Decision::Play(Hit)
        );
    }

    #[test]
    fn split_signals() {
        let mut engine = DecisionEngine::default();
        for dealer in Card::iter() {
            assert_eq!(
                engine.decide(&Observation::single(dealer.glyph(), &["8", "8"])),
                Decision::SplitRecommended
            );
        }
        assert_eq!(
            engine.decide(&Observation::single("7", &["4", "4"])),
            Decision::Play(Hit)
        );
        assert_eq!(
            engine.decide(&Observation::single("5", &["2", "2"])),
            Decision::SplitRecommended
        );
        assert_eq!(
            engine.decide(&Observation::single("6", &["K", "Q"])),
            Decision::Play(Stand)
        );
    }

    #[test]
    fn split_signal_resets_the_run() {
        let mut engine = engine_with_count(2);
        assert_eq!(
            engine.decide(&Observation::single("9", &["A", "A"])),
            Decision::SplitRecommended
        );
        assert_eq!(engine.guard().consecutive_doubles(), 0);
    }

    #[test]
    fn soft_detection_is_literal() {
        let mut engine = DecisionEngine::default();
        // A,6 is worth 17 and 17 + 10 busts, so it plays as hard 17.
        assert_eq!(
            engine.decide(&Observation::single("5", &["A", "6"])),
            Decision::Play(Stand)
        );
        // A,2 is worth 13: hard 13 against a 5 stands.
        assert_eq!(
            engine.decide(&Observation::single("5", &["A", "2"])),
            Decision::Play(Stand)
        );
        // A lone ace is soft 21.
        assert_eq!(
            engine.decide(&Observation::single("9", &["A"])),
            Decision::Play(Stand)
        );
    }

    #[test]
    fn fourth_double_down_is_a_hit() {
        let mut engine = DecisionEngine::default();
        let observation = Observation::single("6", &["6", "4"]);
        for _ in 0..3 {
            assert_eq!(engine.decide(&observation), Decision::Play(DoubleDown));
        }
        assert_eq!(engine.guard().consecutive_doubles(), 3);
        assert_eq!(engine.decide(&observation), Decision::Play(Hit));
        assert_eq!(engine.guard().consecutive_doubles(), 0);
        assert_eq!(engine.decide(&observation), Decision::Play(DoubleDown));
    }

    #[test]
    fn stand_breaks_the_double_down_run() {
        let mut engine = engine_with_count(3);
        assert_eq!(
            engine.decide(&Observation::single("6", &["10", "8"])),
            Decision::Play(Stand)
        );
        assert_eq!(
            engine.decide(&Observation::single("6", &["6", "4"])),
            Decision::Play(DoubleDown)
        );
    }

    #[test]
    fn malformed_hands_are_idle() {
        let mut engine = engine_with_count(2);
        let decision = engine.decide(&Observation::single("Z", &["5", "6"]));
        assert!(matches!(decision, Decision::NoAction(Idle::Malformed(_))));
        assert_eq!(engine.guard().consecutive_doubles(), 0);

        let decision = engine.decide(&Observation::single("5", &["5", "?"]));
        assert!(matches!(decision, Decision::NoAction(Idle::Malformed(_))));

        let decision = engine.decide(&Observation::single("5", &[]));
        assert_eq!(
            decision,
            Decision::NoAction(Idle::Malformed(DecisionError::EmptyHand.to_string()))
        );
    }

    #[test]
    fn split_hands_are_decided_left_then_right() {
        let mut engine = DecisionEngine::default();
        let decision = engine.decide(&Observation::split("6", &["8", "3"], &["8", "10"]));
        assert_eq!(
            decision,
            Decision::SplitResult {
                left: Box::new(Decision::Play(DoubleDown)),
                right: Box::new(Decision::Play(Stand)),
            }
        );
        // The stand on the right ended the run started on the left.
        assert_eq!(engine.guard().consecutive_doubles(), 0);
    }

    #[test]
    fn split_sides_share_the_guard() {
        let mut engine = engine_with_count(2);
        let decision = engine.decide(&Observation::split("5", &["6", "5"], &["5", "4"]));
        assert_eq!(
            decision,
            Decision::SplitResult {
                left: Box::new(Decision::Play(DoubleDown)),
                right: Box::new(Decision::Play(Hit)),
            }
        );
    }

    #[test]
    fn split_sides_can_resplit_or_idle() {
        let mut engine = DecisionEngine::default();
        let decision = engine.decide(&Observation::split("6", &["8", "8"], &["8", "A"]));
        assert_eq!(
            decision,
            Decision::SplitResult {
                left: Box::new(Decision::SplitRecommended),
                right: Box::new(Decision::Play(Stand)),
            }
        );

        let mut observation = Observation::split("6", &["8", "3"], &["8", "10"]);
        observation.move_available = false;
        assert_eq!(
            engine.decide(&observation),
            Decision::SplitResult {
                left: Box::new(Decision::NoAction(Idle::MoveUnavailable)),
                right: Box::new(Decision::NoAction(Idle::MoveUnavailable)),
            }
        );
    }
}
