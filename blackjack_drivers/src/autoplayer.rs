use std::thread;
use std::time::Duration;

use blackjack_bot::{Button, Decision, DecisionEngine};
use log::{info, warn};

use crate::{Actuator, Coordinates, Error, PageObserver, PageSource, Result};

/// Hooks into each round of the polling loop.
pub trait AutoplayerEventHandler {
    fn on_round_begin(&mut self, round: u64);
    fn on_decision(&mut self, decision: &Decision);
    fn on_click(&mut self, button: Button, point: (i32, i32));
    fn on_round_failed(&mut self, err: &Error);
}

impl AutoplayerEventHandler for () {
    fn on_round_begin(&mut self, _: u64) {}
    fn on_decision(&mut self, _: &Decision) {}
    fn on_click(&mut self, _: Button, _: (i32, i32)) {}
    fn on_round_failed(&mut self, _: &Error) {}
}

/// Observes the table, decides and clicks, over and over.
pub struct Autoplayer<P: PageSource, A: Actuator> {
    observer: PageObserver<P>,
    engine: DecisionEngine,
    actuator: A,
    coordinates: Coordinates,
    poll_interval: Duration,
}

impl<P: PageSource, A: Actuator> Autoplayer<P, A> {
    pub fn new(
        observer: PageObserver<P>,
        engine: DecisionEngine,
        actuator: A,
        coordinates: Coordinates,
        poll_interval: Duration,
    ) -> Self {
        Autoplayer {
            observer,
            engine,
            actuator,
            coordinates,
            poll_interval,
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Plays one round: observe, decide, click the button for the decision.
    pub fn run_round<U: AutoplayerEventHandler>(&mut self, handler: &mut U) -> Result<Decision> {
        let observation = self.observer.observe()?;
        let decision = self.engine.decide(&observation);
        handler.on_decision(&decision);

        let button = decision.button();
        let point = self.coordinates.lookup(button);
        self.actuator.click(point.0, point.1)?;
        info!("{:?} -> clicked {} at {:?}", decision, button.label(), point);
        handler.on_click(button, point);
        Ok(decision)
    }

    /// Runs rounds until `max_rounds` is reached, or forever when it is `None`.
    /// A failed round is reported and the loop carries on.
    pub fn run<U: AutoplayerEventHandler>(&mut self, max_rounds: Option<u64>, handler: &mut U) {
        let mut round = 0;
        while max_rounds.map_or(true, |max_rounds| round < max_rounds) {
            round += 1;
            thread::sleep(self.poll_interval);
            handler.on_round_begin(round);
            if let Err(err) = self.run_round(handler) {
                warn!("round {} failed: {}", round, err);
                handler.on_round_failed(&err);
            }
        }
    }
}
