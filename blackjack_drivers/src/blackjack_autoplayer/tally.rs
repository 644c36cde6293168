use std::collections::BTreeMap;

use blackjack_bot::{Button, Decision};
use blackjack_drivers::{AutoplayerEventHandler, Error};
use log::info;

use self::private::Statistics;

const SUMMARY_PERIOD: u64 = 100;

mod private {
    use std::collections::BTreeMap;

    use blackjack_bot::Button;

    #[derive(Debug, Clone, Default)]
    pub struct Statistics {
        rounds: u64,
        failed_rounds: u64,
        clicks: BTreeMap<Button, u64>,
        splits: u64,
    }

    impl Statistics {
        pub fn begin_round(&mut self) {
            self.rounds += 1;
        }

        pub fn fail_round(&mut self) {
            self.failed_rounds += 1;
        }

        pub fn click(&mut self, button: Button) {
            *self.clicks.entry(button).or_insert(0) += 1;
        }

        pub fn split(&mut self) {
            self.splits += 1;
        }

        pub fn get_rounds(&self) -> u64 {
            self.rounds
        }

        pub fn get_failed_rounds(&self) -> u64 {
            self.failed_rounds
        }

        pub fn get_splits(&self) -> u64 {
            self.splits
        }

        pub fn get_clicks(&self) -> &BTreeMap<Button, u64> {
            &self.clicks
        }
    }
}

/// Counts what the autoplayer did and logs it periodically.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    stat: Statistics,
    last_decision: Option<Decision>,
}

impl Tally {
    pub fn log_summary(&self) {
        let clicks: BTreeMap<&str, u64> = self
            .stat
            .get_clicks()
            .iter()
            .map(|(button, count)| (button.label(), *count))
            .collect();
        info!(
            "{} rounds, {} failed, {} split hands, clicks {:?}",
            self.stat.get_rounds(),
            self.stat.get_failed_rounds(),
            self.stat.get_splits(),
            clicks
        );
        if let Some(decision) = &self.last_decision {
            info!("last decision {:?}", decision);
        }
    }
}

impl AutoplayerEventHandler for Tally {
    fn on_round_begin(&mut self, round: u64) {
        self.stat.begin_round();
        if round > 1 && (round - 1) % SUMMARY_PERIOD == 0 {
            self.log_summary();
        }
    }

    fn on_decision(&mut self, decision: &Decision) {
        if let Decision::SplitResult { .. } = decision {
            self.stat.split();
        }
        self.last_decision = Some(decision.clone());
    }

    fn on_click(&mut self, button: Button, _: (i32, i32)) {
        self.stat.click(button);
    }

    fn on_round_failed(&mut self, _: &Error) {
        self.stat.fail_round();
    }
}
