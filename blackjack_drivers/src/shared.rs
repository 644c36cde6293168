pub mod actuator;
pub mod autoplayer;
pub mod calibration;
mod error;
pub mod observer;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;

use blackjack_bot::Rule;
use serde::{Deserialize, Serialize};

pub use actuator::{Actuator, CommandActuator, Coordinates, DryRunActuator};
pub use autoplayer::{Autoplayer, AutoplayerEventHandler};
pub use error::{Error, Result};
pub use observer::{CardScrape, CommandPageSource, FilePageSource, PageObserver, PageSource, RetryPolicy};

pub const DEFAULT_CONFIG_FILE_NAME: &str = ".blackjack_autoplayer.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rule: ConfigRule,
    #[serde(default)]
    pub autoplayer: ConfigAutoplayer,
    /// Screen position of each button, keyed by button name.
    #[serde(default)]
    pub coordinates: BTreeMap<String, [i32; 2]>,
}

impl Config {
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::try_from(&self.coordinates)
    }

    pub fn has_coordinates(&self) -> bool {
        !self.coordinates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRule {
    pub double_hard_eleven_vs_ace: bool,
    pub max_consecutive_doubles: u8,
}

impl Default for ConfigRule {
    fn default() -> Self {
        let rule = Rule::default();
        ConfigRule {
            double_hard_eleven_vs_ace: rule.double_hard_eleven_vs_ace,
            max_consecutive_doubles: rule.max_consecutive_doubles,
        }
    }
}

impl TryFrom<ConfigRule> for Rule {
    type Error = Error;

    fn try_from(config: ConfigRule) -> Result<Rule> {
        if config.max_consecutive_doubles == 0 {
            return Err(Error::InvalidRule(String::from(
                "max_consecutive_doubles must be at least 1",
            )));
        }
        Ok(Rule {
            double_hard_eleven_vs_ace: config.double_hard_eleven_vs_ace,
            max_consecutive_doubles: config.max_consecutive_doubles,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigAutoplayer {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub card_retry: ConfigRetry,
    /// Card spans on the page before the dealer's upcard that belong to other widgets.
    #[serde(default = "default_skip_leading_cards")]
    pub skip_leading_cards: usize,
    /// Command whose stdout is the current page. Without it the page file is read as is.
    #[serde(default)]
    pub page_command: Option<Vec<String>>,
    #[serde(default = "default_page_file")]
    pub page_file: PathBuf,
    /// Command that clicks the screen. `{x}` and `{y}` are replaced by the coordinate.
    #[serde(default)]
    pub click_command: Option<Vec<String>>,
    #[serde(default)]
    pub max_rounds: Option<u64>,
}

impl ConfigAutoplayer {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.card_retry.max_attempts,
            delay: Duration::from_millis(self.card_retry.delay_ms),
        }
    }
}

impl Default for ConfigAutoplayer {
    fn default() -> Self {
        ConfigAutoplayer {
            poll_interval_ms: default_poll_interval_ms(),
            card_retry: ConfigRetry::default(),
            skip_leading_cards: default_skip_leading_cards(),
            page_command: None,
            page_file: default_page_file(),
            click_command: None,
            max_rounds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRetry {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for ConfigRetry {
    fn default() -> Self {
        ConfigRetry {
            max_attempts: 10,
            delay_ms: 100,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    800
}

fn default_skip_leading_cards() -> usize {
    5
}

fn default_page_file() -> PathBuf {
    PathBuf::from("data/html/page_data.html")
}

/// `~/.blackjack_autoplayer.yml`
pub fn default_config_path() -> Result<PathBuf> {
    let home_dir = home::home_dir().ok_or(Error::NoHomeDir)?;
    Ok(home_dir.join(DEFAULT_CONFIG_FILE_NAME))
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &Path) -> Result<Config> {
    let file_content = fs::read_to_string(filename).map_err(|source| Error::Io {
        path: filename.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml::from_str(&file_content)?)
}

pub fn save_config_to_file(config: &Config, filename: &Path) -> Result<()> {
    let file_content = serde_yaml::to_string(config)?;
    fs::write(filename, file_content).map_err(|source| Error::Io {
        path: filename.to_path_buf(),
        source,
    })
}

/// Runs `command` (program followed by its arguments) to completion.
pub(crate) fn run_command(command: &[String]) -> Result<Output> {
    let (program, args) = command.split_first().ok_or(Error::EmptyCommand)?;
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            program: program.clone(),
            status: output.status,
        });
    }
    Ok(output)
}
