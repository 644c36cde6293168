//! Reads the game page and turns it into an [`Observation`].

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use blackjack_bot::{Observation, RawHand};
use log::{debug, warn};

use crate::{run_command, Error, Result};

/// Markup that only the enabled "Play" bet button carries. While it is on the
/// page the round is over and no move can be made.
const PLAY_BUTTON_MARKERS: [&str; 3] = [
    r#"data-testid="bet-button""#,
    r#"data-test-action-enabled="true""#,
    "<span>Play</span>",
];
const INSURANCE_MARKERS: [&str; 2] = ["Accept Insurance", "Accept insurance"];
const BALANCE_MARKER: &str = "variant-highlighted numeric";

pub trait PageSource {
    /// Returns the current page markup.
    fn fetch(&mut self) -> Result<String>;
}

impl<P: PageSource + ?Sized> PageSource for Box<P> {
    fn fetch(&mut self) -> Result<String> {
        (**self).fetch()
    }
}

/// Reads a page snapshot that something else keeps up to date.
#[derive(Debug, Clone)]
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePageSource { path: path.into() }
    }
}

impl PageSource for FilePageSource {
    fn fetch(&mut self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Runs a command that prints the page, and keeps the output as a snapshot file.
#[derive(Debug, Clone)]
pub struct CommandPageSource {
    command: Vec<String>,
    snapshot: PathBuf,
}

impl CommandPageSource {
    pub fn new(command: Vec<String>, snapshot: impl Into<PathBuf>) -> Self {
        CommandPageSource {
            command,
            snapshot: snapshot.into(),
        }
    }
}

impl PageSource for CommandPageSource {
    fn fetch(&mut self) -> Result<String> {
        let output = run_command(&self.command)?;
        let page = String::from_utf8_lossy(&output.stdout).into_owned();

        if let Some(dir) = self.snapshot.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|source| Error::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }
        if let Err(err) = fs::write(&self.snapshot, &page) {
            warn!("cannot write page snapshot {}: {}", self.snapshot.display(), err);
        }
        Ok(page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 10,
            delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardScrape {
    Found(RawHand),
    NotFound { attempts: u32 },
}

pub struct PageObserver<P: PageSource> {
    source: P,
    retry: RetryPolicy,
    skip_leading_cards: usize,
}

impl<P: PageSource> PageObserver<P> {
    pub fn new(source: P, retry: RetryPolicy, skip_leading_cards: usize) -> Self {
        PageObserver {
            source,
            retry,
            skip_leading_cards,
        }
    }

    /// Fetches the page and reads the table off it. Cards that are not on the
    /// page yet are waited for according to the retry policy.
    pub fn observe(&mut self) -> Result<Observation> {
        let mut page = self.source.fetch()?;
        if let Some(balance) = balance(&page) {
            debug!("balance {:.2}", balance);
        }

        let insurance_offered = insurance_offered(&page);
        let hand = match self.scrape_cards(&mut page)? {
            CardScrape::Found(hand) => Some(hand),
            CardScrape::NotFound { attempts } => {
                debug!("no cards on the page after {} attempts", attempts);
                None
            }
        };

        Ok(Observation {
            insurance_offered,
            move_available: move_available(&page),
            hand,
        })
    }

    /// Looks for cards on `page`, fetching it again between attempts. `page`
    /// is left holding the last page fetched.
    pub fn scrape_cards(&mut self, page: &mut String) -> Result<CardScrape> {
        let attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=attempts {
            if let Some(hand) = scrape_hand(page, self.skip_leading_cards) {
                return Ok(CardScrape::Found(hand));
            }
            if attempt < attempts {
                thread::sleep(self.retry.delay);
                *page = self.source.fetch()?;
            }
        }
        Ok(CardScrape::NotFound { attempts })
    }
}

fn is_card_glyph(text: &str) -> bool {
    matches!(
        text,
        "A" | "K" | "Q" | "J" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" | "10"
    )
}

/// Every `<span>` whose whole content is a card glyph, in page order.
pub fn card_glyphs(page: &str) -> Vec<&str> {
    const OPEN: &str = "<span>";
    const CLOSE: &str = "</span>";

    let mut glyphs = Vec::new();
    let mut rest = page;
    while let Some(start) = rest.find(OPEN) {
        rest = &rest[start + OPEN.len()..];
        if let Some(end) = rest.find(CLOSE) {
            let text = &rest[..end];
            if is_card_glyph(text) {
                glyphs.push(text);
            }
        }
    }
    glyphs
}

/// The dealer's upcard is the first card after the skipped ones, the player's
/// cards follow it.
pub fn scrape_hand(page: &str, skip_leading_cards: usize) -> Option<RawHand> {
    let glyphs: Vec<&str> = card_glyphs(page)
        .into_iter()
        .skip(skip_leading_cards)
        .collect();
    match glyphs.as_slice() {
        [dealer, player @ ..] if !player.is_empty() => Some(RawHand::Single {
            dealer: dealer.to_string(),
            player: player.iter().map(|glyph| glyph.to_string()).collect(),
        }),
        _ => None,
    }
}

pub fn insurance_offered(page: &str) -> bool {
    INSURANCE_MARKERS.iter().any(|marker| page.contains(marker))
}

pub fn move_available(page: &str) -> bool {
    !play_button_enabled(page)
}

fn play_button_enabled(page: &str) -> bool {
    page.match_indices("<button").any(|(start, _)| {
        let element = &page[start..];
        let element = match element.find("</button>") {
            Some(end) => &element[..end],
            None => element,
        };
        PLAY_BUTTON_MARKERS
            .iter()
            .all(|marker| element.contains(marker))
    })
}

/// The account balance shown in the page header, e.g. `1,234.50`.
pub fn balance(page: &str) -> Option<f64> {
    page.match_indices(BALANCE_MARKER).find_map(|(start, _)| {
        let element = &page[start..];
        let text = &element[element.find('>')? + 1..];
        let text = &text[..text.find('<')?];
        parse_amount(text.trim())
    })
}

fn parse_amount(text: &str) -> Option<f64> {
    let (whole, cents) = text.split_once('.')?;
    if cents.len() != 2 || !cents.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !whole.starts_with(|c: char| c.is_ascii_digit())
        || !whole.chars().all(|c| c.is_ascii_digit() || c == ',')
    {
        return None;
    }
    format!("{}.{}", whole.replace(',', ""), cents).parse().ok()
}
