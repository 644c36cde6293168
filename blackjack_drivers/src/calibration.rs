use blackjack_bot::Button;
use dialoguer::Input;
use log::info;
use strum::IntoEnumIterator;

use crate::{Config, Coordinates, Error, Result};

/// Parses a screen position written as `x, y`.
pub fn parse_point(text: &str) -> Result<(i32, i32)> {
    let invalid = || Error::InvalidCoordinate(text.to_string());
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}

/// Asks for the position of every button in turn and stores the answers in
/// `config`. Positions already in `config` are offered as defaults.
pub fn calibrate(config: &mut Config) -> Result<()> {
    let existing = config.coordinates().unwrap_or_default();
    let mut coordinates = Coordinates::default();

    for button in Button::iter() {
        let mut input = Input::<String>::new()
            .with_prompt(format!("Position of the '{}' button (x, y)", button.label()))
            .validate_with(|text: &String| -> std::result::Result<(), String> {
                parse_point(text).map(|_| ()).map_err(|err| err.to_string())
            });
        if let Some((x, y)) = existing.get(button) {
            input = input.default(format!("{}, {}", x, y));
        }
        let point = parse_point(&input.interact_text()?)?;
        info!("{} button recorded at {:?}", button.label(), point);
        coordinates.insert(button, point);
    }

    config.coordinates = coordinates.to_config();
    Ok(())
}
