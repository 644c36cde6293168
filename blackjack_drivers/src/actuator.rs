use std::collections::{BTreeMap, HashMap};

use blackjack_bot::Button;
use log::info;

use crate::{run_command, Error, Result};

/// Where to click when neither the button nor `Button::None` has been calibrated.
pub const FALLBACK_POINT: (i32, i32) = (255, 414);

pub trait Actuator {
    fn click(&mut self, x: i32, y: i32) -> Result<()>;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        (**self).click(x, y)
    }
}

/// Clicks by running an external command, e.g. `cliclick c:{x},{y}` or
/// `xdotool mousemove {x} {y} click 1`.
#[derive(Debug, Clone)]
pub struct CommandActuator {
    command: Vec<String>,
}

impl CommandActuator {
    pub fn new(command: Vec<String>) -> Result<Self> {
        if command.is_empty() {
            return Err(Error::EmptyCommand);
        }
        Ok(CommandActuator { command })
    }

    fn command_for(&self, x: i32, y: i32) -> Vec<String> {
        self.command
            .iter()
            .map(|arg| {
                arg.replace("{x}", &x.to_string())
                    .replace("{y}", &y.to_string())
            })
            .collect()
    }
}

impl Actuator for CommandActuator {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        run_command(&self.command_for(x, y))?;
        Ok(())
    }
}

/// Only logs the clicks it is asked for.
#[derive(Debug, Clone, Default)]
pub struct DryRunActuator;

impl Actuator for DryRunActuator {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        info!("dry run: would click at ({}, {})", x, y);
        Ok(())
    }
}

/// Calibrated screen position of each button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coordinates {
    points: HashMap<Button, (i32, i32)>,
}

impl Coordinates {
    pub fn insert(&mut self, button: Button, point: (i32, i32)) {
        self.points.insert(button, point);
    }

    pub fn get(&self, button: Button) -> Option<(i32, i32)> {
        self.points.get(&button).copied()
    }

    /// Buttons that were never calibrated fall back to the "Play" button.
    pub fn lookup(&self, button: Button) -> (i32, i32) {
        self.get(button)
            .or_else(|| self.get(Button::None))
            .unwrap_or(FALLBACK_POINT)
    }

    pub fn to_config(&self) -> BTreeMap<String, [i32; 2]> {
        self.points
            .iter()
            .map(|(button, (x, y))| (button.to_string(), [*x, *y]))
            .collect()
    }
}

impl TryFrom<&BTreeMap<String, [i32; 2]>> for Coordinates {
    type Error = Error;

    fn try_from(config: &BTreeMap<String, [i32; 2]>) -> Result<Self> {
        let mut coordinates = Coordinates::default();
        for (name, [x, y]) in config {
            let button: Button = name
                .parse()
                .map_err(|_| Error::UnknownButton(name.clone()))?;
            coordinates.insert(button, (*x, *y));
        }
        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn substitutes_coordinates_into_command() {
        let actuator = CommandActuator::new(strings(&["xdotool", "mousemove", "{x}", "{y}", "click", "1"])).unwrap();
        assert_eq!(
            actuator.command_for(320, -5),
            strings(&["xdotool", "mousemove", "320", "-5", "click", "1"])
        );

        let actuator = CommandActuator::new(strings(&["cliclick", "c:{x},{y}"])).unwrap();
        assert_eq!(actuator.command_for(1, 2), strings(&["cliclick", "c:1,2"]));
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(CommandActuator::new(Vec::new()), Err(Error::EmptyCommand)));
    }

    #[test]
    fn lookup_falls_back_to_play_button() {
        let mut coordinates = Coordinates::default();
        assert_eq!(coordinates.lookup(Button::Hit), FALLBACK_POINT);

        coordinates.insert(Button::None, (10, 20));
        coordinates.insert(Button::Stand, (30, 40));
        assert_eq!(coordinates.lookup(Button::Stand), (30, 40));
        assert_eq!(coordinates.lookup(Button::Hit), (10, 20));
        assert_eq!(coordinates.get(Button::Hit), None);
    }

    #[test]
    fn converts_to_and_from_config() {
        let mut coordinates = Coordinates::default();
        for (i, button) in Button::iter().enumerate() {
            coordinates.insert(button, (i as i32, 100 + i as i32));
        }
        let config = coordinates.to_config();
        assert_eq!(config.get("DoubleDown"), Some(&[4, 104]));
        assert_eq!(Coordinates::try_from(&config).unwrap(), coordinates);
    }

    #[test]
    fn dry_run_never_fails() {
        assert!(DryRunActuator.click(1, 1).is_ok());
    }
}
