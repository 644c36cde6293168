mod tally;

use std::path::PathBuf;

use blackjack_bot::{DecisionEngine, Rule};
use blackjack_drivers::{
    calibration::calibrate, default_config_path, parse_config_from_file, save_config_to_file,
    Actuator, Autoplayer, CommandActuator, CommandPageSource, Config, DryRunActuator, Error,
    FilePageSource, PageObserver, PageSource,
};
use clap::Parser;
use log::{info, warn};

use self::tally::Tally;

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file [default: ~/.blackjack_autoplayer.yml]
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Record the position of every button and save it to the config file
    #[arg(short, long)]
    setup: bool,
    /// Log clicks instead of performing them
    #[arg(long)]
    dry_run: bool,
    /// Stop after this many rounds
    #[arg(long)]
    rounds: Option<u64>,
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CommandLineArgs::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = if config_path.exists() {
        parse_config_from_file(&config_path)?
    } else {
        info!("{} not found, starting from defaults", config_path.display());
        Config::default()
    };

    if args.setup || !config.has_coordinates() {
        calibrate(&mut config)?;
        save_config_to_file(&config, &config_path)?;
        info!("configuration saved to {}", config_path.display());
    }

    let rule: Rule = config.rule.clone().try_into()?;
    let coordinates = config.coordinates()?;
    let settings = &config.autoplayer;

    let page_source: Box<dyn PageSource> = match &settings.page_command {
        Some(command) => Box::new(CommandPageSource::new(
            command.clone(),
            settings.page_file.clone(),
        )),
        None => Box::new(FilePageSource::new(settings.page_file.clone())),
    };
    let actuator: Box<dyn Actuator> = match (&settings.click_command, args.dry_run) {
        (Some(command), false) => Box::new(CommandActuator::new(command.clone())?),
        (None, false) => {
            warn!("no click_command configured, clicks will only be logged");
            Box::new(DryRunActuator)
        }
        (_, true) => Box::new(DryRunActuator),
    };

    let observer = PageObserver::new(
        page_source,
        settings.retry_policy(),
        settings.skip_leading_cards,
    );
    let mut autoplayer = Autoplayer::new(
        observer,
        DecisionEngine::new(&rule),
        actuator,
        coordinates,
        settings.poll_interval(),
    );

    info!("starting");
    let mut tally = Tally::default();
    autoplayer.run(args.rounds.or(settings.max_rounds), &mut tally);
    tally.log_summary();
    info!("exiting");
    Ok(())
}
