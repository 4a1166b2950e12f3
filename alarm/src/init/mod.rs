pub mod config;
pub mod logger;

use crate::{cli::Cli, config::Config, error::Error};

/// Load settings, bring up logging and fix the run configuration.
pub fn new(cli: Cli) -> Result<Config, Error> {
    let (settings, warning) = config::load();
    logger::init(settings.log_level, cli.verbose);
    if let Some(warning) = warning {
        log::warn!("{}, using defaults", warning);
    }
    Config::new(cli, &settings)
}
