use crate::error::EvrouteError;
use evroute_domain::config::LoggingConfig;
use evroute_logger::Logger;

/// Installs the global subscriber described by `config`.
///
/// File output is enabled by `directory`; `json` only affects file output.
///
/// # Errors
/// Returns [`EvrouteError::Logger`] for an unknown level, an invalid filter, an unusable
/// directory, or if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<Logger, EvrouteError> {
    let mut builder =
        Logger::builder().name(config.name.as_str()).level_name(&config.level)?.console(config.console);
    if let Some(filter) = &config.filter {
        builder = builder.directive(filter);
    }

    let logger = match &config.directory {
        Some(directory) => builder.directory(directory.clone()).json(config.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
