use config::{Config, Environment, File};
use evroute_domain::config::EvrouteConfig;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides (`EVROUTE__TOPOLOGY__QUEUE_PREFIX`).
pub const ENV_PREFIX: &str = "EVROUTE";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_CONFIG_FILE: &str = "evroute";

#[evroute_derive::evroute_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file, then overlays `EVROUTE__`-prefixed environment variables.
///
/// Nested keys use double underscores, so `EVROUTE__TOPOLOGY__EXCHANGE_NAME` maps to
/// `topology.exchange_name`. Without a path the `evroute` file (any supported extension) in
/// the working directory is used.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing, unreadable or does not match `T`.
///
/// # Example
/// ```rust
/// use evroute_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());
    load_layered(&path, Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
}

/// [`load_config`] specialised to the workspace configuration.
///
/// # Errors
/// See [`load_config`].
pub fn load_evroute_config(path: Option<impl AsRef<Path>>) -> Result<EvrouteConfig, ConfigError> {
    load_config(path)
}

fn load_layered<T>(path: &Path, environment: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    info!(path = %path.display(), "Loading configuration");

    Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(environment)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
