use crate::constants::{DEFAULT_EXCHANGE_NAME, DEFAULT_QUEUE_PREFIX, DEFAULT_TRANSPORT_NAME};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the bootstrap phase.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvrouteConfigInner {
    pub topology: TopologyConfig,
    pub logging: LoggingConfig,
    pub manifest: ManifestConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct EvrouteConfig {
    #[serde(flatten, default)]
    inner: Arc<EvrouteConfigInner>,
}

impl Deref for EvrouteConfig {
    type Target = EvrouteConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for EvrouteConfig {
    fn deref_mut(&mut self) -> &mut EvrouteConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Broker naming used by the binding compiler and the publish path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub exchange_name: String,
    pub queue_prefix: String,
    pub transport_name: String,
}

/// Logging subscriber settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    /// Default level directive (`trace`..`error`); `RUST_LOG` still applies on top.
    pub level: String,
    pub filter: Option<String>,
    pub console: bool,
    pub json: bool,
    /// Directory for rolling log files; file logging is off when unset.
    pub directory: Option<PathBuf>,
}

/// Statically declared producers and consumers.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub events: Vec<EventEntry>,
    pub handlers: Vec<HandlerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventEntry {
    pub producer: String,
    /// Empty when the producer opts out of broker routing.
    #[serde(default)]
    pub routing_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HandlerEntry {
    pub handler: String,
    pub routing_keys: Vec<String>,
    #[serde(default)]
    pub priority: i32,
}

// --- Default ---

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            exchange_name: DEFAULT_EXCHANGE_NAME.to_owned(),
            queue_prefix: DEFAULT_QUEUE_PREFIX.to_owned(),
            transport_name: DEFAULT_TRANSPORT_NAME.to_owned(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "evroute".to_owned(),
            level: "info".to_owned(),
            filter: None,
            console: true,
            json: false,
            directory: None,
        }
    }
}
