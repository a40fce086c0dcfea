//! # Logger
//!
//! Installs the global `tracing` subscriber for an evroute process: a compact console layer
//! and, optionally, non-blocking rolling log files in plain text or JSON.
//!
//! The builder is typestated: a name is required before [`LoggerBuilder::init`] becomes
//! available, and file-only settings (rotation, retention, JSON) only exist once a directory
//! has been set. `RUST_LOG` is honoured; directives added with [`LoggerBuilder::directive`]
//! are applied on top of it.
//!
//! ## Example
//!
//! ```rust
//! use evroute_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("orders-consumer")
//!     .level(LevelFilter::DEBUG)
//!     .directive("evroute_topology=trace")
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone)]
struct Settings {
    console: bool,
    targets: bool,
    level: LevelFilter,
    directives: Vec<String>,
    directory: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            targets: true,
            level: LevelFilter::INFO,
            directives: Vec::new(),
            directory: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);
#[derive(Debug)]
pub struct ConsoleOnly;
#[derive(Debug)]
pub struct WithFiles;

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}
impl Sealed for ConsoleOnly {}
impl Sealed for WithFiles {}

/// Configures and installs the global tracing subscriber.
#[derive(Debug)]
#[must_use = "The builder does nothing until `init` is called."]
pub struct LoggerBuilder<N: Sealed = Unnamed, F: Sealed = ConsoleOnly> {
    settings: Settings,
    name: N,
    output: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<Unnamed, F> {
    /// Names the process; also the prefix of rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), output: PhantomData }
    }
}

impl<F: Sealed> LoggerBuilder<Named, F> {
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Sets the default level from its name (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level name.
    pub fn level_name(self, level: &str) -> Result<Self, LoggerError> {
        let level = LevelFilter::from_str(level.trim())
            .map_err(|_| LoggerError::invalid(format!("Unknown log level '{level}'")))?;
        Ok(self.level(level))
    }

    /// Adds a filter directive such as `evroute_dispatch=debug`.
    ///
    /// A comma-separated list is split into individual directives. Invalid directives make
    /// [`LoggerBuilder::init`] fail.
    pub fn directive(mut self, directive: impl AsRef<str>) -> Self {
        self.settings.directives.extend(
            directive
                .as_ref()
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
        );
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Shows or hides the event target (module path) in console output.
    pub const fn targets(mut self, enabled: bool) -> Self {
        self.settings.targets = enabled;
        self
    }

    /// Writes rolling log files into `directory`, creating it on init.
    pub fn directory(self, directory: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFiles> {
        let mut settings = self.settings;
        settings.directory = Some(directory.into());
        LoggerBuilder { settings, name: self.name, output: PhantomData }
    }

    /// Installs the subscriber.
    ///
    /// The returned [`Logger`] owns the file writer's worker guard; keep it alive until
    /// shutdown or buffered lines are lost.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero retention, an invalid
    ///   directive, or when no output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        let settings = self.settings;
        validate(&settings, &name)?;

        let filter = env_filter(&settings)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if settings.console {
            layers.push(layer().compact().with_target(settings.targets).with_ansi(true).boxed());
        }

        let guard = match settings.directory.as_deref() {
            Some(directory) => {
                let (file_layer, guard) = file_layer(&settings, &name, directory)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::invalid("No output enabled: turn on the console or set a directory"));
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;

        tracing::debug!(name = %name, directory = ?settings.directory, "Logger initialized");
        Ok(Logger { name, directory: settings.directory, guard })
    }
}

impl LoggerBuilder<Named, WithFiles> {
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Number of rotated files kept on disk.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    /// Writes file output as one JSON object per line.
    pub const fn json(mut self, enabled: bool) -> Self {
        self.settings.json = enabled;
        self
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    name: String,
    directory: Option<PathBuf>,
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: Unnamed, output: PhantomData }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory of the rolling log files, if file output is enabled.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!(name = %self.name, "Logger shutting down, flushing log files");
        }
    }
}

fn validate(settings: &Settings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::invalid("Logger name cannot be empty"));
    }
    if settings.directory.is_some() && settings.max_files == 0 {
        return Err(LoggerError::invalid("max_files must be greater than zero"));
    }
    Ok(())
}

fn env_filter(settings: &Settings) -> Result<EnvFilter, LoggerError> {
    let base = EnvFilter::builder().with_default_directive(settings.level.into()).from_env_lossy();

    settings.directives.iter().try_fold(base, |filter, raw| {
        let directive = Directive::from_str(raw).map_err(|e| {
            LoggerError::invalid(format!("Invalid filter directive '{raw}': {e}"))
        })?;
        Ok(filter.add_directive(directive))
    })
}

fn file_layer(
    settings: &Settings,
    name: &str,
    directory: &Path,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(directory)
        .context(format!("Failed to create log directory {}", directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(settings.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(settings.max_files)
        .build(directory)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = layer().with_writer(writer).with_ansi(false);
    let boxed = if settings.json { file.json().boxed() } else { file.boxed() };

    Ok((boxed, guard))
}
