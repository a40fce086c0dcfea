use evroute_kernel::config::ConfigError;
use evroute_topology::{CompileError, RegistryError};
use std::borrow::Cow;

/// Everything that can abort an evroute bootstrap.
#[evroute_derive::evroute_error]
pub enum EvrouteError {
    #[error("Registration failed{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    #[error("Topology compilation failed{}: {source}", format_context(.context))]
    Compile { source: CompileError, context: Option<Cow<'static, str>> },

    #[error("Configuration failed{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[cfg(feature = "logger")]
    #[error("Logging setup failed{}: {source}", format_context(.context))]
    Logger { source: evroute_logger::LoggerError, context: Option<Cow<'static, str>> },
}
