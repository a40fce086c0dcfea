//! # evroute
//!
//! Facade over the evroute crates. Applications register their event producers and handlers
//! on a [`Bootstrap`], freeze it into a [`Topology`], hand the compiled [`ExchangeConfig`] to
//! their broker provisioner and run messages through [`Topology::pipeline`].
//!
//! ## Usage
//! - Load [`EvrouteConfig`] with [`load_config`] (file plus `EVROUTE__` environment overrides).
//! - Call [`init_logging`] with its `logging` section (feature `logger`, on by default).
//! - Build with [`Bootstrap::from_config`], add typed registrations, then [`Bootstrap::freeze`].

mod bootstrap;
mod error;
#[cfg(feature = "logger")]
mod logging;

pub use bootstrap::{Bootstrap, Topology};
pub use error::{EvrouteError, EvrouteErrorExt};
#[cfg(feature = "logger")]
pub use logging::init_logging;

pub use evroute_derive::domain_event;
pub use evroute_dispatch as dispatch;
pub use evroute_domain as domain;
pub use evroute_domain::config::EvrouteConfig;
pub use evroute_domain::{ExchangeConfig, QueueBindingPlan, RoutingKey};
pub use evroute_kernel::config::load_evroute_config as load_config;
pub use evroute_topology as topology;
pub use evroute_topology::{DomainEventHandler, RoutingKeyProvider};
