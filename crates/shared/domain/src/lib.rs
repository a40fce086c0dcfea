//! # Domain Models
//!
//! Pure routing types shared by every evroute crate: the [`RoutingKey`] addressing unit,
//! the [`EventTypeSet`] vocabulary, the compiled topology plan and configuration structs.
//! Keep it lean: no I/O, networking or registries here, just data and parsing.

pub mod config;
pub mod constants;
pub mod events;
pub mod routing_key;
pub mod topology;

pub use events::EventTypeSet;
pub use routing_key::{RoutingKey, RoutingKeyError, RoutingKeyErrorExt};
pub use topology::{ExchangeConfig, QueueBindingPlan};
