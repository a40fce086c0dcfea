//! # Topology
//!
//! Declaration registries and the binding compiler.
//!
//! Producers declare one routing key per event kind, consumers declare the exact keys they
//! handle. Both are registered once during bootstrap; the registries are then frozen (moved
//! into an `Arc`) and read concurrently. The [`BindingCompiler`] turns the event declarations
//! into an [`ExchangeConfig`] for an external broker provisioner.
//!
//! ## Example
//!
//! ```rust
//! use evroute_topology::{BindingCompiler, EventRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut events = EventRegistry::new();
//! events.register_event("payments", "order.payment.created")?;
//! events.register_event("refunds", "order.payment.*")?;
//!
//! let config = BindingCompiler::new("ex", "q.").compile(events.list())?;
//! let plan = config.plan("q.order.payment").unwrap();
//! assert_eq!(
//!     plan.binding_strs().collect::<Vec<_>>(),
//!     ["order.payment.created", "order.payment.deleted", "order.payment.updated"]
//! );
//! # Ok(())
//! # }
//! ```

extern crate self as evroute_topology;

mod compiler;
mod declaration;
mod error;
mod manifest;
mod provider;
mod registry;

pub use compiler::{BindingCompiler, CompileError, CompileErrorExt, compile};
pub use declaration::{EventDeclaration, EventKind, HandlerDeclaration};
pub use error::{RegistryError, RegistryErrorExt};
pub use evroute_domain::{ExchangeConfig, QueueBindingPlan, RoutingKey};
pub use manifest::apply_manifest;
pub use provider::{DomainEventHandler, RoutingKeyProvider};
pub use registry::{EventRegistry, HandlerRegistry};
