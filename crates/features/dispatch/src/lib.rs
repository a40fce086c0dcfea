//! # Dispatch
//!
//! Runtime side of domain event routing: the [`Envelope`] and its markers, a synchronous
//! middleware [`Pipeline`] ending in an external [`Handoff`], the [`RoutingMiddleware`] that
//! tags published events and identifies handlers of received ones, and the outbox types used
//! to dispatch events once an aggregate has been persisted.
//!
//! Delivery, retries and handler invocation are the job of the bus behind the handoff.
//!
//! ## Example
//!
//! ```rust
//! use evroute_dispatch::{DomainEventBus, Envelope, PassThrough, Pipeline, PipelineEventBus, RoutingMiddleware};
//! use evroute_topology::{EventRegistry, HandlerRegistry, RoutingKeyProvider};
//! use std::sync::Arc;
//!
//! struct InvoiceCreated;
//!
//! impl RoutingKeyProvider for InvoiceCreated {
//!     const ROUTING_KEY: &'static str = "billing.invoice.created";
//! }
//!
//! let mut events = EventRegistry::new();
//! events.register::<InvoiceCreated>("billing").unwrap();
//!
//! let routing = RoutingMiddleware::new(Arc::new(events), Arc::new(HandlerRegistry::new()));
//! let bus = PipelineEventBus::new(Pipeline::new(PassThrough).with(routing));
//!
//! let envelope = bus.publish(InvoiceCreated).unwrap();
//! assert_eq!(envelope.outbound().unwrap().routing_key.as_str(), "billing.invoice.created");
//! ```

mod bus;
mod domain_error;
mod envelope;
mod error;
mod pipeline;
mod recorder;
mod routing;

pub use bus::{DomainEventBus, PipelineEventBus};
pub use domain_error::DomainErrorMiddleware;
pub use envelope::{Envelope, MatchedHandler, Outbound};
pub use error::{DispatchError, DispatchErrorExt};
pub use pipeline::{Handoff, Middleware, Next, PassThrough, Pipeline};
pub use recorder::{EventRecorder, PendingEvents};
pub use routing::{RouteDirection, RoutingMiddleware};
