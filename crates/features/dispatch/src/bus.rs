use crate::envelope::Envelope;
use crate::error::DispatchError;
use crate::pipeline::Pipeline;
use evroute_domain::constants::DOMAIN_EVENT_BUS;
use std::any::Any;
use tracing::trace;

/// Application-side entry point for publishing domain events.
pub trait DomainEventBus: Send + Sync {
    /// Dispatches an already wrapped event.
    ///
    /// # Errors
    /// Whatever the underlying pipeline does not contain.
    fn dispatch(&self, envelope: Envelope) -> Result<Envelope, DispatchError>;

    /// Wraps `event` and dispatches it.
    ///
    /// # Errors
    /// See [`DomainEventBus::dispatch`].
    fn publish<E>(&self, event: E) -> Result<Envelope, DispatchError>
    where
        E: Any + Send + Sync,
        Self: Sized,
    {
        self.dispatch(Envelope::new(event))
    }
}

/// [`DomainEventBus`] backed by a middleware [`Pipeline`].
///
/// Every event is stamped with the domain event bus name and deferred until the current bus
/// dispatch completes.
#[derive(Debug, Clone)]
pub struct PipelineEventBus {
    pipeline: Pipeline,
}

impl PipelineEventBus {
    #[must_use]
    pub const fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl DomainEventBus for PipelineEventBus {
    fn dispatch(&self, envelope: Envelope) -> Result<Envelope, DispatchError> {
        let envelope = envelope.with_bus_name(DOMAIN_EVENT_BUS).dispatch_after_current_bus();
        trace!(message_type = envelope.message_type(), "Dispatching on domain event bus");
        self.pipeline.dispatch(envelope)
    }
}
