use crate::error::{EvrouteError, EvrouteErrorExt};
use evroute_dispatch::{
    DomainErrorMiddleware, Handoff, Pipeline, PipelineEventBus, RoutingMiddleware,
};
use evroute_domain::ExchangeConfig;
use evroute_domain::config::{EvrouteConfig, ManifestConfig, TopologyConfig};
use evroute_topology::{
    BindingCompiler, DomainEventHandler, EventRegistry, HandlerRegistry, RoutingKeyProvider,
    apply_manifest,
};
use std::sync::Arc;
use tracing::info;

/// Registration phase: collects producer and consumer declarations until [`Bootstrap::freeze`].
///
/// ```rust
/// use evroute::Bootstrap;
///
/// # fn main() -> Result<(), evroute::EvrouteError> {
/// let mut bootstrap = Bootstrap::new();
/// bootstrap
///     .event("billing", "billing.invoice.*")?
///     .handler("mailer", ["billing.invoice.created"], 0)?;
///
/// let topology = bootstrap.freeze()?;
/// assert_eq!(
///     topology.exchange_config().queue_names().collect::<Vec<_>>(),
///     ["domain.event.billing.invoice"]
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Bootstrap {
    settings: TopologyConfig,
    events: EventRegistry,
    handlers: HandlerRegistry,
}

impl Bootstrap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from loaded configuration: its topology names and declaration manifest.
    ///
    /// # Errors
    /// Returns [`EvrouteError::Registry`] if the manifest contains conflicting or invalid entries.
    pub fn from_config(config: &EvrouteConfig) -> Result<Self, EvrouteError> {
        let mut bootstrap = Self::new().with_topology(config.topology.clone());
        bootstrap.manifest(&config.manifest)?;
        Ok(bootstrap)
    }

    #[must_use]
    pub fn with_topology(mut self, settings: TopologyConfig) -> Self {
        self.settings = settings;
        self
    }

    /// # Errors
    /// See [`EventRegistry::register_event`].
    pub fn event(
        &mut self,
        producer_id: impl Into<String>,
        routing_key: impl Into<String>,
    ) -> Result<&mut Self, EvrouteError> {
        self.events.register_event(producer_id, routing_key)?;
        Ok(self)
    }

    /// Registers a typed event kind, enabling routing-key lookup on the publish path.
    ///
    /// # Errors
    /// See [`EventRegistry::register`].
    pub fn event_kind<E: RoutingKeyProvider>(
        &mut self,
        producer_id: impl Into<String>,
    ) -> Result<&mut Self, EvrouteError> {
        self.events.register::<E>(producer_id)?;
        Ok(self)
    }

    /// # Errors
    /// See [`HandlerRegistry::register_handler`].
    pub fn handler<I, K>(
        &mut self,
        handler_id: impl Into<String>,
        routing_keys: I,
        priority: i32,
    ) -> Result<&mut Self, EvrouteError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.handlers.register_handler(handler_id, routing_keys, priority)?;
        Ok(self)
    }

    /// # Errors
    /// See [`HandlerRegistry::register`].
    pub fn handler_kind<H: DomainEventHandler>(&mut self) -> Result<&mut Self, EvrouteError> {
        self.handlers.register::<H>()?;
        Ok(self)
    }

    /// # Errors
    /// See [`apply_manifest`].
    pub fn manifest(&mut self, manifest: &ManifestConfig) -> Result<&mut Self, EvrouteError> {
        apply_manifest(manifest, &mut self.events, &mut self.handlers)?;
        Ok(self)
    }

    /// Ends registration: compiles the broker topology and freezes the registries.
    ///
    /// # Errors
    /// Returns [`EvrouteError::Compile`] naming the first malformed routing key and its
    /// producer. Startup must not continue with an inconsistent topology.
    pub fn freeze(self) -> Result<Topology, EvrouteError> {
        let exchange = BindingCompiler::from(&self.settings)
            .compile(self.events.list())
            .context("Bootstrap aborted")?;

        info!(
            events = self.events.len(),
            handlers = self.handlers.len(),
            queues = exchange.plans.len(),
            "Domain event topology frozen"
        );

        Ok(Topology {
            exchange,
            events: Arc::new(self.events),
            handlers: Arc::new(self.handlers),
            transport: self.settings.transport_name,
        })
    }
}

/// Frozen declarations and the compiled broker plan, shared by every runtime component.
#[derive(Debug, Clone)]
pub struct Topology {
    exchange: ExchangeConfig,
    events: Arc<EventRegistry>,
    handlers: Arc<HandlerRegistry>,
    transport: String,
}

impl Topology {
    /// Binding plan for the external broker provisioner.
    #[must_use]
    pub const fn exchange_config(&self) -> &ExchangeConfig {
        &self.exchange
    }

    #[must_use]
    pub fn events(&self) -> &Arc<EventRegistry> {
        &self.events
    }

    #[must_use]
    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.handlers
    }

    #[must_use]
    pub fn transport(&self) -> &str {
        &self.transport
    }

    pub fn routing_middleware(&self) -> RoutingMiddleware {
        RoutingMiddleware::new(Arc::clone(&self.events), Arc::clone(&self.handlers))
            .with_transport(self.transport.clone())
    }

    /// Standard pipeline: domain-error containment, then routing, then `handoff`.
    pub fn pipeline(&self, handoff: impl Handoff + 'static) -> Pipeline {
        Pipeline::new(handoff).with(DomainErrorMiddleware).with(self.routing_middleware())
    }

    /// Domain event bus over [`Topology::pipeline`].
    pub fn event_bus(&self, handoff: impl Handoff + 'static) -> PipelineEventBus {
        PipelineEventBus::new(self.pipeline(handoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evroute_dispatch::{DomainEventBus, PassThrough};

    struct OrderPaid;

    impl RoutingKeyProvider for OrderPaid {
        const ROUTING_KEY: &'static str = "order.payment.created";
    }

    #[test]
    fn freeze_aborts_on_malformed_key() {
        let mut bootstrap = Bootstrap::new();
        bootstrap.event("legacy", "payment").unwrap();

        let err = bootstrap.freeze().unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, EvrouteError::Compile { .. }));
        assert!(message.contains("`payment`") && message.contains("`legacy`"), "{message}");
        assert!(message.contains("Bootstrap aborted"), "{message}");
    }

    #[test]
    fn custom_transport_is_stamped_on_publish() {
        let settings = TopologyConfig { transport_name: "amqp.events".to_owned(), ..Default::default() };
        let mut bootstrap = Bootstrap::new().with_topology(settings);
        bootstrap.event_kind::<OrderPaid>("payments").unwrap();

        let topology = bootstrap.freeze().unwrap();
        let envelope = topology.event_bus(PassThrough).publish(OrderPaid).unwrap();
        assert_eq!(envelope.outbound().unwrap().transport, "amqp.events");
    }
}
