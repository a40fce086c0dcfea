use evroute_domain::RoutingKey;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Publish-side stamp: where the message goes and under which key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub routing_key: RoutingKey,
    pub transport: Cow<'static, str>,
}

/// Consume-side stamp: the first registered handler supporting the received key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedHandler {
    pub handler_id: String,
    pub priority: i32,
}

/// A message in transit plus the markers stages read and write.
///
/// The message itself is shared and immutable; cloning an envelope is cheap and only copies
/// the markers.
#[derive(Clone)]
pub struct Envelope {
    message: Arc<dyn Any + Send + Sync>,
    kind: TypeId,
    type_name: &'static str,
    received: Option<Cow<'static, str>>,
    routing_key: Option<String>,
    outbound: Option<Outbound>,
    matched_handler: Option<MatchedHandler>,
    bus_name: Option<Cow<'static, str>>,
    dispatch_after_current_bus: bool,
}

impl Envelope {
    pub fn new<M: Any + Send + Sync>(message: M) -> Self {
        Self {
            message: Arc::new(message),
            kind: TypeId::of::<M>(),
            type_name: std::any::type_name::<M>(),
            received: None,
            routing_key: None,
            outbound: None,
            matched_handler: None,
            bus_name: None,
            dispatch_after_current_bus: false,
        }
    }

    /// Marks the envelope as just received from `transport`, carrying the broker's routing key.
    ///
    /// This is what a transport adapter does before handing a message to the pipeline.
    #[must_use]
    pub fn received_from(
        mut self,
        transport: impl Into<Cow<'static, str>>,
        routing_key: Option<String>,
    ) -> Self {
        self.received = Some(transport.into());
        self.routing_key = routing_key.filter(|key| !key.is_empty());
        self
    }

    #[must_use]
    pub fn with_bus_name(mut self, bus_name: impl Into<Cow<'static, str>>) -> Self {
        self.bus_name = Some(bus_name.into());
        self
    }

    /// Defers handling until the currently running bus dispatch has finished.
    #[must_use]
    pub const fn dispatch_after_current_bus(mut self) -> Self {
        self.dispatch_after_current_bus = true;
        self
    }

    pub fn message<M: Any>(&self) -> Option<&M> {
        self.message.downcast_ref::<M>()
    }

    #[must_use]
    pub fn message_kind(&self) -> TypeId {
        self.kind
    }

    #[must_use]
    pub const fn message_type(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub const fn is_received(&self) -> bool {
        self.received.is_some()
    }

    /// Transport the message was received from.
    #[must_use]
    pub fn received(&self) -> Option<&str> {
        self.received.as_deref()
    }

    /// Routing key supplied by the transport on receipt.
    #[must_use]
    pub fn routing_key(&self) -> Option<&str> {
        self.routing_key.as_deref()
    }

    #[must_use]
    pub const fn outbound(&self) -> Option<&Outbound> {
        self.outbound.as_ref()
    }

    pub fn set_outbound(&mut self, outbound: Outbound) {
        self.outbound = Some(outbound);
    }

    #[must_use]
    pub const fn matched_handler(&self) -> Option<&MatchedHandler> {
        self.matched_handler.as_ref()
    }

    pub fn set_matched_handler(&mut self, matched: MatchedHandler) {
        self.matched_handler = Some(matched);
    }

    #[must_use]
    pub fn bus_name(&self) -> Option<&str> {
        self.bus_name.as_deref()
    }

    #[must_use]
    pub const fn is_dispatched_after_current_bus(&self) -> bool {
        self.dispatch_after_current_bus
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("message", &self.type_name)
            .field("received", &self.received)
            .field("routing_key", &self.routing_key)
            .field("outbound", &self.outbound)
            .field("matched_handler", &self.matched_handler)
            .field("bus_name", &self.bus_name)
            .field("dispatch_after_current_bus", &self.dispatch_after_current_bus)
            .finish()
    }
}
