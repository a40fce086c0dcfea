use crate::envelope::{Envelope, MatchedHandler, Outbound};
use crate::error::DispatchError;
use crate::pipeline::{Middleware, Next};
use evroute_domain::RoutingKey;
use evroute_domain::constants::DEFAULT_TRANSPORT_NAME;
use evroute_topology::{EventRegistry, HandlerRegistry};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, trace, warn};

/// Direction of a message through the routing stage, decided per envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDirection {
    /// Newly dispatched by this process, heading out to the transport.
    Publishing,
    /// Just received from the transport.
    Consuming,
}

impl RouteDirection {
    #[must_use]
    pub const fn of(envelope: &Envelope) -> Self {
        if envelope.is_received() { Self::Consuming } else { Self::Publishing }
    }
}

/// Tags outgoing domain events with their routing key and identifies the handler of incoming
/// ones.
///
/// Only reads the frozen registries it was built with and writes only to the envelope it is
/// handed, so one instance serves any number of concurrent messages. It never fails on its
/// own and always continues the pipeline; unresolved routes are logged and forwarded.
#[derive(Debug, Clone)]
pub struct RoutingMiddleware {
    events: Arc<EventRegistry>,
    handlers: Arc<HandlerRegistry>,
    transport: Cow<'static, str>,
}

impl RoutingMiddleware {
    pub fn new(events: Arc<EventRegistry>, handlers: Arc<HandlerRegistry>) -> Self {
        Self { events, handlers, transport: Cow::Borrowed(DEFAULT_TRANSPORT_NAME) }
    }

    /// Transport name stamped on published events.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Into<Cow<'static, str>>) -> Self {
        self.transport = transport.into();
        self
    }

    #[must_use]
    pub fn transport(&self) -> &str {
        &self.transport
    }

    /// Applies the routing decision to `envelope` without running the rest of a pipeline.
    pub fn route(&self, envelope: &mut Envelope) {
        match RouteDirection::of(envelope) {
            RouteDirection::Publishing => self.publish(envelope),
            RouteDirection::Consuming => self.consume(envelope),
        }
    }

    fn publish(&self, envelope: &mut Envelope) {
        let Some(raw) = self.events.routing_key_of(envelope.message_kind()) else {
            trace!(
                message_type = envelope.message_type(),
                "Not a routed domain event, passing through"
            );
            return;
        };

        match RoutingKey::parse(raw) {
            Ok(routing_key) => {
                info!(
                    message_type = envelope.message_type(),
                    routing_key = %routing_key,
                    transport = %self.transport,
                    "Dispatching domain event"
                );
                envelope.set_outbound(Outbound { routing_key, transport: self.transport.clone() });
            },
            Err(err) => {
                warn!(message_type = envelope.message_type(), error = %err, "Route unresolved");
            },
        }
    }

    fn consume(&self, envelope: &mut Envelope) {
        let Some(raw) = envelope.routing_key() else {
            warn!(
                message_type = envelope.message_type(),
                transport = envelope.received().unwrap_or_default(),
                "Route unresolved: transport supplied no routing key"
            );
            return;
        };

        let key = match RoutingKey::parse(raw) {
            Ok(key) => key,
            Err(err) => {
                warn!(message_type = envelope.message_type(), error = %err, "Route unresolved");
                return;
            },
        };

        let Some(handler) = self.handlers.first_supporting(&key) else {
            warn!(
                message_type = envelope.message_type(),
                routing_key = %key,
                "Route unresolved: no registered handler supports the routing key"
            );
            return;
        };

        info!(
            message_type = envelope.message_type(),
            routing_key = %key,
            handler = handler.handler_id(),
            "Matched domain event handler"
        );
        envelope.set_matched_handler(MatchedHandler {
            handler_id: handler.handler_id().to_owned(),
            priority: handler.priority(),
        });
    }
}

impl Middleware for RoutingMiddleware {
    fn handle(&self, mut envelope: Envelope, next: Next<'_>) -> Result<Envelope, DispatchError> {
        self.route(&mut envelope);
        next.run(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PassThrough, Pipeline};
    use parking_lot::Mutex;
    use std::io;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Debug, Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn captured_logs(json: bool, run: impl FnOnce()) -> String {
        let captured = Captured::default();
        let builder = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE);

        if json {
            tracing::subscriber::with_default(builder.json().finish(), run);
        } else {
            tracing::subscriber::with_default(builder.finish(), run);
        }

        let bytes = captured.0.lock();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[derive(Debug)]
    struct InvoiceCreated;

    #[derive(Debug)]
    struct Untracked;

    fn middleware() -> RoutingMiddleware {
        let mut events = EventRegistry::new();
        events
            .insert(
                evroute_topology::EventDeclaration::new("billing", "billing.invoice.created")
                    .with_kind(evroute_topology::EventKind::of::<InvoiceCreated>()),
            )
            .unwrap();

        let mut handlers = HandlerRegistry::new();
        handlers.register_handler("mailer", ["billing.invoice.created"], 3).unwrap();
        handlers.register_handler("ledger", ["billing.invoice.created"], 0).unwrap();

        RoutingMiddleware::new(Arc::new(events), Arc::new(handlers))
    }

    #[test]
    fn publish_stamps_declared_kinds() {
        let pipeline = Pipeline::new(PassThrough).with(middleware());
        let envelope = pipeline.dispatch(Envelope::new(InvoiceCreated)).unwrap();

        let outbound = envelope.outbound().unwrap();
        assert_eq!(outbound.routing_key.as_str(), "billing.invoice.created");
        assert_eq!(outbound.transport, "domain.event");
        assert!(envelope.matched_handler().is_none());
    }

    #[test]
    fn publish_passes_undeclared_kinds_through() {
        let mut envelope = Envelope::new(Untracked);
        middleware().route(&mut envelope);
        assert!(envelope.outbound().is_none());
    }

    #[test]
    fn consume_records_first_match_in_registration_order() {
        let mut envelope = Envelope::new(InvoiceCreated)
            .received_from("domain.event", Some("billing.invoice.created".to_owned()));
        middleware().route(&mut envelope);

        assert_eq!(
            envelope.matched_handler(),
            Some(&MatchedHandler { handler_id: "mailer".to_owned(), priority: 3 })
        );
        assert!(envelope.outbound().is_none());
    }

    #[test]
    fn consume_without_match_forwards_unchanged() {
        let routing = middleware().with_transport("amqp");
        for key in [None, Some("billing.invoice.*"), Some("billing.invoice.updated"), Some("bad")] {
            let mut envelope = Envelope::new(InvoiceCreated).received_from("amqp", key.map(str::to_owned));
            routing.route(&mut envelope);
            assert!(envelope.matched_handler().is_none(), "{key:?}");
        }
    }

    #[test]
    fn direction_follows_received_marker() {
        let envelope = Envelope::new(Untracked);
        assert_eq!(RouteDirection::of(&envelope), RouteDirection::Publishing);
        let envelope = envelope.received_from("amqp", None);
        assert_eq!(RouteDirection::of(&envelope), RouteDirection::Consuming);
    }

    #[test]
    fn unresolved_consume_routes_warn_and_forward() {
        let routing = middleware();
        for key in [None, Some("bad"), Some("billing.invoice.updated")] {
            let mut envelope =
                Envelope::new(InvoiceCreated).received_from("amqp", key.map(str::to_owned));
            let logs = captured_logs(false, || routing.route(&mut envelope));

            assert!(logs.contains("WARN"), "{key:?}: {logs}");
            assert!(logs.contains("Route unresolved"), "{key:?}: {logs}");
            assert!(!logs.contains("DEBUG"), "{key:?}: {logs}");
            assert!(envelope.matched_handler().is_none());
        }
    }

    #[test]
    fn json_logs_keep_message_text_apart_from_message_type() {
        let routing = middleware();
        let mut envelope = Envelope::new(InvoiceCreated)
            .received_from("amqp", Some("billing.invoice.created".to_owned()));
        let logs = captured_logs(true, || routing.route(&mut envelope));

        assert!(logs.contains(r#""message":"Matched domain event handler""#), "{logs}");
        assert!(logs.contains(r#""message_type":""#), "{logs}");
        assert_eq!(logs.matches(r#""message":"#).count(), 1, "{logs}");
    }
}
