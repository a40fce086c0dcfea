use evroute_dispatch::{DispatchError, Envelope, Handoff};
use evroute_topology::{DomainEventHandler, EventRegistry, HandlerRegistry, RoutingKeyProvider};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceCreated(pub u64);

impl RoutingKeyProvider for InvoiceCreated {
    const ROUTING_KEY: &'static str = "billing.invoice.created";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceVoided(pub u64);

impl RoutingKeyProvider for InvoiceVoided {
    const ROUTING_KEY: &'static str = "billing.invoice.deleted";
}

pub struct InvoiceMailer;

impl DomainEventHandler for InvoiceMailer {
    const HANDLER_ID: &'static str = "billing.invoice_mailer";
    const ROUTING_KEYS: &'static [&'static str] = &["billing.invoice.created"];
}

pub struct Ledger;

impl DomainEventHandler for Ledger {
    const HANDLER_ID: &'static str = "accounting.ledger";
    const ROUTING_KEYS: &'static [&'static str] =
        &["billing.invoice.created", "billing.invoice.deleted"];
    const PRIORITY: i32 = -5;
}

pub fn registries() -> (Arc<EventRegistry>, Arc<HandlerRegistry>) {
    let mut events = EventRegistry::new();
    events.register::<InvoiceCreated>("billing").unwrap();
    events.register::<InvoiceVoided>("billing.void").unwrap();

    let mut handlers = HandlerRegistry::new();
    handlers.register::<InvoiceMailer>().unwrap();
    handlers.register::<Ledger>().unwrap();

    (Arc::new(events), Arc::new(handlers))
}

/// Handoff that remembers every envelope it receives.
#[derive(Default, Clone)]
pub struct Recording {
    pub delivered: Arc<Mutex<Vec<Envelope>>>,
}

impl Handoff for Recording {
    fn handoff(&self, envelope: Envelope) -> Result<Envelope, DispatchError> {
        self.delivered.lock().push(envelope.clone());
        Ok(envelope)
    }
}

/// Handoff that fails every envelope carrying `u64` values at or above the threshold.
pub struct FailAbove(pub u64);

impl Handoff for FailAbove {
    fn handoff(&self, envelope: Envelope) -> Result<Envelope, DispatchError> {
        match envelope.message::<u64>() {
            Some(value) if *value >= self.0 => Err(DispatchError::transport("broker refused")),
            _ => Ok(envelope),
        }
    }
}
