use std::any::Any;

/// Capability of an event kind to name its own broker routing key.
///
/// Usually implemented through `#[evroute_derive::domain_event(routing_key = "...")]`, which
/// also checks the key's shape at compile time. An empty key opts the kind out of broker
/// routing: it is registered but produces no queue and is published without a routing key.
pub trait RoutingKeyProvider: Any + Send + Sync {
    const ROUTING_KEY: &'static str;
}

/// Static declaration of a consumer: the exact routing keys it handles.
///
/// Keys are matched by equality only; wildcards are rejected when the handler is registered.
///
/// # Example
/// ```rust
/// use evroute_topology::{DomainEventHandler, HandlerRegistry};
///
/// struct InvoiceMailer;
///
/// impl DomainEventHandler for InvoiceMailer {
///     const HANDLER_ID: &'static str = "billing.invoice_mailer";
///     const ROUTING_KEYS: &'static [&'static str] = &["billing.invoice.created"];
/// }
///
/// let mut handlers = HandlerRegistry::new();
/// handlers.register::<InvoiceMailer>().unwrap();
/// assert_eq!(handlers.len(), 1);
/// ```
pub trait DomainEventHandler: 'static {
    const HANDLER_ID: &'static str;
    const ROUTING_KEYS: &'static [&'static str];
    const PRIORITY: i32 = 0;
}
