use evroute_domain::RoutingKey;
use std::any::TypeId;
use std::collections::BTreeSet;
use std::fmt;

/// Rust type identity of a declared event kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind {
    id: TypeId,
    name: &'static str,
}

impl EventKind {
    #[must_use]
    pub fn of<E: 'static>() -> Self {
        Self { id: TypeId::of::<E>(), name: std::any::type_name::<E>() }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A producer's declaration of one event kind.
///
/// The routing key is kept exactly as declared; the binding compiler validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDeclaration {
    pub(crate) producer_id: String,
    pub(crate) routing_key: Option<String>,
    pub(crate) kind: Option<EventKind>,
}

impl EventDeclaration {
    /// Creates a declaration; an empty key means the producer opts out of broker routing.
    pub fn new(producer_id: impl Into<String>, routing_key: impl Into<String>) -> Self {
        let routing_key = routing_key.into();
        Self {
            producer_id: producer_id.into(),
            routing_key: (!routing_key.is_empty()).then_some(routing_key),
            kind: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn producer_id(&self) -> &str {
        &self.producer_id
    }

    /// The declared routing key, `None` for opted-out producers.
    #[must_use]
    pub fn routing_key(&self) -> Option<&str> {
        self.routing_key.as_deref()
    }

    #[must_use]
    pub const fn kind(&self) -> Option<EventKind> {
        self.kind
    }
}

/// A consumer's declaration: the exact routing keys it can handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDeclaration {
    pub(crate) handler_id: String,
    pub(crate) routing_keys: BTreeSet<RoutingKey>,
    pub(crate) priority: i32,
}

impl HandlerDeclaration {
    #[must_use]
    pub fn handler_id(&self) -> &str {
        &self.handler_id
    }

    pub fn routing_keys(&self) -> impl Iterator<Item = &RoutingKey> {
        self.routing_keys.iter()
    }

    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Exact set membership. No pattern matching happens on the consumer side.
    #[must_use]
    pub fn supports(&self, key: &RoutingKey) -> bool {
        self.routing_keys.contains(key)
    }

    /// [`Self::supports`] for a raw key; malformed keys are never supported.
    #[must_use]
    pub fn supports_str(&self, key: &str) -> bool {
        RoutingKey::parse(key).is_ok_and(|key| self.supports(&key))
    }
}
