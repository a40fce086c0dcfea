use crate::declaration::{EventDeclaration, EventKind, HandlerDeclaration};
use crate::error::RegistryError;
use crate::provider::{DomainEventHandler, RoutingKeyProvider};
use evroute_domain::RoutingKey;
use fxhash::FxHashMap;
use std::any::TypeId;
use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of checking an id against what is already registered.
enum Slot {
    Vacant,
    /// Same id, same payload: registration is a no-op.
    Identical,
}

/// Producer declarations, in registration order.
///
/// Built during bootstrap through `&mut self`, then shared read-only (typically in an `Arc`).
#[derive(Debug, Default, Clone)]
pub struct EventRegistry {
    declarations: Vec<EventDeclaration>,
    by_producer: FxHashMap<String, usize>,
    by_kind: FxHashMap<TypeId, usize>,
}

impl EventRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a producer's routing key. An empty key registers an opted-out producer.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateDeclaration`] if `producer_id` is already registered
    /// with a different routing key.
    pub fn register_event(
        &mut self,
        producer_id: impl Into<String>,
        routing_key: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.insert(EventDeclaration::new(producer_id, routing_key))
    }

    /// Registers an event kind through its [`RoutingKeyProvider`] implementation.
    ///
    /// The kind's type identity is recorded so the publish path can resolve a message to its
    /// routing key.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateDeclaration`] if the producer id or the event kind is
    /// already registered with a different payload.
    pub fn register<E: RoutingKeyProvider>(
        &mut self,
        producer_id: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.insert(EventDeclaration::new(producer_id, E::ROUTING_KEY).with_kind(EventKind::of::<E>()))
    }

    /// Registers a prepared declaration.
    ///
    /// # Errors
    /// See [`Self::register`].
    pub fn insert(&mut self, declaration: EventDeclaration) -> Result<(), RegistryError> {
        if let Slot::Identical = self.check(&declaration)? {
            return Ok(());
        }

        let idx = self.declarations.len();
        debug!(
            producer = %declaration.producer_id,
            routing_key = declaration.routing_key().unwrap_or_default(),
            kind = ?declaration.kind,
            "Registered event declaration"
        );
        self.by_producer.insert(declaration.producer_id.clone(), idx);
        if let Some(kind) = declaration.kind {
            self.by_kind.insert(kind.type_id(), idx);
        }
        self.declarations.push(declaration);
        Ok(())
    }

    fn check(&self, declaration: &EventDeclaration) -> Result<Slot, RegistryError> {
        let by_kind = declaration.kind.and_then(|kind| self.by_kind.get(&kind.type_id()));

        match (self.by_producer.get(&declaration.producer_id), by_kind) {
            (None, None) => Ok(Slot::Vacant),
            (Some(&idx), _) if self.declarations[idx] == *declaration => Ok(Slot::Identical),
            (Some(_), _) => Err(RegistryError::duplicate(
                &declaration.producer_id,
                "is already registered with a different declaration",
            )),
            (None, Some(_)) => Err(RegistryError::duplicate(
                &declaration.producer_id,
                "declares an event kind already registered by another producer",
            )),
        }
    }

    /// Immutable snapshot of all declarations in registration order.
    #[must_use]
    pub fn list(&self) -> &[EventDeclaration] {
        &self.declarations
    }

    #[must_use]
    pub fn get(&self, producer_id: &str) -> Option<&EventDeclaration> {
        self.by_producer.get(producer_id).map(|&idx| &self.declarations[idx])
    }

    /// Declared routing key of an event kind, if the kind is registered and not opted out.
    #[must_use]
    pub fn routing_key_of(&self, kind: TypeId) -> Option<&str> {
        self.by_kind.get(&kind).and_then(|&idx| self.declarations[idx].routing_key())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Consumer declarations, in registration order.
#[derive(Debug, Default, Clone)]
pub struct HandlerRegistry {
    declarations: Vec<HandlerDeclaration>,
    by_handler: FxHashMap<String, usize>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler and the exact routing keys it handles.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidRoutingKey`] for a malformed or wildcard key and
    /// [`RegistryError::DuplicateDeclaration`] if `handler_id` is already registered with
    /// different keys or priority.
    pub fn register_handler<I, K>(
        &mut self,
        handler_id: impl Into<String>,
        routing_keys: I,
        priority: i32,
    ) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let handler_id = handler_id.into();
        let routing_keys = routing_keys
            .into_iter()
            .map(|raw| parse_handler_key(&handler_id, raw.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let declaration = HandlerDeclaration { handler_id, routing_keys, priority };

        if let Some(&idx) = self.by_handler.get(&declaration.handler_id) {
            if self.declarations[idx] == declaration {
                return Ok(());
            }
            return Err(RegistryError::duplicate(
                &declaration.handler_id,
                "is already registered with different routing keys or priority",
            ));
        }

        debug!(
            handler = %declaration.handler_id,
            keys = declaration.routing_keys.len(),
            priority,
            "Registered handler declaration"
        );
        self.by_handler.insert(declaration.handler_id.clone(), self.declarations.len());
        self.declarations.push(declaration);
        Ok(())
    }

    /// Registers a handler through its [`DomainEventHandler`] implementation.
    ///
    /// # Errors
    /// See [`Self::register_handler`].
    pub fn register<H: DomainEventHandler>(&mut self) -> Result<(), RegistryError> {
        self.register_handler(H::HANDLER_ID, H::ROUTING_KEYS, H::PRIORITY)
    }

    /// Immutable snapshot of all declarations in registration order.
    #[must_use]
    pub fn list(&self) -> &[HandlerDeclaration] {
        &self.declarations
    }

    #[must_use]
    pub fn get(&self, handler_id: &str) -> Option<&HandlerDeclaration> {
        self.by_handler.get(handler_id).map(|&idx| &self.declarations[idx])
    }

    /// First handler, in registration order, that supports `key`.
    #[must_use]
    pub fn first_supporting(&self, key: &RoutingKey) -> Option<&HandlerDeclaration> {
        self.declarations.iter().find(|handler| handler.supports(key))
    }

    /// Every handler supporting `key`, in registration order.
    pub fn supporting<'a>(
        &'a self,
        key: &'a RoutingKey,
    ) -> impl Iterator<Item = &'a HandlerDeclaration> {
        self.declarations.iter().filter(move |handler| handler.supports(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

fn parse_handler_key(handler_id: &str, raw: &str) -> Result<RoutingKey, RegistryError> {
    let key = RoutingKey::parse(raw).map_err(|err| RegistryError::invalid_key(handler_id, err))?;
    if key.is_wildcard() {
        return Err(RegistryError::InvalidRoutingKey {
            key: raw.to_owned().into(),
            declared_by: handler_id.to_owned().into(),
            reason: "handlers must name exact routing keys, not wildcards".into(),
            context: None,
        });
    }
    Ok(key)
}
