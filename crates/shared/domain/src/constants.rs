/// Segment separator inside routing and binding keys.
pub const SEPARATOR: char = '.';

pub const CREATED: &str = "created";
pub const UPDATED: &str = "updated";
pub const DELETED: &str = "deleted";

/// Event type segment standing for every standard event type of an entity.
pub const WILDCARD: &str = "*";

pub const DEFAULT_EXCHANGE_NAME: &str = "domain.event.exchange";
pub const DEFAULT_QUEUE_PREFIX: &str = "domain.event.";

/// Transport that published domain events are sent through.
pub const DEFAULT_TRANSPORT_NAME: &str = "domain.event";

/// Name of the bus domain events are dispatched on.
pub const DOMAIN_EVENT_BUS: &str = "domain.event";
