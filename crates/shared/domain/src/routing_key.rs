//! Hierarchical routing keys (`<entity>.<path>.<event type>`).

use crate::constants::{SEPARATOR, WILDCARD};
use crate::events::EventTypeSet;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::{FromStr, Split};

#[evroute_derive::evroute_error]
pub enum RoutingKeyError {
    /// The raw string does not have the `<entity path>.<event type>` shape.
    #[error("Invalid routing key{}: `{key}` {reason}", format_context(.context))]
    InvalidRoutingKey {
        key: Cow<'static, str>,
        reason: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}

/// A parsed routing key: two or more non-empty, dot-separated segments.
///
/// The last segment is the event type, everything before it is the entity path.
/// Ordering and equality follow the raw string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutingKey {
    raw: String,
    /// Byte offset of the separator in front of the event type.
    split: usize,
}

impl RoutingKey {
    /// Parses a routing key.
    ///
    /// # Errors
    /// Returns [`RoutingKeyError::InvalidRoutingKey`] if the key has fewer than two
    /// segments or any empty segment.
    ///
    /// # Examples
    /// ```rust
    /// use evroute_domain::RoutingKey;
    ///
    /// let key = RoutingKey::parse("billing.invoice.*").unwrap();
    /// assert_eq!(key.entity(), "billing.invoice");
    /// assert!(key.is_wildcard());
    /// assert!(RoutingKey::parse("billing").is_err());
    /// ```
    pub fn parse(raw: impl Into<String>) -> Result<Self, RoutingKeyError> {
        let raw = raw.into();

        if raw.split(SEPARATOR).any(str::is_empty) {
            return Err(invalid(raw, "contains an empty segment"));
        }
        let Some(split) = raw.rfind(SEPARATOR) else {
            return Err(invalid(raw, "needs an entity path and an event type"));
        };

        Ok(Self { raw, split })
    }

    /// Builds `<entity>.<event_type>` from an already validated entity path.
    ///
    /// # Errors
    /// Returns [`RoutingKeyError::InvalidRoutingKey`] if the combination is malformed.
    pub fn compose(entity: &str, event_type: &str) -> Result<Self, RoutingKeyError> {
        Self::parse(format!("{entity}{SEPARATOR}{event_type}"))
    }

    /// The full key as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Entity path segments, in order (always one fewer than the key's segments).
    pub fn entity_path(&self) -> Split<'_, char> {
        self.entity().split(SEPARATOR)
    }

    /// The entity path joined with dots.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.raw[..self.split]
    }

    /// The trailing event type segment.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.raw[self.split + SEPARATOR.len_utf8()..]
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.event_type() == WILDCARD
    }

    /// Event types this key stands for: all standard types for a wildcard, the single
    /// standard type otherwise, empty for a non-standard type.
    #[must_use]
    pub fn event_types(&self) -> EventTypeSet {
        EventTypeSet::from(self.event_type())
    }
}

fn invalid(raw: String, reason: &'static str) -> RoutingKeyError {
    RoutingKeyError::InvalidRoutingKey { key: raw.into(), reason: reason.into(), context: None }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for RoutingKey {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl FromStr for RoutingKey {
    type Err = RoutingKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoutingKey {
    type Error = RoutingKeyError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl TryFrom<&str> for RoutingKey {
    type Error = RoutingKeyError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<RoutingKey> for String {
    fn from(key: RoutingKey) -> Self {
        key.raw
    }
}
