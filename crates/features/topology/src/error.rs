use evroute_domain::RoutingKeyError;
use std::borrow::Cow;

/// Registration failures. Both are fatal for the bootstrap phase.
#[evroute_derive::evroute_error]
pub enum RegistryError {
    /// The id (or event kind) is already registered with a different payload.
    #[error("Duplicate declaration{}: `{id}` {message}", format_context(.context))]
    DuplicateDeclaration {
        id: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error(
        "Invalid routing key{}: `{key}` declared by `{declared_by}` {reason}",
        format_context(.context)
    )]
    InvalidRoutingKey {
        key: Cow<'static, str>,
        declared_by: Cow<'static, str>,
        reason: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}

/// Splits a parse failure into its key and reason.
pub(crate) fn key_and_reason(err: RoutingKeyError) -> (Cow<'static, str>, Cow<'static, str>) {
    match err {
        RoutingKeyError::InvalidRoutingKey { key, reason, .. } => (key, reason),
    }
}

impl RegistryError {
    pub(crate) fn invalid_key(declared_by: &str, err: RoutingKeyError) -> Self {
        let (key, reason) = key_and_reason(err);
        Self::InvalidRoutingKey {
            key,
            declared_by: declared_by.to_owned().into(),
            reason,
            context: None,
        }
    }

    pub(crate) fn duplicate(id: &str, message: &'static str) -> Self {
        Self::DuplicateDeclaration { id: id.to_owned().into(), message: message.into(), context: None }
    }
}
