use std::borrow::Cow;

/// Failures raised by pipeline stages or the terminal handoff.
#[evroute_derive::evroute_error]
pub enum DispatchError {
    /// A business rule rejected the message. Contained by `DomainErrorMiddleware`.
    #[error("Domain error{}: {message}", format_context(.context))]
    Domain { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The external bus or transport could not take the message.
    #[error("Transport error{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DispatchError {
    pub fn domain(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Domain { message: message.into(), context: None }
    }

    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Transport { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }
}
