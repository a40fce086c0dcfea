use crate::envelope::Envelope;
use crate::error::DispatchError;
use crate::pipeline::{Middleware, Next};
use tracing::error;

/// Contains business-rule failures of later stages.
///
/// A [`DispatchError::Domain`] raised further down the pipeline is logged and the envelope, as
/// it entered this stage, is returned as a successful outcome. Every other error propagates.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomainErrorMiddleware;

impl Middleware for DomainErrorMiddleware {
    fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Envelope, DispatchError> {
        match next.run(envelope.clone()) {
            Err(err) if err.is_domain() => {
                error!(message_type = envelope.message_type(), error = %err, "Domain error contained");
                Ok(envelope)
            },
            outcome => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;

    fn failing_with(err: fn() -> DispatchError) -> Pipeline {
        Pipeline::new(move |_: Envelope| -> Result<Envelope, DispatchError> { Err(err()) })
            .with(DomainErrorMiddleware)
    }

    #[test]
    fn domain_errors_are_contained() {
        let pipeline = failing_with(|| DispatchError::domain("invoice already paid"));
        let envelope = pipeline.dispatch(Envelope::new(7_u32)).unwrap();
        assert_eq!(envelope.message::<u32>(), Some(&7));
    }

    #[test]
    fn other_errors_propagate() {
        let pipeline = failing_with(|| DispatchError::transport("broker down"));
        let err = pipeline.dispatch(Envelope::new(7_u32)).unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));

        let pipeline = failing_with(|| "invariant broken".into());
        assert!(matches!(
            pipeline.dispatch(Envelope::new(7_u32)),
            Err(DispatchError::Internal { .. })
        ));
    }
}
