use crate::envelope::Envelope;
use crate::error::DispatchError;
use std::fmt;
use std::sync::Arc;

/// One stage of the envelope pipeline.
///
/// A stage may inspect or stamp the envelope and must hand it on through [`Next::run`] unless
/// it deliberately stops the message. Stages are shared between concurrently processed
/// messages, so any state they hold is read-only.
pub trait Middleware: Send + Sync {
    fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Envelope, DispatchError>;
}

/// Terminal collaborator the pipeline delivers to: the external bus or transport.
pub trait Handoff: Send + Sync {
    fn handoff(&self, envelope: Envelope) -> Result<Envelope, DispatchError>;
}

impl<F> Handoff for F
where
    F: Fn(Envelope) -> Result<Envelope, DispatchError> + Send + Sync,
{
    fn handoff(&self, envelope: Envelope) -> Result<Envelope, DispatchError> {
        self(envelope)
    }
}

/// Handoff that returns the envelope as is, for pipelines whose caller does the delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl Handoff for PassThrough {
    fn handoff(&self, envelope: Envelope) -> Result<Envelope, DispatchError> {
        Ok(envelope)
    }
}

/// The remaining stages after the current one.
pub struct Next<'a> {
    stages: &'a [Arc<dyn Middleware>],
    handoff: &'a dyn Handoff,
}

impl Next<'_> {
    /// Runs the rest of the pipeline.
    ///
    /// # Errors
    /// Whatever a later stage or the handoff returns.
    pub fn run(self, envelope: Envelope) -> Result<Envelope, DispatchError> {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                stage.handle(envelope, Next { stages: rest, handoff: self.handoff })
            },
            None => self.handoff.handoff(envelope),
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("remaining", &self.stages.len()).finish_non_exhaustive()
    }
}

/// Ordered middleware stages ending in a [`Handoff`].
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Middleware>>,
    handoff: Arc<dyn Handoff>,
}

impl Pipeline {
    pub fn new(handoff: impl Handoff + 'static) -> Self {
        Self { stages: Vec::new(), handoff: Arc::new(handoff) }
    }

    /// Appends a stage; stages run in the order they are added.
    #[must_use]
    pub fn with(mut self, stage: impl Middleware + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    #[must_use]
    pub fn with_shared(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Sends one envelope through every stage and the handoff.
    ///
    /// # Errors
    /// The first error a stage or the handoff does not contain.
    pub fn dispatch(&self, envelope: Envelope) -> Result<Envelope, DispatchError> {
        Next { stages: &self.stages, handoff: self.handoff.as_ref() }.run(envelope)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("stages", &self.stages.len()).finish_non_exhaustive()
    }
}
