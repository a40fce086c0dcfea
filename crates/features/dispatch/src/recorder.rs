use crate::bus::DomainEventBus;
use crate::envelope::Envelope;
use crate::error::DispatchError;
use parking_lot::Mutex;
use std::any::Any;
use std::mem;
use tracing::{debug, warn};

/// Buffer of events raised by one aggregate, released when the aggregate is persisted.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<Envelope>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<E: Any + Send + Sync>(&mut self, event: E) {
        self.events.push(Envelope::new(event));
    }

    /// Hands over every recorded event, oldest first, leaving the recorder empty.
    pub fn release(&mut self) -> Vec<Envelope> {
        mem::take(&mut self.events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Unit-of-work outbox: collects released events while changes are being written and
/// dispatches them once the write has succeeded.
#[derive(Debug, Default)]
pub struct PendingEvents {
    events: Mutex<Vec<Envelope>>,
}

impl PendingEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the recorder's events into the outbox.
    pub fn collect(&self, recorder: &mut EventRecorder) {
        let released = recorder.release();
        if !released.is_empty() {
            self.events.lock().extend(released);
        }
    }

    /// Dispatches everything collected, in collection order, and clears the outbox.
    ///
    /// Returns the number of dispatched events.
    ///
    /// # Errors
    /// Stops at the first failed dispatch. The failed event and everything after it stay
    /// pending for the next flush.
    pub fn flush(&self, bus: &dyn DomainEventBus) -> Result<usize, DispatchError> {
        let mut pending = mem::take(&mut *self.events.lock());
        if pending.is_empty() {
            return Ok(0);
        }

        let failure = pending.iter().enumerate().find_map(|(idx, envelope)| {
            bus.dispatch(envelope.clone()).err().map(|err| (idx, err))
        });

        let Some((dispatched, err)) = failure else {
            debug!(dispatched = pending.len(), "Flushed pending domain events");
            return Ok(pending.len());
        };

        pending.drain(..dispatched);
        let mut events = self.events.lock();
        pending.append(&mut events);
        *events = pending;

        warn!(dispatched, pending = events.len(), error = %err, "Flush interrupted");
        Err(err)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_drains_in_record_order() {
        let mut recorder = EventRecorder::new();
        recorder.record(1_u8);
        recorder.record("two");

        let released = recorder.release();
        assert_eq!(released.len(), 2);
        assert_eq!(released[0].message::<u8>(), Some(&1));
        assert_eq!(released[1].message::<&str>(), Some(&"two"));
        assert!(recorder.is_empty());
        assert!(recorder.release().is_empty());
    }
}
