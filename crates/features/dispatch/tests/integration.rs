pub mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use evroute_dispatch::*;
    use std::sync::Arc;

    fn received(key: &str) -> Envelope {
        Envelope::new(InvoiceCreated(1)).received_from("domain.event", Some(key.to_owned()))
    }

    #[test]
    fn publish_then_consume_round_trip() {
        let (events, handlers) = registries();
        let recording = Recording::default();
        let pipeline = Pipeline::new(recording.clone())
            .with(DomainErrorMiddleware)
            .with(RoutingMiddleware::new(events, handlers));

        let bus = PipelineEventBus::new(pipeline.clone());
        let published = bus.publish(InvoiceVoided(9)).unwrap();
        let outbound = published.outbound().unwrap();
        assert_eq!(outbound.routing_key.as_str(), "billing.invoice.deleted");
        assert_eq!(outbound.transport, "domain.event");
        assert_eq!(published.bus_name(), Some("domain.event"));

        // The transport delivers it back with the broker's routing key.
        let consumed = pipeline.dispatch(received(outbound.routing_key.as_str())).unwrap();
        assert_eq!(consumed.matched_handler().unwrap().handler_id, "accounting.ledger");
        assert_eq!(consumed.matched_handler().unwrap().priority, -5);

        assert_eq!(recording.delivered.lock().len(), 2);
    }

    #[test]
    fn handler_match_is_exact() {
        let (events, handlers) = registries();
        let routing = RoutingMiddleware::new(events, handlers);

        let mut envelope = received("billing.invoice.*");
        routing.route(&mut envelope);
        assert!(envelope.matched_handler().is_none());

        let mut envelope = received("billing.invoice.updated");
        routing.route(&mut envelope);
        assert!(envelope.matched_handler().is_none());

        let mut envelope = received("billing.invoice.created");
        routing.route(&mut envelope);
        assert_eq!(envelope.matched_handler().unwrap().handler_id, "billing.invoice_mailer");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_consumes_match_sequential_ones() {
        let (events, handlers) = registries();
        let snapshot = (events.len(), handlers.len());
        let pipeline = Arc::new(
            Pipeline::new(PassThrough).with(RoutingMiddleware::new(events.clone(), handlers.clone())),
        );

        let keys = ["billing.invoice.created", "billing.invoice.deleted", "billing.invoice.updated"];
        let matched = |envelope: &Envelope| {
            envelope.matched_handler().map(|matched| matched.handler_id.clone())
        };

        let sequential: Vec<_> = (0..64)
            .map(|i| matched(&pipeline.dispatch(received(keys[i % keys.len()])).unwrap()))
            .collect();

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move { pipeline.dispatch(received(keys[i % keys.len()])) })
            })
            .collect();

        let mut concurrent = Vec::with_capacity(tasks.len());
        for task in tasks {
            concurrent.push(matched(&task.await.unwrap().unwrap()));
        }

        assert_eq!(sequential, concurrent);
        assert_eq!((events.len(), handlers.len()), snapshot);
    }

    #[test]
    fn flush_dispatches_in_collection_order_and_clears() {
        let recording = Recording::default();
        let bus = PipelineEventBus::new(Pipeline::new(recording.clone()));
        let pending = PendingEvents::new();

        let mut invoice = EventRecorder::new();
        invoice.record(1_u64);
        invoice.record(2_u64);
        let mut customer = EventRecorder::new();
        customer.record(3_u64);

        pending.collect(&mut invoice);
        pending.collect(&mut customer);
        assert!(invoice.is_empty());
        assert_eq!(pending.len(), 3);

        assert_eq!(pending.flush(&bus).unwrap(), 3);
        assert!(pending.is_empty());
        assert_eq!(pending.flush(&bus).unwrap(), 0);

        let delivered: Vec<_> =
            recording.delivered.lock().iter().map(|e| *e.message::<u64>().unwrap()).collect();
        assert_eq!(delivered, [1, 2, 3]);
    }

    #[test]
    fn failed_flush_keeps_the_remainder() {
        let bus = PipelineEventBus::new(Pipeline::new(FailAbove(2)));
        let pending = PendingEvents::new();

        let mut recorder = EventRecorder::new();
        for value in [1_u64, 2, 3] {
            recorder.record(value);
        }
        pending.collect(&mut recorder);

        let err = pending.flush(&bus).unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn domain_errors_from_the_bus_are_contained() {
        let pipeline = Pipeline::new(|_: Envelope| -> Result<Envelope, DispatchError> {
            Err(DispatchError::domain("invoice already voided"))
        })
        .with(DomainErrorMiddleware);

        let bus = PipelineEventBus::new(pipeline);
        let envelope = bus.publish(InvoiceVoided(3)).unwrap();
        assert_eq!(envelope.message::<InvoiceVoided>(), Some(&InvoiceVoided(3)));
    }
}
