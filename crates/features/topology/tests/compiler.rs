use evroute_topology::{BindingCompiler, EventDeclaration, EventRegistry, compile};
use proptest::prelude::*;

fn declarations(entries: &[(&str, &str)]) -> Vec<EventDeclaration> {
    entries.iter().map(|(producer, key)| EventDeclaration::new(*producer, *key)).collect()
}

#[test]
fn wildcard_expands_to_standard_event_types() {
    let config = compile(&declarations(&[("billing", "billing.invoice.*")]), "ex", "evt.").unwrap();

    assert_eq!(config.queue_names().collect::<Vec<_>>(), ["evt.billing.invoice"]);
    let plan = config.plan("evt.billing.invoice").unwrap();
    assert_eq!(
        plan.binding_strs().collect::<Vec<_>>(),
        ["billing.invoice.created", "billing.invoice.deleted", "billing.invoice.updated"]
    );
}

#[test]
fn same_entity_accumulates_without_duplicates() {
    let config = compile(
        &declarations(&[
            ("a", "billing.invoice.created"),
            ("b", "billing.invoice.updated"),
            ("c", "billing.invoice.created"),
        ]),
        "ex",
        "evt.",
    )
    .unwrap();

    assert_eq!(config.plans.len(), 1);
    let plan = &config.plans[0];
    assert_eq!(plan.queue_name, "evt.billing.invoice");
    assert_eq!(
        plan.binding_strs().collect::<Vec<_>>(),
        ["billing.invoice.created", "billing.invoice.updated"]
    );
}

#[test]
fn end_to_end_from_registry() {
    let mut events = EventRegistry::new();
    events.register_event("A", "order.payment.created").unwrap();
    events.register_event("B", "order.payment.*").unwrap();

    let config = BindingCompiler::new("ex", "q.").compile(events.list()).unwrap();

    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        serde_json::json!({
            "exchange_name": "ex",
            "plans": [{
                "queue_name": "q.order.payment",
                "binding_keys": [
                    "order.payment.created",
                    "order.payment.deleted",
                    "order.payment.updated"
                ]
            }]
        })
    );
}

#[test]
fn compiling_twice_is_identical() {
    let decls = declarations(&[("x", "crm.lead.*"), ("y", "crm.deal.updated")]);
    let compiler = BindingCompiler::new("ex", "q.");
    assert_eq!(compiler.compile(&decls).unwrap(), compiler.compile(&decls).unwrap());
}

fn entity() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,6}", 1..4).prop_map(|segments| segments.join("."))
}

fn event_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["created", "updated", "deleted", "*", "archived"])
}

fn declared(size: std::ops::Range<usize>) -> impl Strategy<Value = Vec<EventDeclaration>> {
    prop::collection::vec((entity(), event_type()), size).prop_map(|keys| {
        keys.iter()
            .enumerate()
            .map(|(i, (entity, et))| EventDeclaration::new(format!("p{i}"), format!("{entity}.{et}")))
            .collect()
    })
}

fn declared_and_shuffled() -> impl Strategy<Value = (Vec<EventDeclaration>, Vec<EventDeclaration>)> {
    declared(0..12).prop_flat_map(|decls| (Just(decls.clone()), Just(decls).prop_shuffle()))
}

proptest! {
    #[test]
    fn registration_order_does_not_matter((decls, shuffled) in declared_and_shuffled()) {
        let forward = compile(&decls, "ex", "q.").unwrap();
        let reordered = compile(&shuffled, "ex", "q.").unwrap();
        prop_assert_eq!(
            serde_json::to_string(&forward).unwrap(),
            serde_json::to_string(&reordered).unwrap()
        );
    }

    #[test]
    fn every_plan_binds_only_its_own_entity(decls in declared(1..12)) {
        let config = compile(&decls, "ex", "q.").unwrap();
        for plan in &config.plans {
            let entity = plan.queue_name.strip_prefix("q.").unwrap();
            prop_assert!(!plan.binding_keys.is_empty());
            for key in &plan.binding_keys {
                prop_assert_eq!(key.entity(), entity);
                prop_assert!(!key.is_wildcard());
            }
        }
    }
}
