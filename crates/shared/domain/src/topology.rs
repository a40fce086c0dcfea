use crate::routing_key::RoutingKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One broker queue and the binding keys routed into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueBindingPlan {
    pub queue_name: String,
    pub binding_keys: BTreeSet<RoutingKey>,
}

impl QueueBindingPlan {
    #[must_use]
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self { queue_name: queue_name.into(), binding_keys: BTreeSet::new() }
    }

    /// Binding keys as plain strings, in sorted order.
    pub fn binding_strs(&self) -> impl Iterator<Item = &str> {
        self.binding_keys.iter().map(RoutingKey::as_str)
    }
}

/// Compiled broker topology: an exchange and its queue plans sorted by queue name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub exchange_name: String,
    pub plans: Vec<QueueBindingPlan>,
}

impl ExchangeConfig {
    /// Looks up the plan of a queue.
    #[must_use]
    pub fn plan(&self, queue_name: &str) -> Option<&QueueBindingPlan> {
        self.plans.iter().find(|plan| plan.queue_name == queue_name)
    }

    pub fn queue_names(&self) -> impl Iterator<Item = &str> {
        self.plans.iter().map(|plan| plan.queue_name.as_str())
    }

    /// Total number of queue bindings across all plans.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.plans.iter().map(|plan| plan.binding_keys.len()).sum()
    }
}
