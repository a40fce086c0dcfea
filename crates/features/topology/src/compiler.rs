use crate::declaration::EventDeclaration;
use crate::error::key_and_reason;
use evroute_domain::config::TopologyConfig;
use evroute_domain::constants::{DEFAULT_EXCHANGE_NAME, DEFAULT_QUEUE_PREFIX};
use evroute_domain::{ExchangeConfig, QueueBindingPlan, RoutingKey, RoutingKeyError};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[evroute_derive::evroute_error]
pub enum CompileError {
    /// A declared routing key is malformed. Topology is a deploy-time contract, so this aborts.
    #[error(
        "Invalid routing key{}: `{key}` declared by producer `{producer}` {reason}",
        format_context(.context)
    )]
    InvalidRoutingKey {
        key: Cow<'static, str>,
        producer: Cow<'static, str>,
        reason: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}

impl CompileError {
    fn invalid_key(producer: &str, err: RoutingKeyError) -> Self {
        let (key, reason) = key_and_reason(err);
        Self::InvalidRoutingKey { key, producer: producer.to_owned().into(), reason, context: None }
    }
}

/// Turns event declarations into a broker binding plan.
///
/// Compilation is pure: the same declarations (in any order) with the same names always
/// produce an identical [`ExchangeConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingCompiler {
    exchange_name: String,
    queue_prefix: String,
}

impl Default for BindingCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_EXCHANGE_NAME, DEFAULT_QUEUE_PREFIX)
    }
}

impl From<&TopologyConfig> for BindingCompiler {
    fn from(config: &TopologyConfig) -> Self {
        Self::new(config.exchange_name.clone(), config.queue_prefix.clone())
    }
}

impl BindingCompiler {
    pub fn new(exchange_name: impl Into<String>, queue_prefix: impl Into<String>) -> Self {
        Self { exchange_name: exchange_name.into(), queue_prefix: queue_prefix.into() }
    }

    #[must_use]
    pub fn exchange_name(&self) -> &str {
        &self.exchange_name
    }

    #[must_use]
    pub fn queue_prefix(&self) -> &str {
        &self.queue_prefix
    }

    /// Compiles one queue per distinct entity path.
    ///
    /// Declarations without a routing key are skipped. A wildcard key binds the queue to every
    /// standard event type of its entity; any other key binds its own event type verbatim.
    ///
    /// # Errors
    /// Returns [`CompileError::InvalidRoutingKey`] on the first malformed routing key.
    pub fn compile(&self, declarations: &[EventDeclaration]) -> Result<ExchangeConfig, CompileError> {
        let mut plans: BTreeMap<String, QueueBindingPlan> = BTreeMap::new();

        for declaration in declarations {
            let Some(raw) = declaration.routing_key() else {
                debug!(producer = declaration.producer_id(), "No routing key declared, skipping");
                continue;
            };

            let key = RoutingKey::parse(raw)
                .map_err(|err| CompileError::invalid_key(declaration.producer_id(), err))?;
            let entity = key.entity();
            let queue_name = format!("{}{entity}", self.queue_prefix);

            let plan = plans
                .entry(queue_name)
                .or_insert_with_key(|name| QueueBindingPlan::new(name.as_str()));

            if key.is_wildcard() {
                for event_type in key.event_types().names() {
                    plan.binding_keys.insert(self.binding_key(declaration, entity, event_type)?);
                }
            } else {
                plan.binding_keys.insert(key.clone());
            }
        }

        let config = ExchangeConfig {
            exchange_name: self.exchange_name.clone(),
            plans: plans.into_values().collect(),
        };

        info!(
            exchange = %config.exchange_name,
            queues = config.plans.len(),
            bindings = config.binding_count(),
            "Compiled broker topology"
        );

        Ok(config)
    }

    fn binding_key(
        &self,
        declaration: &EventDeclaration,
        entity: &str,
        event_type: &str,
    ) -> Result<RoutingKey, CompileError> {
        RoutingKey::compose(entity, event_type)
            .map_err(|err| CompileError::invalid_key(declaration.producer_id(), err))
    }
}

/// One-shot form of [`BindingCompiler::compile`].
///
/// # Errors
/// See [`BindingCompiler::compile`].
pub fn compile(
    declarations: &[EventDeclaration],
    exchange_name: &str,
    queue_prefix: &str,
) -> Result<ExchangeConfig, CompileError> {
    BindingCompiler::new(exchange_name, queue_prefix).compile(declarations)
}
