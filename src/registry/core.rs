use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::error::{ProjectionError, Result};
use crate::layout::{LayoutStrategy, validate_records};
use crate::logging::{LogLevel, Logger, REGISTRY_TARGET, event_with_fields, json_kv, json_str};
use crate::metrics::{MetricSnapshot, ProjectionMetrics};
use crate::record::{Record, Schema};
use crate::tree::ComponentTree;

/// Registry entry. `strategy` holds an `Arc<dyn LayoutStrategy<R>>` for the
/// record type the entry is keyed by.
struct Binding {
    type_name: &'static str,
    strategy_name: String,
    schema: Schema,
    strategy: Box<dyn Any + Send + Sync>,
}

#[derive(Default)]
struct Bindings {
    entries: HashMap<TypeId, Binding>,
    sealed: bool,
}

/// Read-only view of one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    pub type_name: &'static str,
    pub strategy: String,
    pub fields: Vec<String>,
}

/// Table from record type to its one layout strategy.
///
/// Bindings are written during startup and read-only afterwards; `bind` is
/// serialized by the write lock and `project` only takes the read lock long
/// enough to clone the strategy handle.
#[derive(Default)]
pub struct ProjectionRegistry {
    bindings: RwLock<Bindings>,
    logger: Option<Logger>,
    metrics: ProjectionMetrics,
}

impl ProjectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Bind `strategy` to record type `R`. A type is bound at most once.
    pub fn bind<R, S>(&self, strategy: S) -> Result<()>
    where
        R: Record,
        S: LayoutStrategy<R> + 'static,
    {
        let type_name = type_name::<R>();
        let result = self.insert_binding::<R>(Arc::new(strategy));
        match &result {
            Ok(strategy_name) => self.emit(
                LogLevel::Info,
                "strategy_bound",
                [json_str("type", type_name), json_str("strategy", strategy_name.as_str())],
            ),
            Err(err) => self.emit(
                LogLevel::Error,
                "bind_failed",
                [
                    json_str("type", type_name),
                    json_str("kind", err.kind()),
                    json_str("error", err.to_string()),
                ],
            ),
        }
        result.map(|_| ())
    }

    fn insert_binding<R: Record>(&self, strategy: Arc<dyn LayoutStrategy<R>>) -> Result<String> {
        let type_name = type_name::<R>();
        let mut guard = self
            .bindings
            .write()
            .map_err(|_| ProjectionError::Poisoned)?;

        if guard.sealed {
            return Err(ProjectionError::RegistrySealed(type_name));
        }

        let type_id = TypeId::of::<R>();
        if let Some(existing) = guard.entries.get(&type_id) {
            return Err(ProjectionError::Rebind {
                type_name,
                existing: existing.strategy_name.clone(),
            });
        }

        let strategy_name = strategy.name().to_string();
        guard.entries.insert(
            type_id,
            Binding {
                type_name,
                strategy_name: strategy_name.clone(),
                schema: R::schema(),
                strategy: Box::new(strategy),
            },
        );
        Ok(strategy_name)
    }

    /// Refuse any further `bind` calls.
    pub fn seal(&self) -> Result<()> {
        let mut guard = self
            .bindings
            .write()
            .map_err(|_| ProjectionError::Poisoned)?;
        guard.sealed = true;
        Ok(())
    }

    pub fn is_sealed(&self) -> Result<bool> {
        let guard = self
            .bindings
            .read()
            .map_err(|_| ProjectionError::Poisoned)?;
        Ok(guard.sealed)
    }

    pub fn is_bound<R: Record>(&self) -> Result<bool> {
        let guard = self
            .bindings
            .read()
            .map_err(|_| ProjectionError::Poisoned)?;
        Ok(guard.entries.contains_key(&TypeId::of::<R>()))
    }

    /// Every binding, ordered by type name.
    pub fn bindings(&self) -> Result<Vec<BindingInfo>> {
        let guard = self
            .bindings
            .read()
            .map_err(|_| ProjectionError::Poisoned)?;
        let mut infos: Vec<_> = guard
            .entries
            .values()
            .map(|binding| BindingInfo {
                type_name: binding.type_name,
                strategy: binding.strategy_name.clone(),
                fields: binding
                    .schema
                    .names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();
        infos.sort_by(|a, b| a.type_name.cmp(b.type_name));
        Ok(infos)
    }

    /// Build a fresh tree for `records` with the strategy bound to `R`.
    ///
    /// Fails before any tree is built when `R` is unbound, its schema has no
    /// fields, or a record drifts from the schema. The strategy output is
    /// returned as-is and never cached.
    pub fn project<R: Record>(&self, records: &[R]) -> Result<ComponentTree> {
        let started = Instant::now();
        let result = self.project_inner(records);

        match &result {
            Ok((tree, strategy_name)) => {
                let nodes = tree.node_count();
                self.metrics.record_projection(records.len(), nodes);
                self.emit(
                    LogLevel::Debug,
                    "projected",
                    [
                        json_str("type", type_name::<R>()),
                        json_str("strategy", strategy_name.as_str()),
                        json_kv("records", records.len()),
                        json_kv("nodes", nodes),
                        json_kv("elapsed_us", started.elapsed().as_micros() as u64),
                    ],
                );
            }
            Err(err) => {
                self.metrics.record_failure();
                self.emit(
                    LogLevel::Error,
                    "projection_failed",
                    [
                        json_str("type", type_name::<R>()),
                        json_str("kind", err.kind()),
                        json_str("error", err.to_string()),
                    ],
                );
            }
        }

        result.map(|(tree, _)| tree)
    }

    fn project_inner<R: Record>(&self, records: &[R]) -> Result<(ComponentTree, String)> {
        let type_name = type_name::<R>();
        let (schema, strategy, strategy_name) = {
            let guard = self
                .bindings
                .read()
                .map_err(|_| ProjectionError::Poisoned)?;
            let binding = guard
                .entries
                .get(&TypeId::of::<R>())
                .ok_or(ProjectionError::UnboundType(type_name))?;
            // Keyed by TypeId, so the stored handle is always for `R`.
            let strategy = binding
                .strategy
                .downcast_ref::<Arc<dyn LayoutStrategy<R>>>()
                .cloned()
                .ok_or(ProjectionError::UnboundType(type_name))?;
            (
                binding.schema.clone(),
                strategy,
                binding.strategy_name.clone(),
            )
        };

        schema.validate(type_name)?;
        validate_records(&schema, records)?;
        let tree = strategy.layout(&schema, records)?;
        Ok((tree, strategy_name))
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.metrics.snapshot()
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(level, REGISTRY_TARGET, message, fields));
        }
    }
}
