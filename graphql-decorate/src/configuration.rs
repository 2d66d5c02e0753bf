//! Decoration configuration.
//!
//! A [`Configuration`] can be injected into each [`FieldExtension`](crate::FieldExtension).
//! Extensions without one read the process wide configuration at decoration time, which is
//! changed with [`configure`] and restored with [`reset_configuration`].

use std::sync::Arc;

use derivative::Derivative;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use tower::BoxError;

use crate::collection::CollectionType;
use crate::context::ExecutionContext;
use crate::decorator::Decorated;
use crate::decorator::DecorationStrategy;
use crate::decorator::DecoratorClass;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::metadata::fmt_provider;

static CONFIGURATION: Lazy<RwLock<Arc<Configuration>>> = Lazy::new(Default::default);

/// How scoped metadata is tracked during a query.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScopeTracking {
    /// Scoped metadata is indexed by execution path; list siblings are isolated.
    #[default]
    Path,
    /// A single scoped metadata value per query; list siblings overwrite each other.
    Flat,
}

/// Declarative decoration options.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct DecorateConfig {
    /// How scoped metadata is tracked during a query.
    /// default: path
    pub scope_tracking: ScopeTracking,
}

/// Decoration configuration: the decoration strategy, the custom collection types and the scope
/// tracking of new execution contexts.
#[derive(Clone, Default, Derivative)]
#[derivative(Debug)]
pub struct Configuration {
    #[derivative(Debug(format_with = "fmt_provider"))]
    strategy: Option<DecorationStrategy>,
    collection_types: Vec<Arc<dyn CollectionType>>,
    scope_tracking: ScopeTracking,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: DecorateConfig) -> Self {
        Self {
            scope_tracking: config.scope_tracking,
            ..Default::default()
        }
    }

    /// Replaces how decorated values are built from a decorator class, a value and its metadata.
    pub fn decorate<F>(&mut self, strategy: F) -> &mut Self
    where
        F: Fn(&DecoratorClass, Value, Object) -> Result<Arc<dyn Decorated>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Treats values recognized by `collection_type` as collections whose elements are decorated
    /// one by one.
    pub fn register_collection_type(
        &mut self,
        collection_type: impl CollectionType + 'static,
    ) -> &mut Self {
        self.collection_types.push(Arc::new(collection_type));
        self
    }

    pub fn scope_tracking(&mut self, scope_tracking: ScopeTracking) -> &mut Self {
        self.scope_tracking = scope_tracking;
        self
    }

    pub fn tracking(&self) -> ScopeTracking {
        self.scope_tracking
    }

    pub fn collection_types(&self) -> &[Arc<dyn CollectionType>] {
        &self.collection_types
    }

    /// Creates the execution context of a new query.
    pub fn new_context(&self) -> ExecutionContext {
        ExecutionContext::with_scope_tracking(self.scope_tracking)
    }

    pub(crate) fn apply_strategy(
        &self,
        class: &DecoratorClass,
        value: Value,
        metadata: Object,
    ) -> Result<Arc<dyn Decorated>, BoxError> {
        match &self.strategy {
            Some(strategy) => strategy(class, value, metadata),
            None => class.decorate(value, metadata),
        }
    }
}

/// The process wide configuration.
pub fn configuration() -> Arc<Configuration> {
    Arc::clone(&CONFIGURATION.read())
}

/// Updates the process wide configuration.
///
/// Decorations already running keep the configuration they started with.
pub fn configure(f: impl FnOnce(&mut Configuration)) {
    let mut current = CONFIGURATION.write();
    let mut configuration = Configuration::clone(&current);
    f(&mut configuration);
    *current = Arc::new(configuration);
}

/// Restores the default process wide configuration.
pub fn reset_configuration() {
    *CONFIGURATION.write() = Default::default();
}
