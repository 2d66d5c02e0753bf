//! Metadata passed to decorators.
//!
//! Every decorated value receives the merge of three layers: the [`GRAPHQL_KEY`] marker, the
//! unscoped metadata computed for the value itself and the scoped metadata it inherits from the
//! values above it (plus its own contribution).

use std::sync::Arc;

use derivative::Derivative;
use tower::BoxError;

use crate::context::ExecutionContext;
use crate::json_ext::Object;
use crate::json_ext::Value;

/// Key always present in decorator metadata, marking values decorated during GraphQL resolution.
pub const GRAPHQL_KEY: &str = "graphql";

/// Computes metadata for a resolved value.
pub type MetadataProvider =
    Arc<dyn Fn(&Value, &ExecutionContext) -> Result<Object, BoxError> + Send + Sync>;

/// The marker layer every decorator metadata starts from.
pub(crate) fn default_metadata() -> Object {
    let mut metadata = Object::new();
    metadata.insert(GRAPHQL_KEY, Value::Bool(true));
    metadata
}

/// Unscoped and scoped metadata providers of a type.
///
/// Unscoped metadata is only visible to the decorator of the value that produced it; scoped
/// metadata is also inherited by all fields resolved below that value.
#[derive(Clone, Default, Derivative)]
#[derivative(Debug)]
pub struct DecorationMetadata {
    #[derivative(Debug(format_with = "fmt_provider"))]
    unscoped: Option<MetadataProvider>,
    #[derivative(Debug(format_with = "fmt_provider"))]
    scoped: Option<MetadataProvider>,
}

impl DecorationMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates metadata for a single resolved value.
    pub fn unscoped<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Value, &ExecutionContext) -> Result<Object, BoxError> + Send + Sync + 'static,
    {
        self.unscoped = Some(Arc::new(provider));
        self
    }

    /// Evaluates metadata for a resolved value and all of its child fields.
    pub fn scoped<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Value, &ExecutionContext) -> Result<Object, BoxError> + Send + Sync + 'static,
    {
        self.scoped = Some(Arc::new(provider));
        self
    }

    pub fn unscoped_provider(&self) -> Option<&MetadataProvider> {
        self.unscoped.as_ref()
    }

    pub fn scoped_provider(&self) -> Option<&MetadataProvider> {
        self.scoped.as_ref()
    }
}

pub(crate) fn fmt_provider<T>(
    provider: &Option<T>,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    if provider.is_some() {
        f.write_str("Some(<fn>)")
    } else {
        f.write_str("None")
    }
}

/// Evaluates an optional provider, treating an absent one as empty metadata.
pub(crate) fn evaluate(
    provider: Option<&MetadataProvider>,
    value: &Value,
    context: &ExecutionContext,
) -> Result<Object, BoxError> {
    match provider {
        Some(provider) => provider(value, context),
        None => Ok(Object::new()),
    }
}
