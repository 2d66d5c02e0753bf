//! The hook run by the host engine after a field is resolved.

use std::sync::Arc;

use derivative::Derivative;
use tower::BoxError;

use crate::collection;
use crate::configuration::configuration;
use crate::configuration::Configuration;
use crate::connection::Connection;
use crate::connection::ConnectionWrapper;
use crate::context::ExecutionContext;
use crate::decoration::FieldExecutionContext;
use crate::decorator::DecoratorClass;
use crate::decorator::DecoratorEvaluator;
use crate::error::DecorateError;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;
use crate::metadata::fmt_provider;
use crate::metadata::MetadataProvider;
use crate::resolved::Resolved;
use crate::spec::FieldType;
use crate::spec::TypeAttributes;
use crate::spec::TypeRef;

/// Per field overrides of the decoration declared on the field type.
#[derive(Clone, Default, Derivative)]
#[derivative(Debug)]
pub struct FieldOptions {
    pub(crate) decorator_class: Option<DecoratorClass>,
    #[derivative(Debug(format_with = "fmt_provider"))]
    pub(crate) decorator_evaluator: Option<DecoratorEvaluator>,
    #[derivative(Debug(format_with = "fmt_provider"))]
    pub(crate) unscoped_metadata: Option<MetadataProvider>,
    #[derivative(Debug(format_with = "fmt_provider"))]
    pub(crate) scoped_metadata: Option<MetadataProvider>,
    pub(crate) unresolved_type: Option<TypeRef>,
}

impl FieldOptions {
    pub fn decorator_class(mut self, class: DecoratorClass) -> Self {
        self.decorator_class = Some(class);
        self
    }

    pub fn decorator_evaluator<F>(mut self, evaluator: F) -> Self
    where
        F: Fn(&Value) -> Result<Option<DecoratorClass>, BoxError> + Send + Sync + 'static,
    {
        self.decorator_evaluator = Some(Arc::new(evaluator));
        self
    }

    pub fn unscoped_metadata<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Value, &ExecutionContext) -> Result<Object, BoxError> + Send + Sync + 'static,
    {
        self.unscoped_metadata = Some(Arc::new(provider));
        self
    }

    pub fn scoped_metadata<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Value, &ExecutionContext) -> Result<Object, BoxError> + Send + Sync + 'static,
    {
        self.scoped_metadata = Some(Arc::new(provider));
        self
    }

    /// The polymorphic type values of this field are resolved against.
    pub fn unresolved_type(mut self, ty: TypeRef) -> Self {
        self.unresolved_type = Some(ty);
        self
    }

    /// True if these options alone can pick a decorator.
    pub(crate) fn overrides_decorator(&self) -> bool {
        self.decorator_class.is_some()
            || self.decorator_evaluator.is_some()
            || self.unresolved_type.is_some()
    }
}

/// A resolved field value as handed over by the host.
#[derive(Clone, Debug)]
pub enum FieldValue {
    Value(Value),
    Connection(Arc<dyn Connection>),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Value(value)
    }
}

/// Decorates the values of one field.
#[derive(Clone, Debug)]
pub struct FieldExtension {
    field_type: FieldType,
    options: FieldOptions,
    configuration: Option<Arc<Configuration>>,
}

impl FieldExtension {
    pub fn new(field_type: FieldType, options: FieldOptions) -> Self {
        Self {
            field_type,
            options,
            configuration: None,
        }
    }

    /// The extension for a field of type `field_type`, if values of that type can be decorated.
    pub fn for_field_type(field_type: FieldType) -> Option<Self> {
        TypeAttributes::of(field_type.inner_type())
            .decoratable()
            .then(|| Self::new(field_type, FieldOptions::default()))
    }

    /// Uses `configuration` instead of the process wide configuration.
    pub fn with_configuration(mut self, configuration: Arc<Configuration>) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// The configuration in effect for this field.
    pub fn configuration(&self) -> Arc<Configuration> {
        self.configuration.clone().unwrap_or_else(configuration)
    }

    /// Decorates a resolved field value.
    ///
    /// `path` is the execution path of the field. Null values return `Ok(None)` without running
    /// any user code.
    pub fn after_resolve(
        &self,
        context: &ExecutionContext,
        value: Option<FieldValue>,
        parent_value: Option<&Value>,
        parent_type: Option<&TypeRef>,
        path: &Path,
    ) -> Result<Option<Resolved>, DecorateError> {
        let value = match value {
            None | Some(FieldValue::Value(Value::Null)) => return Ok(None),
            Some(value) => value,
        };
        let configuration = self.configuration();
        let field_type = self.field_type.inner_type();

        match value {
            FieldValue::Connection(connection) => {
                let wrapper = ConnectionWrapper::wrap(
                    connection,
                    field_type,
                    parent_value.cloned(),
                    parent_type.cloned(),
                    context.clone(),
                    self.options.clone(),
                    path.clone(),
                    configuration,
                );
                Ok(Some(Resolved::Connection(Arc::new(wrapper))))
            }
            FieldValue::Value(value) => {
                let field = FieldExecutionContext::new(
                    value,
                    field_type.clone(),
                    parent_value,
                    parent_type,
                    context,
                    &self.options,
                    path.clone(),
                );
                collection::decorate_value(&configuration, field).map(Some)
            }
        }
    }
}
