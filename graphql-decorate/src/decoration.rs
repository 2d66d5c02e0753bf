//! The decoration engine.
//!
//! For one resolved value the engine picks the decorator class, computes the decorator metadata
//! and records the scoped metadata the value passes down to its descendant fields.

use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::configuration::Configuration;
use crate::context::ExecutionContext;
use crate::decorator::DecoratorClass;
use crate::decorator::DecoratorEvaluator;
use crate::error::DecorateError;
use crate::field_extension::FieldOptions;
use crate::json_ext::merged;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;
use crate::metadata::default_metadata;
use crate::metadata::evaluate;
use crate::metadata::MetadataProvider;
use crate::resolved::Resolved;
use crate::spec::TypeAttributes;
use crate::spec::TypeRef;

/// Everything known about a single value being decorated.
#[derive(Clone, Debug)]
pub struct FieldExecutionContext<'a> {
    /// The resolved value.
    pub value: Value,
    /// The named type of the field.
    pub field_type: TypeRef,
    pub parent_value: Option<&'a Value>,
    pub parent_type: Option<&'a TypeRef>,
    pub context: &'a ExecutionContext,
    pub options: &'a FieldOptions,
    /// Execution path of the value, including its list index if it is a collection element.
    pub path: Path,
}

impl<'a> FieldExecutionContext<'a> {
    pub fn new(
        value: Value,
        field_type: TypeRef,
        parent_value: Option<&'a Value>,
        parent_type: Option<&'a TypeRef>,
        context: &'a ExecutionContext,
        options: &'a FieldOptions,
        path: Path,
    ) -> Self {
        Self {
            value,
            field_type,
            parent_value,
            parent_type,
            context,
            options,
            path,
        }
    }

    /// The same field, for another value at another path.
    pub fn with_value(&self, value: Value, path: Path) -> Self {
        Self {
            value,
            field_type: self.field_type.clone(),
            parent_value: self.parent_value,
            parent_type: self.parent_type,
            context: self.context,
            options: self.options,
            path,
        }
    }
}

/// The decorator chosen for a value and the metadata it is constructed with.
#[derive(Clone, Debug)]
pub struct DecoratorBinding {
    pub decorator_class: DecoratorClass,
    pub metadata: Object,
}

/// Decorates single values.
pub struct Decoration;

impl Decoration {
    /// Decorates `field.value`, or hands it back unchanged when no decorator applies.
    pub fn decorate(
        configuration: &Configuration,
        field: FieldExecutionContext<'_>,
    ) -> Result<Resolved, DecorateError> {
        match Self::bind(&field)? {
            Some(binding) => {
                tracing::debug!(
                    path = %field.path,
                    type_name = field.field_type.name(),
                    decorator = binding.decorator_class.name(),
                    "decorating field value"
                );
                configuration
                    .apply_strategy(&binding.decorator_class, field.value, binding.metadata)
                    .map(Resolved::Decorated)
                    .map_err(DecorateError::from_user)
            }
            None => {
                tracing::trace!(
                    path = %field.path,
                    type_name = field.field_type.name(),
                    "no decorator for field value"
                );
                Ok(Resolved::Value(field.value))
            }
        }
    }

    /// Picks the decorator of `field.value` and computes its metadata.
    ///
    /// The scoped metadata of the value is recorded even when no decorator applies, so that
    /// descendant fields still inherit it.
    pub fn bind(field: &FieldExecutionContext<'_>) -> Result<Option<DecoratorBinding>, DecorateError> {
        let resolution = Resolution::new(field);
        let decorator_class = resolution.decorator_class()?;
        let scoped = resolution.scoped_metadata()?;

        let Some(decorator_class) = decorator_class else {
            return Ok(None);
        };
        let unscoped = resolution.unscoped_metadata()?;
        Ok(Some(DecoratorBinding {
            decorator_class,
            metadata: merged([default_metadata(), unscoped, scoped]),
        }))
    }
}

struct Resolution<'f, 'a> {
    field: &'f FieldExecutionContext<'a>,
    static_type: TypeAttributes,
    concrete_type: OnceCell<Option<TypeAttributes>>,
}

impl<'f, 'a> Resolution<'f, 'a> {
    fn new(field: &'f FieldExecutionContext<'a>) -> Self {
        Self {
            field,
            static_type: TypeAttributes::of(&field.field_type),
            concrete_type: OnceCell::new(),
        }
    }

    /// The runtime type of an interface or union value, resolved at most once.
    fn concrete_type(&self) -> Result<Option<&TypeAttributes>, DecorateError> {
        self.concrete_type
            .get_or_try_init(|| {
                let unresolved = self
                    .field
                    .options
                    .unresolved_type
                    .clone()
                    .or_else(|| self.static_type.unresolved_type());
                let Some(unresolved) = unresolved else {
                    return Ok(None);
                };
                let concrete = unresolved
                    .resolve_type(&self.field.value, self.field.context)
                    .map_err(DecorateError::from_user)?;
                tracing::trace!(
                    path = %self.field.path,
                    type_name = unresolved.name(),
                    concrete = concrete.name(),
                    "resolved concrete type"
                );
                Ok(Some(TypeAttributes::new(concrete)))
            })
            .map(Option::as_ref)
    }

    /// The type metadata providers are read from.
    fn effective_type(&self) -> Result<&TypeAttributes, DecorateError> {
        Ok(self.concrete_type()?.unwrap_or(&self.static_type))
    }

    fn decorator_class(&self) -> Result<Option<DecoratorClass>, DecorateError> {
        let options = self.field.options;
        if let Some(class) = &options.decorator_class {
            return Ok(Some(class.clone()));
        }
        if let Some(class) = self.evaluate(options.decorator_evaluator.as_ref())? {
            return Ok(Some(class));
        }
        if let Some(class) = self.from_type(&self.static_type)? {
            return Ok(Some(class));
        }
        match self.concrete_type()? {
            Some(concrete) => self.from_type(concrete),
            None => Ok(None),
        }
    }

    fn from_type(&self, ty: &TypeAttributes) -> Result<Option<DecoratorClass>, DecorateError> {
        if let Some(class) = ty.decorator_class() {
            return Ok(Some(class));
        }
        self.evaluate(ty.decorator_evaluator().as_ref())
    }

    fn evaluate(
        &self,
        evaluator: Option<&DecoratorEvaluator>,
    ) -> Result<Option<DecoratorClass>, DecorateError> {
        match evaluator {
            Some(evaluator) => evaluator(&self.field.value).map_err(DecorateError::from_user),
            None => Ok(None),
        }
    }

    fn unscoped_metadata(&self) -> Result<Object, DecorateError> {
        let provider = match &self.field.options.unscoped_metadata {
            Some(provider) => Some(provider.clone()),
            None => self.effective_type()?.metadata_unscoped(),
        };
        self.provide(provider.as_ref(), &self.field.value)
    }

    /// Records the metadata this value passes down and returns the scoped metadata visible here.
    fn scoped_metadata(&self) -> Result<Object, DecorateError> {
        let from_parent = match self.field.parent_type {
            Some(parent_type) => {
                let provider = TypeAttributes::of(parent_type).metadata_scoped();
                self.provide(
                    provider.as_ref(),
                    self.field.parent_value.unwrap_or(&Value::Null),
                )?
            }
            None => Object::new(),
        };
        let provider = match &self.field.options.scoped_metadata {
            Some(provider) => Some(provider.clone()),
            None => self.effective_type()?.metadata_scoped(),
        };
        let own = self.provide(provider.as_ref(), &self.field.value)?;

        Ok(self
            .field
            .context
            .record_scoped(&self.field.path, merged([from_parent, own])))
    }

    fn provide(
        &self,
        provider: Option<&MetadataProvider>,
        value: &Value,
    ) -> Result<Object, DecorateError> {
        evaluate(provider, value, self.field.context).map_err(DecorateError::from_user)
    }
}
