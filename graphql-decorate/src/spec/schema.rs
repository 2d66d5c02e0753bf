//! Reference type descriptors.
//!
//! Hosts that already own a schema representation implement [`TypeDescriptor`] themselves. The
//! descriptors here are enough to declare a schema by hand:
//!
//! ```ignore
//! let post: TypeRef = Arc::new(
//!     ObjectType::new("Post")
//!         .decorate_with(DecoratorClass::new(PostDecorator))
//!         .decorate_metadata(DecorationMetadata::new().scoped(|post, _| Ok(owner_of(post)))),
//! );
//! let blog = ObjectType::new("Blog")
//!     .field(FieldDefinition::new("posts", FieldType::named(post).list()));
//! ```

use std::sync::Arc;

use derivative::Derivative;
use tower::BoxError;

use super::DecorationAttributes;
use super::FieldType;
use super::TypeAttributes;
use super::TypeDescriptor;
use super::TypeKind;
use super::TypeRef;
use crate::configuration::Configuration;
use crate::context::ExecutionContext;
use crate::decorator::DecoratorClass;
use crate::field_extension::FieldExtension;
use crate::field_extension::FieldOptions;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::metadata::fmt_provider;
use crate::metadata::DecorationMetadata;

/// Resolves the concrete type of an interface or union value.
pub type TypeResolver =
    Arc<dyn Fn(&Value, &ExecutionContext) -> Result<TypeRef, BoxError> + Send + Sync>;

/// A scalar or enum type. Never decorated.
#[derive(Clone, Debug)]
pub struct ScalarType {
    name: String,
    kind: TypeKind,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Scalar,
        }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum,
        }
    }
}

impl TypeDescriptor for ScalarType {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TypeKind {
        self.kind
    }
}

/// An object type with its fields and optional decoration.
#[derive(Clone, Debug)]
pub struct ObjectType {
    name: String,
    decoration: Option<DecorationAttributes>,
    fields: Vec<FieldDefinition>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decoration: None,
            fields: Vec::new(),
        }
    }

    /// Decorates values of this type with `class`.
    pub fn decorate_with(mut self, class: DecoratorClass) -> Self {
        self.decoration_mut().set_decorator_class(class);
        self
    }

    /// Picks the decorator of each value of this type at runtime.
    pub fn decorate_with_evaluator<F>(mut self, evaluator: F) -> Self
    where
        F: Fn(&Value) -> Result<Option<DecoratorClass>, BoxError> + Send + Sync + 'static,
    {
        self.decoration_mut()
            .set_decorator_evaluator(Arc::new(evaluator));
        self
    }

    /// Sets the metadata providers of this type.
    pub fn decorate_metadata(mut self, metadata: DecorationMetadata) -> Self {
        self.decoration_mut().set_metadata(metadata);
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field_definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn decoration_mut(&mut self) -> &mut DecorationAttributes {
        self.decoration.get_or_insert_with(Default::default)
    }
}

impl TypeDescriptor for ObjectType {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TypeKind {
        TypeKind::Object
    }

    fn decoration(&self) -> Option<&DecorationAttributes> {
        self.decoration.as_ref()
    }
}

/// An interface or union type.
///
/// Without a resolver the type is malformed: decorating one of its values fails with
/// [`DecorateError::MissingTypeResolver`](crate::DecorateError::MissingTypeResolver).
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct PolymorphicType {
    name: String,
    kind: TypeKind,
    #[derivative(Debug(format_with = "fmt_provider"))]
    resolver: Option<TypeResolver>,
}

impl PolymorphicType {
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            resolver: None,
        }
    }

    pub fn union(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Union,
            resolver: None,
        }
    }

    pub fn resolve_type_with<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&Value, &ExecutionContext) -> Result<TypeRef, BoxError> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }
}

impl TypeDescriptor for PolymorphicType {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TypeKind {
        self.kind
    }

    fn resolve_type(&self, value: &Value, context: &ExecutionContext) -> Result<TypeRef, BoxError> {
        match &self.resolver {
            Some(resolver) => resolver(value, context),
            None => Err(crate::error::DecorateError::MissingTypeResolver {
                type_name: self.name.clone(),
            }
            .into()),
        }
    }
}

/// A connection over `node_type`, named `{Node}Connection`.
#[derive(Clone, Debug)]
pub struct ConnectionType {
    name: String,
    node_type: TypeRef,
}

impl ConnectionType {
    pub fn of(node_type: TypeRef) -> Self {
        Self {
            name: format!("{}Connection", node_type.name()),
            node_type,
        }
    }
}

impl TypeDescriptor for ConnectionType {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TypeKind {
        TypeKind::Connection
    }

    fn node_type(&self) -> Option<TypeRef> {
        Some(self.node_type.clone())
    }
}

/// A field of an object type.
///
/// A [`FieldExtension`] is installed when the field's named type is decoratable, or when the
/// field itself overrides the decorator.
#[derive(Clone, Debug)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
    options: FieldOptions,
    configuration: Option<Arc<Configuration>>,
    extension: Option<FieldExtension>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            options: FieldOptions::default(),
            configuration: None,
            extension: None,
        }
        .install()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn extension(&self) -> Option<&FieldExtension> {
        self.extension.as_ref()
    }

    pub fn decorator_class(mut self, class: DecoratorClass) -> Self {
        self.options = self.options.decorator_class(class);
        self.install()
    }

    pub fn decorator_evaluator<F>(mut self, evaluator: F) -> Self
    where
        F: Fn(&Value) -> Result<Option<DecoratorClass>, BoxError> + Send + Sync + 'static,
    {
        self.options = self.options.decorator_evaluator(evaluator);
        self.install()
    }

    pub fn unscoped_metadata<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Value, &ExecutionContext) -> Result<Object, BoxError> + Send + Sync + 'static,
    {
        self.options = self.options.unscoped_metadata(provider);
        self.install()
    }

    pub fn scoped_metadata<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Value, &ExecutionContext) -> Result<Object, BoxError> + Send + Sync + 'static,
    {
        self.options = self.options.scoped_metadata(provider);
        self.install()
    }

    pub fn unresolved_type(mut self, ty: TypeRef) -> Self {
        self.options = self.options.unresolved_type(ty);
        self.install()
    }

    /// Decorates this field with `configuration` instead of the process wide one.
    pub fn configuration(mut self, configuration: Arc<Configuration>) -> Self {
        self.configuration = Some(configuration);
        self.install()
    }

    fn install(mut self) -> Self {
        let decoratable = TypeAttributes::of(self.field_type.inner_type()).decoratable()
            || self.options.overrides_decorator();
        self.extension = decoratable.then(|| {
            let extension = FieldExtension::new(self.field_type.clone(), self.options.clone());
            match &self.configuration {
                Some(configuration) => extension.with_configuration(configuration.clone()),
                None => extension,
            }
        });
        self
    }
}
