//! Schema types as seen by the decoration engine.
//!
//! The engine never parses schemas: hosts describe their types through [`TypeDescriptor`]. The
//! [`schema`] module provides ready made descriptors with a builder style decoration DSL.

use std::fmt::Debug;
use std::sync::Arc;

use tower::BoxError;

use crate::context::ExecutionContext;
use crate::decorator::DecoratorClass;
use crate::decorator::DecoratorEvaluator;
use crate::error::DecorateError;
use crate::json_ext::Value;
use crate::metadata::DecorationMetadata;

mod field_type;
pub mod schema;
mod type_attributes;

pub use field_type::FieldType;
pub use type_attributes::TypeAttributes;

/// A shared schema type.
pub type TypeRef = Arc<dyn TypeDescriptor>;

/// GraphQL type kinds relevant to decoration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    Union,
    /// A paginated list of nodes.
    Connection,
}

impl TypeKind {
    /// Interfaces and unions need a concrete type at runtime.
    pub fn is_polymorphic(&self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Union)
    }
}

/// A named schema type.
pub trait TypeDescriptor: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> TypeKind;

    /// The decoration declared on this type, if any.
    fn decoration(&self) -> Option<&DecorationAttributes> {
        None
    }

    /// The node type of a connection.
    fn node_type(&self) -> Option<TypeRef> {
        None
    }

    /// Resolves the concrete type of a polymorphic value.
    fn resolve_type(
        &self,
        _value: &Value,
        _context: &ExecutionContext,
    ) -> Result<TypeRef, BoxError> {
        Err(DecorateError::MissingTypeResolver {
            type_name: self.name().to_string(),
        }
        .into())
    }
}

/// Decoration declared on a type: a decorator class or an evaluator, and metadata providers.
#[derive(Clone, Default, derivative::Derivative)]
#[derivative(Debug)]
pub struct DecorationAttributes {
    decorator_class: Option<DecoratorClass>,
    #[derivative(Debug(format_with = "crate::metadata::fmt_provider"))]
    decorator_evaluator: Option<DecoratorEvaluator>,
    metadata: DecorationMetadata,
}

impl DecorationAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decorator_class(&self) -> Option<&DecoratorClass> {
        self.decorator_class.as_ref()
    }

    pub fn decorator_evaluator(&self) -> Option<&DecoratorEvaluator> {
        self.decorator_evaluator.as_ref()
    }

    pub fn metadata(&self) -> &DecorationMetadata {
        &self.metadata
    }

    pub(crate) fn set_decorator_class(&mut self, class: DecoratorClass) {
        self.decorator_class = Some(class);
    }

    pub(crate) fn set_decorator_evaluator(&mut self, evaluator: DecoratorEvaluator) {
        self.decorator_evaluator = Some(evaluator);
    }

    pub(crate) fn set_metadata(&mut self, metadata: DecorationMetadata) {
        self.metadata = metadata;
    }
}
