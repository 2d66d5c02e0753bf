use super::DecorationAttributes;
use super::TypeKind;
use super::TypeRef;
use crate::decorator::DecoratorClass;
use crate::decorator::DecoratorEvaluator;
use crate::metadata::MetadataProvider;

/// Read only view of the decoration capabilities of a type.
///
/// Connection types are looked through: every capability is read on their node type.
#[derive(Clone, Debug)]
pub struct TypeAttributes {
    ty: TypeRef,
}

impl TypeAttributes {
    pub fn new(ty: TypeRef) -> Self {
        Self { ty }
    }

    pub fn of(ty: &TypeRef) -> Self {
        Self::new(ty.clone())
    }

    /// The inspected type itself.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The type capabilities are read from: the node type of a connection, else the type itself.
    pub fn target(&self) -> TypeRef {
        if self.is_connection() {
            if let Some(node_type) = self.ty.node_type() {
                return node_type;
            }
        }
        self.ty.clone()
    }

    pub fn is_connection(&self) -> bool {
        self.ty.kind() == TypeKind::Connection
    }

    pub fn node_type(&self) -> Option<TypeRef> {
        if self.is_connection() {
            self.ty.node_type()
        } else {
            None
        }
    }

    pub fn decoratable(&self) -> bool {
        self.decorator_class().is_some()
            || self.decorator_evaluator().is_some()
            || self.is_unresolved()
    }

    pub fn decorator_class(&self) -> Option<DecoratorClass> {
        self.with_decoration(|decoration| decoration.decorator_class().cloned())
    }

    pub fn decorator_evaluator(&self) -> Option<DecoratorEvaluator> {
        self.with_decoration(|decoration| decoration.decorator_evaluator().cloned())
    }

    pub fn metadata_unscoped(&self) -> Option<MetadataProvider> {
        self.with_decoration(|decoration| decoration.metadata().unscoped_provider().cloned())
    }

    pub fn metadata_scoped(&self) -> Option<MetadataProvider> {
        self.with_decoration(|decoration| decoration.metadata().scoped_provider().cloned())
    }

    /// Interfaces and unions must be resolved to a concrete type before they can be decorated.
    pub fn is_unresolved(&self) -> bool {
        self.target().kind().is_polymorphic()
    }

    pub fn unresolved_type(&self) -> Option<TypeRef> {
        let target = self.target();
        target.kind().is_polymorphic().then_some(target)
    }

    fn with_decoration<T>(&self, f: impl FnOnce(&DecorationAttributes) -> Option<T>) -> Option<T> {
        let target = self.target();
        target.decoration().and_then(f)
    }
}
