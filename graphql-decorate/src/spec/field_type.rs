use std::fmt;

use super::TypeRef;

/// The declared type of a field: a named type wrapped in lists and non null markers.
#[derive(Clone, Debug)]
pub enum FieldType {
    /// Named type {0}
    Named(TypeRef),
    /// List type {0}
    List(Box<FieldType>),
    /// Non null type {0}
    NonNull(Box<FieldType>),
}

impl FieldType {
    pub fn named(ty: TypeRef) -> Self {
        FieldType::Named(ty)
    }

    pub fn list(self) -> Self {
        FieldType::List(Box::new(self))
    }

    pub fn non_null(self) -> Self {
        FieldType::NonNull(Box::new(self))
    }

    /// The named type under any list and non null wrappers.
    pub fn inner_type(&self) -> &TypeRef {
        match self {
            FieldType::Named(ty) => ty,
            FieldType::List(ty) | FieldType::NonNull(ty) => ty.inner_type(),
        }
    }

    pub fn inner_type_name(&self) -> &str {
        self.inner_type().name()
    }

    pub fn is_list(&self) -> bool {
        match self {
            FieldType::Named(_) => false,
            FieldType::List(_) => true,
            FieldType::NonNull(ty) => ty.is_list(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Named(ty) => write!(f, "{}", ty.name()),
            FieldType::List(ty) => write!(f, "[{ty}]"),
            FieldType::NonNull(ty) => write!(f, "{ty}!"),
        }
    }
}
