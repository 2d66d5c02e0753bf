//! Collection decoration.
//!
//! A value is a collection when it is a JSON array, when one of the configured
//! [`CollectionType`]s recognizes it, or (with the `relation` feature) when it is a serialized
//! relation. Each element is decorated on its own, at its index under the field path.

use std::fmt::Debug;

use crate::configuration::Configuration;
use crate::decoration::Decoration;
use crate::decoration::FieldExecutionContext;
use crate::error::DecorateError;
use crate::json_ext::Value;
use crate::resolved::Resolved;

/// Recognizes values that hold a collection of elements.
pub trait CollectionType: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// The elements of `value`, in order, or `None` if `value` is not of this collection type.
    fn elements(&self, value: &Value) -> Option<Vec<Value>>;
}

/// A serialized ORM relation: `{"__relation": <name>, "records": [..]}`.
#[cfg(feature = "relation")]
#[derive(Clone, Copy, Debug, Default)]
pub struct RelationCollection;

#[cfg(feature = "relation")]
impl RelationCollection {
    const RELATION_KEY: &'static str = "__relation";
    const RECORDS_KEY: &'static str = "records";
}

#[cfg(feature = "relation")]
impl CollectionType for RelationCollection {
    fn name(&self) -> &str {
        "relation"
    }

    fn elements(&self, value: &Value) -> Option<Vec<Value>> {
        let relation = value.as_object()?;
        if !relation.contains_key(Self::RELATION_KEY) {
            return None;
        }
        relation
            .get(Self::RECORDS_KEY)
            .and_then(Value::as_array)
            .cloned()
    }
}

impl Configuration {
    /// The elements of `value` if it is a collection. The first matching collection type wins.
    pub fn collection_elements(&self, value: &Value) -> Option<Vec<Value>> {
        if let Value::Array(elements) = value {
            return Some(elements.clone());
        }
        self.collection_types()
            .iter()
            .find_map(|collection_type| collection_type.elements(value))
            .or_else(|| relation_elements(value))
    }
}

#[cfg(feature = "relation")]
fn relation_elements(value: &Value) -> Option<Vec<Value>> {
    RelationCollection.elements(value)
}

#[cfg(not(feature = "relation"))]
fn relation_elements(_value: &Value) -> Option<Vec<Value>> {
    None
}

/// Decorates a field value, element by element if it is a collection.
pub(crate) fn decorate_value(
    configuration: &Configuration,
    field: FieldExecutionContext<'_>,
) -> Result<Resolved, DecorateError> {
    if field.value.is_null() {
        return Ok(Resolved::Value(Value::Null));
    }
    match configuration.collection_elements(&field.value) {
        Some(elements) => {
            tracing::trace!(path = %field.path, elements = elements.len(), "decorating collection");
            elements
                .into_iter()
                .enumerate()
                .map(|(index, element)| {
                    let path = field.path.join(index);
                    decorate_value(configuration, field.with_value(element, path))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Resolved::List)
        }
        None => Decoration::decorate(configuration, field),
    }
}
