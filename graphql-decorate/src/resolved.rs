use std::sync::Arc;

use crate::connection::ConnectionWrapper;
use crate::decorator::Decorated;
use crate::json_ext::Value;

/// A field value after decoration.
#[derive(Clone, Debug)]
pub enum Resolved {
    /// The value, unchanged: no decorator applies to it.
    Value(Value),

    /// The value wrapped by its decorator.
    Decorated(Arc<dyn Decorated>),

    /// A collection, element by element.
    List(Vec<Resolved>),

    /// A connection whose nodes are decorated when read.
    Connection(Arc<ConnectionWrapper>),
}

impl Resolved {
    pub fn is_decorated(&self) -> bool {
        matches!(self, Resolved::Decorated(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_decorated(&self) -> Option<&dyn Decorated> {
        match self {
            Resolved::Decorated(decorated) => Some(decorated.as_ref()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Resolved]> {
        match self {
            Resolved::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_connection(&self) -> Option<&ConnectionWrapper> {
        match self {
            Resolved::Connection(connection) => Some(connection),
            _ => None,
        }
    }

    /// The resolved value under its decorator, if any.
    pub fn object(&self) -> Option<&Value> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Decorated(decorated) => Some(decorated.object()),
            Resolved::List(_) | Resolved::Connection(_) => None,
        }
    }

    /// Resolves a child field: through the decorator when decorated, on the object otherwise.
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Resolved::Value(value) => value.as_object().and_then(|o| o.get(name)).cloned(),
            Resolved::Decorated(decorated) => decorated.field(name),
            Resolved::List(_) | Resolved::Connection(_) => None,
        }
    }
}
