//! Decorators and decorated values.

use std::any::Any;
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use tower::BoxError;

use crate::json_ext::Object;
use crate::json_ext::Value;

/// A presentation wrapper for resolved values.
///
/// The decorator itself is stateless: [`Decorator::construct`] builds the decorated value from the
/// resolved value and its metadata, and [`Decorator::field`] provides the presentation accessors
/// of the stock [`DecoratedObject`].
pub trait Decorator: Send + Sync + 'static {
    /// Name used in logs and for equality between [`DecoratorClass`] handles.
    fn name(&self) -> &str;

    /// Presentation accessor for `name`.
    ///
    /// Returning `None` lets the decorated value fall back to the field of the wrapped object.
    fn field(&self, _decorated: &DecoratedObject, _name: &str) -> Option<Value> {
        None
    }

    /// Builds the decorated value.
    fn construct(
        &self,
        class: &DecoratorClass,
        object: Value,
        metadata: Object,
    ) -> Result<Arc<dyn Decorated>, BoxError> {
        Ok(Arc::new(DecoratedObject::new(class.clone(), object, metadata)))
    }
}

/// A cheaply clonable handle to a [`Decorator`].
#[derive(Clone)]
pub struct DecoratorClass(Arc<dyn Decorator>);

impl DecoratorClass {
    pub fn new(decorator: impl Decorator) -> Self {
        DecoratorClass(Arc::new(decorator))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn decorator(&self) -> &dyn Decorator {
        self.0.as_ref()
    }

    /// Constructs the decorator around `object`.
    pub fn decorate(&self, object: Value, metadata: Object) -> Result<Arc<dyn Decorated>, BoxError> {
        self.0.construct(self, object, metadata)
    }
}

impl PartialEq for DecoratorClass {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.name() == other.name()
    }
}

impl Eq for DecoratorClass {}

impl Debug for DecoratorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DecoratorClass").field(&self.name()).finish()
    }
}

/// Picks a decorator for a value; `None` means this evaluator has no decorator for it.
pub type DecoratorEvaluator =
    Arc<dyn Fn(&Value) -> Result<Option<DecoratorClass>, BoxError> + Send + Sync>;

/// Produces the decorated value from a decorator class, the resolved value and its metadata.
pub type DecorationStrategy =
    Arc<dyn Fn(&DecoratorClass, Value, Object) -> Result<Arc<dyn Decorated>, BoxError> + Send + Sync>;

/// A decorated value, as handed back to the host engine.
pub trait Decorated: Send + Sync + Debug + 'static {
    /// The decorator that built this value.
    fn decorator_class(&self) -> &DecoratorClass;

    /// The wrapped resolved value.
    fn object(&self) -> &Value;

    /// The metadata the decorator was constructed with.
    fn metadata(&self) -> &Object;

    /// Resolves a field on the decorated value.
    ///
    /// Fields the decorator does not present are delegated to the wrapped object.
    fn field(&self, name: &str) -> Option<Value> {
        object_field(self.object(), name)
    }

    fn as_any(&self) -> &dyn Any;
}

impl dyn Decorated {
    pub fn downcast_ref<T: Decorated>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

fn object_field(object: &Value, name: &str) -> Option<Value> {
    object.as_object().and_then(|object| object.get(name)).cloned()
}

/// The decorated value built by default: the decorator, the object and its metadata.
#[derive(Clone, Debug)]
pub struct DecoratedObject {
    class: DecoratorClass,
    object: Value,
    metadata: Object,
}

impl DecoratedObject {
    pub fn new(class: DecoratorClass, object: Value, metadata: Object) -> Self {
        Self {
            class,
            object,
            metadata,
        }
    }

    /// Reads a metadata key.
    pub fn context(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

impl Decorated for DecoratedObject {
    fn decorator_class(&self) -> &DecoratorClass {
        &self.class
    }

    fn object(&self) -> &Value {
        &self.object
    }

    fn metadata(&self) -> &Object {
        &self.metadata
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.class
            .decorator()
            .field(self, name)
            .or_else(|| object_field(&self.object, name))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
