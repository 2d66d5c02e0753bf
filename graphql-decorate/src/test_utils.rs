use std::sync::Arc;

use crate::decorator::Decorated;
use crate::decorator::DecoratedObject;
use crate::decorator::Decorator;
use crate::decorator::DecoratorClass;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::spec::schema::ObjectType;
use crate::spec::TypeRef;

pub(crate) fn object(value: Value) -> Object {
    value.as_object().cloned().unwrap_or_default()
}

/// A decorator that presents nothing of its own.
pub(crate) struct NamedDecorator(pub(crate) &'static str);

impl Decorator for NamedDecorator {
    fn name(&self) -> &str {
        self.0
    }
}

/// Presents `name` from the first and last names of a post, and every metadata key.
pub(crate) struct PostDecorator;

impl Decorator for PostDecorator {
    fn name(&self) -> &str {
        "PostDecorator"
    }

    fn field(&self, decorated: &DecoratedObject, name: &str) -> Option<Value> {
        match name {
            "name" => {
                let post = decorated.object().as_object()?;
                let first_name = post.get("first_name")?.as_str()?;
                let last_name = post.get("last_name")?.as_str()?;
                Some(Value::from(format!("{first_name} {last_name}")))
            }
            _ => decorated.context(name).cloned(),
        }
    }
}

pub(crate) fn post_decorator() -> DecoratorClass {
    DecoratorClass::new(PostDecorator)
}

pub(crate) fn post_type() -> TypeRef {
    Arc::new(ObjectType::new("Post").decorate_with(post_decorator()))
}
