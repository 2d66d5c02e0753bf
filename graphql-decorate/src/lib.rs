//! Decorates resolved GraphQL field values with presentation objects.
//!
//! A field's value is handed to a [`FieldExtension`] once the host engine has resolved it. The
//! extension picks a decorator from the field options or from the field's schema type (resolving
//! interfaces and unions at runtime), computes the decorator metadata and propagates scoped
//! metadata down to every descendant field of the value.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![warn(unreachable_pub)]

pub mod collection;
mod configuration;
pub mod connection;
mod context;
mod decoration;
pub mod decorator;
pub mod error;
mod field_extension;
pub mod json_ext;
pub mod metadata;
mod resolved;
pub mod scoped;
pub mod spec;
#[cfg(test)]
pub(crate) mod test_utils;

pub use configuration::configuration;
pub use configuration::configure;
pub use configuration::reset_configuration;
pub use configuration::Configuration;
pub use configuration::DecorateConfig;
pub use configuration::ScopeTracking;
pub use context::ExecutionContext;
pub use decoration::Decoration;
pub use decoration::DecoratorBinding;
pub use decoration::FieldExecutionContext;
pub use decorator::Decorated;
pub use decorator::DecoratedObject;
pub use decorator::Decorator;
pub use decorator::DecoratorClass;
pub use error::DecorateError;
pub use field_extension::FieldExtension;
pub use field_extension::FieldOptions;
pub use field_extension::FieldValue;
pub use json_ext::Object;
pub use json_ext::Path;
pub use json_ext::PathElement;
pub use json_ext::Value;
pub use resolved::Resolved;
