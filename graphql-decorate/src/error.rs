//! Decoration errors.
use displaydoc::Display;
use thiserror::Error;
use tower::BoxError;

/// Error types for decoration.
///
/// A field without a resolvable decorator is not an error: its value passes through undecorated.
#[derive(Error, Display, Debug)]
#[ignore_extra_doc_attributes]
#[non_exhaustive]
pub enum DecorateError {
    /// {0}
    ///
    /// Raised by a user supplied evaluator, metadata provider, decoration strategy, connection or
    /// type resolver and passed through untouched.
    Evaluation(#[source] BoxError),

    /// type '{type_name}' is polymorphic but cannot resolve a concrete type
    MissingTypeResolver {
        /// The interface or union type.
        type_name: String,
    },

    /// invalid execution context entry: {0}
    Context(#[source] BoxError),
}

impl DecorateError {
    /// Wraps an error raised by user code, keeping decoration errors as they are.
    pub(crate) fn from_user(error: BoxError) -> Self {
        match error.downcast::<DecorateError>() {
            Ok(error) => *error,
            Err(error) => DecorateError::Evaluation(error),
        }
    }

    /// The error raised by user code, if that is what this is.
    pub fn user_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            DecorateError::Evaluation(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}
