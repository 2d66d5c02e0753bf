//! Scoped metadata propagation.
//!
//! Scoped metadata contributed while decorating a value is visible to every field resolved below
//! that value. A store records the metadata contributed at each execution path and answers which
//! metadata a path inherits from its nearest ancestor.

use std::fmt::Debug;

use crate::json_ext::Object;
use crate::json_ext::Path;

mod flat;
mod tree;

pub use flat::FlatScopedStore;
pub use tree::PathScopedStore;

/// Records scoped metadata for one query execution.
///
/// Implementations must accept concurrent calls for sibling paths.
pub trait ScopedMetadataStore: Send + Sync + Debug {
    /// Records `contributed` at `path` on top of the metadata inherited there and returns the
    /// resulting metadata visible at `path`. Keys of `contributed` win.
    fn record(&self, path: &Path, contributed: Object) -> Object;

    /// Returns the metadata visible at `path`: the value recorded by its nearest recorded
    /// ancestor (or `path` itself).
    fn inherited(&self, path: &Path) -> Object;
}
