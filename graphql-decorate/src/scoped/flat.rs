use parking_lot::RwLock;

use super::ScopedMetadataStore;
use crate::json_ext::merge_into;
use crate::json_ext::Object;
use crate::json_ext::Path;

/// A single scoped metadata value per query, overwritten on every recording.
///
/// Paths are ignored: siblings in a list see (and clobber) each other's metadata. Prefer
/// [`PathScopedStore`](super::PathScopedStore) unless the host cannot provide execution paths.
#[derive(Debug, Default)]
pub struct FlatScopedStore {
    current: RwLock<Object>,
}

impl FlatScopedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScopedMetadataStore for FlatScopedStore {
    fn record(&self, _path: &Path, contributed: Object) -> Object {
        let mut current = self.current.write();
        merge_into(&mut current, contributed);
        (*current).clone()
    }

    fn inherited(&self, _path: &Path) -> Object {
        (*self.current.read()).clone()
    }
}
