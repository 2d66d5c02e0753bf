use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use super::ScopedMetadataStore;
use crate::json_ext::merge_into;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::PathElement;

/// A node's value is always its nearest ancestor's value merged with the metadata contributed by
/// the field at this path.
#[derive(Debug, Default)]
struct ScopedMetadataNode {
    value: RwLock<Object>,
    children: DashMap<PathElement, Arc<ScopedMetadataNode>>,
}

impl ScopedMetadataNode {
    fn new(value: Object) -> Self {
        Self {
            value: RwLock::new(value),
            children: Default::default(),
        }
    }

    fn value(&self) -> Object {
        (*self.value.read()).clone()
    }
}

/// Path indexed scoped metadata.
///
/// Sibling list elements get their own subtrees, so metadata contributed while resolving one
/// element is never visible to its siblings.
#[derive(Debug, Default)]
pub struct PathScopedStore {
    root: Arc<ScopedMetadataNode>,
}

impl PathScopedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScopedMetadataStore for PathScopedStore {
    fn record(&self, path: &Path, contributed: Object) -> Object {
        let Some((last, ancestors)) = path.0.split_last() else {
            let mut value = self.root.value.write();
            merge_into(&mut value, contributed);
            return (*value).clone();
        };

        let mut node = self.root.clone();
        let mut inherited = node.value();
        for element in ancestors {
            // ancestors that never recorded anything are filled in with what they inherit, so
            // that deeper fields still see the metadata of the last recording ancestor
            let child = node
                .children
                .entry(element.clone())
                .or_insert_with(|| Arc::new(ScopedMetadataNode::new(inherited.clone())))
                .value()
                .clone();
            inherited = child.value();
            node = child;
        }

        // a path recorded twice keeps its earlier keys and its subtree
        let target = node
            .children
            .entry(last.clone())
            .or_insert_with(|| Arc::new(ScopedMetadataNode::new(inherited)))
            .value()
            .clone();
        let merged = {
            let mut value = target.value.write();
            merge_into(&mut value, contributed);
            (*value).clone()
        };
        tracing::trace!(path = %path, keys = merged.len(), "recorded scoped metadata");
        merged
    }

    fn inherited(&self, path: &Path) -> Object {
        let mut node = self.root.clone();
        for element in path.iter() {
            let child = match node.children.get(element) {
                Some(child) => child.value().clone(),
                None => break,
            };
            node = child;
        }
        node.value()
    }
}
