//! JSON values and execution paths.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
pub use serde_json_bytes::ByteString;
pub use serde_json_bytes::Value;

/// A JSON object.
pub type Object = serde_json_bytes::Map<ByteString, Value>;

/// One step of an execution path: a response key or a list index.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// A list index.
    Index(usize),

    /// A field response key.
    Key(String),
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Index(index) => write!(f, "{index}"),
            PathElement::Key(key) => write!(f, "{key}"),
        }
    }
}

impl From<usize> for PathElement {
    fn from(index: usize) -> Self {
        PathElement::Index(index)
    }
}

impl From<&str> for PathElement {
    fn from(key: &str) -> Self {
        PathElement::Key(key.to_string())
    }
}

impl From<String> for PathElement {
    fn from(key: String) -> Self {
        PathElement::Key(key)
    }
}

/// The sequence of field and index steps from the query root to a resolving field.
///
/// e.g `/blog/posts/0/comments`
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(pub Vec<PathElement>);

impl Path {
    pub fn empty() -> Path {
        Path(Default::default())
    }

    pub fn from_slice<T: Into<PathElement> + Clone>(elements: &[T]) -> Self {
        elements.iter().cloned().map(Into::into).collect()
    }

    /// Returns a new path with `element` appended.
    pub fn join(&self, element: impl Into<PathElement>) -> Path {
        let mut path = self.clone();
        path.push(element);
        path
    }

    pub fn push(&mut self, element: impl Into<PathElement>) {
        self.0.push(element.into())
    }

    pub fn parent(&self) -> Option<Path> {
        self.0
            .split_last()
            .map(|(_, parent)| Path(parent.to_vec()))
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in self.iter() {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}

/// Shallow merge: every key of `other` overwrites the same key in `base`.
pub(crate) fn merge_into(base: &mut Object, other: Object) {
    for (key, value) in other {
        base.insert(key, value);
    }
}

/// Merges `layers` left to right into a new object, later layers winning.
pub(crate) fn merged<I: IntoIterator<Item = Object>>(layers: I) -> Object {
    let mut result = Object::new();
    for layer in layers {
        merge_into(&mut result, layer);
    }
    result
}
