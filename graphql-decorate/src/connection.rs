//! Connection decoration.
//!
//! A connection is paginated by the host after the field resolves, so its nodes cannot be
//! decorated up front. The [`ConnectionWrapper`] decorates them when they are read, using the
//! decoration of the connection's node type.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use derivative::Derivative;
use serde::Deserialize;
use serde::Serialize;
use tower::BoxError;

use crate::configuration::Configuration;
use crate::context::ExecutionContext;
use crate::decoration::Decoration;
use crate::decoration::FieldExecutionContext;
use crate::error::DecorateError;
use crate::field_extension::FieldOptions;
use crate::json_ext::Path;
use crate::json_ext::Value;
use crate::resolved::Resolved;
use crate::spec::TypeAttributes;
use crate::spec::TypeRef;

/// A paginated list of nodes.
pub trait Connection: Send + Sync + Debug + 'static {
    /// The nodes of the current page.
    fn nodes(&self) -> Result<Vec<Value>, BoxError>;

    /// The object the connection field was resolved on.
    fn parent(&self) -> Option<&Value> {
        None
    }

    /// The name of the connection field.
    fn field_name(&self) -> Option<&str> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Decorates the nodes of a connection when they are read.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ConnectionWrapper {
    connection: Arc<dyn Connection>,
    node_type: TypeRef,
    parent_value: Option<Value>,
    parent_type: Option<TypeRef>,
    options: FieldOptions,
    #[derivative(Debug = "ignore")]
    context: ExecutionContext,
    path: Path,
    #[derivative(Debug = "ignore")]
    configuration: Arc<Configuration>,
}

impl ConnectionWrapper {
    /// Wraps `connection`, resolved for a field of type `field_type` at `path`.
    ///
    /// `field_type` is either a connection type or the node type itself.
    #[allow(clippy::too_many_arguments)]
    pub fn wrap(
        connection: Arc<dyn Connection>,
        field_type: &TypeRef,
        parent_value: Option<Value>,
        parent_type: Option<TypeRef>,
        context: ExecutionContext,
        options: FieldOptions,
        path: Path,
        configuration: Arc<Configuration>,
    ) -> Self {
        Self {
            connection,
            node_type: TypeAttributes::of(field_type).target(),
            parent_value,
            parent_type,
            context,
            options,
            path,
            configuration,
        }
    }

    /// The decorated nodes, decorated at `<path>/nodes/<index>`.
    pub fn nodes(&self) -> Result<Vec<Resolved>, DecorateError> {
        self.decorate_nodes(|index| self.path.join("nodes").join(index))
    }

    /// The decorated nodes, decorated at `<path>/edges/<index>/node`.
    pub fn edge_nodes(&self) -> Result<Vec<Resolved>, DecorateError> {
        self.decorate_nodes(|index| self.path.join("edges").join(index).join("node"))
    }

    /// The wrapped connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub fn downcast_ref<T: Connection>(&self) -> Option<&T> {
        self.connection.as_any().downcast_ref::<T>()
    }

    pub fn node_type(&self) -> &TypeRef {
        &self.node_type
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decorate_nodes(&self, path_of: impl Fn(usize) -> Path) -> Result<Vec<Resolved>, DecorateError> {
        let nodes = self.connection.nodes().map_err(DecorateError::from_user)?;
        let parent_value = self
            .parent_value
            .as_ref()
            .or_else(|| self.connection.parent());
        tracing::trace!(path = %self.path, nodes = nodes.len(), "decorating connection nodes");

        nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| {
                if node.is_null() {
                    return Ok(Resolved::Value(Value::Null));
                }
                let field = FieldExecutionContext::new(
                    node,
                    self.node_type.clone(),
                    parent_value,
                    self.parent_type.as_ref(),
                    &self.context,
                    &self.options,
                    path_of(index),
                );
                Decoration::decorate(&self.configuration, field)
            })
            .collect()
    }
}

/// Pagination state of an [`ArrayConnection`] page.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Offset pagination over an in memory list.
///
/// Cursors are the base64 encoded offsets of the items.
#[derive(Clone, Debug, Default)]
pub struct ArrayConnection {
    items: Vec<Value>,
    first: Option<usize>,
    after: Option<String>,
    parent: Option<Value>,
    field_name: Option<String>,
}

impl ArrayConnection {
    const CURSOR_PREFIX: &'static str = "offset:";

    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Limits the page to `first` items.
    pub fn first(mut self, first: usize) -> Self {
        self.first = Some(first);
        self
    }

    /// Starts the page after the item at `cursor`.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn with_parent(mut self, parent: Value) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn encode_cursor(offset: usize) -> String {
        STANDARD.encode(format!("{}{offset}", Self::CURSOR_PREFIX))
    }

    pub fn decode_cursor(cursor: &str) -> Result<usize, BoxError> {
        let decoded = String::from_utf8(STANDARD.decode(cursor)?)?;
        let offset = decoded
            .strip_prefix(Self::CURSOR_PREFIX)
            .ok_or_else(|| format!("invalid cursor '{cursor}'"))?;
        Ok(offset.parse()?)
    }

    /// The offsets of the current page.
    fn range(&self) -> Result<std::ops::Range<usize>, BoxError> {
        let start = match &self.after {
            Some(cursor) => Self::decode_cursor(cursor)?.saturating_add(1),
            None => 0,
        }
        .min(self.items.len());
        let end = match self.first {
            Some(first) => start.saturating_add(first).min(self.items.len()),
            None => self.items.len(),
        };
        Ok(start..end)
    }

    /// The cursors and nodes of the current page.
    pub fn edges(&self) -> Result<Vec<(String, Value)>, BoxError> {
        let range = self.range()?;
        Ok(self.items[range.clone()]
            .iter()
            .zip(range)
            .map(|(item, offset)| (Self::encode_cursor(offset), item.clone()))
            .collect())
    }

    pub fn page_info(&self) -> Result<PageInfo, BoxError> {
        let range = self.range()?;
        let (start_cursor, end_cursor) = if range.is_empty() {
            (None, None)
        } else {
            (
                Some(Self::encode_cursor(range.start)),
                Some(Self::encode_cursor(range.end - 1)),
            )
        };
        Ok(PageInfo {
            has_next_page: range.end < self.items.len(),
            has_previous_page: range.start > 0,
            start_cursor,
            end_cursor,
        })
    }
}

impl Connection for ArrayConnection {
    fn nodes(&self) -> Result<Vec<Value>, BoxError> {
        let range = self.range()?;
        Ok(self.items[range].to_vec())
    }

    fn parent(&self) -> Option<&Value> {
        self.parent.as_ref()
    }

    fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
