//! Node identity and payload types for the arena-backed document tree.

use std::fmt;

/// Handle to a node inside a [`Document`](crate::Document).
///
/// Handles are small and `Copy`; they stay valid until the node is freed.
/// Every access checks the slot's generation stamp, so a handle to a freed
/// (or recycled) node reports [`ArborError::Stale`](crate::ArborError::Stale)
/// instead of silently reading another node's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Variant tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    /// Pre-serialized JSON text, emitted verbatim by the printer.
    Raw,
    Array,
    Object,
    /// Borrowing wrapper around another node; deleting it never touches the
    /// referent.
    Ref,
}

/// A string payload with an explicit ownership mode.
///
/// `Static` is the borrowed mode: the document stores the pointer and never
/// copies or frees the text. Borrowed text is restricted to `'static` so the
/// referent outlives every wrapper by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Owned(String),
    Static(&'static str),
}

impl Text {
    pub fn as_str(&self) -> &str {
        match self {
            Text::Owned(s) => s,
            Text::Static(s) => s,
        }
    }

    /// True when the payload is borrowed rather than owned by the document.
    pub fn is_static(&self) -> bool {
        matches!(self, Text::Static(_))
    }

    pub(crate) fn to_owned_text(&self) -> Text {
        Text::Owned(self.as_str().to_string())
    }
}

/// Payload of a node. Containers hold child handles in insertion order.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Null,
    Bool(bool),
    Number {
        value: f64,
        /// Exact integer view, present when the literal round-trips as `i64`.
        int: Option<i64>,
    },
    Str(Text),
    Raw(Text),
    Array(Vec<NodeId>),
    Object(Vec<NodeId>),
    Ref(NodeId),
}

impl Payload {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            Payload::Null => Kind::Null,
            Payload::Bool(_) => Kind::Bool,
            Payload::Number { .. } => Kind::Number,
            Payload::Str(_) => Kind::String,
            Payload::Raw(_) => Kind::Raw,
            Payload::Array(_) => Kind::Array,
            Payload::Object(_) => Kind::Object,
            Payload::Ref(_) => Kind::Ref,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    /// Member name; set while the node is a child of an object.
    pub(crate) key: Option<Text>,
    pub(crate) payload: Payload,
}

impl Node {
    pub(crate) fn detached(payload: Payload) -> Self {
        Node {
            parent: None,
            key: None,
            payload,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node>,
}
