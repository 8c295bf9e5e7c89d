//! The document arena: node storage, factory constructors, and accessors.
//!
//! All nodes of a tree (and any number of detached trees) live in one
//! [`Document`]. Parent/child relationships are [`NodeId`] handles into the
//! arena, so back-references are plain indices rather than owning pointers,
//! and dropping the document releases everything at once. Individually freed
//! slots go on a free list and bump a generation stamp, which is how stale
//! handles are caught.
//!
//! # Ownership rules
//!
//! - A node has at most one parent; attaching an attached node fails.
//! - Freeing a node frees everything it owns, depth-first.
//! - `Ref` wrapper nodes and `Static` text are borrowed: freeing the wrapper
//!   never touches the referent, and freeing a node never frees static text.

use crate::codec;
use crate::error::{ArborError, Result};
use crate::node::{Kind, Node, NodeId, Payload, Slot, Text};

/// Arena holding every node of one or more JSON trees.
#[derive(Debug, Default)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    node_limit: Option<usize>,
}

impl Document {
    /// An empty document with no node budget.
    pub fn new() -> Self {
        Document {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            node_limit: None,
        }
    }

    /// An empty document that refuses to hold more than `limit` live nodes.
    ///
    /// Exceeding the budget fails the allocating operation with
    /// [`ArborError::Capacity`]; the tree built so far stays valid.
    pub fn with_node_limit(limit: usize) -> Self {
        Document {
            node_limit: Some(limit),
            ..Document::new()
        }
    }

    /// Number of live nodes across all trees in this document.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    // ------------------------------------------------------------------
    // Arena internals
    // ------------------------------------------------------------------

    pub(crate) fn alloc_node(&mut self, node: Node) -> Result<NodeId> {
        if let Some(limit) = self.node_limit {
            if self.live >= limit {
                return Err(ArborError::Capacity { limit });
            }
        }
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            Ok(NodeId {
                index,
                generation: slot.generation,
            })
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            Ok(NodeId {
                index,
                generation: 0,
            })
        }
    }

    pub(crate) fn alloc_detached(&mut self, payload: Payload) -> Result<NodeId> {
        self.alloc_node(Node::detached(payload))
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(ArborError::Stale)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(ArborError::Stale)
    }

    /// Free one slot, recycling it under a new generation.
    fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.node.is_some() {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                self.live -= 1;
            }
        }
    }

    /// Free a subtree with an explicit work stack. `Ref` wrappers are freed
    /// without following their referent.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Ok(node) = self.node(current) {
                match &node.payload {
                    Payload::Array(children) | Payload::Object(children) => {
                        stack.extend(children.iter().copied());
                    }
                    _ => {}
                }
                self.release(current);
            }
        }
    }

    /// Recursively free a detached subtree.
    ///
    /// Attached nodes belong to their parent and cannot be destroyed
    /// directly; detach them first (or delete them through the container).
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if self.node(id)?.parent.is_some() {
            return Err(ArborError::AlreadyAttached);
        }
        self.free_subtree(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Factory
    // ------------------------------------------------------------------

    pub fn null(&mut self) -> Result<NodeId> {
        self.alloc_detached(Payload::Null)
    }

    pub fn boolean(&mut self, value: bool) -> Result<NodeId> {
        self.alloc_detached(Payload::Bool(value))
    }

    pub fn number(&mut self, value: f64) -> Result<NodeId> {
        self.alloc_detached(Payload::Number {
            value,
            int: codec::int_view(value),
        })
    }

    /// A number node carrying an exact integer, even when the value does not
    /// fit an `f64` without rounding.
    pub fn integer(&mut self, value: i64) -> Result<NodeId> {
        self.alloc_detached(Payload::Number {
            value: value as f64,
            int: Some(value),
        })
    }

    /// A string node owning a copy of `text`.
    pub fn string(&mut self, text: &str) -> Result<NodeId> {
        self.alloc_detached(Payload::Str(Text::Owned(text.to_string())))
    }

    /// A string node borrowing `text` instead of copying it.
    pub fn string_ref(&mut self, text: &'static str) -> Result<NodeId> {
        self.alloc_detached(Payload::Str(Text::Static(text)))
    }

    /// A node holding pre-serialized JSON, printed verbatim without
    /// re-encoding or validation.
    pub fn raw(&mut self, text: &str) -> Result<NodeId> {
        self.alloc_detached(Payload::Raw(Text::Owned(text.to_string())))
    }

    pub fn array(&mut self) -> Result<NodeId> {
        self.alloc_detached(Payload::Array(Vec::new()))
    }

    pub fn object(&mut self) -> Result<NodeId> {
        self.alloc_detached(Payload::Object(Vec::new()))
    }

    pub fn int_array(&mut self, values: &[i64]) -> Result<NodeId> {
        self.build_array(values, |doc, &v| doc.integer(v))
    }

    pub fn float_array(&mut self, values: &[f32]) -> Result<NodeId> {
        self.build_array(values, |doc, &v| doc.number(f64::from(v)))
    }

    pub fn double_array(&mut self, values: &[f64]) -> Result<NodeId> {
        self.build_array(values, |doc, &v| doc.number(v))
    }

    pub fn string_array(&mut self, values: &[&str]) -> Result<NodeId> {
        self.build_array(values, |doc, v| doc.string(v))
    }

    fn build_array<T>(
        &mut self,
        values: &[T],
        make: impl Fn(&mut Document, &T) -> Result<NodeId>,
    ) -> Result<NodeId> {
        let arr = self.array()?;
        for value in values {
            let child = match make(self, value) {
                Ok(id) => id,
                Err(e) => {
                    self.free_subtree(arr);
                    return Err(e);
                }
            };
            if let Err(e) = self.add_to_array(arr, child) {
                self.free_subtree(child);
                self.free_subtree(arr);
                return Err(e);
            }
        }
        Ok(arr)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The node's own kind. `Ref` wrappers report [`Kind::Ref`]; use
    /// [`resolve`](Document::resolve) or the `is_*` predicates to look
    /// through them.
    pub fn kind(&self, id: NodeId) -> Result<Kind> {
        Ok(self.node(id)?.payload.kind())
    }

    /// Follow `Ref` wrappers until a concrete node is reached.
    pub fn resolve(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        loop {
            match &self.node(current)?.payload {
                Payload::Ref(target) => current = *target,
                _ => return Ok(current),
            }
        }
    }

    fn resolved_kind(&self, id: NodeId) -> Option<Kind> {
        let id = self.resolve(id).ok()?;
        self.kind(id).ok()
    }

    pub fn is_null(&self, id: NodeId) -> bool {
        self.resolved_kind(id) == Some(Kind::Null)
    }

    pub fn is_bool(&self, id: NodeId) -> bool {
        self.resolved_kind(id) == Some(Kind::Bool)
    }

    pub fn is_number(&self, id: NodeId) -> bool {
        self.resolved_kind(id) == Some(Kind::Number)
    }

    pub fn is_string(&self, id: NodeId) -> bool {
        self.resolved_kind(id) == Some(Kind::String)
    }

    pub fn is_raw(&self, id: NodeId) -> bool {
        self.resolved_kind(id) == Some(Kind::Raw)
    }

    pub fn is_array(&self, id: NodeId) -> bool {
        self.resolved_kind(id) == Some(Kind::Array)
    }

    pub fn is_object(&self, id: NodeId) -> bool {
        self.resolved_kind(id) == Some(Kind::Object)
    }

    /// True when the node itself is a borrowing wrapper.
    pub fn is_reference(&self, id: NodeId) -> bool {
        self.kind(id) == Ok(Kind::Ref)
    }

    pub fn bool_value(&self, id: NodeId) -> Option<bool> {
        let id = self.resolve(id).ok()?;
        match self.node(id).ok()?.payload {
            Payload::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn number_value(&self, id: NodeId) -> Option<f64> {
        let id = self.resolve(id).ok()?;
        match self.node(id).ok()?.payload {
            Payload::Number { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The exact integer view of a number node, when the value round-trips
    /// as `i64`.
    pub fn int_value(&self, id: NodeId) -> Option<i64> {
        let id = self.resolve(id).ok()?;
        match self.node(id).ok()?.payload {
            Payload::Number { int, .. } => int,
            _ => None,
        }
    }

    pub fn string_value(&self, id: NodeId) -> Option<&str> {
        let id = self.resolve(id).ok()?;
        match &self.node(id).ok()?.payload {
            Payload::Str(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn raw_value(&self, id: NodeId) -> Option<&str> {
        let id = self.resolve(id).ok()?;
        match &self.node(id).ok()?.payload {
            Payload::Raw(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The member name this node is stored under, if it sits in an object.
    pub fn key_of(&self, id: NodeId) -> Option<&str> {
        self.node(id).ok()?.key.as_ref().map(Text::as_str)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.parent
    }

    /// Child handles of an array or object, in insertion order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        let id = self.resolve(id)?;
        match &self.node(id)?.payload {
            Payload::Array(children) | Payload::Object(children) => Ok(children),
            _ => Err(ArborError::WrongKind),
        }
    }

    /// Overwrite the value of a number node, refreshing its integer view.
    pub fn set_number(&mut self, id: NodeId, value: f64) -> Result<()> {
        let id = self.resolve(id)?;
        match &mut self.node_mut(id)?.payload {
            Payload::Number { value: v, int } => {
                *v = value;
                *int = codec::int_view(value);
                Ok(())
            }
            _ => Err(ArborError::WrongKind),
        }
    }

    /// Overwrite the text of a string node with an owned copy.
    pub fn set_string(&mut self, id: NodeId, text: &str) -> Result<()> {
        let id = self.resolve(id)?;
        match &mut self.node_mut(id)?.payload {
            Payload::Str(t) => {
                *t = Text::Owned(text.to_string());
                Ok(())
            }
            _ => Err(ArborError::WrongKind),
        }
    }
}
