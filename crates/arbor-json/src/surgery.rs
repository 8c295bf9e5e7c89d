//! Structural tree mutation: attach, detach, insert, delete, replace.
//!
//! Every operation validates before it relinks, so a failure leaves the tree
//! untouched. Detach hands ownership of the removed subtree back to the
//! caller; delete is detach plus recursive free.

use crate::document::Document;
use crate::error::{ArborError, Result};
use crate::node::{Node, NodeId, Payload, Text};

impl Document {
    /// Append `value` to an array. `value` must be detached.
    pub fn add_to_array(&mut self, arr: NodeId, value: NodeId) -> Result<()> {
        self.pre_attach(arr, value)?;
        match &mut self.node_mut(arr)?.payload {
            Payload::Array(children) => children.push(value),
            _ => return Err(ArborError::WrongKind),
        }
        self.node_mut(value)?.parent = Some(arr);
        Ok(())
    }

    /// Append `value` to an object under an owned copy of `key`.
    /// Duplicate keys are permitted; lookups return the first match.
    pub fn add_to_object(&mut self, obj: NodeId, key: &str, value: NodeId) -> Result<()> {
        self.insert_member(obj, Text::Owned(key.to_string()), value)
    }

    /// Like [`add_to_object`](Document::add_to_object), but the key is
    /// borrowed instead of copied. Useful for literal keys in hot paths.
    pub fn add_to_object_cs(&mut self, obj: NodeId, key: &'static str, value: NodeId) -> Result<()> {
        self.insert_member(obj, Text::Static(key), value)
    }

    pub(crate) fn insert_member(&mut self, obj: NodeId, key: Text, value: NodeId) -> Result<()> {
        self.pre_attach(obj, value)?;
        match &mut self.node_mut(obj)?.payload {
            Payload::Object(children) => children.push(value),
            _ => return Err(ArborError::WrongKind),
        }
        let node = self.node_mut(value)?;
        node.parent = Some(obj);
        node.key = Some(key);
        Ok(())
    }

    /// Insert `value` before the element currently at `index`; an index at or
    /// past the end appends.
    pub fn insert_at(&mut self, arr: NodeId, index: usize, value: NodeId) -> Result<()> {
        self.pre_attach(arr, value)?;
        match &mut self.node_mut(arr)?.payload {
            Payload::Array(children) => {
                let at = index.min(children.len());
                children.insert(at, value);
            }
            _ => return Err(ArborError::WrongKind),
        }
        self.node_mut(value)?.parent = Some(arr);
        Ok(())
    }

    /// Remove the child at `index` and hand it to the caller, who now owns it
    /// (re-attach it or [`destroy`](Document::destroy) it). Out-of-range
    /// indexes are a no-op reported as `Ok(None)`.
    pub fn detach_by_index(&mut self, container: NodeId, index: usize) -> Result<Option<NodeId>> {
        if index >= self.container_len(container)? {
            return Ok(None);
        }
        Ok(Some(self.detach_pos(container, index)?))
    }

    /// Remove the first member stored under `key` (case-sensitive). A missing
    /// key is a no-op reported as `Ok(None)`.
    pub fn detach_by_key(&mut self, obj: NodeId, key: &str) -> Result<Option<NodeId>> {
        match self.find_member(obj, key, true)? {
            Some((pos, _)) => Ok(Some(self.detach_pos(obj, pos)?)),
            None => Ok(None),
        }
    }

    /// Remove a specific child, identified by handle rather than position.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.child_position(parent, child)? {
            Some(pos) => {
                self.detach_pos(parent, pos)?;
                Ok(())
            }
            None => Err(ArborError::NotFound),
        }
    }

    /// Detach and recursively free. Returns whether anything was deleted.
    pub fn delete_by_index(&mut self, container: NodeId, index: usize) -> Result<bool> {
        match self.detach_by_index(container, index)? {
            Some(id) => {
                self.free_subtree(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Detach and recursively free the first member under `key`.
    pub fn delete_by_key(&mut self, obj: NodeId, key: &str) -> Result<bool> {
        match self.detach_by_key(obj, key)? {
            Some(id) => {
                self.free_subtree(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Free the old child at `index` and put `new` in its slot, preserving
    /// position (and, for objects, the member name).
    pub fn replace_by_index(&mut self, container: NodeId, index: usize, new: NodeId) -> Result<()> {
        if index >= self.container_len(container)? {
            return Err(ArborError::NotFound);
        }
        self.replace_pos(container, index, new)
    }

    /// Replace the first member under `key`. A missing key inserts instead of
    /// failing silently.
    pub fn replace_by_key(&mut self, obj: NodeId, key: &str, new: NodeId) -> Result<()> {
        match self.find_member(obj, key, true)? {
            Some((pos, _)) => {
                self.replace_pos(obj, pos, new)?;
                self.node_mut(new)?.key = Some(Text::Owned(key.to_string()));
                Ok(())
            }
            None => self.add_to_object(obj, key, new),
        }
    }

    /// Replace a specific child, identified by handle rather than position.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        match self.child_position(parent, old)? {
            Some(pos) => self.replace_pos(parent, pos, new),
            None => Err(ArborError::NotFound),
        }
    }

    /// Attach a borrowing wrapper around `referent` to an array. The referent
    /// keeps its own parent and ownership; freeing the wrapper never frees
    /// the referent, and a referent freed first leaves the wrapper reporting
    /// [`ArborError::Stale`].
    pub fn add_reference(&mut self, arr: NodeId, referent: NodeId) -> Result<NodeId> {
        self.node(referent)?;
        let wrapper = self.alloc_node(Node::detached(Payload::Ref(referent)))?;
        match self.add_to_array(arr, wrapper) {
            Ok(()) => Ok(wrapper),
            Err(e) => {
                self.free_subtree(wrapper);
                Err(e)
            }
        }
    }

    /// Attach a borrowing wrapper around `referent` to an object under `key`.
    pub fn add_reference_to_object(
        &mut self,
        obj: NodeId,
        key: &str,
        referent: NodeId,
    ) -> Result<NodeId> {
        self.node(referent)?;
        let wrapper = self.alloc_node(Node::detached(Payload::Ref(referent)))?;
        match self.insert_member(obj, Text::Owned(key.to_string()), wrapper) {
            Ok(()) => Ok(wrapper),
            Err(e) => {
                self.free_subtree(wrapper);
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Checks shared by every attaching operation: the value must be alive,
    /// detached, and not an ancestor of the container.
    fn pre_attach(&self, container: NodeId, value: NodeId) -> Result<()> {
        if self.node(value)?.parent.is_some() {
            return Err(ArborError::AlreadyAttached);
        }
        if container == value {
            return Err(ArborError::WouldCycle);
        }
        let mut cursor = self.node(container)?.parent;
        while let Some(ancestor) = cursor {
            if ancestor == value {
                return Err(ArborError::WouldCycle);
            }
            cursor = self.node(ancestor)?.parent;
        }
        Ok(())
    }

    pub(crate) fn container_len(&self, container: NodeId) -> Result<usize> {
        match &self.node(container)?.payload {
            Payload::Array(children) | Payload::Object(children) => Ok(children.len()),
            _ => Err(ArborError::WrongKind),
        }
    }

    /// Position of `child` in `container`'s child list, by identity.
    fn child_position(&self, container: NodeId, child: NodeId) -> Result<Option<usize>> {
        match &self.node(container)?.payload {
            Payload::Array(children) | Payload::Object(children) => {
                Ok(children.iter().position(|&c| c == child))
            }
            _ => Err(ArborError::WrongKind),
        }
    }

    /// Unlink the child at a known-valid position.
    fn detach_pos(&mut self, container: NodeId, pos: usize) -> Result<NodeId> {
        let child = match &mut self.node_mut(container)?.payload {
            Payload::Array(children) | Payload::Object(children) => children.remove(pos),
            _ => return Err(ArborError::WrongKind),
        };
        self.node_mut(child)?.parent = None;
        Ok(child)
    }

    /// Swap `new` into a known-valid position and free the old child.
    fn replace_pos(&mut self, container: NodeId, pos: usize, new: NodeId) -> Result<()> {
        let (old, is_object) = match &self.node(container)?.payload {
            Payload::Array(children) => (children[pos], false),
            Payload::Object(children) => (children[pos], true),
            _ => return Err(ArborError::WrongKind),
        };
        if old == new {
            return Ok(());
        }
        self.pre_attach(container, new)?;
        match &mut self.node_mut(container)?.payload {
            Payload::Array(children) | Payload::Object(children) => children[pos] = new,
            _ => return Err(ArborError::WrongKind),
        }
        let old_key = match self.node_mut(old) {
            Ok(node) => {
                node.parent = None;
                node.key.take()
            }
            Err(_) => None,
        };
        let node = self.node_mut(new)?;
        node.parent = Some(container);
        if is_object {
            node.key = old_key;
        }
        self.free_subtree(old);
        Ok(())
    }
}
