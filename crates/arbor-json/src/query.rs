//! Read-side operations: lookup, containment, structural comparison, and
//! duplication.

use crate::document::Document;
use crate::error::{ArborError, Result};
use crate::node::{NodeId, Payload, Text};

/// ASCII-case-folding equality; non-ASCII bytes compare exactly.
pub(crate) fn text_matches(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.len() == b.len()
            && a.bytes()
                .zip(b.bytes())
                .all(|(x, y)| x.to_ascii_lowercase() == y.to_ascii_lowercase())
    }
}

impl Document {
    /// First member of `obj` stored under `key`, comparing case-sensitively.
    pub fn get(&self, obj: NodeId, key: &str) -> Option<NodeId> {
        let obj = self.resolve(obj).ok()?;
        self.find_member(obj, key, true)
            .ok()
            .flatten()
            .map(|(_, id)| id)
    }

    /// Like [`get`](Document::get), folding ASCII case.
    pub fn get_ignore_case(&self, obj: NodeId, key: &str) -> Option<NodeId> {
        let obj = self.resolve(obj).ok()?;
        self.find_member(obj, key, false)
            .ok()
            .flatten()
            .map(|(_, id)| id)
    }

    pub fn has(&self, obj: NodeId, key: &str) -> bool {
        self.get(obj, key).is_some()
    }

    /// Child count of an array (or object). Non-containers and stale handles
    /// report zero rather than failing.
    pub fn array_len(&self, id: NodeId) -> usize {
        let Ok(id) = self.resolve(id) else { return 0 };
        match self.node(id).map(|n| &n.payload) {
            Ok(Payload::Array(children)) | Ok(Payload::Object(children)) => children.len(),
            _ => 0,
        }
    }

    /// Child at `index`; out-of-range is `None`, never a panic.
    pub fn get_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        let id = self.resolve(id).ok()?;
        match &self.node(id).ok()?.payload {
            Payload::Array(children) | Payload::Object(children) => children.get(index).copied(),
            _ => None,
        }
    }

    /// Linear scan for the first member whose key matches. The container must
    /// actually be an object.
    pub(crate) fn find_member(
        &self,
        obj: NodeId,
        key: &str,
        case_sensitive: bool,
    ) -> Result<Option<(usize, NodeId)>> {
        let children = match &self.node(obj)?.payload {
            Payload::Object(children) => children,
            _ => return Err(ArborError::WrongKind),
        };
        for (pos, &child) in children.iter().enumerate() {
            if let Ok(node) = self.node(child) {
                if let Some(k) = &node.key {
                    if text_matches(k.as_str(), key, case_sensitive) {
                        return Ok(Some((pos, child)));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Deep structural equality.
    ///
    /// Arrays compare element-wise in order; objects compare by key
    /// (order-independent, first match wins on duplicate keys); numbers by
    /// exact float equality; string and raw text under the given case rule.
    /// `Ref` wrappers are looked through on both sides; a stale handle
    /// anywhere makes the result `false`.
    pub fn compare(&self, a: NodeId, b: NodeId, case_sensitive: bool) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            let (Ok(a), Ok(b)) = (self.resolve(a), self.resolve(b)) else {
                return false;
            };
            let (Ok(an), Ok(bn)) = (self.node(a), self.node(b)) else {
                return false;
            };
            match (&an.payload, &bn.payload) {
                (Payload::Null, Payload::Null) => {}
                (Payload::Bool(x), Payload::Bool(y)) if x == y => {}
                (Payload::Number { value: x, .. }, Payload::Number { value: y, .. })
                    if x == y => {}
                (Payload::Str(x), Payload::Str(y))
                    if text_matches(x.as_str(), y.as_str(), case_sensitive) => {}
                (Payload::Raw(x), Payload::Raw(y))
                    if text_matches(x.as_str(), y.as_str(), case_sensitive) => {}
                (Payload::Array(xs), Payload::Array(ys)) if xs.len() == ys.len() => {
                    stack.extend(xs.iter().copied().zip(ys.iter().copied()));
                }
                (Payload::Object(xs), Payload::Object(ys)) if xs.len() == ys.len() => {
                    for &child in xs {
                        let Ok(node) = self.node(child) else {
                            return false;
                        };
                        let Some(key) = &node.key else {
                            return false;
                        };
                        match self.find_member(b, key.as_str(), case_sensitive) {
                            Ok(Some((_, other))) => stack.push((child, other)),
                            _ => return false,
                        }
                    }
                }
                _ => return false,
            }
        }
        true
    }

    /// Deep copy of a subtree. With `recursive` false, containers duplicate
    /// as empty shells of the same kind (callers rebuild children
    /// themselves).
    ///
    /// Every text payload in the copy is owned, and `Ref` wrappers are
    /// resolved into owned copies of their referent's content; a duplicate
    /// never borrows anything from the source.
    pub fn duplicate(&mut self, src: NodeId, recursive: bool) -> Result<NodeId> {
        let src = self.resolve(src)?;
        let root = self.copy_shell(src)?;
        if recursive {
            if let Err(e) = self.copy_children(src, root) {
                self.free_subtree(root);
                return Err(e);
            }
        }
        Ok(root)
    }

    /// Copy one node without children: scalars in full, containers as empty
    /// shells. Text and key become owned copies.
    fn copy_shell(&mut self, src: NodeId) -> Result<NodeId> {
        let src = self.resolve(src)?;
        let node = self.node(src)?;
        let key = node.key.as_ref().map(Text::to_owned_text);
        let payload = match &node.payload {
            Payload::Null => Payload::Null,
            Payload::Bool(b) => Payload::Bool(*b),
            Payload::Number { value, int } => Payload::Number {
                value: *value,
                int: *int,
            },
            Payload::Str(text) => Payload::Str(text.to_owned_text()),
            Payload::Raw(text) => Payload::Raw(text.to_owned_text()),
            Payload::Array(_) => Payload::Array(Vec::new()),
            Payload::Object(_) => Payload::Object(Vec::new()),
            // resolve() above never yields a Ref
            Payload::Ref(_) => return Err(ArborError::Stale),
        };
        self.alloc_node(crate::node::Node {
            parent: None,
            key,
            payload,
        })
    }

    fn copy_children(&mut self, src: NodeId, dst: NodeId) -> Result<()> {
        let mut stack = vec![(src, dst)];
        while let Some((from, to)) = stack.pop() {
            let kids: Vec<NodeId> = match &self.node(from)?.payload {
                Payload::Array(children) | Payload::Object(children) => children.clone(),
                _ => continue,
            };
            for child in kids {
                let resolved = self.resolve(child)?;
                let copy = self.copy_shell(resolved)?;
                // The member name lives on the wrapper when the child is a
                // reference, so prefer the wrapper's key.
                if let Some(key) = self.node(child)?.key.as_ref().map(Text::to_owned_text) {
                    self.node_mut(copy)?.key = Some(key);
                }
                match &mut self.node_mut(to)?.payload {
                    Payload::Array(children) | Payload::Object(children) => children.push(copy),
                    _ => {}
                }
                self.node_mut(copy)?.parent = Some(to);
                if matches!(
                    self.node(resolved)?.payload,
                    Payload::Array(_) | Payload::Object(_)
                ) {
                    stack.push((resolved, copy));
                }
            }
        }
        Ok(())
    }
}
