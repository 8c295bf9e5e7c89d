//! JSON printer: pretty/compact serialization over three buffer strategies.
//!
//! Printing is a depth-first walk mirroring the decoder's grammar. The walk
//! is generic over a [`Sink`], which is how one traversal serves all three
//! strategies:
//!
//! - [`print`] runs a counting pass first, allocates exactly once, then
//!   writes (and shrinks if the two passes ever disagree).
//! - [`print_to_fixed`] writes into a caller-owned slice and reports
//!   overflow the instant a write would not fit; partial contents are
//!   unspecified and must be discarded.
//! - [`print_buffered`] starts from a caller-chosen capacity and doubles it
//!   whenever a write would overflow, amortizing reallocation on big trees.
//!
//! Pretty output indents object members with one tab per depth and keeps
//! arrays on a single line with `, ` separators. Raw nodes are copied
//! byte-for-byte without re-validation.

use crate::codec;
use crate::decoder::MAX_NESTING_DEPTH;
use crate::document::Document;
use crate::error::{ArborError, Result};
use crate::node::{NodeId, Payload, Text};

/// Serialize into a fresh, exactly-sized heap buffer.
pub fn print(doc: &Document, id: NodeId, pretty: bool) -> Result<String> {
    let mut counter = Sink::Count(0);
    write_value(doc, id, 0, pretty, &mut counter)?;
    let total = match counter {
        Sink::Count(n) => n,
        _ => 0,
    };
    let mut sink = Sink::Grow(String::with_capacity(total));
    write_value(doc, id, 0, pretty, &mut sink)?;
    match sink {
        Sink::Grow(mut out) => {
            out.shrink_to_fit();
            Ok(out)
        }
        _ => Ok(String::new()),
    }
}

/// Serialize into a growing buffer that starts at `initial_capacity` bytes
/// and doubles on demand.
pub fn print_buffered(
    doc: &Document,
    id: NodeId,
    initial_capacity: usize,
    pretty: bool,
) -> Result<String> {
    let mut sink = Sink::Grow(String::with_capacity(initial_capacity));
    write_value(doc, id, 0, pretty, &mut sink)?;
    match sink {
        Sink::Grow(out) => Ok(out),
        _ => Ok(String::new()),
    }
}

/// Serialize into caller-owned memory.
///
/// `Ok(Some(len))` on success with `len` bytes written; `Ok(None)` the
/// instant output would overflow the buffer, in which case the bytes already
/// written are unspecified and must not be used. Never writes past the
/// buffer.
pub fn print_to_fixed(
    doc: &Document,
    id: NodeId,
    buf: &mut [u8],
    pretty: bool,
) -> Result<Option<usize>> {
    let mut sink = Sink::Fixed { buf, len: 0 };
    if !write_value(doc, id, 0, pretty, &mut sink)? {
        return Ok(None);
    }
    match sink {
        Sink::Fixed { len, .. } => Ok(Some(len)),
        _ => Ok(None),
    }
}

enum Sink<'a> {
    /// Measuring pass: tracks the length without storing anything.
    Count(usize),
    Grow(String),
    Fixed { buf: &'a mut [u8], len: usize },
}

impl Sink<'_> {
    /// Append text; `false` means a fixed buffer ran out of room.
    fn push_str(&mut self, s: &str) -> bool {
        match self {
            Sink::Count(n) => {
                *n += s.len();
                true
            }
            Sink::Grow(out) => {
                if out.len() + s.len() > out.capacity() {
                    let want = (out.len() + s.len()).max(out.capacity() * 2);
                    out.reserve(want - out.len());
                }
                out.push_str(s);
                true
            }
            Sink::Fixed { buf, len } => {
                if *len + s.len() > buf.len() {
                    return false;
                }
                buf[*len..*len + s.len()].copy_from_slice(s.as_bytes());
                *len += s.len();
                true
            }
        }
    }

    fn push(&mut self, c: char) -> bool {
        let mut tmp = [0u8; 4];
        self.push_str(c.encode_utf8(&mut tmp))
    }
}

fn write_value(
    doc: &Document,
    id: NodeId,
    depth: usize,
    pretty: bool,
    out: &mut Sink<'_>,
) -> Result<bool> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ArborError::TooDeep);
    }
    let id = doc.resolve(id)?;
    let node = doc.node(id)?;
    match &node.payload {
        Payload::Null => Ok(out.push_str("null")),
        Payload::Bool(true) => Ok(out.push_str("true")),
        Payload::Bool(false) => Ok(out.push_str("false")),
        Payload::Number { value, int } => Ok(out.push_str(&codec::format_number(*value, *int))),
        Payload::Str(text) => Ok(write_string(text.as_str(), out)),
        Payload::Raw(text) => Ok(out.push_str(text.as_str())),
        Payload::Array(children) => write_array(doc, children, depth, pretty, out),
        Payload::Object(children) => write_object(doc, children, depth, pretty, out),
        // resolve() above never yields a Ref
        Payload::Ref(_) => Err(ArborError::Stale),
    }
}

fn write_string(s: &str, out: &mut Sink<'_>) -> bool {
    out.push('"') && out.push_str(&codec::escape(s)) && out.push('"')
}

fn write_array(
    doc: &Document,
    children: &[NodeId],
    depth: usize,
    pretty: bool,
    out: &mut Sink<'_>,
) -> Result<bool> {
    if !out.push('[') {
        return Ok(false);
    }
    for (i, &child) in children.iter().enumerate() {
        if i > 0 && !out.push_str(if pretty { ", " } else { "," }) {
            return Ok(false);
        }
        if !write_value(doc, child, depth + 1, pretty, out)? {
            return Ok(false);
        }
    }
    Ok(out.push(']'))
}

fn write_object(
    doc: &Document,
    children: &[NodeId],
    depth: usize,
    pretty: bool,
    out: &mut Sink<'_>,
) -> Result<bool> {
    if children.is_empty() {
        return Ok(out.push_str("{}"));
    }
    if !out.push('{') {
        return Ok(false);
    }
    if pretty && !out.push('\n') {
        return Ok(false);
    }
    for (i, &child) in children.iter().enumerate() {
        if pretty && !push_indent(out, depth + 1) {
            return Ok(false);
        }
        let key = self_key(doc, child)?;
        if !write_string(key, out) {
            return Ok(false);
        }
        if !out.push(':') {
            return Ok(false);
        }
        if pretty && !out.push('\t') {
            return Ok(false);
        }
        if !write_value(doc, child, depth + 1, pretty, out)? {
            return Ok(false);
        }
        if i + 1 < children.len() && !out.push(',') {
            return Ok(false);
        }
        if pretty && !out.push('\n') {
            return Ok(false);
        }
    }
    if pretty && !push_indent(out, depth) {
        return Ok(false);
    }
    Ok(out.push('}'))
}

fn self_key(doc: &Document, child: NodeId) -> Result<&str> {
    Ok(doc.node(child)?.key.as_ref().map(Text::as_str).unwrap_or(""))
}

fn push_indent(out: &mut Sink<'_>, depth: usize) -> bool {
    for _ in 0..depth {
        if !out.push('\t') {
            return false;
        }
    }
    true
}
