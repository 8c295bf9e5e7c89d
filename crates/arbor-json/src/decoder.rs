//! Recursive-descent JSON parser producing nodes in a [`Document`] arena.
//!
//! Single pass over a byte slice with an explicit cursor; no backtracking.
//! Container parsing recurses with a depth counter so adversarial nesting
//! fails with [`ParseErrorKind::TooDeep`] instead of exhausting the host
//! stack. A failed parse frees every node it allocated before returning, so
//! the caller never sees a partially built tree.
//!
//! Three entry points cover the common shapes of input:
//!
//! - [`parse`]: the whole input must be one value (plus whitespace)
//! - [`parse_bytes`]: same, from raw bytes with a UTF-8 check
//! - [`parse_prefix`]: stop after the first value, report where it ended
//!   (for streams of concatenated values)

use crate::codec;
use crate::document::Document;
use crate::error::{ArborError, ParseError, ParseErrorKind, Result};
use crate::node::{NodeId, Payload, Text};

/// Default cap on array/object nesting.
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Parse `text` as exactly one JSON value.
///
/// Anything but whitespace after the value fails with `TrailingGarbage`.
pub fn parse(doc: &mut Document, text: &str) -> Result<NodeId> {
    parse_with_depth(doc, text, MAX_NESTING_DEPTH)
}

/// [`parse`] with a caller-chosen nesting limit.
pub fn parse_with_depth(doc: &mut Document, text: &str, max_depth: usize) -> Result<NodeId> {
    let mut cur = Cursor::new(text.as_bytes());
    cur.skip_ws();
    let root = parse_value(doc, &mut cur, 0, max_depth)?;
    cur.skip_ws();
    if cur.pos != cur.bytes.len() {
        doc.free_subtree(root);
        return Err(cur.err(ParseErrorKind::TrailingGarbage));
    }
    Ok(root)
}

/// Parse raw bytes; the slice length is authoritative (no terminator is
/// expected). Invalid UTF-8 fails with [`ArborError::Encoding`].
pub fn parse_bytes(doc: &mut Document, bytes: &[u8]) -> Result<NodeId> {
    let text = std::str::from_utf8(bytes).map_err(|_| ArborError::Encoding)?;
    parse(doc, text)
}

/// Parse the first complete value and return it along with the byte offset
/// of the first unconsumed byte.
pub fn parse_prefix(doc: &mut Document, text: &str) -> Result<(NodeId, usize)> {
    let mut cur = Cursor::new(text.as_bytes());
    cur.skip_ws();
    let root = parse_value(doc, &mut cur, 0, MAX_NESTING_DEPTH)?;
    Ok((root, cur.pos))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn err(&self, kind: ParseErrorKind) -> ArborError {
        ArborError::Parse(ParseError {
            kind,
            offset: self.pos,
        })
    }

    /// Error kind for "expected more of the current construct".
    fn stopped(&self) -> ArborError {
        if self.peek().is_none() {
            self.err(ParseErrorKind::UnexpectedEnd)
        } else {
            self.err(ParseErrorKind::UnexpectedChar)
        }
    }
}

fn parse_value(
    doc: &mut Document,
    cur: &mut Cursor<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<NodeId> {
    if depth > max_depth {
        return Err(cur.err(ParseErrorKind::TooDeep));
    }
    match cur.peek() {
        None => Err(cur.err(ParseErrorKind::UnexpectedEnd)),
        Some(b'n') => parse_literal(doc, cur, b"null", Payload::Null),
        Some(b't') => parse_literal(doc, cur, b"true", Payload::Bool(true)),
        Some(b'f') => parse_literal(doc, cur, b"false", Payload::Bool(false)),
        Some(b'"') => {
            let text = parse_string_text(cur)?;
            doc.alloc_detached(Payload::Str(Text::Owned(text)))
        }
        Some(b'[') => parse_array(doc, cur, depth, max_depth),
        Some(b'{') => parse_object(doc, cur, depth, max_depth),
        Some(c) if c == b'-' || c.is_ascii_digit() => parse_number_node(doc, cur),
        Some(_) => Err(cur.err(ParseErrorKind::UnexpectedChar)),
    }
}

fn parse_literal(
    doc: &mut Document,
    cur: &mut Cursor<'_>,
    literal: &[u8],
    payload: Payload,
) -> Result<NodeId> {
    if cur.bytes[cur.pos..].starts_with(literal) {
        cur.pos += literal.len();
        doc.alloc_detached(payload)
    } else {
        Err(cur.err(ParseErrorKind::UnexpectedChar))
    }
}

fn parse_number_node(doc: &mut Document, cur: &mut Cursor<'_>) -> Result<NodeId> {
    match codec::parse_number(&cur.bytes[cur.pos..]) {
        Ok((value, int, used)) => {
            cur.pos += used;
            doc.alloc_detached(Payload::Number { value, int })
        }
        Err(kind) => Err(cur.err(kind)),
    }
}

/// Scan a quoted string and decode its escapes. The cursor must sit on the
/// opening quote; afterwards it sits past the closing quote.
fn parse_string_text(cur: &mut Cursor<'_>) -> Result<String> {
    cur.pos += 1;
    let body_start = cur.pos;
    loop {
        match cur.peek() {
            None => return Err(cur.err(ParseErrorKind::UnexpectedEnd)),
            Some(b'"') => break,
            Some(b'\\') => {
                cur.pos += 1;
                if cur.peek().is_none() {
                    return Err(cur.err(ParseErrorKind::UnexpectedEnd));
                }
                cur.pos += 1;
            }
            // raw control characters are not allowed inside strings
            Some(c) if c < 0x20 => return Err(cur.err(ParseErrorKind::UnexpectedChar)),
            Some(_) => cur.pos += 1,
        }
    }
    let body = &cur.bytes[body_start..cur.pos];
    cur.pos += 1;
    let body = std::str::from_utf8(body).map_err(|_| ArborError::Encoding)?;
    codec::unescape(body).map_err(|e| {
        ArborError::Parse(ParseError {
            kind: e.kind,
            offset: body_start + e.offset,
        })
    })
}

fn parse_array(
    doc: &mut Document,
    cur: &mut Cursor<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<NodeId> {
    cur.pos += 1;
    let arr = doc.array()?;
    match parse_array_items(doc, cur, arr, depth, max_depth) {
        Ok(()) => Ok(arr),
        Err(e) => {
            doc.free_subtree(arr);
            Err(e)
        }
    }
}

fn parse_array_items(
    doc: &mut Document,
    cur: &mut Cursor<'_>,
    arr: NodeId,
    depth: usize,
    max_depth: usize,
) -> Result<()> {
    cur.skip_ws();
    if cur.eat(b']') {
        return Ok(());
    }
    loop {
        cur.skip_ws();
        let item = parse_value(doc, cur, depth + 1, max_depth)?;
        // attach immediately so a later failure frees it with the array
        if let Err(e) = doc.add_to_array(arr, item) {
            doc.free_subtree(item);
            return Err(e);
        }
        cur.skip_ws();
        if cur.eat(b',') {
            continue;
        }
        if cur.eat(b']') {
            return Ok(());
        }
        return Err(cur.stopped());
    }
}

fn parse_object(
    doc: &mut Document,
    cur: &mut Cursor<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<NodeId> {
    cur.pos += 1;
    let obj = doc.object()?;
    match parse_object_members(doc, cur, obj, depth, max_depth) {
        Ok(()) => Ok(obj),
        Err(e) => {
            doc.free_subtree(obj);
            Err(e)
        }
    }
}

fn parse_object_members(
    doc: &mut Document,
    cur: &mut Cursor<'_>,
    obj: NodeId,
    depth: usize,
    max_depth: usize,
) -> Result<()> {
    cur.skip_ws();
    if cur.eat(b'}') {
        return Ok(());
    }
    loop {
        cur.skip_ws();
        if cur.peek() != Some(b'"') {
            return Err(cur.stopped());
        }
        let key = parse_string_text(cur)?;
        cur.skip_ws();
        if !cur.eat(b':') {
            return Err(cur.stopped());
        }
        cur.skip_ws();
        let value = parse_value(doc, cur, depth + 1, max_depth)?;
        if let Err(e) = doc.insert_member(obj, Text::Owned(key), value) {
            doc.free_subtree(value);
            return Err(e);
        }
        cur.skip_ws();
        if cur.eat(b',') {
            continue;
        }
        if cur.eat(b'}') {
            return Ok(());
        }
        return Err(cur.stopped());
    }
}
