//! Lossless-ish bridging to and from `serde_json::Value`.
//!
//! Numbers map through the exact integer view when they have one; NaN and
//! infinity export as JSON null, matching the printer. Raw nodes are
//! re-parsed on export since `serde_json` has no verbatim variant. Duplicate
//! object keys collapse to the last occurrence on export (`serde_json::Map`
//! cannot hold duplicates).

use serde_json::{Map, Number, Value};

use crate::decoder::MAX_NESTING_DEPTH;
use crate::document::Document;
use crate::error::{ArborError, ParseError, ParseErrorKind, Result};
use crate::node::{NodeId, Payload, Text};

/// Build a tree in `doc` mirroring a `serde_json::Value`.
pub fn from_json_value(doc: &mut Document, value: &Value) -> Result<NodeId> {
    from_value_at(doc, value, 0)
}

fn from_value_at(doc: &mut Document, value: &Value, depth: usize) -> Result<NodeId> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ArborError::TooDeep);
    }
    match value {
        Value::Null => doc.null(),
        Value::Bool(b) => doc.boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                doc.integer(i)
            } else if let Some(f) = n.as_f64() {
                doc.number(f)
            } else {
                // u64 beyond i64::MAX: keep the closest double
                doc.number(n.as_u64().map(|u| u as f64).unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => doc.string(s),
        Value::Array(items) => {
            let arr = doc.array()?;
            for item in items {
                let child = build_or_clean(doc, item, depth + 1, arr)?;
                if let Err(e) = doc.add_to_array(arr, child) {
                    doc.free_subtree(child);
                    doc.free_subtree(arr);
                    return Err(e);
                }
            }
            Ok(arr)
        }
        Value::Object(map) => {
            let obj = doc.object()?;
            for (key, item) in map {
                let child = build_or_clean(doc, item, depth + 1, obj)?;
                if let Err(e) = doc.insert_member(obj, Text::Owned(key.clone()), child) {
                    doc.free_subtree(child);
                    doc.free_subtree(obj);
                    return Err(e);
                }
            }
            Ok(obj)
        }
    }
}

fn build_or_clean(
    doc: &mut Document,
    item: &Value,
    depth: usize,
    container: NodeId,
) -> Result<NodeId> {
    match from_value_at(doc, item, depth) {
        Ok(id) => Ok(id),
        Err(e) => {
            doc.free_subtree(container);
            Err(e)
        }
    }
}

/// Export a subtree as a `serde_json::Value`.
pub fn to_json_value(doc: &Document, id: NodeId) -> Result<Value> {
    to_value_at(doc, id, 0)
}

fn to_value_at(doc: &Document, id: NodeId, depth: usize) -> Result<Value> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ArborError::TooDeep);
    }
    let id = doc.resolve(id)?;
    match &doc.node(id)?.payload {
        Payload::Null => Ok(Value::Null),
        Payload::Bool(b) => Ok(Value::Bool(*b)),
        Payload::Number { value, int } => Ok(match int {
            Some(i) => Value::Number(Number::from(*i)),
            None => Number::from_f64(*value).map(Value::Number).unwrap_or(Value::Null),
        }),
        Payload::Str(text) => Ok(Value::String(text.as_str().to_string())),
        Payload::Raw(text) => serde_json::from_str(text.as_str()).map_err(|_| {
            ArborError::Parse(ParseError {
                kind: ParseErrorKind::UnexpectedChar,
                offset: 0,
            })
        }),
        Payload::Array(children) => {
            let mut items = Vec::with_capacity(children.len());
            for &child in children {
                items.push(to_value_at(doc, child, depth + 1)?);
            }
            Ok(Value::Array(items))
        }
        Payload::Object(children) => {
            let mut map = Map::new();
            for &child in children {
                let key = doc
                    .node(child)?
                    .key
                    .as_ref()
                    .map(Text::as_str)
                    .unwrap_or("")
                    .to_string();
                map.insert(key, to_value_at(doc, child, depth + 1)?);
            }
            Ok(Value::Object(map))
        }
        // resolve() above never yields a Ref
        Payload::Ref(_) => Err(ArborError::Stale),
    }
}
