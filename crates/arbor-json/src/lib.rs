//! # arbor-json
//!
//! An arena-backed JSON document tree with ownership-aware structural
//! editing, a strict recursive-descent parser, a multi-strategy printer, and
//! an in-place minifier.
//!
//! All nodes live inside a [`Document`] and are addressed by copyable
//! [`NodeId`] handles; parent/child links are arena indices, so trees with
//! back-references need no shared ownership, and a freed node is detected by
//! a generation stamp instead of dangling. A node has exactly one owner
//! (its parent, or the caller while it is detached), and borrowing is
//! explicit: `Ref` wrapper nodes and `'static` text references never free
//! what they point at.
//!
//! ## Quick start
//!
//! ```rust
//! use arbor_json::{decoder, encoder, Document};
//!
//! let mut doc = Document::new();
//! let root = decoder::parse(&mut doc, r#"{"name":"Ada","scores":[95,87]}"#).unwrap();
//!
//! let scores = doc.get(root, "scores").unwrap();
//! assert_eq!(doc.array_len(scores), 2);
//!
//! let extra = doc.number(91.5).unwrap();
//! doc.add_to_array(scores, extra).unwrap();
//!
//! let out = encoder::print(&doc, root, false).unwrap();
//! assert_eq!(out, r#"{"name":"Ada","scores":[95,87,91.5]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`document`]: the arena, node factory, and accessors
//! - [`decoder`]: JSON text to node tree (strict, depth-bounded)
//! - [`encoder`]: node tree to JSON text (pretty/compact, three buffer strategies)
//! - [`codec`]: string escaping and number formatting shared by both
//! - [`minify`]: in-place whitespace/comment stripping of raw text
//! - [`convert`]: `serde_json::Value` interop
//! - [`error`]: typed errors for every fallible operation

pub mod codec;
pub mod convert;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod minify;
pub mod node;
mod query;
mod surgery;

pub use convert::{from_json_value, to_json_value};
pub use decoder::{parse, parse_bytes, parse_prefix, parse_with_depth, MAX_NESTING_DEPTH};
pub use document::Document;
pub use encoder::{print, print_buffered, print_to_fixed};
pub use error::{ArborError, ParseError, ParseErrorKind, Result};
pub use minify::{minify, minify_string, minify_with, MinifyOptions};
pub use node::{Kind, NodeId, Text};
