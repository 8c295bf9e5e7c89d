//! Error types for document construction, surgery, parsing, and printing.

use std::fmt;

use thiserror::Error;

/// Why a chunk of JSON text was rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended in the middle of a value.
    UnexpectedEnd,
    /// A byte that cannot start or continue the current token.
    UnexpectedChar,
    /// Malformed number literal (leading zero, bare `.` or `e`, missing digits).
    BadNumber,
    /// Malformed escape sequence inside a string literal.
    BadEscape,
    /// A complete value was followed by non-whitespace input.
    TrailingGarbage,
    /// Nesting exceeded the configured depth limit.
    TooDeep,
}

impl ParseErrorKind {
    fn message(self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedEnd => "unexpected end of input",
            ParseErrorKind::UnexpectedChar => "unexpected character",
            ParseErrorKind::BadNumber => "malformed number",
            ParseErrorKind::BadEscape => "malformed escape sequence",
            ParseErrorKind::TrailingGarbage => "trailing characters after value",
            ParseErrorKind::TooDeep => "nesting too deep",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A parse failure, with the byte offset where it was detected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

/// Errors reported by document operations.
///
/// Every fallible operation is atomic: on error the tree is exactly as it was
/// before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArborError {
    /// The document's node budget is exhausted.
    #[error("node budget exhausted ({limit} nodes)")]
    Capacity { limit: usize },

    /// Operation applied to a node of the wrong kind (e.g. array insert on a
    /// number).
    #[error("operation applied to the wrong node kind")]
    WrongKind,

    /// The node already has a parent and cannot be attached or destroyed
    /// directly.
    #[error("node is already attached to a parent")]
    AlreadyAttached,

    /// The identified child is not present in the container.
    #[error("no matching child in this container")]
    NotFound,

    /// The node id refers to a slot that has been freed (or recycled).
    #[error("stale node id: the node has been freed")]
    Stale,

    /// Attaching here would make the node an ancestor of itself.
    #[error("attaching here would create a cycle")]
    WouldCycle,

    /// A tree was deeper than the printer's nesting limit.
    #[error("nesting deeper than the supported limit")]
    TooDeep,

    /// Byte input was not valid UTF-8.
    #[error("input is not valid UTF-8")]
    Encoding,

    /// The input text was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ArborError>;
