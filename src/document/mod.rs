//! Module for typed access to a parsed JSON document
//!
//! [`Document`] is the entry point: it parses a complete JSON document from a
//! [`ParseSource`] and exposes the members of the root object through typed
//! lookup methods such as [`Document::get_member`] and
//! [`Document::get_array_member`]. Access failures are reported as
//! [`DocumentError`] values carrying an [`ErrorKind`].

use thiserror::Error;

/// Kind of a document access failure
///
/// The kind is the complete payload of a [`DocumentError`]; the human-readable
/// message is derived from it and from nothing else.
#[derive(PartialEq, Eq, Clone, Copy, strum::Display, Debug)]
pub enum ErrorKind {
    /// Success sentinel of the error table; never carried by a raised error
    NoError,
    /// The root object has no member with the requested name
    MemberNotFound,
    /// The member exists but its value is not an array
    NotAnArray,
    /// The value cannot be read as the requested type
    ///
    /// Raised for scalar access to a member whose value is not a string
    /// (only string-encoded scalars are coercible), for nested-document
    /// access to a member whose value is not an object, for array elements
    /// which are neither strings nor objects, and for a parsed document
    /// whose top-level value is not an object.
    UnsupportedType,
    /// A member which passed validation unexpectedly disappeared during lookup
    InvalidValue,
    /// A precondition was violated
    ///
    /// Raised for an empty member name, for member access on an unparsed
    /// document, and for a document source file which could not be read.
    Precondition,
}

/// Error raised when parsing or typed member access fails
///
/// The error carries only its [`ErrorKind`]; see there for the failure
/// categories.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
#[error("document access error {kind}")]
pub struct DocumentError {
    /// Kind of the error
    pub kind: ErrorKind,
}

/// Creates a [`DocumentError`] carrying the kind
impl From<ErrorKind> for DocumentError {
    fn from(kind: ErrorKind) -> Self {
        DocumentError { kind }
    }
}

mod coerce;
mod tree_document;

pub use coerce::TextScalar;
// Re-export the document implementation under the `document` module
pub use tree_document::*;
