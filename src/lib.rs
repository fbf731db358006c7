#![warn(missing_docs)]
#![forbid(unsafe_code)]
// Allow needless `return` because that makes it sometimes more obvious that
// an expression is the result of the function
#![allow(clippy::needless_return)]
// Allow `assert_eq!(true, ...)` because in some cases it is used to check a bool
// value and not a 'flag' / 'state', and `assert_eq!` makes that more explicit
#![allow(clippy::bool_assert_comparison)]
// Enable 'unused' warnings for doc tests (are disabled by default)
#![doc(test(no_crate_inject))]
#![doc(test(attr(warn(unused))))]
// Fail on warnings in doc tests
#![doc(test(attr(deny(warnings))))]
// When `docsrs` configuration flag is set enable banner for features in documentation
// See https://stackoverflow.com/q/61417452
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Jsondoc is a typed-access façade over a parsed JSON document.
//!
//! It loads a complete JSON document from a file or from in-memory text and
//! exposes the members of the root object through typed lookup methods. It is
//! *not* an object mapper which converts structs to JSON and vice versa, a
//! dedicated library such as [Serde](https://github.com/serde-rs/json) should
//! be used for that; Jsondoc is aimed at configuration-style documents whose
//! shape is checked member by member at the call site.
//!
//! # Terminology
//!
//! This crate uses the same terminology as the JSON specification:
//!
//! - *object*: `{ ... }`
//!   - *member*: Entry in an object. For example the JSON object `{"a": "1"}` has the member
//!     `"a": "1"` where `"a"` is the member *name* and `"1"` is the member *value*.
//! - *array*: `[ ... ]`
//! - *string*: string value, for example `"text in \"quotes\""`
//!
//! A *document* is the parsed wrapper around one JSON object; a *nested
//! document* is a document whose root is an object somewhere below the
//! top-level object of the tree it was extracted from.
//!
//! Scalar member values are expected to be *string-encoded*: `{"port": "8080"}`
//! rather than `{"port": 8080}`. Typed access parses the string into the
//! requested type; a member holding a native JSON number is rejected with
//! [`ErrorKind::UnsupportedType`](document::ErrorKind::UnsupportedType).
//!
//! # Usage examples
//!
//! ## Typed member access
//!
//! ```
//! # use jsondoc::document::{Document, ParseSource};
//! let mut document = Document::new();
//! let parsed = document.parse(ParseSource::Text(
//!     r#"{"port": "8080", "hosts": ["alpha", "beta"]}"#.to_owned(),
//! ))?;
//! assert!(parsed);
//!
//! let port: i32 = document.get_member("port")?;
//! assert_eq!(8080, port);
//!
//! let hosts: Vec<String> = document.get_array_member("hosts")?;
//! assert_eq!(vec!["alpha".to_owned(), "beta".to_owned()], hosts);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Member iteration
//!
//! ```
//! # use jsondoc::document::{Document, ParseSource};
//! let mut document = Document::new();
//! document.parse(ParseSource::Text(r#"{"a": "1", "b": "2"}"#.to_owned()))?;
//!
//! // Prints "a = 1", "b = 2", in source order
//! for member in document.members()? {
//!     let value: i64 = member.value()?;
//!     println!("{} = {}", member.name(), value);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;

mod comments;
mod input;
