use std::borrow::Cow;
use std::path::PathBuf;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::comments::{self, BlockCommentNotClosed};
use crate::document::{DocumentError, ErrorKind, TextScalar};
use crate::input::RawInput;

/// Source a document is parsed from
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ParseSource {
    /// Path of a file whose complete contents are the document text
    ///
    /// The file is opened read-only and consumed in fixed-size chunks until
    /// the end of the file; reading blocks the calling thread until the file
    /// has been consumed completely.
    File(PathBuf),
    /// Document text supplied directly by the caller, without file I/O
    Text(String),
}

/// Settings to customize which document text [`Document::parse`] accepts
///
/// These settings are used by [`Document::new_custom`]. To avoid repeating the
/// default values for unchanged settings `..Default::default()` can be used:
/// ```
/// # use jsondoc::document::ParserSettings;
/// ParserSettings {
///     allow_comments: false,
///     // For all other settings use the default
///     ..Default::default()
/// }
/// # ;
/// ```
#[derive(Clone, Debug)]
pub struct ParserSettings {
    /// Whether to allow comments in the document text
    ///
    /// The JSON specification does not allow comments. However, configuration
    /// files are frequently annotated, so tolerance is on by default. When
    /// enabled the following two comment variants can be used where the JSON
    /// specification allows whitespace:
    /// - end of line comments: `// ...`\
    ///   The comment spans to the end of the line (next `\r\n`, `\r` or `\n`)
    /// - block comments: `/* ... */`\
    ///   The comment ends at the next `*/` and can include line breaks
    ///
    /// # Examples
    /// ```json
    /// {
    ///     // The port the service binds to
    ///     "port": "8080" /* string-encoded */
    /// }
    /// ```
    pub allow_comments: bool,
}

impl Default for ParserSettings {
    /// Creates the default parser settings
    ///
    /// - comments: allowed
    fn default() -> Self {
        ParserSettings {
            allow_comments: true,
        }
    }
}

/// Piece of the back-reference path from the tree root to a nested object
#[derive(PartialEq, Eq, Clone, Debug)]
enum PathPiece {
    /// Name of a JSON object member
    ObjectMember(String),
    /// Index (starting at 0) of a JSON array item
    ArrayItem(usize),
}

/// Shared view of one object node within a parsed tree
///
/// The complete tree is kept alive by the `Rc`; the path identifies the
/// object node this view is rooted at. Every document holding a view of the
/// same tree shares ownership, so a nested document stays valid after the
/// document it was extracted from is dropped.
#[derive(Clone, Debug)]
struct ObjectView {
    tree: Rc<Value>,
    path: Vec<PathPiece>,
}

impl ObjectView {
    fn node(&self) -> &Value {
        let mut node: &Value = &self.tree;
        for piece in &self.path {
            node = match piece {
                PathPiece::ObjectMember(name) => node.as_object().and_then(|o| o.get(name)),
                PathPiece::ArrayItem(index) => node.as_array().and_then(|a| a.get(*index)),
            }
            .unwrap_or_else(|| {
                panic!("Unexpected: view path does not resolve in the parsed tree; report this to the Jsondoc maintainers")
            });
        }
        node
    }

    fn object(&self) -> &Map<String, Value> {
        self.node().as_object().unwrap_or_else(|| {
            panic!("Unexpected: view path does not point at an object; report this to the Jsondoc maintainers")
        })
    }

    /// Creates a view of a node below this view's object, sharing the tree
    fn child(&self, pieces: impl IntoIterator<Item = PathPiece>) -> ObjectView {
        let mut path = self.path.clone();
        path.extend(pieces);
        ObjectView {
            tree: Rc::clone(&self.tree),
            path,
        }
    }
}

/// A parsed JSON document with typed member access
///
/// A document starts out *unparsed*; [`parse`](Self::parse) transitions it to
/// *parsed*, after which the members of the root object can be read. All
/// accessors validate membership and value type before coercion and report
/// failures as [`DocumentError`].
///
/// Scalar member values must be string-encoded (`{"port": "8080"}`); see
/// [`TextScalar`] for the coercion rules. Nested objects are read as further
/// `Document` values which share ownership of the parsed tree and therefore
/// may outlive the document they were extracted from. Cloning a document is
/// cheap and shares the tree as well.
///
/// A document is not designed for concurrent access from multiple threads;
/// callers needing concurrency must use one document per thread.
///
/// # Examples
/// ```
/// # use jsondoc::document::{Document, ParseSource};
/// let mut document = Document::new();
/// let parsed = document.parse(ParseSource::Text(
///     r#"{"retries": "3", "verbose": "1"}"#.to_owned(),
/// ))?;
/// assert!(parsed);
///
/// assert_eq!(3, document.get_member::<i32>("retries")?);
/// assert_eq!(true, document.get_member::<bool>("verbose")?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Document {
    /// `Some` iff the document is parsed
    root: Option<ObjectView>,
    settings: ParserSettings,
}

impl Document {
    /// Creates an unparsed document with [default settings](ParserSettings::default)
    pub fn new() -> Self {
        Document::new_custom(ParserSettings::default())
    }

    /// Creates an unparsed document with custom settings
    ///
    /// The settings determine which document text [`parse`](Self::parse)
    /// accepts. Nested documents inherit the settings of the document they
    /// are extracted from.
    pub fn new_custom(settings: ParserSettings) -> Self {
        Document {
            root: None,
            settings,
        }
    }

    /// Whether this document holds a parsed tree
    ///
    /// `true` after a successful [`parse`](Self::parse), and for every nested
    /// document obtained from an accessor. While `false`, all accessors fail
    /// with [`ErrorKind::Precondition`].
    pub fn is_parsed(&self) -> bool {
        self.root.is_some()
    }

    /// Parses the complete document from the source
    ///
    /// Previous state is discarded: repeated calls re-parse, and a failed
    /// call leaves the document unparsed.
    ///
    /// Returns `Ok(false)` when the text is not well-formed JSON; that
    /// includes an unterminated block comment, and any comment when comments
    /// are [disallowed](ParserSettings::allow_comments).
    ///
    /// # Errors
    /// - [`ErrorKind::Precondition`] when a [`ParseSource::File`] cannot be
    ///   opened or read.
    /// - [`ErrorKind::UnsupportedType`] when the text is well-formed JSON but
    ///   its top-level value is not an object.
    ///
    /// Errors are logged through [`tracing`] before they are returned; the
    /// recoverable `Ok(false)` outcome is logged at debug level only.
    pub fn parse(&mut self, source: ParseSource) -> Result<bool, DocumentError> {
        self.root = None;

        let input = match &source {
            ParseSource::File(path) => RawInput::from_file(path).map_err(|e| {
                let error = DocumentError::from(ErrorKind::Precondition);
                tracing::error!(path = %path.display(), io_error = %e, "{error}");
                error
            })?,
            ParseSource::Text(text) => RawInput::from_text(text),
        };

        let bytes = if self.settings.allow_comments {
            match comments::strip_comments(input.as_bytes()) {
                Ok(bytes) => bytes,
                Err(BlockCommentNotClosed) => {
                    tracing::debug!("document text has an unterminated block comment");
                    return Ok(false);
                }
            }
        } else {
            Cow::Borrowed(input.as_bytes())
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(tree @ Value::Object(_)) => {
                self.root = Some(ObjectView {
                    tree: Rc::new(tree),
                    path: Vec::new(),
                });
                Ok(true)
            }
            Ok(_) => {
                let error = DocumentError::from(ErrorKind::UnsupportedType);
                tracing::error!(reason = "top-level value is not an object", "{error}");
                Err(error)
            }
            Err(e) => {
                tracing::debug!(parse_error = %e, "document text is not well-formed JSON");
                Ok(false)
            }
        }
    }

    /// Whether the root object contains a member with that exact name
    ///
    /// `false` on an unparsed document.
    pub fn has_member(&self, key: &str) -> bool {
        self.root
            .as_ref()
            .is_some_and(|view| view.object().contains_key(key))
    }

    /// Whether the member's value is an array
    ///
    /// `false` when the member does not exist or the document is unparsed.
    pub fn is_array(&self, key: &str) -> bool {
        self.root
            .as_ref()
            .and_then(|view| view.object().get(key))
            .is_some_and(Value::is_array)
    }

    /// The guard every accessor runs first
    fn validation_check(&self, key: &str) -> Result<&ObjectView, DocumentError> {
        if key.is_empty() {
            return Err(ErrorKind::Precondition.into());
        }
        let view = self.root.as_ref().ok_or(ErrorKind::Precondition)?;
        if !view.object().contains_key(key) {
            return Err(ErrorKind::MemberNotFound.into());
        }
        Ok(view)
    }

    fn is_array_check(&self, key: &str) -> Result<(), DocumentError> {
        if !self.is_array(key) {
            return Err(ErrorKind::NotAnArray.into());
        }
        Ok(())
    }

    /// Reads the member's string-encoded value coerced to `T`
    ///
    /// Only string values are coercible; see [`TextScalar`] for the coercion
    /// rules per type. It might be necessary to help the Rust compiler a bit
    /// by explicitly specifying the type in case it cannot be inferred
    /// automatically.
    ///
    /// # Examples
    /// ```
    /// # use jsondoc::document::{Document, ParseSource};
    /// # let mut document = Document::new();
    /// # document.parse(ParseSource::Text(r#"{"timeout": "30"}"#.to_owned()))?;
    /// let timeout: i64 = document.get_member("timeout")?;
    /// assert_eq!(30, timeout);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    /// - [`ErrorKind::Precondition`] for an empty key or an unparsed document.
    /// - [`ErrorKind::MemberNotFound`] when the member does not exist.
    /// - [`ErrorKind::UnsupportedType`] when the member's value is not a
    ///   string (native JSON numbers, booleans, arrays and objects are not
    ///   coercible).
    pub fn get_member<T: TextScalar>(&self, key: &str) -> Result<T, DocumentError> {
        let view = self.validation_check(key)?;
        let value = view.object().get(key).ok_or(ErrorKind::InvalidValue)?;
        match value.as_str() {
            Some(text) => Ok(T::from_text(text)),
            None => Err(ErrorKind::UnsupportedType.into()),
        }
    }

    /// Reads the member's object value as a nested document
    ///
    /// The nested document shares ownership of the parsed tree, so it remains
    /// usable after this document is dropped. Coercion does not apply here;
    /// the member's value must be a JSON object.
    ///
    /// # Examples
    /// ```
    /// # use jsondoc::document::{Document, ParseSource};
    /// # let mut document = Document::new();
    /// # document.parse(ParseSource::Text(r#"{"limits": {"depth": "4"}}"#.to_owned()))?;
    /// let limits = document.get_document("limits")?;
    /// assert_eq!(4, limits.get_member::<i32>("depth")?);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    /// - [`ErrorKind::Precondition`] for an empty key or an unparsed document.
    /// - [`ErrorKind::MemberNotFound`] when the member does not exist.
    /// - [`ErrorKind::UnsupportedType`] when the member's value is not an
    ///   object.
    pub fn get_document(&self, key: &str) -> Result<Document, DocumentError> {
        let view = self.validation_check(key)?;
        let value = view.object().get(key).ok_or(ErrorKind::InvalidValue)?;
        if !value.is_object() {
            return Err(ErrorKind::UnsupportedType.into());
        }
        Ok(Document {
            root: Some(view.child([PathPiece::ObjectMember(key.to_owned())])),
            settings: self.settings.clone(),
        })
    }

    /// Reads the member's array value as a `Vec` of elements
    ///
    /// Elements are returned in source order, one per array entry. Only two
    /// element types exist: `String` for arrays of JSON strings and
    /// [`Document`] for arrays of JSON objects ([`ArrayElement`] is sealed).
    /// Unlike scalar member access, string elements are read directly; no
    /// textual number coercion applies on the array path.
    ///
    /// # Examples
    /// ```
    /// # use jsondoc::document::{Document, ParseSource};
    /// # let mut document = Document::new();
    /// # document.parse(ParseSource::Text(r#"{"hosts": ["alpha", "beta"]}"#.to_owned()))?;
    /// let hosts: Vec<String> = document.get_array_member("hosts")?;
    /// assert_eq!(vec!["alpha".to_owned(), "beta".to_owned()], hosts);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    /// - [`ErrorKind::Precondition`] for an empty key or an unparsed document.
    /// - [`ErrorKind::MemberNotFound`] when the member does not exist.
    /// - [`ErrorKind::NotAnArray`] when the member's value is not an array.
    /// - [`ErrorKind::UnsupportedType`] when an element is not of the
    ///   requested type.
    pub fn get_array_member<T: ArrayElement>(&self, key: &str) -> Result<Vec<T>, DocumentError> {
        let view = self.validation_check(key)?;
        self.is_array_check(key)?;

        let items = view
            .object()
            .get(key)
            .and_then(Value::as_array)
            .ok_or(ErrorKind::InvalidValue)?;

        items
            .iter()
            .enumerate()
            .map(|(index, value)| {
                T::from_slot(ArraySlot {
                    view,
                    key,
                    index,
                    value,
                    settings: &self.settings,
                })
            })
            .collect()
    }

    /// Iterates over the members of the root object in source order
    ///
    /// The returned iterator is a lazy single-pass forward sequence over
    /// (name, value) pairs; restart it by calling `members` again. Member
    /// values are read with the same string-only coercion rule as
    /// [`get_member`](Self::get_member), without knowing the member names in
    /// advance.
    ///
    /// # Examples
    /// ```
    /// # use jsondoc::document::{Document, ParseSource};
    /// # let mut document = Document::new();
    /// # document.parse(ParseSource::Text(r#"{"a": "1", "b": "2"}"#.to_owned()))?;
    /// let mut names = Vec::new();
    /// for member in document.members()? {
    ///     names.push(member.name().to_owned());
    /// }
    /// assert_eq!(vec!["a".to_owned(), "b".to_owned()], names);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    /// [`ErrorKind::Precondition`] on an unparsed document.
    pub fn members(&self) -> Result<Members<'_>, DocumentError> {
        let view = self.root.as_ref().ok_or(ErrorKind::Precondition)?;
        Ok(Members {
            iter: view.object().iter(),
        })
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for super::Document {}
}

/// One array slot during extraction
#[doc(hidden)]
pub struct ArraySlot<'a> {
    view: &'a ObjectView,
    key: &'a str,
    index: usize,
    value: &'a Value,
    settings: &'a ParserSettings,
}

/// An element type [`Document::get_array_member`] can produce
///
/// Implemented for `String` (arrays of JSON strings) and [`Document`] (arrays
/// of JSON objects) only; the trait is sealed and cannot be implemented
/// outside of this crate. Numeric array elements are unsupported by design.
pub trait ArrayElement: sealed::Sealed + Sized {
    /// Extracts the element from its array slot
    #[doc(hidden)]
    fn from_slot(slot: ArraySlot<'_>) -> Result<Self, DocumentError>;
}

impl ArrayElement for String {
    fn from_slot(slot: ArraySlot<'_>) -> Result<Self, DocumentError> {
        match slot.value.as_str() {
            Some(text) => Ok(text.to_owned()),
            None => Err(ErrorKind::UnsupportedType.into()),
        }
    }
}

impl ArrayElement for Document {
    fn from_slot(slot: ArraySlot<'_>) -> Result<Self, DocumentError> {
        if !slot.value.is_object() {
            return Err(ErrorKind::UnsupportedType.into());
        }
        Ok(Document {
            root: Some(slot.view.child([
                PathPiece::ObjectMember(slot.key.to_owned()),
                PathPiece::ArrayItem(slot.index),
            ])),
            settings: slot.settings.clone(),
        })
    }
}

/// Iterator over the members of a document's root object, in source order
///
/// Created by [`Document::members`].
#[derive(Debug)]
pub struct Members<'a> {
    iter: serde_json::map::Iter<'a>,
}

impl<'a> Iterator for Members<'a> {
    type Item = Member<'a>;

    fn next(&mut self) -> Option<Member<'a>> {
        self.iter.next().map(|(name, value)| Member {
            name: name.as_str(),
            value,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// One member yielded by [`Members`]
#[derive(Clone, Copy, Debug)]
pub struct Member<'a> {
    name: &'a str,
    value: &'a Value,
}

impl<'a> Member<'a> {
    /// The member's name
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The member's string-encoded value coerced to `T`
    ///
    /// Applies the same string-only coercion rule as
    /// [`Document::get_member`].
    ///
    /// # Errors
    /// [`ErrorKind::UnsupportedType`] when the member's value is not a
    /// string.
    pub fn value<T: TextScalar>(&self) -> Result<T, DocumentError> {
        match self.value.as_str() {
            Some(text) => Ok(T::from_text(text)),
            None => Err(ErrorKind::UnsupportedType.into()),
        }
    }
}
