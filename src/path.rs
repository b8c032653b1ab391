//! Field paths for locating issues inside submitted form values.
//!
//! This module provides [`FieldPath`] and [`PathSegment`]. A path is built
//! outer-to-inner while an object schema descends into its fields, so the
//! first segment is always the top-level form field that owns the issue.

use std::fmt::{self, Display};

/// A single step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field (e.g., `email`).
    Field(String),
    /// A positional index (e.g., `[0]`).
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }

    /// Renders the segment as a bare key: field names verbatim, indices as digits.
    pub fn as_key(&self) -> String {
        match self {
            PathSegment::Field(name) => name.clone(),
            PathSegment::Index(idx) => idx.to_string(),
        }
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// The location of a value inside a submitted form.
///
/// # Example
///
/// ```rust
/// use fieldwork::FieldPath;
///
/// let path = FieldPath::root()
///     .push_field("contacts")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.to_string(), "contacts[0].email");
/// assert_eq!(path.head_key().as_deref(), Some("contacts"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Creates an empty path: the whole form.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the outermost segment, or None for the root path.
    pub fn head(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    /// Returns the outermost segment rendered as a field key.
    ///
    /// This is the key an issue is filed under when issues are flattened
    /// into a per-field error map.
    pub fn head_key(&self) -> Option<String> {
        self.head().map(PathSegment::as_key)
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Field(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
