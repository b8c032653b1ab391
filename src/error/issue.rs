//! Schema issue types.
//!
//! This module provides [`Issue`] for single validation failures and
//! [`Issues`] for accumulating them across fields.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::FieldPath;

/// What went wrong, in broad strokes.
///
/// The kind is informational. Presentation code keys off the issue path and
/// message only; the message text (usually a translation key) already says
/// which rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// The value had the wrong primitive type.
    TypeMismatch,
    /// A required value was absent.
    MissingRequired,
    /// A format, length, equality or custom constraint failed.
    ConstraintViolation,
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueKind::TypeMismatch => "type_mismatch",
            IssueKind::MissingRequired => "missing_required",
            IssueKind::ConstraintViolation => "constraint_violation",
        };
        f.write_str(name)
    }
}

/// A single located validation failure.
///
/// # Example
///
/// ```rust
/// use fieldwork::{FieldPath, Issue, IssueKind};
///
/// let issue = Issue::new(FieldPath::from_field("email"), "auth.validation.email")
///     .with_kind(IssueKind::ConstraintViolation);
///
/// assert_eq!(issue.path.head_key().as_deref(), Some("email"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Where the failing value lives.
    pub path: FieldPath,
    /// The message or translation key shown to the user.
    pub message: String,
    pub kind: IssueKind,
}

impl Issue {
    /// Creates a constraint-violation issue at `path`.
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            kind: IssueKind::ConstraintViolation,
        }
    }

    /// Sets the issue kind and returns self for chaining.
    pub fn with_kind(mut self, kind: IssueKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(form)".to_string()
        } else {
            self.path.to_string()
        };
        write!(f, "{}: {}", path_str, self.message)
    }
}

impl std::error::Error for Issue {}

/// A non-empty, ordered collection of issues.
///
/// `Issues` wraps a `NonEmptyVec<Issue>` so a failed validation always has at
/// least one issue to show. It implements `Semigroup`, which is how per-field
/// results are folded together without losing order.
///
/// ```rust
/// use fieldwork::{FieldPath, Issue, Issues};
/// use stillwater::prelude::*;
///
/// let name = Issues::single(Issue::new(FieldPath::from_field("fullName"), "required"));
/// let email = Issues::single(Issue::new(FieldPath::from_field("email"), "invalid"));
///
/// let combined = name.combine(email);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined.first().message, "required");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issues(NonEmptyVec<Issue>);

impl Issues {
    pub fn single(issue: Issue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Builds a collection from a vec, or returns None when the vec is empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    pub fn first(&self) -> &Issue {
        self.0.head()
    }

    /// Returns every issue whose path starts with the given top-level field.
    pub fn for_field(&self, field: &str) -> Vec<&Issue> {
        self.0
            .iter()
            .filter(|issue| issue.path.head_key().as_deref() == Some(field))
            .collect()
    }

    pub fn with_kind(&self, kind: IssueKind) -> Vec<&Issue> {
        self.0.iter().filter(|issue| issue.kind == kind).collect()
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0.into_vec()
    }
}

impl Semigroup for Issues {
    fn combine(self, other: Self) -> Self {
        Issues(self.0.combine(other.0))
    }
}

impl Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for Issues {}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = Box<dyn Iterator<Item = &'a Issue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

// Schemas are shared across threads behind Arc; keep the issue types Send + Sync.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Issues>();
    assert_sync::<Issues>();
};
