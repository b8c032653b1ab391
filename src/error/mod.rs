//! Issue types for validation failures.
//!
//! An [`Issue`] is one located schema violation; [`Issues`] is the non-empty
//! collection a failed validation carries.

mod issue;

pub use issue::{Issue, IssueKind, Issues};
