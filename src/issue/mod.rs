//! Issues as seen by the sync engine.
//!
//! The host owns issues; this crate only reads them and attaches side effects
//! (labels, project items, field values, sub-issue links).

mod reference;
pub use reference::{IssueRef, RepoRef};

mod types;
pub use types::{HierarchyNode, Issue, IssueState};
