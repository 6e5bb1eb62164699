//! Pure domain layer for `ghpm`.
//!
//! Everything in here is free of I/O: issue and project types, the field alias
//! resolver, the triage query matcher and the typed errors the engine reports.
//! The binary wires these to the GitHub client.

pub mod error;
pub mod fields;
pub mod issue;
pub mod outcome;
pub mod project;
pub mod query;
pub mod rules;

pub use error::{AssignmentError, FieldError, IssueRefError, LinkFailure, classify_link_failure, is_already_member};
pub use fields::{FieldAlias, FieldAliasConfig, FieldResolver, parse_field_assignments};
pub use issue::{HierarchyNode, Issue, IssueRef, IssueState, RepoRef};
pub use outcome::{BatchSummary, IssueOutcome, OutcomeStatus};
pub use project::{FieldDataType, FieldOption, FieldValue, ItemContent, ItemsPage, Project, ProjectField, ProjectItem, RawProjectItem};
pub use query::{Qualifier, Query, matches};
pub use rules::{TriageApply, TriageRule};
