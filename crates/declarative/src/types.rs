//! Core types for declarative resource reconciliation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single attribute value crossing the engine boundary
///
/// Only scalars and ordered sequences of scalars are allowed; nested
/// structures are flattened by the entity codecs before they get here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// A plain string scalar
    Str(String),
    /// An ordered list of string scalars
    List(Vec<String>),
}

impl AttrValue {
    /// Borrow the scalar value, if this is a scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Borrow the list value, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Str(_) => None,
        }
    }

    /// Whether the value is an empty scalar or an empty list
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Flat attribute set keyed by schema attribute name
pub type Attributes = BTreeMap<String, AttrValue>;

/// Whether a reconciler manages a remote object or only reads one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcilerKind {
    /// Full lifecycle: create, read, update, delete, import
    Resource,
    /// Read-only lookup
    DataSource,
}

/// Result of applying one operation to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// Remote object was created
    Created,
    /// Local attributes were refreshed from the remote object
    Refreshed,
    /// Remote object was updated
    Updated,
    /// Remote object was deleted
    Deleted,
    /// Remote object vanished out-of-band; local id was cleared
    Gone,
    /// Remote object was imported into local state
    Imported,
    /// Nothing to do
    NoChange,
    /// Operation failed
    Failed { error: String },
    /// Operation was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a remote change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Deleted)
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub refreshed: usize,
    pub updated: usize,
    pub deleted: usize,
    pub gone: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of remote changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.created
            + self.refreshed
            + self.updated
            + self.deleted
            + self.gone
            + self.imported
            + self.skipped
            + self.failed
            + self.no_change
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &ExecuteSummary) {
        self.created += other.created;
        self.refreshed += other.refreshed;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.gone += other.gone;
        self.imported += other.imported;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.no_change += other.no_change;
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::Created => self.created += 1,
            ApplyResult::Refreshed => self.refreshed += 1,
            ApplyResult::Updated => self.updated += 1,
            ApplyResult::Deleted => self.deleted += 1,
            ApplyResult::Gone => self.gone += 1,
            ApplyResult::Imported => self.imported += 1,
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Don't call any reconciler, just report what would run
    pub dry_run: bool,
    /// Number of parallel workers
    pub jobs: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_value_accessors() {
        let s = AttrValue::from("prod");
        assert_eq!(s.as_str(), Some("prod"));
        assert!(s.as_list().is_none());

        let l = AttrValue::from(vec!["a".to_string()]);
        assert_eq!(l.as_list(), Some(&["a".to_string()][..]));
        assert!(l.as_str().is_none());
    }

    #[test]
    fn test_attr_value_empty() {
        assert!(AttrValue::from("").is_empty());
        assert!(AttrValue::List(Vec::new()).is_empty());
        assert!(!AttrValue::from("x").is_empty());
    }

    #[test]
    fn test_attr_value_serializes_untagged() {
        let json = serde_json::to_string(&AttrValue::from("x")).unwrap();
        assert_eq!(json, "\"x\"");
        let list: AttrValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(list, AttrValue::List(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ExecuteSummary::default();
        summary.add_result(&ApplyResult::Created);
        summary.add_result(&ApplyResult::Gone);
        summary.add_result(&ApplyResult::Failed {
            error: "boom".into(),
        });

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.total_changes(), 1);
        assert!(!summary.is_success());

        let mut other = ExecuteSummary::default();
        other.add_result(&ApplyResult::Updated);
        summary.merge(&other);
        assert_eq!(summary.total_changes(), 2);
    }

    #[test]
    fn test_apply_result_flags() {
        assert!(ApplyResult::Deleted.is_change());
        assert!(!ApplyResult::Refreshed.is_change());
        assert!(ApplyResult::Gone.is_success());
        assert!(
            !ApplyResult::Failed {
                error: String::new()
            }
            .is_success()
        );
    }
}
