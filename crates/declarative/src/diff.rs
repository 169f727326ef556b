//! Attribute-level diff computation

use crate::state::LocalState;
use crate::types::AttrValue;
use serde::{Deserialize, Serialize};

/// A single attribute whose snapshots disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDiff {
    /// Attribute name
    pub name: String,
    /// Last synchronized value
    pub old: Option<AttrValue>,
    /// Configured value
    pub new: Option<AttrValue>,
}

impl AttributeDiff {
    /// Check if this diff sets a previously unset attribute
    pub fn is_addition(&self) -> bool {
        self.old.is_none() && self.new.is_some()
    }

    /// Check if this diff unsets an attribute
    pub fn is_removal(&self) -> bool {
        self.old.is_some() && self.new.is_none()
    }
}

/// Compute the diff between the prior and desired snapshots
///
/// Returns only attributes that differ, sorted by name.
pub fn diff_attributes(state: &LocalState) -> Vec<AttributeDiff> {
    state
        .changed_attributes()
        .into_iter()
        .map(|name| AttributeDiff {
            name: name.to_string(),
            old: state.prior().get(name).cloned(),
            new: state.desired().get(name).cloned(),
        })
        .collect()
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of attributes being set for the first time
    pub additions: usize,
    /// Number of attributes being unset
    pub removals: usize,
    /// Number of attributes changing value
    pub modifications: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[AttributeDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            if diff.is_addition() {
                summary.additions += 1;
            } else if diff.is_removal() {
                summary.removals += 1;
            } else {
                summary.modifications += 1;
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
