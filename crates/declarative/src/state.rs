//! Local state of a single resource
//!
//! The engine's per-resource attribute bag, modelled as two explicit
//! snapshots instead of a stateful object queried imperatively:
//!
//! - `prior`: what was last synchronized with the remote system
//! - `desired`: what the configuration asks for
//!
//! An attribute "has a change" when the two snapshots disagree on it.
//! Reconcilers write remote values with [`LocalState::set`] or
//! [`LocalState::apply_remote`], which update both snapshots at once.

use crate::types::{AttrValue, Attributes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attribute stamped after every successful update
pub const LAST_UPDATED: &str = "last_updated";

/// Per-resource state: an optional opaque id plus two attribute snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    id: Option<String>,
    #[serde(default)]
    prior: Attributes,
    #[serde(default)]
    desired: Attributes,
}

impl LocalState {
    /// Empty state with no id and no attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a resource that has never been synchronized
    ///
    /// Every configured attribute counts as changed.
    pub fn from_config(desired: Attributes) -> Self {
        Self {
            id: None,
            prior: Attributes::new(),
            desired,
        }
    }

    /// State for a resource that is in sync with the remote system
    pub fn synced(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: Some(id.into()),
            prior: attributes.clone(),
            desired: attributes,
        }
    }

    /// The opaque id correlating this state with a remote object
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether the resource is present (has an id)
    pub fn is_present(&self) -> bool {
        self.id().is_some()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Clear the id, marking the resource absent
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Get an attribute from the desired snapshot
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.desired.get(name)
    }

    /// Get a scalar attribute, or `""` when unset or not a scalar
    pub fn get_str(&self, name: &str) -> &str {
        self.get(name).and_then(AttrValue::as_str).unwrap_or("")
    }

    /// Get a list attribute, or an empty slice when unset or not a list
    pub fn get_list(&self, name: &str) -> &[String] {
        self.get(name).and_then(AttrValue::as_list).unwrap_or(&[])
    }

    /// The last synchronized snapshot
    pub fn prior(&self) -> &Attributes {
        &self.prior
    }

    /// The configured snapshot
    pub fn desired(&self) -> &Attributes {
        &self.desired
    }

    /// Write a synchronized value into both snapshots
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        self.prior.insert(name.clone(), value.clone());
        self.desired.insert(name, value);
    }

    /// Overwrite attributes from a remote response in one step
    pub fn apply_remote(&mut self, attributes: Attributes) {
        for (name, value) in attributes {
            self.set(name, value);
        }
    }

    /// Replace the desired snapshot with new configuration
    ///
    /// Attributes the configuration does not mention (computed ones) keep
    /// their synchronized value, so they never show up as changes.
    pub fn configure(&mut self, config: Attributes) {
        let mut desired = self.prior.clone();
        desired.extend(config);
        self.desired = desired;
    }

    /// Whether the two snapshots disagree on an attribute
    pub fn has_change(&self, name: &str) -> bool {
        self.prior.get(name) != self.desired.get(name)
    }

    /// Names of all attributes whose snapshots disagree, sorted
    pub fn changed_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .prior
            .keys()
            .chain(self.desired.keys())
            .map(String::as_str)
            .filter(|name| self.has_change(name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Whether any attribute has a change
    pub fn has_changes(&self) -> bool {
        !self.changed_attributes().is_empty()
    }

    /// Stamp the `last_updated` attribute
    pub fn stamp_last_updated(&mut self, at: DateTime<Utc>) {
        self.set(LAST_UPDATED, format_last_updated(at));
    }
}

/// Format a timestamp the way `last_updated` is stored (RFC 850 style)
pub fn format_last_updated(at: DateTime<Utc>) -> String {
    at.format("%A, %d-%b-%y %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), AttrValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_new_state_is_absent() {
        let state = LocalState::new();
        assert!(!state.is_present());
        assert_eq!(state.get_str("anything"), "");
        assert!(state.get_list("anything").is_empty());
    }

    #[test]
    fn test_empty_id_is_absent() {
        let mut state = LocalState::new();
        state.set_id("");
        assert!(!state.is_present());
        assert_eq!(state.id(), None);
    }

    #[test]
    fn test_from_config_marks_everything_changed() {
        let state = LocalState::from_config(attrs(&[("key", "env"), ("value", "prod")]));
        assert_eq!(state.changed_attributes(), vec!["key", "value"]);
    }

    #[test]
    fn test_synced_has_no_changes() {
        let state = LocalState::synced("abc", attrs(&[("key", "env")]));
        assert_eq!(state.id(), Some("abc"));
        assert!(!state.has_changes());
    }

    #[test]
    fn test_configure_detects_only_changed_attributes() {
        let mut state = LocalState::synced("abc", attrs(&[("key", "env"), ("value", "prod")]));
        state.configure(attrs(&[("key", "env"), ("value", "staging")]));

        assert!(!state.has_change("key"));
        assert!(state.has_change("value"));
        assert_eq!(state.get_str("value"), "staging");
        assert_eq!(state.prior()["value"], AttrValue::from("prod"));
    }

    #[test]
    fn test_configure_keeps_computed_attributes() {
        let mut state = LocalState::synced("abc", attrs(&[("name", "x")]));
        state.set("aliases", vec!["a".to_string()]);
        state.configure(attrs(&[("name", "x")]));

        assert_eq!(state.get_list("aliases"), &["a".to_string()]);
        assert!(!state.has_changes());
    }

    #[test]
    fn test_apply_remote_synchronizes_both_snapshots() {
        let mut state = LocalState::from_config(attrs(&[("value", "prod")]));
        state.apply_remote(attrs(&[("value", "prod"), ("key", "env")]));
        assert!(!state.has_changes());
        assert_eq!(state.get_str("key"), "env");
    }

    #[test]
    fn test_stamp_last_updated_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let mut state = LocalState::new();
        state.stamp_last_updated(at);
        assert_eq!(state.get_str(LAST_UPDATED), "Tuesday, 05-Mar-24 14:07:09 UTC");
    }
}
