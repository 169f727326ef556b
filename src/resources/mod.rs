//! Reconcilers for catalog entities
//!
//! Every entity type is a [`Reconciler`](declarative::Reconciler) with
//! its codec (`to_attributes` plus mutation inputs) beside it:
//! - `service` resource and data source
//! - `service_tag` resource
//! - `group` data source
//! - filter-driven data sources: `rubric_category`, `filter`,
//!   `lifecycle`, `tier`
//! - `filters` listing data source

pub mod filtered;
pub mod group;
pub mod lifecycle;
pub mod rubric_category;
pub mod service;
pub mod service_filter;
pub mod service_tag;
pub mod tier;

use catalog::Error;
use declarative::LocalState;

/// The id of a present state, or a configuration error
pub(crate) fn require_id<'a>(state: &'a LocalState, kind: &str) -> catalog::Result<&'a str> {
    state.id().ok_or_else(|| {
        Error::configuration(format!(
            "{kind} has no id, it must be created or imported first"
        ))
    })
}

/// A configured scalar, `None` when empty
pub(crate) fn non_empty(state: &LocalState, name: &str) -> Option<String> {
    Some(state.get_str(name))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The desired value of an attribute when it differs from the synced one
pub(crate) fn changed(state: &LocalState, name: &str) -> Option<String> {
    state
        .has_change(name)
        .then(|| state.get_str(name).to_string())
}

/// Mark configuration-only attributes as synchronized
///
/// These never come back from the remote side, so after a successful
/// write their desired value is the synced value.
pub(crate) fn accept_config(state: &mut LocalState, names: &[&str]) {
    for name in names {
        let value = state.get_str(name).to_string();
        state.set(*name, value);
    }
}

/// Turn a lookup result into `Some`, or `None` when the object is gone
///
/// A missing object clears the id so the next plan recreates it.
pub(crate) fn found_or_gone<T>(
    result: catalog::Result<T>,
    state: &mut LocalState,
    kind: &str,
) -> catalog::Result<Option<T>> {
    match result {
        Ok(entity) => Ok(Some(entity)),
        Err(e) if e.is_not_found() => {
            log::warn!(
                "{kind} {} no longer exists, removing it from state: {e}",
                state.id().unwrap_or_default()
            );
            state.clear_id();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{AttrValue, Attributes};

    fn synced(pairs: &[(&str, &str)]) -> LocalState {
        let attrs: Attributes = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), AttrValue::from(*v)))
            .collect();
        LocalState::synced("id-1", attrs)
    }

    #[test]
    fn test_changed_only_reports_differences() {
        let mut state = synced(&[("key", "env"), ("value", "prod")]);
        state.configure(
            [("value".to_string(), AttrValue::from("staging"))]
                .into_iter()
                .collect(),
        );

        assert_eq!(changed(&state, "key"), None);
        assert_eq!(changed(&state, "value").as_deref(), Some("staging"));
    }

    #[test]
    fn test_non_empty() {
        let state = synced(&[("product", ""), ("language", "rust")]);
        assert_eq!(non_empty(&state, "product"), None);
        assert_eq!(non_empty(&state, "language").as_deref(), Some("rust"));
        assert_eq!(non_empty(&state, "missing"), None);
    }

    #[test]
    fn test_accept_config() {
        let mut state = LocalState::from_config(
            [("service_alias".to_string(), AttrValue::from("payments"))]
                .into_iter()
                .collect(),
        );
        assert!(state.has_change("service_alias"));

        accept_config(&mut state, &["service_alias"]);
        assert!(!state.has_changes());
    }

    #[test]
    fn test_found_or_gone() {
        let mut state = synced(&[]);
        let kept = found_or_gone(Ok(7), &mut state, "service").unwrap();
        assert_eq!(kept, Some(7));
        assert!(state.is_present());

        let gone: Option<i32> =
            found_or_gone(Err(Error::not_found("service", "x")), &mut state, "service").unwrap();
        assert_eq!(gone, None);
        assert!(!state.is_present());
    }

    #[test]
    fn test_found_or_gone_propagates_other_errors() {
        let mut state = synced(&[]);
        let err = found_or_gone::<()>(
            Err(Error::Transport {
                message: "reset".into(),
            }),
            &mut state,
            "service",
        )
        .unwrap_err();

        assert!(matches!(err, Error::Transport { .. }));
        assert!(state.is_present());
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id(&synced(&[]), "tag").unwrap(), "id-1");
        assert!(require_id(&LocalState::new(), "tag").is_err());
    }
}
