//! Reconciler trait for declarative state management
//!
//! A Reconciler is the per-entity-type state machine that moves a
//! [`LocalState`] between `Absent` (no id) and `Present` (id set,
//! attributes synchronized) by talking to a remote system.

use crate::state::LocalState;
use crate::types::{ApplyResult, ReconcilerKind};
use anyhow::{Result, bail};
use std::fmt;

/// Core trait for declarative resources and data sources
///
/// Every entity type implements this trait, which provides:
/// - Identity (type name, kind)
/// - Lifecycle operations (create, read, update, delete)
/// - Import from an opaque import string
///
/// Every operation either writes all attributes from a successful
/// response or leaves the state untouched. The one exception is
/// [`Reconciler::read`], which clears the id when the remote object is
/// gone so the next plan re-creates it.
///
/// # Example
///
/// ```ignore
/// use declarative::{LocalState, Reconciler, ReconcilerKind};
///
/// #[derive(Debug)]
/// struct Echo;
///
/// impl Reconciler for Echo {
///     fn type_name(&self) -> &'static str {
///         "echo"
///     }
///
///     fn kind(&self) -> ReconcilerKind {
///         ReconcilerKind::DataSource
///     }
///
///     fn read(&self, state: &mut LocalState) -> anyhow::Result<()> {
///         let value = state.get_str("input").to_string();
///         state.set_id(value.clone());
///         state.set("output", value);
///         Ok(())
///     }
/// }
/// ```
pub trait Reconciler: Send + Sync + fmt::Debug {
    /// Type name the engine addresses this reconciler by
    fn type_name(&self) -> &'static str;

    /// Whether this manages a remote object or only reads one
    fn kind(&self) -> ReconcilerKind {
        ReconcilerKind::Resource
    }

    /// Create the remote object from the desired attributes
    ///
    /// On success the state's id is set and all attributes are
    /// overwritten from the response.
    fn create(&self, _state: &mut LocalState) -> Result<()> {
        bail!("{} does not support create", self.type_name())
    }

    /// Refresh attributes from the remote object
    fn read(&self, state: &mut LocalState) -> Result<()>;

    /// Send a sparse patch of changed attributes to the remote object
    ///
    /// Returns [`ApplyResult::Updated`] when a patch was sent and
    /// [`ApplyResult::NoChange`] when nothing remote needed changing.
    fn update(&self, _state: &mut LocalState) -> Result<ApplyResult> {
        bail!("{} does not support update", self.type_name())
    }

    /// Delete the remote object and clear the id
    fn delete(&self, _state: &mut LocalState) -> Result<()> {
        bail!("{} does not support delete", self.type_name())
    }

    /// Reconstruct state from an import string, then read
    ///
    /// The default treats the whole import string as the id.
    fn import(&self, state: &mut LocalState, import_id: &str) -> Result<()> {
        if self.kind() == ReconcilerKind::DataSource {
            bail!("{} does not support import", self.type_name());
        }
        state.set_id(import_id);
        self.read(state)
    }
}

/// A boxed reconciler for type-erased storage
pub type BoxedReconciler = Box<dyn Reconciler>;

/// Extension trait for working with reconcilers
pub trait ReconcilerExt {
    /// Check if the reconciler only reads
    fn is_data_source(&self) -> bool;
}

impl<R: Reconciler + ?Sized> ReconcilerExt for R {
    fn is_data_source(&self) -> bool {
        self.kind() == ReconcilerKind::DataSource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Lookup;

    impl Reconciler for Lookup {
        fn type_name(&self) -> &'static str {
            "lookup"
        }

        fn kind(&self) -> ReconcilerKind {
            ReconcilerKind::DataSource
        }

        fn read(&self, state: &mut LocalState) -> Result<()> {
            state.set_id("found");
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Thing;

    impl Reconciler for Thing {
        fn type_name(&self) -> &'static str {
            "thing"
        }

        fn read(&self, state: &mut LocalState) -> Result<()> {
            let id = state.id().unwrap_or_default().to_string();
            state.set("echo", id);
            Ok(())
        }
    }

    #[test]
    fn test_data_source_rejects_lifecycle_operations() {
        let mut state = LocalState::new();
        let err = Lookup.create(&mut state).unwrap_err();
        assert!(err.to_string().contains("lookup does not support create"));
        assert!(Lookup.import(&mut state, "x").is_err());
        assert!(Lookup.is_data_source());
    }

    #[test]
    fn test_default_import_sets_id_then_reads() {
        let mut state = LocalState::new();
        Thing.import(&mut state, "abc").unwrap();
        assert_eq!(state.id(), Some("abc"));
        assert_eq!(state.get_str("echo"), "abc");
        assert!(!Thing.is_data_source());
    }
}
