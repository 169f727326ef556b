//! Data sources that select one listed entity by a field filter
//!
//! The criterion is validated before the listing call, so a malformed
//! filter never reaches the remote API.

use crate::filter::{FilterCriterion, Filterable, select_one};
use anyhow::Result;
use catalog::Client;
use declarative::{Attributes, LocalState, Reconciler, ReconcilerKind};
use std::fmt;
use std::marker::PhantomData;

/// An entity type that is fetched as a full listing
pub trait Listed: Filterable + Sized {
    /// Data source type name
    const TYPE_NAME: &'static str;

    fn list(client: &Client) -> catalog::Result<Vec<Self>>;

    fn id(&self) -> &str;

    fn to_attributes(&self) -> Attributes;
}

/// Reads the single `T` matching the configured `filter` block
pub struct FilteredDataSource<T> {
    client: Client,
    entity: PhantomData<fn() -> T>,
}

impl<T> FilteredDataSource<T> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            entity: PhantomData,
        }
    }
}

impl<T: Listed> fmt::Debug for FilteredDataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredDataSource")
            .field("type_name", &T::TYPE_NAME)
            .finish_non_exhaustive()
    }
}

impl<T: Listed> Reconciler for FilteredDataSource<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn kind(&self) -> ReconcilerKind {
        ReconcilerKind::DataSource
    }

    fn read(&self, state: &mut LocalState) -> Result<()> {
        let criterion = FilterCriterion::from_state(state);
        criterion.validate::<T>()?;

        let candidates = T::list(&self.client)?;
        let found = select_one(&candidates, &criterion.field, &criterion.value)?;
        log::debug!(
            "{} {}=={} matched {}",
            T::TYPE_NAME,
            criterion.field,
            criterion.value,
            found.id()
        );

        state.set_id(found.id());
        state.apply_remote(found.to_attributes());
        Ok(())
    }
}
