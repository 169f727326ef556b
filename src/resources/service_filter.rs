//! Saved service filter data sources: `filter` (one, by field) and
//! `filters` (all)

use super::filtered::{FilteredDataSource, Listed};
use anyhow::Result;
use catalog::{Client, Filter};
use chrono::Utc;
use declarative::{AttrValue, Attributes, LocalState, Reconciler, ReconcilerKind};

pub const TYPE_NAME: &str = "filter";
pub const LIST_TYPE_NAME: &str = "filters";

pub const NAME: &str = "name";
pub const IDS: &str = "ids";
pub const NAMES: &str = "names";

pub type FilterDataSource = FilteredDataSource<Filter>;

impl Listed for Filter {
    const TYPE_NAME: &'static str = TYPE_NAME;

    fn list(client: &Client) -> catalog::Result<Vec<Self>> {
        client.list_filters()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn to_attributes(&self) -> Attributes {
        Attributes::from([(NAME.to_string(), AttrValue::from(self.name.as_str()))])
    }
}

/// Parallel `ids` and `names` lists, in listing order
pub fn list_attributes(filters: &[Filter]) -> Attributes {
    let (ids, names): (Vec<String>, Vec<String>) = filters
        .iter()
        .map(|f| (f.id.clone(), f.name.clone()))
        .unzip();
    Attributes::from([
        (IDS.to_string(), AttrValue::from(ids)),
        (NAMES.to_string(), AttrValue::from(names)),
    ])
}

/// Lists every saved filter
///
/// The listing has no remote identity of its own, so its id is the time
/// of the read.
#[derive(Debug, Clone)]
pub struct FiltersDataSource {
    client: Client,
}

impl FiltersDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Reconciler for FiltersDataSource {
    fn type_name(&self) -> &'static str {
        LIST_TYPE_NAME
    }

    fn kind(&self) -> ReconcilerKind {
        ReconcilerKind::DataSource
    }

    fn read(&self, state: &mut LocalState) -> Result<()> {
        let filters = self.client.list_filters()?;
        log::debug!("Listed {} filter(s)", filters.len());
        state.set_id(Utc::now().to_rfc3339());
        state.apply_remote(list_attributes(&filters));
        Ok(())
    }
}
