//! Lifecycle data source, selected by `alias`, `id`, `index` or `name`

use super::filtered::{FilteredDataSource, Listed};
use catalog::{Client, Lifecycle};
use declarative::{AttrValue, Attributes};

pub const TYPE_NAME: &str = "lifecycle";

pub const ALIAS: &str = "alias";
pub const NAME: &str = "name";
pub const INDEX: &str = "index";

pub type LifecycleDataSource = FilteredDataSource<Lifecycle>;

impl Listed for Lifecycle {
    const TYPE_NAME: &'static str = TYPE_NAME;

    fn list(client: &Client) -> catalog::Result<Vec<Self>> {
        client.list_lifecycles()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn to_attributes(&self) -> Attributes {
        Attributes::from([
            (ALIAS.to_string(), AttrValue::from(self.alias.as_str())),
            (NAME.to_string(), AttrValue::from(self.name.as_str())),
            (INDEX.to_string(), AttrValue::from(self.index.to_string())),
        ])
    }
}
