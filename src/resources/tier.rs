//! Tier data source, selected by `alias`, `id`, `index` or `name`

use super::filtered::{FilteredDataSource, Listed};
use catalog::{Client, Tier};
use declarative::{AttrValue, Attributes};

pub const TYPE_NAME: &str = "tier";

pub const ALIAS: &str = "alias";
pub const NAME: &str = "name";
pub const INDEX: &str = "index";

pub type TierDataSource = FilteredDataSource<Tier>;

impl Listed for Tier {
    const TYPE_NAME: &'static str = TYPE_NAME;

    fn list(client: &Client) -> catalog::Result<Vec<Self>> {
        client.list_tiers()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FILTER_FIELD, FILTER_VALUE};
    use catalog::{Error, ErrorCategory, MemoryBackend};
    use declarative::{LocalState, Reconciler};
    use std::sync::Arc;

    #[test]
    fn test_read_by_alias() {
        let backend = Arc::new(MemoryBackend::new());
        backend.add_tier("tier_1", "Mission Critical", 1);
        backend.add_tier("tier_2", "Business Critical", 2);
        let source = TierDataSource::new(Client::from_shared(backend));

        let mut state = LocalState::from_config(Attributes::from([
            (FILTER_FIELD.to_string(), AttrValue::from("alias")),
            (FILTER_VALUE.to_string(), AttrValue::from("tier_2")),
        ]));
        source.read(&mut state).unwrap();
        assert_eq!(state.get_str(NAME), "Business Critical");
        assert_eq!(state.get_str(INDEX), "2");
    }

    #[test]
    fn test_unsupported_field_makes_no_call() {
        let backend = Arc::new(MemoryBackend::new());
        let source = TierDataSource::new(Client::from_shared(backend.clone()));

        let mut state = LocalState::from_config(Attributes::from([
            (FILTER_FIELD.to_string(), AttrValue::from("color")),
            (FILTER_VALUE.to_string(), AttrValue::from("red")),
        ]));
        let err = source.read(&mut state).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>().unwrap().category(),
            ErrorCategory::Validation
        );
        assert_eq!(backend.total_calls(), 0);
    }
}
