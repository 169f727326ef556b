//! Rubric category data source, selected by `id` or `name`

use super::filtered::{FilteredDataSource, Listed};
use catalog::{Category, Client};
use declarative::{AttrValue, Attributes};

pub const TYPE_NAME: &str = "rubric_category";

pub const NAME: &str = "name";

pub type RubricCategoryDataSource = FilteredDataSource<Category>;

impl Listed for Category {
    const TYPE_NAME: &'static str = TYPE_NAME;

    fn list(client: &Client) -> catalog::Result<Vec<Self>> {
        client.list_categories()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn to_attributes(&self) -> Attributes {
        Attributes::from([(NAME.to_string(), AttrValue::from(self.name.as_str()))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FILTER_FIELD, FILTER_VALUE};
    use catalog::{Error, ErrorCategory, MemoryBackend};
    use declarative::{LocalState, Reconciler, ReconcilerKind};
    use std::sync::Arc;

    fn filter_state(field: &str, value: &str) -> LocalState {
        LocalState::from_config(Attributes::from([
            (FILTER_FIELD.to_string(), AttrValue::from(field)),
            (FILTER_VALUE.to_string(), AttrValue::from(value)),
        ]))
    }

    fn setup() -> (Arc<MemoryBackend>, RubricCategoryDataSource) {
        let backend = Arc::new(MemoryBackend::new());
        backend.add_category("Security");
        backend.add_category("Reliability");
        let source = RubricCategoryDataSource::new(Client::from_shared(backend.clone()));
        (backend, source)
    }

    #[test]
    fn test_is_a_data_source() {
        let (_backend, source) = setup();
        assert_eq!(source.type_name(), TYPE_NAME);
        assert_eq!(source.kind(), ReconcilerKind::DataSource);
    }

    #[test]
    fn test_read_by_name() {
        let (backend, source) = setup();
        let mut state = filter_state("name", "Reliability");

        source.read(&mut state).unwrap();
        assert!(state.is_present());
        assert_eq!(state.get_str(NAME), "Reliability");
        assert_eq!(backend.call_count("list_categories"), 1);
    }

    #[test]
    fn test_empty_value_makes_no_call() {
        let (backend, source) = setup();
        let mut state = filter_state("name", "");

        let err = source.read(&mut state).unwrap_err();
        let err = err.downcast_ref::<Error>().unwrap();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(backend.total_calls(), 0);
    }

    #[test]
    fn test_duplicate_names_are_ambiguous() {
        let (backend, source) = setup();
        backend.add_category("Security");

        let err = source.read(&mut filter_state("name", "Security")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>().unwrap().category(),
            ErrorCategory::Ambiguous
        );
    }
}
