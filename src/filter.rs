//! Field filter dispatch: pick exactly one entity by `field == value`
//!
//! Each entity type declares a closed set of queryable fields and how to
//! project each one. [`select_one`] is a pure function over an already
//! fetched candidate list.

use catalog::{Category, Error, Filter, Lifecycle, Result, Tier};
use declarative::LocalState;
use std::borrow::Cow;

/// Attribute holding the filter's field name
pub const FILTER_FIELD: &str = "filter.field";

/// Attribute holding the filter's value
pub const FILTER_VALUE: &str = "filter.value";

/// An entity type that can be selected by a field filter
pub trait Filterable {
    /// Entity kind used in error messages
    const KIND: &'static str;

    /// The closed set of fields a filter may name
    const FIELDS: &'static [&'static str];

    /// Project one field, or `None` if the field is not queryable
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>>;
}

impl Filterable for Category {
    const KIND: &'static str = "category";
    const FIELDS: &'static [&'static str] = &["id", "name"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Borrowed(&self.id)),
            "name" => Some(Cow::Borrowed(&self.name)),
            _ => None,
        }
    }
}

impl Filterable for Filter {
    const KIND: &'static str = "filter";
    const FIELDS: &'static [&'static str] = &["id", "name"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Borrowed(&self.id)),
            "name" => Some(Cow::Borrowed(&self.name)),
            _ => None,
        }
    }
}

impl Filterable for Lifecycle {
    const KIND: &'static str = "lifecycle";
    const FIELDS: &'static [&'static str] = &["alias", "id", "index", "name"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "alias" => Some(Cow::Borrowed(&self.alias)),
            "id" => Some(Cow::Borrowed(&self.id)),
            "index" => Some(Cow::Owned(self.index.to_string())),
            "name" => Some(Cow::Borrowed(&self.name)),
            _ => None,
        }
    }
}

impl Filterable for Tier {
    const KIND: &'static str = "tier";
    const FIELDS: &'static [&'static str] = &["alias", "id", "index", "name"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "alias" => Some(Cow::Borrowed(&self.alias)),
            "id" => Some(Cow::Borrowed(&self.id)),
            "index" => Some(Cow::Owned(self.index.to_string())),
            "name" => Some(Cow::Borrowed(&self.name)),
            _ => None,
        }
    }
}

/// A `(field, value)` criterion read from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    pub field: String,
    pub value: String,
}

impl FilterCriterion {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Read the criterion from a state's filter attributes
    pub fn from_state(state: &LocalState) -> Self {
        Self::new(state.get_str(FILTER_FIELD), state.get_str(FILTER_VALUE))
    }

    /// Check the criterion against an entity type without any lookup
    pub fn validate<T: Filterable>(&self) -> Result<()> {
        if self.value.is_empty() {
            return Err(Error::validation(
                "Please provide a non-empty value for filter's value",
            ));
        }
        if !T::FIELDS.contains(&self.field.as_str()) {
            return Err(Error::validation(format!(
                "unsupported {} filter field {:?}, expected one of: {}",
                T::KIND,
                self.field,
                T::FIELDS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Select the single candidate whose `field` equals `value`
///
/// Zero matches is `NotFound`; more than one is `AmbiguousMatch`.
pub fn select_one<'a, T: Filterable>(
    candidates: &'a [T],
    field: &str,
    value: &str,
) -> Result<&'a T> {
    FilterCriterion::new(field, value).validate::<T>()?;

    let matches: Vec<&T> = candidates
        .iter()
        .filter(|c| c.field_value(field).is_some_and(|v| v == value))
        .collect();

    match matches.as_slice() {
        [] => Err(Error::not_found(T::KIND, format!("{field}=={value}"))),
        [only] => Ok(*only),
        _ => Err(Error::AmbiguousMatch {
            kind: T::KIND.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            count: matches.len(),
        }),
    }
}
