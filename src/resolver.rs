//! Identifier resolution: id-or-alias to a canonical remote entity
//!
//! The identifier is classified once ([`Identifier::parse`]) and the
//! lookup dispatched on that classification. Errors propagate verbatim;
//! there is no retry and no fallback to the other lookup mode.

use catalog::{Client, Error, Group, Identifier, Result, Service};
use declarative::LocalState;

/// An entity type that can be looked up by id or by alias
pub trait Resolvable: Sized {
    /// Entity kind used in error messages
    const KIND: &'static str;

    fn get_by_id(client: &Client, id: &str) -> Result<Self>;

    fn get_by_alias(client: &Client, alias: &str) -> Result<Self>;
}

impl Resolvable for Service {
    const KIND: &'static str = "service";

    fn get_by_id(client: &Client, id: &str) -> Result<Self> {
        client.get_service(id)
    }

    fn get_by_alias(client: &Client, alias: &str) -> Result<Self> {
        client.get_service_with_alias(alias)
    }
}

impl Resolvable for Group {
    const KIND: &'static str = "group";

    fn get_by_id(client: &Client, id: &str) -> Result<Self> {
        client.get_group(id)
    }

    fn get_by_alias(client: &Client, alias: &str) -> Result<Self> {
        client.get_group_with_alias(alias)
    }
}

/// Look up an entity by a classified identifier
pub fn resolve<E: Resolvable>(client: &Client, identifier: &Identifier) -> Result<E> {
    log::debug!("Resolving {} by {identifier}", E::KIND);
    match identifier {
        Identifier::ById(id) => E::get_by_id(client, id),
        Identifier::ByAlias(alias) => E::get_by_alias(client, alias),
    }
}

/// Pick the identifier from a pair of id-typed and alias-typed attributes
///
/// A non-empty id attribute wins. Its value is still classified by shape,
/// so an import string may name the parent by alias.
pub fn identifier_from_attributes(
    state: &LocalState,
    alias_field: &str,
    id_field: &str,
) -> Result<Identifier> {
    let id = state.get_str(id_field);
    let alias = state.get_str(alias_field);

    match (id.is_empty(), alias.is_empty()) {
        (false, _) => Ok(Identifier::parse(id)),
        (true, false) => Ok(Identifier::ByAlias(alias.to_string())),
        (true, true) => Err(Error::configuration(format!(
            "must provide one of `{alias_field}` or `{id_field}` field to find by"
        ))),
    }
}

/// Resolve an entity from whichever of two attributes is set
pub fn find_by_either_attribute<E: Resolvable>(
    client: &Client,
    state: &LocalState,
    alias_field: &str,
    id_field: &str,
) -> Result<E> {
    let identifier = identifier_from_attributes(state, alias_field, id_field)?;
    resolve(client, &identifier)
}
