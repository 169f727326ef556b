//! Service tag resource
//!
//! A tag is owned by exactly one service, named by `service` (id) or
//! `service_alias`. Imports use `"<service>:<tag id>"`.

use super::{accept_config, changed, found_or_gone, require_id};
use crate::import::parse_import_id;
use crate::resolver::find_by_either_attribute;
use anyhow::Result;
use catalog::{Client, Error, Service, Tag, TagCreateInput, TagUpdateInput};
use chrono::Utc;
use declarative::{ApplyResult, AttrValue, Attributes, LocalState, Reconciler};
use regex::Regex;
use std::sync::LazyLock;

pub const TYPE_NAME: &str = "service_tag";

pub const SERVICE: &str = "service";
pub const SERVICE_ALIAS: &str = "service_alias";
pub const KEY: &str = "key";
pub const VALUE: &str = "value";

/// Allowed shape of a tag key
pub const TAG_KEY_PATTERN: &str = r"^[a-z][0-9a-z_./\\-]*$";

pub const TAG_KEY_ERROR: &str = "tag key name must start with a letter and be only lowercase alphanumerics, underscores, hyphens, periods, and slashes.";

static TAG_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TAG_KEY_PATTERN).expect("TAG_KEY_PATTERN is a valid regex"));

/// The compiled [`TAG_KEY_PATTERN`]
pub fn tag_key_regex() -> &'static Regex {
    &TAG_KEY
}

/// Check a tag key against a compiled pattern
///
/// Keys are never lowercased on the caller's behalf.
pub fn validate_tag_key(pattern: &Regex, key: &str) -> catalog::Result<()> {
    if pattern.is_match(key) {
        Ok(())
    } else {
        Err(Error::validation(format!("invalid tag key {key:?}: {TAG_KEY_ERROR}")))
    }
}

pub fn to_attributes(tag: &Tag) -> Attributes {
    Attributes::from([
        (KEY.to_string(), AttrValue::from(tag.key.as_str())),
        (VALUE.to_string(), AttrValue::from(tag.value.as_str())),
    ])
}

/// Build a sparse patch; a changed key is validated first
pub fn update_input(id: &str, state: &LocalState) -> catalog::Result<TagUpdateInput> {
    let key = changed(state, KEY);
    if let Some(key) = &key {
        validate_tag_key(tag_key_regex(), key)?;
    }
    Ok(TagUpdateInput {
        id: id.to_string(),
        key,
        value: changed(state, VALUE),
    })
}

fn sync(state: &mut LocalState, tag: &Tag) {
    state.set_id(&tag.id);
    state.apply_remote(to_attributes(tag));
    accept_config(state, &[SERVICE, SERVICE_ALIAS]);
}

#[derive(Debug, Clone)]
pub struct ServiceTagResource {
    client: Client,
}

impl ServiceTagResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn owner(&self, state: &LocalState) -> catalog::Result<Service> {
        find_by_either_attribute(&self.client, state, SERVICE_ALIAS, SERVICE)
    }

    /// Reject a configured owner that does not already hold the tag
    ///
    /// Tags cannot move between services. Renaming the owner reference
    /// (id to alias, or one alias to another of the same service) is fine.
    fn ensure_same_owner(&self, state: &LocalState, tag_id: &str) -> catalog::Result<()> {
        let service = self.owner(state)?;
        if service.tag(tag_id).is_some() {
            return Ok(());
        }
        Err(Error::validation(format!(
            "tag {tag_id} does not belong to service {}, the owning service of a tag cannot change; delete the tag and create it on the new service",
            service.display_alias()
        )))
    }
}

impl Reconciler for ServiceTagResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn create(&self, state: &mut LocalState) -> Result<()> {
        let key = state.get_str(KEY);
        validate_tag_key(tag_key_regex(), key)?;

        let service = self.owner(state)?;
        let input = TagCreateInput {
            owner_id: service.id,
            key: key.to_string(),
            value: state.get_str(VALUE).to_string(),
        };
        let tag = self.client.create_tag(&input)?;
        log::info!(
            "Created tag {}:{} on service {}",
            tag.key,
            tag.value,
            service.name
        );
        sync(state, &tag);
        Ok(())
    }

    fn read(&self, state: &mut LocalState) -> Result<()> {
        let tag_id = require_id(state, TYPE_NAME)?.to_string();
        let found = self.owner(state);
        let Some(service) = found_or_gone(found, state, TYPE_NAME)? else {
            return Ok(());
        };

        let found = service
            .tag(&tag_id)
            .cloned()
            .ok_or_else(|| Error::not_found("tag", &tag_id));
        if let Some(tag) = found_or_gone(found, state, TYPE_NAME)? {
            sync(state, &tag);
        }
        Ok(())
    }

    fn update(&self, state: &mut LocalState) -> Result<ApplyResult> {
        let input = update_input(require_id(state, TYPE_NAME)?, state)?;
        if state.has_change(SERVICE) || state.has_change(SERVICE_ALIAS) {
            self.ensure_same_owner(state, &input.id)?;
        }
        if input.is_empty() {
            log::debug!("Tag {} has no remote changes", input.id);
            accept_config(state, &[SERVICE, SERVICE_ALIAS]);
            return Ok(ApplyResult::NoChange);
        }

        let tag = self.client.update_tag(&input)?;
        log::info!("Updated tag {} to {}:{}", tag.id, tag.key, tag.value);
        sync(state, &tag);
        state.stamp_last_updated(Utc::now());
        Ok(ApplyResult::Updated)
    }

    fn delete(&self, state: &mut LocalState) -> Result<()> {
        let id = require_id(state, TYPE_NAME)?;
        self.client.delete_tag(id)?;
        log::info!("Deleted tag {id}");
        state.clear_id();
        Ok(())
    }

    fn import(&self, state: &mut LocalState, import_id: &str) -> Result<()> {
        let parsed = parse_import_id(import_id);
        if let Some(service) = parsed.parent {
            state.set(SERVICE, service);
        }
        state.set_id(parsed.id);
        self.read(state)
    }
}
