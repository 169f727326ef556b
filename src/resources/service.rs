//! Service resource and data source

use super::{changed, found_or_gone, non_empty, require_id};
use crate::resolver::{find_by_either_attribute, resolve};
use anyhow::Result;
use catalog::{
    Client, EntityRef, Error, Identifier, Service, ServiceCreateInput, ServiceUpdateInput, Tag,
};
use chrono::Utc;
use declarative::{ApplyResult, AttrValue, Attributes, LocalState, Reconciler, ReconcilerKind};

pub const TYPE_NAME: &str = "service";

pub const NAME: &str = "name";
pub const PRODUCT: &str = "product";
pub const DESCRIPTION: &str = "description";
pub const LANGUAGE: &str = "language";
pub const FRAMEWORK: &str = "framework";
pub const TIER_ALIAS: &str = "tier_alias";
pub const OWNER_ALIAS: &str = "owner_alias";
pub const LIFECYCLE_ALIAS: &str = "lifecycle_alias";
pub const ALIASES: &str = "aliases";
pub const TAGS: &str = "tags";

/// Data source lookup inputs
pub const ALIAS: &str = "alias";
pub const ID: &str = "id";

// ============================================================================
// Codec
// ============================================================================

/// Flatten tags to `"key:value"` strings, in order
pub fn flatten_tags(tags: &[Tag]) -> Vec<String> {
    tags.iter()
        .map(|t| format!("{}:{}", t.key, t.value))
        .collect()
}

fn ref_alias(reference: &Option<EntityRef>) -> AttrValue {
    AttrValue::from(reference.as_ref().map_or("", |r| r.alias.as_str()))
}

/// Project every service field onto attributes
pub fn to_attributes(service: &Service) -> Attributes {
    Attributes::from([
        (NAME.to_string(), AttrValue::from(service.name.as_str())),
        (PRODUCT.to_string(), AttrValue::from(service.product.as_str())),
        (
            DESCRIPTION.to_string(),
            AttrValue::from(service.description.as_str()),
        ),
        (LANGUAGE.to_string(), AttrValue::from(service.language.as_str())),
        (
            FRAMEWORK.to_string(),
            AttrValue::from(service.framework.as_str()),
        ),
        (TIER_ALIAS.to_string(), ref_alias(&service.tier)),
        (OWNER_ALIAS.to_string(), ref_alias(&service.owner)),
        (LIFECYCLE_ALIAS.to_string(), ref_alias(&service.lifecycle)),
        (ALIASES.to_string(), AttrValue::from(service.aliases.clone())),
        (
            TAGS.to_string(),
            AttrValue::from(flatten_tags(&service.tags.nodes)),
        ),
    ])
}

/// Build the create input from configured attributes
///
/// Empty optional fields are left out of the input.
pub fn create_input(state: &LocalState) -> catalog::Result<ServiceCreateInput> {
    let name = state.get_str(NAME);
    if name.is_empty() {
        return Err(Error::validation("service name must not be empty"));
    }
    Ok(ServiceCreateInput {
        name: name.to_string(),
        product: non_empty(state, PRODUCT),
        description: non_empty(state, DESCRIPTION),
        language: non_empty(state, LANGUAGE),
        framework: non_empty(state, FRAMEWORK),
        tier_alias: non_empty(state, TIER_ALIAS),
        owner_alias: non_empty(state, OWNER_ALIAS),
        lifecycle_alias: non_empty(state, LIFECYCLE_ALIAS),
    })
}

/// Build a sparse patch of the changed attributes
pub fn update_input(id: &str, state: &LocalState) -> ServiceUpdateInput {
    ServiceUpdateInput {
        id: id.to_string(),
        name: changed(state, NAME),
        product: changed(state, PRODUCT),
        description: changed(state, DESCRIPTION),
        language: changed(state, LANGUAGE),
        framework: changed(state, FRAMEWORK),
        tier_alias: changed(state, TIER_ALIAS),
        owner_alias: changed(state, OWNER_ALIAS),
        lifecycle_alias: changed(state, LIFECYCLE_ALIAS),
    }
}

fn sync(state: &mut LocalState, service: &Service) {
    state.set_id(&service.id);
    state.apply_remote(to_attributes(service));
}

// ============================================================================
// Resource
// ============================================================================

/// Manages a service. Imports by id or alias.
#[derive(Debug, Clone)]
pub struct ServiceResource {
    client: Client,
}

impl ServiceResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Reconciler for ServiceResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn create(&self, state: &mut LocalState) -> Result<()> {
        let input = create_input(state)?;
        let service = self.client.create_service(&input)?;
        log::info!("Created service {} ({})", service.name, service.id);
        sync(state, &service);
        Ok(())
    }

    fn read(&self, state: &mut LocalState) -> Result<()> {
        let identifier = Identifier::parse(require_id(state, TYPE_NAME)?);
        let found = resolve::<Service>(&self.client, &identifier);
        if let Some(service) = found_or_gone(found, state, TYPE_NAME)? {
            sync(state, &service);
        }
        Ok(())
    }

    fn update(&self, state: &mut LocalState) -> Result<ApplyResult> {
        let input = update_input(require_id(state, TYPE_NAME)?, state);
        if input.is_empty() {
            log::debug!("Service {} has no remote changes", input.id);
            return Ok(ApplyResult::NoChange);
        }

        let service = self.client.update_service(&input)?;
        log::info!("Updated service {} ({})", service.name, service.id);
        sync(state, &service);
        state.stamp_last_updated(Utc::now());
        Ok(ApplyResult::Updated)
    }

    fn delete(&self, state: &mut LocalState) -> Result<()> {
        let id = require_id(state, TYPE_NAME)?;
        self.client.delete_service(id)?;
        log::info!("Deleted service {id}");
        state.clear_id();
        Ok(())
    }
}

// ============================================================================
// Data source
// ============================================================================

/// Reads one service by `id` or `alias`
#[derive(Debug, Clone)]
pub struct ServiceDataSource {
    client: Client,
}

impl ServiceDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Reconciler for ServiceDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn kind(&self) -> ReconcilerKind {
        ReconcilerKind::DataSource
    }

    fn read(&self, state: &mut LocalState) -> Result<()> {
        let service: Service = find_by_either_attribute(&self.client, state, ALIAS, ID)?;
        sync(state, &service);
        Ok(())
    }
}
