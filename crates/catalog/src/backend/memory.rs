//! In-memory backend.
//!
//! Holds a registry of catalog entities behind a mutex and counts every
//! call per operation, so tests can assert that validation failures never
//! reach the remote side. Ids are real `gid://` tokens, so they pass
//! [`crate::is_id`].

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::identifier::encode_id;
use crate::types::{
    Category, EntityRef, Filter, Group, Lifecycle, Service, ServiceCreateInput,
    ServiceUpdateInput, Tag, TagCreateInput, TagUpdateInput, Team, Tier, User,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

const APP: &str = "opslevel";

#[derive(Default)]
struct Registry {
    next_id: u64,
    services: Vec<Service>,
    teams: Vec<Team>,
    groups: Vec<Group>,
    members: HashMap<String, Vec<User>>,
    child_teams: HashMap<String, Vec<Team>>,
    categories: Vec<Category>,
    filters: Vec<Filter>,
    lifecycles: Vec<Lifecycle>,
    tiers: Vec<Tier>,
    calls: BTreeMap<&'static str, usize>,
    fail_next: Option<Error>,
    tag_creates: Vec<TagCreateInput>,
    tag_updates: Vec<TagUpdateInput>,
    service_updates: Vec<ServiceUpdateInput>,
}

impl Registry {
    fn new_id(&mut self, type_name: &str) -> String {
        self.next_id += 1;
        encode_id(APP, type_name, self.next_id)
    }

    /// Count a call, failing it if a failure was injected
    fn record(&mut self, operation: &'static str) -> Result<()> {
        *self.calls.entry(operation).or_default() += 1;
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn service_mut(&mut self, id: &str) -> Result<&mut Service> {
        self.services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("service", id))
    }

    fn tag_mut(&mut self, id: &str) -> Result<&mut Tag> {
        self.services
            .iter_mut()
            .flat_map(|s| s.tags.nodes.iter_mut())
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found("tag", id))
    }

    fn group(&self, id: &str) -> Result<&Group> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::not_found("group", id))
    }

    fn tier_ref(&self, alias: &str) -> Result<Option<EntityRef>> {
        if alias.is_empty() {
            return Ok(None);
        }
        self.tiers
            .iter()
            .find(|t| t.alias == alias)
            .map(|t| Some(EntityRef::new(&t.id, &t.alias)))
            .ok_or_else(|| Error::not_found("tier", alias))
    }

    fn owner_ref(&self, alias: &str) -> Result<Option<EntityRef>> {
        if alias.is_empty() {
            return Ok(None);
        }
        self.teams
            .iter()
            .find(|t| t.alias == alias)
            .map(|t| Some(EntityRef::new(&t.id, &t.alias)))
            .ok_or_else(|| Error::not_found("team", alias))
    }

    fn lifecycle_ref(&self, alias: &str) -> Result<Option<EntityRef>> {
        if alias.is_empty() {
            return Ok(None);
        }
        self.lifecycles
            .iter()
            .find(|l| l.alias == alias)
            .map(|l| Some(EntityRef::new(&l.id, &l.alias)))
            .ok_or_else(|| Error::not_found("lifecycle", alias))
    }
}

/// Alias the catalog derives from a service name
fn alias_from_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Resolve an optional reference alias from an input
fn resolve_ref(
    alias: Option<&str>,
    lookup: impl Fn(&str) -> Result<Option<EntityRef>>,
) -> Result<Option<Option<EntityRef>>> {
    alias.map(lookup).transpose()
}

/// In-memory catalog backend with per-operation call counters.
#[derive(Default)]
pub struct MemoryBackend {
    registry: Mutex<Registry>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Seeding (not counted as calls)
    // =========================================================================

    /// Add a service with the given aliases.
    pub fn add_service(&self, name: &str, aliases: &[&str]) -> Service {
        let mut reg = self.lock();
        let service = Service {
            id: reg.new_id("Service"),
            aliases: aliases.iter().map(ToString::to_string).collect(),
            name: name.to_string(),
            ..Default::default()
        };
        reg.services.push(service.clone());
        service
    }

    /// Add a tag directly to a service.
    pub fn add_tag(&self, service_id: &str, key: &str, value: &str) -> Result<Tag> {
        let mut reg = self.lock();
        let tag = Tag {
            id: reg.new_id("Tag"),
            key: key.to_string(),
            value: value.to_string(),
        };
        reg.service_mut(service_id)?.tags.nodes.push(tag.clone());
        Ok(tag)
    }

    /// Add a team that services can be owned by.
    pub fn add_team(&self, alias: &str, name: &str) -> Team {
        let mut reg = self.lock();
        let team = Team {
            id: reg.new_id("Team"),
            alias: alias.to_string(),
            name: name.to_string(),
        };
        reg.teams.push(team.clone());
        team
    }

    /// Add a group, optionally under a parent group.
    pub fn add_group(&self, alias: &str, name: &str, parent: Option<&Group>) -> Group {
        let mut reg = self.lock();
        let group = Group {
            id: reg.new_id("Group"),
            alias: alias.to_string(),
            name: name.to_string(),
            description: format!("{name} group"),
            parent: parent.map(|p| EntityRef::new(&p.id, &p.alias)),
        };
        reg.groups.push(group.clone());
        group
    }

    /// Add a member to a group.
    pub fn add_group_member(&self, group_id: &str, name: &str, email: &str) -> User {
        let mut reg = self.lock();
        let user = User {
            id: reg.new_id("User"),
            name: name.to_string(),
            email: email.to_string(),
        };
        reg.members
            .entry(group_id.to_string())
            .or_default()
            .push(user.clone());
        user
    }

    /// Place a team directly under a group.
    pub fn add_child_team(&self, group_id: &str, team: &Team) {
        self.lock()
            .child_teams
            .entry(group_id.to_string())
            .or_default()
            .push(team.clone());
    }

    /// Add a rubric category.
    pub fn add_category(&self, name: &str) -> Category {
        let mut reg = self.lock();
        let category = Category {
            id: reg.new_id("Category"),
            name: name.to_string(),
        };
        reg.categories.push(category.clone());
        category
    }

    /// Add a saved filter.
    pub fn add_filter(&self, name: &str) -> Filter {
        let mut reg = self.lock();
        let filter = Filter {
            id: reg.new_id("Filter"),
            name: name.to_string(),
        };
        reg.filters.push(filter.clone());
        filter
    }

    /// Add a lifecycle stage.
    pub fn add_lifecycle(&self, alias: &str, name: &str, index: i32) -> Lifecycle {
        let mut reg = self.lock();
        let lifecycle = Lifecycle {
            id: reg.new_id("Lifecycle"),
            alias: alias.to_string(),
            name: name.to_string(),
            index,
        };
        reg.lifecycles.push(lifecycle.clone());
        lifecycle
    }

    /// Add a tier.
    pub fn add_tier(&self, alias: &str, name: &str, index: i32) -> Tier {
        let mut reg = self.lock();
        let tier = Tier {
            id: reg.new_id("Tier"),
            alias: alias.to_string(),
            name: name.to_string(),
            index,
        };
        reg.tiers.push(tier.clone());
        tier
    }

    /// Delete a service out-of-band, as another operator would.
    pub fn remove_service(&self, id: &str) -> bool {
        let mut reg = self.lock();
        let before = reg.services.len();
        reg.services.retain(|s| s.id != id);
        reg.services.len() < before
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Peek at a service without counting a call.
    pub fn service(&self, id: &str) -> Option<Service> {
        self.lock().services.iter().find(|s| s.id == id).cloned()
    }

    /// Make the next call fail with the given error.
    pub fn fail_next_call(&self, error: Error) {
        self.lock().fail_next = Some(error);
    }

    /// Number of calls made to one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock().calls.get(operation).copied().unwrap_or(0)
    }

    /// Number of calls made to any operation.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Every tag-create input received, in order.
    pub fn tag_creates(&self) -> Vec<TagCreateInput> {
        self.lock().tag_creates.clone()
    }

    /// Every tag-update input received, in order.
    pub fn tag_updates(&self) -> Vec<TagUpdateInput> {
        self.lock().tag_updates.clone()
    }

    /// Every service-update input received, in order.
    pub fn service_updates(&self) -> Vec<ServiceUpdateInput> {
        self.lock().service_updates.clone()
    }
}

impl Backend for MemoryBackend {
    fn get_service(&self, id: &str) -> Result<Service> {
        let mut reg = self.lock();
        reg.record("get_service")?;
        reg.services
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("service", id))
    }

    fn get_service_with_alias(&self, alias: &str) -> Result<Service> {
        let mut reg = self.lock();
        reg.record("get_service_with_alias")?;
        reg.services
            .iter()
            .find(|s| s.aliases.iter().any(|a| a == alias))
            .cloned()
            .ok_or_else(|| Error::not_found("service", alias))
    }

    fn create_service(&self, input: &ServiceCreateInput) -> Result<Service> {
        let mut reg = self.lock();
        reg.record("create_service")?;

        let tier = resolve_ref(input.tier_alias.as_deref(), |a| reg.tier_ref(a))?.flatten();
        let owner = resolve_ref(input.owner_alias.as_deref(), |a| reg.owner_ref(a))?.flatten();
        let lifecycle =
            resolve_ref(input.lifecycle_alias.as_deref(), |a| reg.lifecycle_ref(a))?.flatten();

        let service = Service {
            id: reg.new_id("Service"),
            aliases: vec![alias_from_name(&input.name)],
            name: input.name.clone(),
            product: input.product.clone().unwrap_or_default(),
            description: input.description.clone().unwrap_or_default(),
            language: input.language.clone().unwrap_or_default(),
            framework: input.framework.clone().unwrap_or_default(),
            tier,
            owner,
            lifecycle,
            tags: Vec::new().into(),
        };
        reg.services.push(service.clone());
        Ok(service)
    }

    fn update_service(&self, input: &ServiceUpdateInput) -> Result<Service> {
        let mut reg = self.lock();
        reg.record("update_service")?;
        reg.service_updates.push(input.clone());

        let tier = resolve_ref(input.tier_alias.as_deref(), |a| reg.tier_ref(a))?;
        let owner = resolve_ref(input.owner_alias.as_deref(), |a| reg.owner_ref(a))?;
        let lifecycle = resolve_ref(input.lifecycle_alias.as_deref(), |a| reg.lifecycle_ref(a))?;

        let service = reg.service_mut(&input.id)?;
        let fields = [
            (&input.name, &mut service.name),
            (&input.product, &mut service.product),
            (&input.description, &mut service.description),
            (&input.language, &mut service.language),
            (&input.framework, &mut service.framework),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                field.clone_from(value);
            }
        }
        if let Some(tier) = tier {
            service.tier = tier;
        }
        if let Some(owner) = owner {
            service.owner = owner;
        }
        if let Some(lifecycle) = lifecycle {
            service.lifecycle = lifecycle;
        }
        Ok(service.clone())
    }

    fn delete_service(&self, id: &str) -> Result<()> {
        let mut reg = self.lock();
        reg.record("delete_service")?;
        let before = reg.services.len();
        reg.services.retain(|s| s.id != id);
        if reg.services.len() == before {
            return Err(Error::not_found("service", id));
        }
        Ok(())
    }

    fn create_tag(&self, input: &TagCreateInput) -> Result<Tag> {
        let mut reg = self.lock();
        reg.record("create_tag")?;
        reg.tag_creates.push(input.clone());

        let tag = Tag {
            id: reg.new_id("Tag"),
            key: input.key.clone(),
            value: input.value.clone(),
        };
        reg.service_mut(&input.owner_id)?
            .tags
            .nodes
            .push(tag.clone());
        Ok(tag)
    }

    fn update_tag(&self, input: &TagUpdateInput) -> Result<Tag> {
        let mut reg = self.lock();
        reg.record("update_tag")?;
        reg.tag_updates.push(input.clone());

        let tag = reg.tag_mut(&input.id)?;
        if let Some(key) = &input.key {
            tag.key.clone_from(key);
        }
        if let Some(value) = &input.value {
            tag.value.clone_from(value);
        }
        Ok(tag.clone())
    }

    fn delete_tag(&self, id: &str) -> Result<()> {
        let mut reg = self.lock();
        reg.record("delete_tag")?;
        for service in &mut reg.services {
            let before = service.tags.nodes.len();
            service.tags.nodes.retain(|t| t.id != id);
            if service.tags.nodes.len() < before {
                return Ok(());
            }
        }
        Err(Error::not_found("tag", id))
    }

    fn get_group(&self, id: &str) -> Result<Group> {
        let mut reg = self.lock();
        reg.record("get_group")?;
        reg.group(id).cloned()
    }

    fn get_group_with_alias(&self, alias: &str) -> Result<Group> {
        let mut reg = self.lock();
        reg.record("get_group_with_alias")?;
        reg.groups
            .iter()
            .find(|g| g.alias == alias)
            .cloned()
            .ok_or_else(|| Error::not_found("group", alias))
    }

    fn group_members(&self, group_id: &str) -> Result<Vec<User>> {
        let mut reg = self.lock();
        reg.record("group_members")?;
        reg.group(group_id)?;
        Ok(reg.members.get(group_id).cloned().unwrap_or_default())
    }

    fn group_child_teams(&self, group_id: &str) -> Result<Vec<Team>> {
        let mut reg = self.lock();
        reg.record("group_child_teams")?;
        reg.group(group_id)?;
        Ok(reg.child_teams.get(group_id).cloned().unwrap_or_default())
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut reg = self.lock();
        reg.record("list_categories")?;
        Ok(reg.categories.clone())
    }

    fn list_filters(&self) -> Result<Vec<Filter>> {
        let mut reg = self.lock();
        reg.record("list_filters")?;
        Ok(reg.filters.clone())
    }

    fn list_lifecycles(&self) -> Result<Vec<Lifecycle>> {
        let mut reg = self.lock();
        reg.record("list_lifecycles")?;
        Ok(reg.lifecycles.clone())
    }

    fn list_tiers(&self) -> Result<Vec<Tier>> {
        let mut reg = self.lock();
        reg.record("list_tiers")?;
        Ok(reg.tiers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::is_id;

    #[test]
    fn test_seeding_is_not_counted() {
        let backend = MemoryBackend::new();
        let service = backend.add_service("Payments", &["payments"]);
        backend.add_category("Security");

        assert!(is_id(&service.id));
        assert_eq!(backend.total_calls(), 0);
    }

    #[test]
    fn test_alias_lookup_counts_calls() {
        let backend = MemoryBackend::new();
        let service = backend.add_service("Payments", &["payments", "pay"]);

        assert_eq!(backend.get_service_with_alias("pay").unwrap().id, service.id);
        assert!(backend.get_service_with_alias("missing").unwrap_err().is_not_found());
        assert_eq!(backend.call_count("get_service_with_alias"), 2);
    }

    #[test]
    fn test_injected_failure_applies_once() {
        let backend = MemoryBackend::new();
        backend.fail_next_call(Error::Transport {
            message: "connection reset".into(),
        });

        assert!(matches!(
            backend.list_filters(),
            Err(Error::Transport { .. })
        ));
        assert!(backend.list_filters().is_ok());
    }

    #[test]
    fn test_create_service_resolves_references() {
        let backend = MemoryBackend::new();
        backend.add_team("platform", "Platform");
        backend.add_tier("tier_1", "Tier 1", 1);

        let service = backend
            .create_service(&ServiceCreateInput {
                name: "Order Router".into(),
                owner_alias: Some("platform".into()),
                tier_alias: Some("tier_1".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(service.aliases, vec!["order_router".to_string()]);
        assert_eq!(service.owner.unwrap().alias, "platform");
        assert_eq!(service.tier.unwrap().alias, "tier_1");
        assert!(service.lifecycle.is_none());
    }

    #[test]
    fn test_create_service_unknown_owner() {
        let backend = MemoryBackend::new();
        let err = backend
            .create_service(&ServiceCreateInput {
                name: "x".into(),
                owner_alias: Some("ghost".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, Error::not_found("team", "ghost"));
    }

    #[test]
    fn test_update_service_clears_reference_with_empty_alias() {
        let backend = MemoryBackend::new();
        backend.add_team("platform", "Platform");
        let service = backend
            .create_service(&ServiceCreateInput {
                name: "x".into(),
                owner_alias: Some("platform".into()),
                ..Default::default()
            })
            .unwrap();

        let updated = backend
            .update_service(&ServiceUpdateInput {
                id: service.id.clone(),
                owner_alias: Some(String::new()),
                description: Some("new".into()),
                ..Default::default()
            })
            .unwrap();

        assert!(updated.owner.is_none());
        assert_eq!(updated.description, "new");
        assert_eq!(updated.name, "x");
    }

    #[test]
    fn test_tag_lifecycle() {
        let backend = MemoryBackend::new();
        let service = backend.add_service("Payments", &["payments"]);

        let tag = backend
            .create_tag(&TagCreateInput {
                owner_id: service.id.clone(),
                key: "env".into(),
                value: "prod".into(),
            })
            .unwrap();

        let updated = backend
            .update_tag(&TagUpdateInput {
                id: tag.id.clone(),
                key: None,
                value: Some("dev".into()),
            })
            .unwrap();
        assert_eq!(updated.key, "env");
        assert_eq!(updated.value, "dev");

        backend.delete_tag(&tag.id).unwrap();
        assert!(backend.delete_tag(&tag.id).unwrap_err().is_not_found());
        assert!(backend.service(&service.id).unwrap().tags.nodes.is_empty());
    }

    #[test]
    fn test_group_listings_require_group() {
        let backend = MemoryBackend::new();
        let group = backend.add_group("eng", "Engineering", None);
        backend.add_group_member(&group.id, "Ada", "ada@example.com");

        assert_eq!(backend.group_members(&group.id).unwrap().len(), 1);
        assert!(backend.group_child_teams(&group.id).unwrap().is_empty());
        assert!(backend.group_members("nope").unwrap_err().is_not_found());
    }
}
