//! Backend abstraction for catalog operations.
//!
//! The [`Backend`] trait defines the typed operations the reconcilers need
//! from the remote catalog API, allowing for different implementations
//! (a GraphQL transport supplied by the embedding program, or the
//! in-memory [`memory::MemoryBackend`] used in tests).

pub mod memory;

use crate::error::Result;
use crate::types::{
    Category, Filter, Group, Lifecycle, Service, ServiceCreateInput, ServiceUpdateInput, Tag,
    TagCreateInput, TagUpdateInput, Team, Tier, User,
};

/// Backend trait for catalog operations.
///
/// Every call returns a fully populated domain object or a typed error
/// (`NotFound`, `Transport`, `Server`). Implementations must be safe for
/// concurrent use and must not cache results.
pub trait Backend: Send + Sync {
    // Services

    /// Get a service by id.
    fn get_service(&self, id: &str) -> Result<Service>;

    /// Get a service by any of its aliases.
    fn get_service_with_alias(&self, alias: &str) -> Result<Service>;

    /// Create a service.
    fn create_service(&self, input: &ServiceCreateInput) -> Result<Service>;

    /// Apply a sparse update to a service.
    fn update_service(&self, input: &ServiceUpdateInput) -> Result<Service>;

    /// Delete a service by id.
    fn delete_service(&self, id: &str) -> Result<()>;

    // Tags

    /// Create a tag on a service.
    fn create_tag(&self, input: &TagCreateInput) -> Result<Tag>;

    /// Apply a sparse update to a tag.
    fn update_tag(&self, input: &TagUpdateInput) -> Result<Tag>;

    /// Delete a tag by id.
    fn delete_tag(&self, id: &str) -> Result<()>;

    // Groups

    /// Get a group by id.
    fn get_group(&self, id: &str) -> Result<Group>;

    /// Get a group by alias.
    fn get_group_with_alias(&self, alias: &str) -> Result<Group>;

    /// List the users belonging to a group.
    fn group_members(&self, group_id: &str) -> Result<Vec<User>>;

    /// List the teams directly under a group.
    fn group_child_teams(&self, group_id: &str) -> Result<Vec<Team>>;

    // Listings

    /// List all rubric categories.
    fn list_categories(&self) -> Result<Vec<Category>>;

    /// List all saved filters.
    fn list_filters(&self) -> Result<Vec<Filter>>;

    /// List all lifecycle stages.
    fn list_lifecycles(&self) -> Result<Vec<Lifecycle>>;

    /// List all tiers.
    fn list_tiers(&self) -> Result<Vec<Tier>>;
}
