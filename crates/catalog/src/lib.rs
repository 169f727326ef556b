//! # catalog
//!
//! Typed domain model and backend abstraction for a service catalog API.
//!
//! This crate provides:
//! - Domain types (services, tags, groups, categories, filters, lifecycles, tiers)
//! - Sparse mutation inputs for create/update calls
//! - The opaque-id shape check and the id-or-alias [`Identifier`]
//! - A [`Backend`] trait for the remote API and an in-memory implementation
//!
//! ## Example
//!
//! ```
//! use catalog::{Client, MemoryBackend};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! backend.add_service("Payments", &["payments"]);
//!
//! let client = Client::from_shared(backend.clone());
//! let service = client.get_service_with_alias("payments").unwrap();
//! assert_eq!(service.name, "Payments");
//! assert_eq!(backend.call_count("get_service_with_alias"), 1);
//! ```

#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod identifier;
pub mod types;

pub use backend::Backend;
pub use backend::memory::MemoryBackend;
pub use error::{Error, ErrorCategory, Result};
pub use identifier::{Identifier, encode_id, is_id};
pub use types::{
    Category, Connection, EntityRef, Filter, Group, Lifecycle, Service, ServiceCreateInput,
    ServiceUpdateInput, Tag, TagCreateInput, TagUpdateInput, Team, Tier, User,
};

use std::fmt;
use std::sync::Arc;

/// Shared handle to a catalog backend.
///
/// Cheap to clone and safe to use from many reconcilers at once; it holds
/// no cache and no per-call state.
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client that owns its backend.
    pub fn with_backend(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a client over a backend that is also held elsewhere
    /// (useful for inspecting a [`MemoryBackend`] in tests).
    pub fn from_shared(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Get a service by id.
    pub fn get_service(&self, id: &str) -> Result<Service> {
        log::debug!("Looking up service by id {id}");
        self.backend.get_service(id)
    }

    /// Get a service by alias.
    pub fn get_service_with_alias(&self, alias: &str) -> Result<Service> {
        log::debug!("Looking up service by alias {alias}");
        self.backend.get_service_with_alias(alias)
    }

    /// Create a service.
    pub fn create_service(&self, input: &ServiceCreateInput) -> Result<Service> {
        self.backend.create_service(input)
    }

    /// Apply a sparse update to a service.
    pub fn update_service(&self, input: &ServiceUpdateInput) -> Result<Service> {
        self.backend.update_service(input)
    }

    /// Delete a service.
    pub fn delete_service(&self, id: &str) -> Result<()> {
        self.backend.delete_service(id)
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Create a tag on a service.
    pub fn create_tag(&self, input: &TagCreateInput) -> Result<Tag> {
        self.backend.create_tag(input)
    }

    /// Apply a sparse update to a tag.
    pub fn update_tag(&self, input: &TagUpdateInput) -> Result<Tag> {
        self.backend.update_tag(input)
    }

    /// Delete a tag.
    pub fn delete_tag(&self, id: &str) -> Result<()> {
        self.backend.delete_tag(id)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Get a group by id.
    pub fn get_group(&self, id: &str) -> Result<Group> {
        log::debug!("Looking up group by id {id}");
        self.backend.get_group(id)
    }

    /// Get a group by alias.
    pub fn get_group_with_alias(&self, alias: &str) -> Result<Group> {
        log::debug!("Looking up group by alias {alias}");
        self.backend.get_group_with_alias(alias)
    }

    /// List a group's members.
    pub fn group_members(&self, group_id: &str) -> Result<Vec<User>> {
        self.backend.group_members(group_id)
    }

    /// List a group's direct child teams.
    pub fn group_child_teams(&self, group_id: &str) -> Result<Vec<Team>> {
        self.backend.group_child_teams(group_id)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// List all rubric categories.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.backend.list_categories()
    }

    /// List all saved filters.
    pub fn list_filters(&self) -> Result<Vec<Filter>> {
        self.backend.list_filters()
    }

    /// List all lifecycle stages.
    pub fn list_lifecycles(&self) -> Result<Vec<Lifecycle>> {
        self.backend.list_lifecycles()
    }

    /// List all tiers.
    pub fn list_tiers(&self) -> Result<Vec<Tier>> {
        self.backend.list_tiers()
    }
}
