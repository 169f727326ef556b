//! # catalogsync
//!
//! Declarative reconcilers for service-catalog entities.
//!
//! Each entity type (services, service tags, groups, rubric categories,
//! filters, lifecycles, tiers) is exposed as a
//! [`Reconciler`](declarative::Reconciler) that resolves identifiers,
//! converts between remote objects and flat attributes, and performs
//! create/read/update/delete/import against a [`catalog::Client`].
//!
//! ## Example
//!
//! ```
//! use catalogsync::Provider;
//! use catalog::MemoryBackend;
//! use declarative::{AttrValue, Attributes, LocalState, Reconciler};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let service = backend.add_service("Payments", &["payments"]);
//! let provider = Provider::new(
//!     catalog::Client::from_shared(backend.clone()),
//!     Default::default(),
//! );
//!
//! let tag = provider.resource("service_tag").unwrap();
//! let mut state = LocalState::from_config(Attributes::from([
//!     ("service_alias".to_string(), AttrValue::from("payments")),
//!     ("key".to_string(), AttrValue::from("env")),
//!     ("value".to_string(), AttrValue::from("prod")),
//! ]));
//! tag.create(&mut state).unwrap();
//!
//! assert!(state.is_present());
//! assert_eq!(backend.tag_creates()[0].owner_id, service.id);
//! ```

pub mod config;
pub mod filter;
pub mod import;
pub mod provider;
pub mod resolver;
pub mod resources;

pub use config::ProviderConfig;
pub use filter::{FilterCriterion, Filterable, select_one};
pub use import::{ImportId, parse_import_id};
pub use provider::Provider;
pub use resolver::{Resolvable, find_by_either_attribute, resolve};
pub use resources::service_tag::{TAG_KEY_PATTERN, validate_tag_key};
