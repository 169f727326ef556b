//! Provider registry: maps type names to reconcilers

use crate::config::ProviderConfig;
use crate::resources::{
    group::GroupDataSource,
    lifecycle::LifecycleDataSource,
    rubric_category::RubricCategoryDataSource,
    service::{ServiceDataSource, ServiceResource},
    service_filter::{FilterDataSource, FiltersDataSource},
    service_tag::ServiceTagResource,
    tier::TierDataSource,
};
use catalog::{Backend, Client, Error};
use declarative::{
    ExecuteOptions, ExecuteReport, ExecutionPlan, LogProgress, Reconciler, execute,
};
use std::sync::Arc;

const RESOURCE_TYPES: &[&str] = &["service", "service_tag"];

const DATA_SOURCE_TYPES: &[&str] = &[
    "filter",
    "filters",
    "group",
    "lifecycle",
    "rubric_category",
    "service",
    "tier",
];

/// Entry point for the engine: hands out reconcilers over one shared client
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    config: ProviderConfig,
}

impl Provider {
    /// Provider over a client, trusting the configuration as given
    ///
    /// Nothing is validated, so this suits in-memory backends that need
    /// no URL or token. Use [`Provider::connect`] for a remote API.
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    /// Provider for a remote API, rejecting an unusable configuration
    pub fn connect(client: Client, config: ProviderConfig) -> catalog::Result<Self> {
        config.validate()?;
        log::debug!(
            "Using catalog API at {} with {:?}",
            config.api_url,
            config.execute_options()
        );
        Ok(Self::new(client, config))
    }

    /// Provider over a backend with default configuration
    pub fn with_backend(backend: impl Backend + 'static) -> Self {
        Self::new(Client::with_backend(backend), ProviderConfig::default())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Names of all managed resource types
    pub fn resource_types() -> &'static [&'static str] {
        RESOURCE_TYPES
    }

    /// Names of all data source types
    pub fn data_source_types() -> &'static [&'static str] {
        DATA_SOURCE_TYPES
    }

    /// Reconciler for a managed resource type
    pub fn resource(&self, type_name: &str) -> catalog::Result<Arc<dyn Reconciler>> {
        let client = self.client.clone();
        let reconciler: Arc<dyn Reconciler> = match type_name {
            "service" => Arc::new(ServiceResource::new(client)),
            "service_tag" => Arc::new(ServiceTagResource::new(client)),
            other => {
                return Err(Error::configuration(format!(
                    "unknown resource type {other:?}, expected one of: {}",
                    RESOURCE_TYPES.join(", ")
                )));
            }
        };
        Ok(reconciler)
    }

    /// Reconciler for a data source type
    pub fn data_source(&self, type_name: &str) -> catalog::Result<Arc<dyn Reconciler>> {
        let client = self.client.clone();
        let reconciler: Arc<dyn Reconciler> = match type_name {
            "filter" => Arc::new(FilterDataSource::new(client)),
            "filters" => Arc::new(FiltersDataSource::new(client)),
            "group" => Arc::new(GroupDataSource::new(client)),
            "lifecycle" => Arc::new(LifecycleDataSource::new(client)),
            "rubric_category" => Arc::new(RubricCategoryDataSource::new(client)),
            "service" => Arc::new(ServiceDataSource::new(client)),
            "tier" => Arc::new(TierDataSource::new(client)),
            other => {
                return Err(Error::configuration(format!(
                    "unknown data source type {other:?}, expected one of: {}",
                    DATA_SOURCE_TYPES.join(", ")
                )));
            }
        };
        Ok(reconciler)
    }

    pub fn execute_options(&self) -> ExecuteOptions {
        self.config.execute_options()
    }

    /// Run a plan with this provider's options, logging progress
    pub fn apply(&self, plan: ExecutionPlan) -> anyhow::Result<ExecuteReport> {
        execute(plan, &self.execute_options(), &mut LogProgress)
    }
}
