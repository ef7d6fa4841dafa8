//! Provider assembly.
//!
//! [`Provider::configure`] builds the HTTP client once, verifies the API is reachable and hands
//! the shared transport to every resource and data source it registers.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::client::{AirbyteApi, ApiClient, Transport};
use crate::config::ProviderConfig;
use crate::data_sources::{SourceSchemaCatalogDataSource, WorkspaceDataSource, WorkspaceIdsDataSource};
use crate::error::ProviderError;
use crate::models::ConnectorKind;
use crate::resources::{
    ConnectionResource, ConnectorDefinitionResource, ConnectorResource, OperationResource,
    WorkspaceResource,
};

pub mod registry;

pub use registry::{ManagedDataSource, ManagedResource, Registry, RegistryError};

/// Prefix of every resource and data source type name.
pub const TYPE_PREFIX: &str = "airbyte";

pub fn full_type_name(name: &str) -> String {
    format!("{TYPE_PREFIX}_{name}")
}

pub struct Provider {
    config: ProviderConfig,
    api: AirbyteApi,
    registry: Registry,
}

impl Provider {
    /// Validates `config`, connects to the API and checks its health endpoint.
    #[instrument(skip_all, fields(url = %config.host_url))]
    pub async fn configure(config: ProviderConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let client = ApiClient::new(&config)?;
        client.health_check().await?;

        let provider = Self::with_transport(config, Arc::new(client));
        info!(
            resources = provider.registry.resource_type_names().len(),
            data_sources = provider.registry.data_source_type_names().len(),
            "provider configured"
        );
        Ok(provider)
    }

    /// Assembles the provider around an existing transport without contacting the API.
    pub fn with_transport(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        let api = AirbyteApi::new(transport);
        let mut provider = Self {
            config,
            api,
            registry: Registry::new(),
        };

        let mut registry = Registry::new();
        registry.register_resource(provider.workspaces());
        for kind in [ConnectorKind::Source, ConnectorKind::Destination] {
            registry.register_resource(provider.connector_definitions(kind));
            registry.register_resource(provider.connectors(kind));
        }
        registry.register_resource(provider.connections());
        registry.register_resource(provider.operations());
        registry.register_data_source(provider.workspace_lookup());
        registry.register_data_source(provider.workspace_ids());
        registry.register_data_source(provider.source_schema_catalog());
        provider.registry = registry;

        provider
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn api(&self) -> &AirbyteApi {
        &self.api
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn workspaces(&self) -> WorkspaceResource {
        WorkspaceResource::new(self.api.clone())
    }

    pub fn connector_definitions(&self, kind: ConnectorKind) -> ConnectorDefinitionResource {
        ConnectorDefinitionResource::new(self.api.clone(), kind)
    }

    pub fn connectors(&self, kind: ConnectorKind) -> ConnectorResource {
        ConnectorResource::new(self.api.clone(), kind, self.config.check_connectors)
    }

    pub fn connections(&self) -> ConnectionResource {
        ConnectionResource::new(self.api.clone())
    }

    pub fn operations(&self) -> OperationResource {
        OperationResource::new(self.api.clone())
    }

    pub fn workspace_lookup(&self) -> WorkspaceDataSource {
        WorkspaceDataSource::new(self.api.clone())
    }

    pub fn workspace_ids(&self) -> WorkspaceIdsDataSource {
        WorkspaceIdsDataSource::new(self.api.clone())
    }

    pub fn source_schema_catalog(&self) -> SourceSchemaCatalogDataSource {
        SourceSchemaCatalogDataSource::new(self.api.clone())
    }
}
