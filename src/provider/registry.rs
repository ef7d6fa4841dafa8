//! Type-name registry
//!
//! The declarative harness addresses resources and data sources by their full type name and
//! exchanges plans and states as JSON documents. The registry maps each name to a handle that
//! decodes the document into the typed model, runs the lifecycle step and encodes the result.
//! Values the harness has not resolved yet travel as `{"$unknown": true}` in plans; encoded
//! states never contain the marker.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::full_type_name;
use crate::data_sources::DataSource;
use crate::error::{Action, ProviderError, ResourceError};
use crate::resources::Resource;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("resource type '{name}' is not supported")]
    UnknownResourceType { name: String },
    #[error("data source type '{name}' is not supported")]
    UnknownDataSourceType { name: String },
}

/// JSON-document view of a [`Resource`].
#[async_trait]
pub trait ManagedResource: Send + Sync {
    fn type_name(&self) -> &'static str;
    async fn create(&self, plan: Value) -> Result<Value, ResourceError>;
    async fn read(&self, state: Value) -> Result<Value, ResourceError>;
    async fn update(&self, prior: Value, plan: Value) -> Result<Value, ResourceError>;
    async fn delete(&self, state: Value) -> Result<(), ResourceError>;
    fn import_state(&self, id: &str) -> Result<Value, ResourceError>;
}

/// JSON-document view of a [`DataSource`].
#[async_trait]
pub trait ManagedDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;
    async fn read(&self, config: Value) -> Result<Value, ResourceError>;
}

struct Erased<T>(T);

const UNDECODED: &str = "(undecoded)";

fn decode<M: DeserializeOwned>(document: &'static str, value: Value) -> Result<M, ProviderError> {
    serde_json::from_value(value).map_err(|source| ProviderError::Document { document, source })
}

fn encode<M: Serialize>(model: &M) -> Result<Value, ProviderError> {
    serde_json::to_value(model).map_err(|source| ProviderError::Document {
        document: "state",
        source,
    })
}

impl<R: Resource> Erased<R> {
    fn fail(&self, action: Action) -> impl FnOnce(ProviderError) -> ResourceError + '_ {
        move |source| ResourceError::new(action, self.0.type_name(), UNDECODED, source)
    }
}

#[async_trait]
impl<R> ManagedResource for Erased<R>
where
    R: Resource + 'static,
{
    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    async fn create(&self, plan: Value) -> Result<Value, ResourceError> {
        let plan: R::Model = decode("plan", plan).map_err(self.fail(Action::Create))?;
        let state = self.0.create(&plan).await?;
        encode(&state).map_err(self.fail(Action::Create))
    }

    async fn read(&self, state: Value) -> Result<Value, ResourceError> {
        let state: R::Model = decode("state", state).map_err(self.fail(Action::Read))?;
        let refreshed = self.0.read(&state).await?;
        encode(&refreshed).map_err(self.fail(Action::Read))
    }

    async fn update(&self, prior: Value, plan: Value) -> Result<Value, ResourceError> {
        let prior: R::Model = decode("state", prior).map_err(self.fail(Action::Update))?;
        let plan: R::Model = decode("plan", plan).map_err(self.fail(Action::Update))?;
        let state = self.0.update(&prior, &plan).await?;
        encode(&state).map_err(self.fail(Action::Update))
    }

    async fn delete(&self, state: Value) -> Result<(), ResourceError> {
        let state: R::Model = decode("state", state).map_err(self.fail(Action::Delete))?;
        self.0.delete(&state).await
    }

    fn import_state(&self, id: &str) -> Result<Value, ResourceError> {
        encode(&self.0.import_state(id))
            .map_err(|source| ResourceError::new(Action::Import, self.0.type_name(), id, source))
    }
}

#[async_trait]
impl<D> ManagedDataSource for Erased<D>
where
    D: DataSource + 'static,
{
    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    async fn read(&self, config: Value) -> Result<Value, ResourceError> {
        let fail = |source| ResourceError::new(Action::Read, self.0.type_name(), UNDECODED, source);
        let config: D::Model = decode("config", config).map_err(fail)?;
        let result = self.0.read(&config).await?;
        encode(&result).map_err(fail)
    }
}

/// Resources and data sources keyed by full type name.
#[derive(Clone, Default)]
pub struct Registry {
    resources: HashMap<String, Arc<dyn ManagedResource>>,
    data_sources: HashMap<String, Arc<dyn ManagedDataSource>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_resource<R>(&mut self, resource: R)
    where
        R: Resource + 'static,
    {
        let name = full_type_name(resource.type_name());
        self.resources.insert(name, Arc::new(Erased(resource)));
    }

    pub fn register_data_source<D>(&mut self, data_source: D)
    where
        D: DataSource + 'static,
    {
        let name = full_type_name(data_source.type_name());
        self.data_sources.insert(name, Arc::new(Erased(data_source)));
    }

    pub fn resource(&self, name: &str) -> Result<Arc<dyn ManagedResource>, RegistryError> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownResourceType {
                name: name.to_string(),
            })
    }

    pub fn data_source(&self, name: &str) -> Result<Arc<dyn ManagedDataSource>, RegistryError> {
        self.data_sources
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownDataSourceType {
                name: name.to_string(),
            })
    }

    /// Full resource type names, sorted for stable ordering.
    pub fn resource_type_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn data_source_type_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.data_sources.keys().cloned().collect();
        names.sort();
        names
    }
}
