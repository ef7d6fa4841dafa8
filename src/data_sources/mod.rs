//! Read-only data sources.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ResourceError;

pub mod source_schema_catalog;
pub mod workspace;
pub mod workspace_ids;

pub use source_schema_catalog::SourceSchemaCatalogDataSource;
pub use workspace::WorkspaceDataSource;
pub use workspace_ids::WorkspaceIdsDataSource;

/// Lookup of remote data that is never created or changed by the provider.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Clone + Default + Serialize + DeserializeOwned + Send + Sync;

    fn type_name(&self) -> &'static str;

    /// Resolves `config` (the lookup arguments) into a full result.
    async fn read(&self, config: &Self::Model) -> Result<Self::Model, ResourceError>;
}

/// Id of a computed result: the Unix time of the read, in seconds.
pub(crate) fn read_timestamp() -> String {
    Utc::now().timestamp().to_string()
}
