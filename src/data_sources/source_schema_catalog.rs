use async_trait::async_trait;
use tracing::info;

use super::{DataSource, read_timestamp};
use crate::client::AirbyteApi;
use crate::error::{Action, ProviderError, ResourceError};
use crate::mapper::flatten_sync_catalog;
use crate::state::{Attr, SourceSchemaCatalogModel};

const TYPE_NAME: &str = "source_schema_catalog";

/// Discovers the streams a source offers and returns them as a ready-to-use sync catalog.
///
/// Discovery runs as a job on the server; a job that did not succeed fails the read instead of
/// returning a partial catalog.
pub struct SourceSchemaCatalogDataSource {
    api: AirbyteApi,
}

impl SourceSchemaCatalogDataSource {
    pub fn new(api: AirbyteApi) -> Self {
        Self { api }
    }

    async fn discover(
        &self,
        config: &SourceSchemaCatalogModel,
    ) -> Result<SourceSchemaCatalogModel, ProviderError> {
        let source_id = config.source_id.required("source_id")?;
        let catalog = self.api.discover_source_schema(&source_id).await?;
        info!(
            data_source = TYPE_NAME,
            source_id = %source_id,
            streams = catalog.streams.len(),
            "discovered source schema catalog"
        );

        Ok(SourceSchemaCatalogModel {
            id: Attr::Known(read_timestamp()),
            source_id: Attr::Known(source_id),
            sync_catalog: flatten_sync_catalog(&catalog),
        })
    }
}

#[async_trait]
impl DataSource for SourceSchemaCatalogDataSource {
    type Model = SourceSchemaCatalogModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(
        &self,
        config: &SourceSchemaCatalogModel,
    ) -> Result<SourceSchemaCatalogModel, ResourceError> {
        self.discover(config).await.map_err(|source| {
            ResourceError::new(
                Action::Read,
                TYPE_NAME,
                target_source(&config.source_id),
                source,
            )
        })
    }
}

fn target_source(source_id: &Attr<String>) -> String {
    format!(
        "for source {}",
        source_id.as_known().map(String::as_str).unwrap_or("(unknown)")
    )
}
