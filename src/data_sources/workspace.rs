use async_trait::async_trait;
use tracing::debug;

use super::DataSource;
use crate::client::AirbyteApi;
use crate::error::{Action, ProviderError, ResourceError};
use crate::mapper::flatten_workspace;
use crate::resources::target;
use crate::state::WorkspaceModel;
use crate::validation::validate_workspace_lookup;

const TYPE_NAME: &str = "workspace";

/// Looks a workspace up by `id` or by `slug`.
pub struct WorkspaceDataSource {
    api: AirbyteApi,
}

impl WorkspaceDataSource {
    pub fn new(api: AirbyteApi) -> Self {
        Self { api }
    }

    async fn lookup(&self, config: &WorkspaceModel) -> Result<WorkspaceModel, ProviderError> {
        validate_workspace_lookup(config)?;

        let workspace = match config.id.optional("id")? {
            Some(id) => self.api.get_workspace(&id).await?,
            None => {
                let slug = config.slug.required("slug")?;
                self.api.get_workspace_by_slug(&slug).await?
            }
        };
        debug!(data_source = TYPE_NAME, id = %workspace.workspace_id, "resolved workspace");
        Ok(flatten_workspace(&workspace))
    }
}

#[async_trait]
impl DataSource for WorkspaceDataSource {
    type Model = WorkspaceModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, config: &WorkspaceModel) -> Result<WorkspaceModel, ResourceError> {
        self.lookup(config).await.map_err(|source| {
            ResourceError::new(Action::Read, TYPE_NAME, target(&config.id, &config.slug), source)
        })
    }
}
