use async_trait::async_trait;
use tracing::debug;

use super::{DataSource, read_timestamp};
use crate::client::AirbyteApi;
use crate::error::{Action, ResourceError};
use crate::state::{Attr, WorkspaceIdsModel};

const TYPE_NAME: &str = "workspace_ids";

/// Ids of every workspace visible to the configured credentials.
pub struct WorkspaceIdsDataSource {
    api: AirbyteApi,
}

impl WorkspaceIdsDataSource {
    pub fn new(api: AirbyteApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for WorkspaceIdsDataSource {
    type Model = WorkspaceIdsModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, _config: &WorkspaceIdsModel) -> Result<WorkspaceIdsModel, ResourceError> {
        let workspaces = self
            .api
            .list_workspaces()
            .await
            .map_err(|source| ResourceError::new(Action::Read, TYPE_NAME, "(all)", source))?;

        let ids: Vec<String> = workspaces
            .into_iter()
            .map(|workspace| workspace.workspace_id)
            .collect();
        debug!(data_source = TYPE_NAME, count = ids.len(), "listed workspaces");

        Ok(WorkspaceIdsModel {
            id: Attr::Known(read_timestamp()),
            ids: Attr::Known(ids),
        })
    }
}
