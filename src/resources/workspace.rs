use async_trait::async_trait;
use tracing::info;

use super::{ReplaceCheck, Resource, ensure_in_place, keyed_by, target, wrap};
use crate::client::AirbyteApi;
use crate::error::{Action, ProviderError, ResourceError};
use crate::mapper::{flatten_workspace, unflatten_new_workspace, unflatten_updated_workspace};
use crate::state::WorkspaceModel;

const TYPE_NAME: &str = "workspace";

pub struct WorkspaceResource {
    api: AirbyteApi,
}

impl WorkspaceResource {
    pub fn new(api: AirbyteApi) -> Self {
        Self { api }
    }

    async fn try_create(&self, plan: &WorkspaceModel) -> Result<WorkspaceModel, ProviderError> {
        let request = unflatten_new_workspace(plan)?;
        let workspace = self.api.create_workspace(&request).await?;
        info!(resource = TYPE_NAME, id = %workspace.workspace_id, "created workspace");
        Ok(flatten_workspace(&workspace))
    }

    async fn try_read(&self, state: &WorkspaceModel) -> Result<WorkspaceModel, ProviderError> {
        let id = state.id.required("id")?;
        let workspace = self.api.get_workspace(&id).await?;
        Ok(flatten_workspace(&workspace))
    }

    async fn try_update(
        &self,
        prior: &WorkspaceModel,
        plan: &WorkspaceModel,
    ) -> Result<WorkspaceModel, ProviderError> {
        ensure_in_place(self.requires_replace(prior, plan))?;

        let plan = WorkspaceModel {
            id: keyed_by(&plan.id, &prior.id),
            ..plan.clone()
        };
        let request = unflatten_updated_workspace(&plan)?;
        let workspace = self.api.update_workspace(&request).await?;
        info!(resource = TYPE_NAME, id = %workspace.workspace_id, "updated workspace");
        Ok(flatten_workspace(&workspace))
    }

    async fn try_delete(&self, state: &WorkspaceModel) -> Result<(), ProviderError> {
        let id = state.id.required("id")?;
        self.api.delete_workspace(&id).await?;
        info!(resource = TYPE_NAME, id = %id, "deleted workspace");
        Ok(())
    }
}

#[async_trait]
impl Resource for WorkspaceResource {
    type Model = WorkspaceModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, plan: &WorkspaceModel) -> Result<WorkspaceModel, ResourceError> {
        self.try_create(plan)
            .await
            .map_err(wrap(Action::Create, TYPE_NAME, target(&plan.id, &plan.name)))
    }

    async fn read(&self, state: &WorkspaceModel) -> Result<WorkspaceModel, ResourceError> {
        self.try_read(state)
            .await
            .map_err(wrap(Action::Read, TYPE_NAME, target(&state.id, &state.name)))
    }

    async fn update(
        &self,
        prior: &WorkspaceModel,
        plan: &WorkspaceModel,
    ) -> Result<WorkspaceModel, ResourceError> {
        self.try_update(prior, plan)
            .await
            .map_err(wrap(Action::Update, TYPE_NAME, target(&prior.id, &prior.name)))
    }

    async fn delete(&self, state: &WorkspaceModel) -> Result<(), ResourceError> {
        self.try_delete(state)
            .await
            .map_err(wrap(Action::Delete, TYPE_NAME, target(&state.id, &state.name)))
    }

    fn requires_replace(&self, prior: &WorkspaceModel, plan: &WorkspaceModel) -> Vec<&'static str> {
        ReplaceCheck::default()
            .attr("name", &prior.name, &plan.name)
            .finish()
    }

    fn import_state(&self, id: &str) -> WorkspaceModel {
        WorkspaceModel::with_id(id)
    }
}
