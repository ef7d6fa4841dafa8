use async_trait::async_trait;
use tracing::{info, warn};

use super::{ReplaceCheck, Resource, ensure_in_place, keyed_by, target, wrap};
use crate::client::AirbyteApi;
use crate::error::{Action, ProviderError, ResourceError};
use crate::mapper::{flatten_operation, unflatten_new_operation, unflatten_updated_operation};
use crate::models::CheckStatus;
use crate::state::OperationModel;
use crate::validation::validate_operation;

const TYPE_NAME: &str = "operation";

/// Normalization, dbt or webhook operation.
///
/// Create always runs `operations/check` on the operator configuration first and stops there
/// when the check fails.
pub struct OperationResource {
    api: AirbyteApi,
}

impl OperationResource {
    pub fn new(api: AirbyteApi) -> Self {
        Self { api }
    }

    async fn try_create(&self, plan: &OperationModel) -> Result<OperationModel, ProviderError> {
        validate_operation(plan)?;
        let request = unflatten_new_operation(plan)?;

        let check = self
            .api
            .check_operation(&request.fields.operator_configuration)
            .await?;
        if check.status == CheckStatus::Failed {
            warn!(resource = TYPE_NAME, message = ?check.message, "operation check failed");
            return Err(ProviderError::check_failed(TYPE_NAME, check.message));
        }

        let operation = self.api.create_operation(&request).await?;
        info!(resource = TYPE_NAME, id = %operation.operation_id, "created operation");
        Ok(flatten_operation(&operation)?)
    }

    async fn try_read(&self, state: &OperationModel) -> Result<OperationModel, ProviderError> {
        let id = state.id.required("id")?;
        let operation = self.api.get_operation(&id).await?;
        Ok(flatten_operation(&operation)?)
    }

    async fn try_update(
        &self,
        prior: &OperationModel,
        plan: &OperationModel,
    ) -> Result<OperationModel, ProviderError> {
        ensure_in_place(self.requires_replace(prior, plan))?;
        validate_operation(plan)?;

        let plan = OperationModel {
            id: keyed_by(&plan.id, &prior.id),
            ..plan.clone()
        };
        let request = unflatten_updated_operation(&plan)?;
        let operation = self.api.update_operation(&request).await?;
        info!(resource = TYPE_NAME, id = %operation.operation_id, "updated operation");
        Ok(flatten_operation(&operation)?)
    }

    async fn try_delete(&self, state: &OperationModel) -> Result<(), ProviderError> {
        let id = state.id.required("id")?;
        self.api.delete_operation(&id).await?;
        info!(resource = TYPE_NAME, id = %id, "deleted operation");
        Ok(())
    }
}

#[async_trait]
impl Resource for OperationResource {
    type Model = OperationModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, plan: &OperationModel) -> Result<OperationModel, ResourceError> {
        self.try_create(plan)
            .await
            .map_err(wrap(Action::Create, TYPE_NAME, target(&plan.id, &plan.name)))
    }

    async fn read(&self, state: &OperationModel) -> Result<OperationModel, ResourceError> {
        self.try_read(state)
            .await
            .map_err(wrap(Action::Read, TYPE_NAME, target(&state.id, &state.name)))
    }

    async fn update(
        &self,
        prior: &OperationModel,
        plan: &OperationModel,
    ) -> Result<OperationModel, ResourceError> {
        self.try_update(prior, plan)
            .await
            .map_err(wrap(Action::Update, TYPE_NAME, target(&prior.id, &prior.name)))
    }

    async fn delete(&self, state: &OperationModel) -> Result<(), ResourceError> {
        self.try_delete(state)
            .await
            .map_err(wrap(Action::Delete, TYPE_NAME, target(&state.id, &state.name)))
    }

    fn requires_replace(&self, prior: &OperationModel, plan: &OperationModel) -> Vec<&'static str> {
        ReplaceCheck::default()
            .attr("workspace_id", &prior.workspace_id, &plan.workspace_id)
            .finish()
    }

    fn import_state(&self, id: &str) -> OperationModel {
        OperationModel::with_id(id)
    }
}
