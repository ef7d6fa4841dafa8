use async_trait::async_trait;
use tracing::{debug, info};

use super::{ReplaceCheck, Resource, ensure_in_place, keyed_by, target, wrap};
use crate::client::AirbyteApi;
use crate::error::{Action, ProviderError, ResourceError};
use crate::mapper::{flatten_connector, unflatten_new_connector, unflatten_updated_connector};
use crate::models::{CheckConnectionResponse, CheckStatus, ConnectorKind};
use crate::state::ConnectorModel;

/// Source or destination instance.
///
/// The API masks secrets inside `connection_configuration`, so state always keeps the plan's
/// (or prior state's) configuration text instead of the echoed one. With `check_connectors` set,
/// the configuration is tested before it is saved.
pub struct ConnectorResource {
    api: AirbyteApi,
    kind: ConnectorKind,
    check_connectors: bool,
}

impl ConnectorResource {
    pub fn new(api: AirbyteApi, kind: ConnectorKind, check_connectors: bool) -> Self {
        Self {
            api,
            kind,
            check_connectors,
        }
    }

    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }

    fn ensure_check_passed(&self, response: CheckConnectionResponse) -> Result<(), ProviderError> {
        debug!(resource = self.type_name(), status = ?response.status, "connection check finished");
        match response.status {
            CheckStatus::Succeeded => Ok(()),
            CheckStatus::Failed => Err(ProviderError::check_failed(
                self.kind.as_str(),
                response.message,
            )),
        }
    }

    async fn try_create(&self, plan: &ConnectorModel) -> Result<ConnectorModel, ProviderError> {
        let request = unflatten_new_connector(self.kind, plan)?;
        if self.check_connectors {
            let response = self.api.check_new_connector(self.kind, &request).await?;
            self.ensure_check_passed(response)?;
        }

        let connector = self.api.create_connector(self.kind, &request).await?;
        let state = flatten_connector(&connector, plan.connection_configuration.clone())?;
        info!(resource = self.type_name(), id = ?state.id.as_known(), "created connector");
        Ok(state)
    }

    async fn try_read(&self, state: &ConnectorModel) -> Result<ConnectorModel, ProviderError> {
        let id = state.id.required("id")?;
        let connector = self.api.get_connector(self.kind, &id).await?;
        Ok(flatten_connector(
            &connector,
            state.connection_configuration.clone(),
        )?)
    }

    async fn try_update(
        &self,
        prior: &ConnectorModel,
        plan: &ConnectorModel,
    ) -> Result<ConnectorModel, ProviderError> {
        ensure_in_place(self.requires_replace(prior, plan))?;

        let plan = ConnectorModel {
            id: keyed_by(&plan.id, &prior.id),
            ..plan.clone()
        };
        let request = unflatten_updated_connector(self.kind, &plan)?;
        if self.check_connectors {
            let response = self.api.check_updated_connector(self.kind, &request).await?;
            self.ensure_check_passed(response)?;
        }

        let connector = self.api.update_connector(self.kind, &request).await?;
        let state = flatten_connector(&connector, plan.connection_configuration.clone())?;
        info!(resource = self.type_name(), id = ?state.id.as_known(), "updated connector");
        Ok(state)
    }

    async fn try_delete(&self, state: &ConnectorModel) -> Result<(), ProviderError> {
        let id = state.id.required("id")?;
        self.api.delete_connector(self.kind, &id).await?;
        info!(resource = self.type_name(), id = %id, "deleted connector");
        Ok(())
    }
}

#[async_trait]
impl Resource for ConnectorResource {
    type Model = ConnectorModel;

    fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn create(&self, plan: &ConnectorModel) -> Result<ConnectorModel, ResourceError> {
        self.try_create(plan)
            .await
            .map_err(wrap(Action::Create, self.type_name(), target(&plan.id, &plan.name)))
    }

    async fn read(&self, state: &ConnectorModel) -> Result<ConnectorModel, ResourceError> {
        self.try_read(state)
            .await
            .map_err(wrap(Action::Read, self.type_name(), target(&state.id, &state.name)))
    }

    async fn update(
        &self,
        prior: &ConnectorModel,
        plan: &ConnectorModel,
    ) -> Result<ConnectorModel, ResourceError> {
        self.try_update(prior, plan)
            .await
            .map_err(wrap(Action::Update, self.type_name(), target(&prior.id, &prior.name)))
    }

    async fn delete(&self, state: &ConnectorModel) -> Result<(), ResourceError> {
        self.try_delete(state)
            .await
            .map_err(wrap(Action::Delete, self.type_name(), target(&state.id, &state.name)))
    }

    fn requires_replace(&self, prior: &ConnectorModel, plan: &ConnectorModel) -> Vec<&'static str> {
        ReplaceCheck::default()
            .attr("definition_id", &prior.definition_id, &plan.definition_id)
            .attr("workspace_id", &prior.workspace_id, &plan.workspace_id)
            .finish()
    }

    fn import_state(&self, id: &str) -> ConnectorModel {
        ConnectorModel::with_id(id)
    }
}
