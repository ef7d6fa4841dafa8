use async_trait::async_trait;
use tracing::info;

use super::{ReplaceCheck, Resource, ensure_in_place, keyed_by, target, wrap};
use crate::client::AirbyteApi;
use crate::error::{Action, ProviderError, ResourceError};
use crate::mapper::{flatten_connection, unflatten_new_connection, unflatten_updated_connection};
use crate::state::ConnectionModel;
use crate::validation::validate_connection;

const TYPE_NAME: &str = "connection";

pub struct ConnectionResource {
    api: AirbyteApi,
}

impl ConnectionResource {
    pub fn new(api: AirbyteApi) -> Self {
        Self { api }
    }

    async fn try_create(&self, plan: &ConnectionModel) -> Result<ConnectionModel, ProviderError> {
        validate_connection(plan)?;
        let request = unflatten_new_connection(plan)?;
        let connection = self.api.create_connection(&request).await?;
        info!(
            resource = TYPE_NAME,
            id = %connection.connection_id,
            source_id = %connection.source_id,
            destination_id = %connection.destination_id,
            "created connection"
        );
        Ok(flatten_connection(&connection)?)
    }

    async fn try_read(&self, state: &ConnectionModel) -> Result<ConnectionModel, ProviderError> {
        let id = state.id.required("id")?;
        let connection = self.api.get_connection(&id).await?;
        Ok(flatten_connection(&connection)?)
    }

    async fn try_update(
        &self,
        prior: &ConnectionModel,
        plan: &ConnectionModel,
    ) -> Result<ConnectionModel, ProviderError> {
        ensure_in_place(self.requires_replace(prior, plan))?;
        validate_connection(plan)?;

        let plan = ConnectionModel {
            id: keyed_by(&plan.id, &prior.id),
            ..plan.clone()
        };
        let request = unflatten_updated_connection(&plan)?;
        let connection = self.api.update_connection(&request).await?;
        info!(resource = TYPE_NAME, id = %connection.connection_id, "updated connection");
        Ok(flatten_connection(&connection)?)
    }

    async fn try_delete(&self, state: &ConnectionModel) -> Result<(), ProviderError> {
        let id = state.id.required("id")?;
        self.api.delete_connection(&id).await?;
        info!(resource = TYPE_NAME, id = %id, "deleted connection");
        Ok(())
    }
}

#[async_trait]
impl Resource for ConnectionResource {
    type Model = ConnectionModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, plan: &ConnectionModel) -> Result<ConnectionModel, ResourceError> {
        self.try_create(plan)
            .await
            .map_err(wrap(Action::Create, TYPE_NAME, target(&plan.id, &plan.name)))
    }

    async fn read(&self, state: &ConnectionModel) -> Result<ConnectionModel, ResourceError> {
        self.try_read(state)
            .await
            .map_err(wrap(Action::Read, TYPE_NAME, target(&state.id, &state.name)))
    }

    async fn update(
        &self,
        prior: &ConnectionModel,
        plan: &ConnectionModel,
    ) -> Result<ConnectionModel, ResourceError> {
        self.try_update(prior, plan)
            .await
            .map_err(wrap(Action::Update, TYPE_NAME, target(&prior.id, &prior.name)))
    }

    async fn delete(&self, state: &ConnectionModel) -> Result<(), ResourceError> {
        self.try_delete(state)
            .await
            .map_err(wrap(Action::Delete, TYPE_NAME, target(&state.id, &state.name)))
    }

    fn requires_replace(&self, prior: &ConnectionModel, plan: &ConnectionModel) -> Vec<&'static str> {
        ReplaceCheck::default()
            .attr("source_id", &prior.source_id, &plan.source_id)
            .attr("destination_id", &prior.destination_id, &plan.destination_id)
            .finish()
    }

    fn import_state(&self, id: &str) -> ConnectionModel {
        ConnectionModel::with_id(id)
    }
}
