use async_trait::async_trait;
use tracing::info;

use super::{ReplaceCheck, Resource, ensure_in_place, keyed_by, target, wrap};
use crate::client::AirbyteApi;
use crate::error::{Action, ProviderError, ResourceError};
use crate::mapper::{
    flatten_connector_definition, unflatten_new_connector_definition,
    unflatten_updated_connector_definition,
};
use crate::models::ConnectorKind;
use crate::state::{Attr, ConnectorDefinitionModel};

/// Custom source or destination definition.
///
/// The API does not return the workspace a definition was registered in, so `workspace_id` is
/// always taken from the plan or prior state.
pub struct ConnectorDefinitionResource {
    api: AirbyteApi,
    kind: ConnectorKind,
}

impl ConnectorDefinitionResource {
    pub fn new(api: AirbyteApi, kind: ConnectorKind) -> Self {
        Self { api, kind }
    }

    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }

    fn with_workspace(
        &self,
        flattened: ConnectorDefinitionModel,
        workspace_id: &Attr<String>,
    ) -> ConnectorDefinitionModel {
        ConnectorDefinitionModel {
            workspace_id: workspace_id.clone(),
            ..flattened
        }
    }

    async fn try_create(
        &self,
        plan: &ConnectorDefinitionModel,
    ) -> Result<ConnectorDefinitionModel, ProviderError> {
        let request = unflatten_new_connector_definition(self.kind, plan)?;
        let definition = self
            .api
            .create_connector_definition(self.kind, &request)
            .await?;
        let state = flatten_connector_definition(&definition)?;
        info!(resource = self.type_name(), id = ?state.id.as_known(), "created connector definition");
        Ok(self.with_workspace(state, &plan.workspace_id))
    }

    async fn try_read(
        &self,
        state: &ConnectorDefinitionModel,
    ) -> Result<ConnectorDefinitionModel, ProviderError> {
        let id = state.id.required("id")?;
        let definition = self.api.get_connector_definition(self.kind, &id).await?;
        let refreshed = flatten_connector_definition(&definition)?;
        Ok(self.with_workspace(refreshed, &state.workspace_id))
    }

    async fn try_update(
        &self,
        prior: &ConnectorDefinitionModel,
        plan: &ConnectorDefinitionModel,
    ) -> Result<ConnectorDefinitionModel, ProviderError> {
        ensure_in_place(self.requires_replace(prior, plan))?;

        let plan = ConnectorDefinitionModel {
            id: keyed_by(&plan.id, &prior.id),
            ..plan.clone()
        };
        let request = unflatten_updated_connector_definition(self.kind, &plan)?;
        let definition = self
            .api
            .update_connector_definition(self.kind, &request)
            .await?;
        let state = flatten_connector_definition(&definition)?;
        info!(resource = self.type_name(), id = ?state.id.as_known(), "updated connector definition");
        Ok(self.with_workspace(state, &prior.workspace_id))
    }

    async fn try_delete(&self, state: &ConnectorDefinitionModel) -> Result<(), ProviderError> {
        let id = state.id.required("id")?;
        self.api.delete_connector_definition(self.kind, &id).await?;
        info!(resource = self.type_name(), id = %id, "deleted connector definition");
        Ok(())
    }
}

#[async_trait]
impl Resource for ConnectorDefinitionResource {
    type Model = ConnectorDefinitionModel;

    fn type_name(&self) -> &'static str {
        match self.kind {
            ConnectorKind::Source => "source_definition",
            ConnectorKind::Destination => "destination_definition",
        }
    }

    async fn create(
        &self,
        plan: &ConnectorDefinitionModel,
    ) -> Result<ConnectorDefinitionModel, ResourceError> {
        self.try_create(plan)
            .await
            .map_err(wrap(Action::Create, self.type_name(), target(&plan.id, &plan.name)))
    }

    async fn read(
        &self,
        state: &ConnectorDefinitionModel,
    ) -> Result<ConnectorDefinitionModel, ResourceError> {
        self.try_read(state)
            .await
            .map_err(wrap(Action::Read, self.type_name(), target(&state.id, &state.name)))
    }

    async fn update(
        &self,
        prior: &ConnectorDefinitionModel,
        plan: &ConnectorDefinitionModel,
    ) -> Result<ConnectorDefinitionModel, ResourceError> {
        self.try_update(prior, plan)
            .await
            .map_err(wrap(Action::Update, self.type_name(), target(&prior.id, &prior.name)))
    }

    async fn delete(&self, state: &ConnectorDefinitionModel) -> Result<(), ResourceError> {
        self.try_delete(state)
            .await
            .map_err(wrap(Action::Delete, self.type_name(), target(&state.id, &state.name)))
    }

    fn requires_replace(
        &self,
        prior: &ConnectorDefinitionModel,
        plan: &ConnectorDefinitionModel,
    ) -> Vec<&'static str> {
        ReplaceCheck::default()
            .attr("workspace_id", &prior.workspace_id, &plan.workspace_id)
            .attr("name", &prior.name, &plan.name)
            .attr("docker_repository", &prior.docker_repository, &plan.docker_repository)
            .attr("documentation_url", &prior.documentation_url, &plan.documentation_url)
            .finish()
    }

    fn import_state(&self, id: &str) -> ConnectorDefinitionModel {
        ConnectorDefinitionModel::with_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::client::{ClientError, Method, Transport};

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn request(
            &self,
            _method: Method,
            path: &str,
            _body: Option<String>,
        ) -> Result<String, ClientError> {
            panic!("unexpected request to {path}");
        }
    }

    fn resource(kind: ConnectorKind) -> ConnectorDefinitionResource {
        ConnectorDefinitionResource::new(AirbyteApi::new(Arc::new(Offline)), kind)
    }

    #[test]
    fn test_type_name_follows_kind() {
        assert_eq!(resource(ConnectorKind::Source).type_name(), "source_definition");
        assert_eq!(
            resource(ConnectorKind::Destination).type_name(),
            "destination_definition"
        );
    }

    #[test]
    fn test_only_tag_and_requirements_change_in_place() {
        let prior = ConnectorDefinitionModel {
            id: Attr::known("def-1"),
            workspace_id: Attr::known("ws-1"),
            name: Attr::known("Custom Postgres"),
            docker_repository: Attr::known("acme/source-postgres"),
            docker_image_tag: Attr::known("1.2.0"),
            ..ConnectorDefinitionModel::default()
        };
        let bump = ConnectorDefinitionModel {
            docker_image_tag: Attr::known("1.3.0"),
            ..prior.clone()
        };
        let resource = resource(ConnectorKind::Source);
        assert!(resource.requires_replace(&prior, &bump).is_empty());

        let moved = ConnectorDefinitionModel {
            docker_repository: Attr::known("acme/source-postgres-v2"),
            ..bump
        };
        assert_eq!(resource.requires_replace(&prior, &moved), vec!["docker_repository"]);
    }

    #[tokio::test]
    async fn test_update_refuses_replacement_before_any_request() {
        let prior = ConnectorDefinitionModel::with_id("def-1");
        let plan = ConnectorDefinitionModel {
            name: Attr::known("renamed"),
            ..prior.clone()
        };
        let err = resource(ConnectorKind::Destination)
            .update(&prior, &plan)
            .await
            .unwrap_err();
        assert!(matches!(err.source, ProviderError::RequiresReplace { .. }));
        assert_eq!(err.target, "def-1");
    }
}
