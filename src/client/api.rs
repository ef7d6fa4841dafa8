//! Typed endpoint calls over a [`Transport`].
//!
//! Every remote call is a POST of a JSON body to `{entity}/{action}`; reads pass the id in the
//! body rather than in the path.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::{ClientError, Method, Transport};
use crate::models::{
    CheckConnectionResponse, Connection, Connector, ConnectorDefinition, ConnectorKind,
    NewConnection, NewConnector, NewConnectorDefinition, NewOperation, NewWorkspace, Operation,
    OperationCheckResponse, OperatorConfiguration, SourceDiscoverSchemaResponse, SyncCatalog,
    UpdatedConnection, UpdatedConnector, UpdatedConnectorDefinition, UpdatedOperation,
    UpdatedWorkspace, Workspace, WorkspaceList,
};

/// Typed client for the Airbyte configuration API.
#[derive(Clone)]
pub struct AirbyteApi {
    transport: Arc<dyn Transport>,
}

fn id_body(key: &str, id: &str) -> Value {
    let mut body = Map::new();
    body.insert(key.to_string(), Value::String(id.to_string()));
    Value::Object(body)
}

impl AirbyteApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn send<B>(&self, path: &str, body: &B) -> Result<String, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body).map_err(|source| ClientError::Encode {
            path: path.to_string(),
            source,
        })?;
        self.transport.request(Method::POST, path, Some(body)).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let text = self.send(path, body).await?;
        serde_json::from_str(&text).map_err(|source| ClientError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Delete endpoints answer with an empty body.
    async fn post_discarding<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send(path, body).await.map(|_| ())
    }

    // Workspaces

    pub async fn get_workspace(&self, workspace_id: &str) -> Result<Workspace, ClientError> {
        self.post("workspaces/get", &id_body("workspaceId", workspace_id))
            .await
    }

    pub async fn get_workspace_by_slug(&self, slug: &str) -> Result<Workspace, ClientError> {
        self.post("workspaces/get_by_slug", &id_body("slug", slug))
            .await
    }

    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>, ClientError> {
        let list: WorkspaceList = self.post("workspaces/list", &Map::new()).await?;
        Ok(list.workspaces)
    }

    pub async fn create_workspace(&self, workspace: &NewWorkspace) -> Result<Workspace, ClientError> {
        self.post("workspaces/create", workspace).await
    }

    pub async fn update_workspace(
        &self,
        workspace: &UpdatedWorkspace,
    ) -> Result<Workspace, ClientError> {
        self.post("workspaces/update", workspace).await
    }

    pub async fn delete_workspace(&self, workspace_id: &str) -> Result<(), ClientError> {
        self.post_discarding("workspaces/delete", &id_body("workspaceId", workspace_id))
            .await
    }

    // Source and destination definitions

    pub async fn get_connector_definition(
        &self,
        kind: ConnectorKind,
        definition_id: &str,
    ) -> Result<ConnectorDefinition, ClientError> {
        let path = format!("{}/get", kind.definition_path());
        self.post(&path, &id_body(kind.definition_id_key(), definition_id))
            .await
    }

    pub async fn create_connector_definition(
        &self,
        kind: ConnectorKind,
        definition: &NewConnectorDefinition,
    ) -> Result<ConnectorDefinition, ClientError> {
        let path = format!("{}/create", kind.definition_path());
        self.post(&path, definition).await
    }

    pub async fn update_connector_definition(
        &self,
        kind: ConnectorKind,
        definition: &UpdatedConnectorDefinition,
    ) -> Result<ConnectorDefinition, ClientError> {
        let path = format!("{}/update", kind.definition_path());
        self.post(&path, definition).await
    }

    pub async fn delete_connector_definition(
        &self,
        kind: ConnectorKind,
        definition_id: &str,
    ) -> Result<(), ClientError> {
        let path = format!("{}/delete", kind.definition_path());
        self.post_discarding(&path, &id_body(kind.definition_id_key(), definition_id))
            .await
    }

    // Sources and destinations

    pub async fn get_connector(
        &self,
        kind: ConnectorKind,
        connector_id: &str,
    ) -> Result<Connector, ClientError> {
        let path = format!("{}/get", kind.connector_path());
        self.post(&path, &id_body(kind.connector_id_key(), connector_id))
            .await
    }

    pub async fn create_connector(
        &self,
        kind: ConnectorKind,
        connector: &NewConnector,
    ) -> Result<Connector, ClientError> {
        let path = format!("{}/create", kind.connector_path());
        self.post(&path, connector).await
    }

    pub async fn update_connector(
        &self,
        kind: ConnectorKind,
        connector: &UpdatedConnector,
    ) -> Result<Connector, ClientError> {
        let path = format!("{}/update", kind.connector_path());
        self.post(&path, connector).await
    }

    pub async fn delete_connector(
        &self,
        kind: ConnectorKind,
        connector_id: &str,
    ) -> Result<(), ClientError> {
        let path = format!("{}/delete", kind.connector_path());
        self.post_discarding(&path, &id_body(kind.connector_id_key(), connector_id))
            .await
    }

    /// Tests a connector configuration that has not been saved yet. Unsaved configurations go
    /// through the scheduler endpoints; `{plural}/check_connection` only checks a saved connector.
    pub async fn check_new_connector(
        &self,
        kind: ConnectorKind,
        connector: &NewConnector,
    ) -> Result<CheckConnectionResponse, ClientError> {
        let path = format!("scheduler/{}/check_connection", kind.connector_path());
        self.post(&path, &connector.without_name()).await
    }

    /// Tests a configuration change against an existing connector.
    pub async fn check_updated_connector(
        &self,
        kind: ConnectorKind,
        connector: &UpdatedConnector,
    ) -> Result<CheckConnectionResponse, ClientError> {
        let path = format!("{}/check_connection_for_update", kind.connector_path());
        self.post(&path, connector).await
    }

    /// Runs schema discovery for a source and returns its catalog.
    ///
    /// A response whose job did not succeed is an error even though the HTTP call returned 2xx.
    #[instrument(skip(self))]
    pub async fn discover_source_schema(&self, source_id: &str) -> Result<SyncCatalog, ClientError> {
        let response: SourceDiscoverSchemaResponse = self
            .post("sources/discover_schema", &id_body("sourceId", source_id))
            .await?;

        if !response.job_info.succeeded {
            warn!(job_id = %response.job_info.id, "schema discovery job failed");
            return Err(ClientError::DiscoverJobFailed {
                job_id: response.job_info.id,
            });
        }

        let catalog = response.catalog.unwrap_or_default();
        debug!(streams = catalog.streams.len(), "discovered source schema");
        Ok(catalog)
    }

    // Connections

    pub async fn get_connection(&self, connection_id: &str) -> Result<Connection, ClientError> {
        self.post("connections/get", &id_body("connectionId", connection_id))
            .await
    }

    pub async fn create_connection(
        &self,
        connection: &NewConnection,
    ) -> Result<Connection, ClientError> {
        self.post("connections/create", connection).await
    }

    pub async fn update_connection(
        &self,
        connection: &UpdatedConnection,
    ) -> Result<Connection, ClientError> {
        self.post("connections/update", connection).await
    }

    pub async fn delete_connection(&self, connection_id: &str) -> Result<(), ClientError> {
        self.post_discarding("connections/delete", &id_body("connectionId", connection_id))
            .await
    }

    // Operations

    pub async fn get_operation(&self, operation_id: &str) -> Result<Operation, ClientError> {
        self.post("operations/get", &id_body("operationId", operation_id))
            .await
    }

    pub async fn check_operation(
        &self,
        configuration: &OperatorConfiguration,
    ) -> Result<OperationCheckResponse, ClientError> {
        self.post("operations/check", configuration).await
    }

    pub async fn create_operation(&self, operation: &NewOperation) -> Result<Operation, ClientError> {
        self.post("operations/create", operation).await
    }

    pub async fn update_operation(
        &self,
        operation: &UpdatedOperation,
    ) -> Result<Operation, ClientError> {
        self.post("operations/update", operation).await
    }

    pub async fn delete_operation(&self, operation_id: &str) -> Result<(), ClientError> {
        self.post_discarding("operations/delete", &id_body("operationId", operation_id))
            .await
    }
}
