//! # Wire Models
//!
//! Data-transfer structures mirroring the Airbyte configuration API JSON contract.
//!
//! Each entity has a "read" shape (server-populated), a "new" shape used by create calls and an
//! "updated" shape keyed by id. Optional fields are omitted from request bodies when absent rather
//! than being sent as explicit `null`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod common;
pub mod connection;
pub mod connector;
pub mod connector_definition;
pub mod operation;
pub mod workspace;

pub use catalog::{
    DestinationStreamConfig, DestinationSyncMode, SourceDiscoverSchemaResponse,
    SourceStreamSchema, StreamAndConfiguration, SyncCatalog, SyncMode,
};
pub use common::{
    CheckConnectionResponse, CheckStatus, HealthCheckResponse, JobInfo, JobSpecificResourceRequirements,
    JobType, ResourceRequirements, ResourceRequirementsOptions,
};
pub use connection::{
    BasicSchedule, Connection, ConnectionFields, ConnectionStatus, CronSchedule, NamespaceDefinition,
    NewConnection, ScheduleData, ScheduleType, TimeUnit, UpdatedConnection,
};
pub use connector::{Connector, NewConnector, UpdatedConnector};
pub use connector_definition::{
    ConnectorDefinition, ConnectorDefinitionFields, NewConnectorDefinition,
    UpdatedConnectorDefinition,
};
pub use operation::{
    DbtConfig, NewOperation, NormalizationOption, Operation, OperationCheckResponse,
    OperationFields, OperatorConfiguration, OperatorType, UpdatedOperation, WebhookConfig,
};
pub use workspace::{
    NewWorkspace, Notification, NotificationType, SlackConfiguration, UpdatedWorkspace, Workspace,
    WorkspaceFields, WorkspaceList,
};

/// Which side of a data pipeline a connector or connector definition sits on.
///
/// The API exposes sources and destinations through parallel endpoint families whose paths and
/// id keys differ only by this prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    Source,
    Destination,
}

impl ConnectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
        }
    }

    /// Endpoint family for connector instances (`sources`, `destinations`).
    pub fn connector_path(self) -> &'static str {
        match self {
            Self::Source => "sources",
            Self::Destination => "destinations",
        }
    }

    /// Endpoint family for connector definitions.
    pub fn definition_path(self) -> &'static str {
        match self {
            Self::Source => "source_definitions",
            Self::Destination => "destination_definitions",
        }
    }

    /// JSON key carrying a connector instance id.
    pub fn connector_id_key(self) -> &'static str {
        match self {
            Self::Source => "sourceId",
            Self::Destination => "destinationId",
        }
    }

    /// JSON key carrying a connector definition id.
    pub fn definition_id_key(self) -> &'static str {
        match self {
            Self::Source => "sourceDefinitionId",
            Self::Destination => "destinationDefinitionId",
        }
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
