//! Plan/state model exchanged with the declarative-configuration harness.
//!
//! Every scalar is an [`Attr`]; nested blocks are plain `Option`/`Vec` because the harness
//! either supplies a block or does not. Models serialize to JSON with snake_case attribute names.

pub mod attr;
pub mod catalog;
pub mod connection;
pub mod connector;
pub mod connector_definition;
pub mod operation;
pub mod workspace;

pub use attr::Attr;
pub use catalog::{
    DestinationStreamConfigModel, SourceSchemaCatalogModel, SourceStreamSchemaModel,
    SyncCatalogModel,
};
pub use connection::{BasicScheduleModel, ConnectionModel, CronScheduleModel};
pub use connector::ConnectorModel;
pub use connector_definition::{
    ConnectorDefinitionModel, JobSpecificResourceRequirementsModel, ResourceRequirementsModel,
};
pub use operation::{DbtModel, OperationModel, WebhookModel};
pub use workspace::{NotificationConfigModel, WorkspaceIdsModel, WorkspaceModel};
