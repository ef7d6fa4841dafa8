//! Connection wire shapes.

use serde::{Deserialize, Serialize};

use super::{ResourceRequirementsOptions, SyncCatalog};

/// Mutable connection fields shared by the create and update bodies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionFields {
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_definition: Option<NamespaceDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_catalog: Option<SyncCatalog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_data: Option<ScheduleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<ResourceRequirementsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_catalog_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaking_change: Option<bool>,
}

/// Connection as returned by the API.
///
/// Declared without `#[serde(flatten)]` because flattened structs cannot carry the raw JSON
/// schemas nested in the sync catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
    pub source_id: String,
    pub destination_id: String,
    pub status: ConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_definition: Option<NamespaceDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_catalog: Option<SyncCatalog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_data: Option<ScheduleData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<ResourceRequirementsOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_catalog_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breaking_change: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnection {
    pub source_id: String,
    pub destination_id: String,
    #[serde(flatten)]
    pub fields: ConnectionFields,
}

/// Update body. Source and destination are immutable and therefore absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedConnection {
    pub connection_id: String,
    #[serde(flatten)]
    pub fields: ConnectionFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Active,
    Inactive,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceDefinition {
    Source,
    Destination,
    Customformat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    Manual,
    Basic,
    Cron,
}

/// Schedule union. The server populates at most one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_schedule: Option<BasicSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<CronSchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSchedule {
    pub units: i64,
    pub time_unit: TimeUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronSchedule {
    pub cron_expression: String,
    pub cron_time_zone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}
