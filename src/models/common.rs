//! Wire shapes shared by several entities.

use serde::{Deserialize, Serialize};

/// CPU and memory overrides. These keys are snake_case on the wire, unlike the rest of the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirementsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
}

/// Default requirements plus per-job-type overrides for a connector definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ResourceRequirementsOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_specific: Option<Vec<JobSpecificResourceRequirements>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpecificResourceRequirements {
    pub job_type: JobType,
    #[serde(default)]
    pub resource_requirements: ResourceRequirementsOptions,
}

/// Job types that accept resource requirement overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    GetSpec,
    CheckConnection,
    DiscoverSchema,
    Sync,
    ResetConnection,
    ConnectionUpdater,
    Replicate,
}

/// Summary of the synchronous job backing a check or discover call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub succeeded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Succeeded,
    Failed,
}

/// Response of `check_connection` and `check_connection_for_update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConnectionResponse {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub job_info: JobInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    #[serde(default)]
    pub available: bool,
}
