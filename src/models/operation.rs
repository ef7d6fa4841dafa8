//! Operation wire shapes.

use serde::{Deserialize, Serialize};

use super::CheckStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationFields {
    pub name: String,
    pub operator_configuration: OperatorConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    pub workspace_id: String,
    pub name: String,
    pub operator_configuration: OperatorConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOperation {
    pub workspace_id: String,
    #[serde(flatten)]
    pub fields: OperationFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedOperation {
    pub operation_id: String,
    #[serde(flatten)]
    pub fields: OperationFields,
}

/// Operator union tagged by `operatorType`; exactly one branch should be populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorConfiguration {
    pub operator_type: OperatorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<NormalizationOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbt: Option<DbtConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorType {
    Normalization,
    Dbt,
    Webhook,
}

impl OperatorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normalization => "normalization",
            Self::Dbt => "dbt",
            Self::Webhook => "webhook",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbtConfig {
    #[serde(default)]
    pub git_repo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repo_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbt_arguments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    #[serde(default)]
    pub execution_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_config_id: Option<String>,
}

/// Response of `operations/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCheckResponse {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
