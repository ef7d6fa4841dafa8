use serde::{Deserialize, Serialize};

use super::Attr;
use crate::models::OperatorType;

/// Operation model: exactly one of `normalization_option`, `dbt` and `webhook` matching
/// `operator_type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationModel {
    pub id: Attr<String>,
    pub workspace_id: Attr<String>,
    pub name: Attr<String>,
    pub operator_type: Attr<OperatorType>,
    pub normalization_option: Attr<String>,
    pub dbt: Option<DbtModel>,
    pub webhook: Option<WebhookModel>,
}

impl OperationModel {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Attr::known(id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbtModel {
    pub git_repo_url: Attr<String>,
    pub git_repo_branch: Attr<String>,
    pub docker_image: Attr<String>,
    pub dbt_arguments: Attr<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookModel {
    pub execution_url: Attr<String>,
    pub execution_body: Attr<String>,
    pub webhook_config_id: Attr<String>,
}
