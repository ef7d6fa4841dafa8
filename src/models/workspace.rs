//! Workspace wire shapes.

use serde::{Deserialize, Serialize};

/// Fields a caller may set on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_data_collection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_updates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<Notification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_setup_wizard: Option<bool>,
}

/// Workspace as returned by `workspaces/get`, `get_by_slug`, `create` and `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub workspace_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub fields: WorkspaceFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_setup_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_completed_sync: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_geography: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkspace {
    pub name: String,
    #[serde(flatten)]
    pub fields: WorkspaceFields,
}

/// Update body. The name is immutable and therefore absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedWorkspace {
    pub workspace_id: String,
    #[serde(flatten)]
    pub fields: WorkspaceFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_type: NotificationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_on_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_on_failure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_configuration: Option<SlackConfiguration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Slack,
    Customerio,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackConfiguration {
    pub webhook: String,
}

/// Response of `workspaces/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceList {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}
