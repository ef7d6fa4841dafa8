use serde::{Deserialize, Serialize};

use super::Attr;
use crate::models::NotificationType;

/// Workspace resource and data source model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceModel {
    pub id: Attr<String>,
    pub customer_id: Attr<String>,
    pub email: Attr<String>,
    pub name: Attr<String>,
    pub slug: Attr<String>,
    pub initial_setup_complete: Attr<bool>,
    pub display_setup_wizard: Attr<bool>,
    pub anonymous_data_collection: Attr<bool>,
    pub news: Attr<bool>,
    pub security_updates: Attr<bool>,
    pub notification_config: Vec<NotificationConfigModel>,
    pub first_completed_sync: Attr<bool>,
    pub feedback_done: Attr<bool>,
    pub default_geography: Attr<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfigModel {
    pub notification_type: Attr<NotificationType>,
    pub send_on_success: Attr<bool>,
    pub send_on_failure: Attr<bool>,
    pub slack_webhook: Attr<String>,
}

/// Result of the `workspace_ids` data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceIdsModel {
    pub id: Attr<String>,
    pub ids: Attr<Vec<String>>,
}

impl WorkspaceModel {
    /// A state that only carries the id, used for import.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Attr::known(id.into()),
            ..Self::default()
        }
    }
}
