use super::MapperError;
use crate::models::{
    NewWorkspace, Notification, SlackConfiguration, UpdatedWorkspace, Workspace, WorkspaceFields,
};
use crate::state::{Attr, NotificationConfigModel, WorkspaceModel};

pub fn flatten_workspace(workspace: &Workspace) -> WorkspaceModel {
    let fields = &workspace.fields;

    WorkspaceModel {
        id: Attr::known(workspace.workspace_id.clone()),
        customer_id: Attr::non_empty(workspace.customer_id.clone()),
        email: Attr::non_empty(fields.email.clone()),
        name: Attr::known(workspace.name.clone()),
        slug: Attr::non_empty(workspace.slug.clone()),
        initial_setup_complete: workspace.initial_setup_complete.into(),
        display_setup_wizard: fields.display_setup_wizard.into(),
        anonymous_data_collection: fields.anonymous_data_collection.into(),
        news: fields.news.into(),
        security_updates: fields.security_updates.into(),
        notification_config: fields
            .notifications
            .iter()
            .flatten()
            .map(flatten_notification)
            .collect(),
        first_completed_sync: workspace.first_completed_sync.into(),
        feedback_done: workspace.feedback_done.into(),
        default_geography: Attr::non_empty(workspace.default_geography.clone()),
    }
}

fn flatten_notification(notification: &Notification) -> NotificationConfigModel {
    NotificationConfigModel {
        notification_type: Attr::Known(notification.notification_type),
        send_on_success: notification.send_on_success.into(),
        send_on_failure: notification.send_on_failure.into(),
        slack_webhook: Attr::non_empty(
            notification
                .slack_configuration
                .as_ref()
                .map(|slack| slack.webhook.clone()),
        ),
    }
}

pub fn unflatten_new_workspace(model: &WorkspaceModel) -> Result<NewWorkspace, MapperError> {
    Ok(NewWorkspace {
        name: model.name.required("name")?,
        fields: workspace_fields(model)?,
    })
}

pub fn unflatten_updated_workspace(model: &WorkspaceModel) -> Result<UpdatedWorkspace, MapperError> {
    Ok(UpdatedWorkspace {
        workspace_id: model.id.required("id")?,
        fields: workspace_fields(model)?,
    })
}

/// Email, the feature flags and the notification flags default on the server, so an unknown
/// plan value is left out of the request.
fn workspace_fields(model: &WorkspaceModel) -> Result<WorkspaceFields, MapperError> {
    let notifications = model
        .notification_config
        .iter()
        .map(unflatten_notification)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WorkspaceFields {
        email: model.email.resolved(),
        anonymous_data_collection: model.anonymous_data_collection.resolved(),
        news: model.news.resolved(),
        security_updates: model.security_updates.resolved(),
        notifications: (!notifications.is_empty()).then_some(notifications),
        display_setup_wizard: model.display_setup_wizard.resolved(),
    })
}

fn unflatten_notification(model: &NotificationConfigModel) -> Result<Notification, MapperError> {
    Ok(Notification {
        notification_type: model.notification_type.required("notification_type")?,
        send_on_success: model.send_on_success.resolved(),
        send_on_failure: model.send_on_failure.resolved(),
        slack_configuration: model
            .slack_webhook
            .optional("slack_webhook")?
            .map(|webhook| SlackConfiguration { webhook }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;
    use serde_json::json;

    fn plan() -> WorkspaceModel {
        WorkspaceModel {
            name: Attr::known("analytics"),
            email: Attr::known("data@example.com"),
            anonymous_data_collection: Attr::Known(false),
            news: Attr::Known(true),
            security_updates: Attr::Known(true),
            display_setup_wizard: Attr::Known(false),
            notification_config: vec![NotificationConfigModel {
                notification_type: Attr::Known(NotificationType::Slack),
                send_on_success: Attr::Known(false),
                send_on_failure: Attr::Known(true),
                slack_webhook: Attr::known("https://hooks.slack.com/services/T/B/X"),
            }],
            ..WorkspaceModel::default()
        }
    }

    #[test]
    fn test_new_workspace_body() {
        let body = serde_json::to_value(unflatten_new_workspace(&plan()).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "analytics",
                "email": "data@example.com",
                "anonymousDataCollection": false,
                "news": true,
                "securityUpdates": true,
                "displaySetupWizard": false,
                "notifications": [{
                    "notificationType": "slack",
                    "sendOnSuccess": false,
                    "sendOnFailure": true,
                    "slackConfiguration": {"webhook": "https://hooks.slack.com/services/T/B/X"}
                }]
            })
        );
    }

    #[test]
    fn test_unknown_flags_and_empty_notifications_are_omitted() {
        let model = WorkspaceModel {
            email: Attr::Unknown,
            news: Attr::Unknown,
            notification_config: vec![],
            ..plan()
        };
        let body = serde_json::to_value(unflatten_new_workspace(&model).unwrap()).unwrap();
        assert!(body.get("email").is_none());
        assert!(body.get("news").is_none());
        assert!(body.get("notifications").is_none());
    }

    #[test]
    fn test_flatten_round_trips_plan() {
        let new = unflatten_new_workspace(&plan()).unwrap();
        let workspace = Workspace {
            workspace_id: "ws-1".to_string(),
            name: new.name,
            fields: new.fields,
            slug: Some("analytics".to_string()),
            customer_id: Some("cust-1".to_string()),
            initial_setup_complete: Some(true),
            ..Workspace::default()
        };

        let state = flatten_workspace(&workspace);
        let expected = WorkspaceModel {
            id: Attr::known("ws-1"),
            slug: Attr::known("analytics"),
            customer_id: Attr::known("cust-1"),
            initial_setup_complete: Attr::Known(true),
            ..plan()
        };
        assert_eq!(state, expected);
    }

    #[test]
    fn test_absent_optional_fields_flatten_to_null() {
        let workspace: Workspace = serde_json::from_str(
            r#"{"workspaceId":"ws-1","name":"n","email":"","slug":"s","firstCompletedSync":null}"#,
        )
        .unwrap();
        let state = flatten_workspace(&workspace);

        assert_eq!(state.email, Attr::Null);
        assert_eq!(state.news, Attr::Null);
        assert_eq!(state.first_completed_sync, Attr::Null);
        assert_eq!(state.default_geography, Attr::Null);
        assert!(state.notification_config.is_empty());
    }

    #[test]
    fn test_update_requires_id() {
        assert!(matches!(
            unflatten_updated_workspace(&plan()),
            Err(MapperError::MissingValue { attribute: "id" })
        ));
    }
}
