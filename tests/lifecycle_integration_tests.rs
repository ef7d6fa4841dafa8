//! Lifecycle tests for the managed resources against a mocked Airbyte API.

use airbyte_provider::ProviderError;
use airbyte_provider::error::Action;
use airbyte_provider::models::{ConnectionStatus, ConnectorKind, OperatorType, ScheduleType};
use airbyte_provider::resources::Resource;
use airbyte_provider::state::{
    Attr, ConnectionModel, ConnectorDefinitionModel, ConnectorModel, CronScheduleModel,
    OperationModel, WebhookModel,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

mod test_utils;
use test_utils::{masked_source, provider_for, provider_with_connector_checks};

const SECRET_CONFIGURATION: &str = r#"{"host":"db.internal","password":"hunter2"}"#;

fn source_plan() -> ConnectorModel {
    ConnectorModel {
        definition_id: Attr::known("def-postgres"),
        workspace_id: Attr::known("ws-1"),
        name: Attr::known("warehouse"),
        connection_configuration: Attr::known(SECRET_CONFIGURATION),
        ..ConnectorModel::default()
    }
}

fn webhook_plan() -> OperationModel {
    OperationModel {
        workspace_id: Attr::known("ws-1"),
        name: Attr::known("notify"),
        operator_type: Attr::Known(OperatorType::Webhook),
        webhook: Some(WebhookModel {
            execution_url: Attr::known("https://hooks.example.com/run"),
            ..WebhookModel::default()
        }),
        ..OperationModel::default()
    }
}

fn webhook_operation(operation_id: &str) -> serde_json::Value {
    json!({
        "operationId": operation_id,
        "workspaceId": "ws-1",
        "name": "notify",
        "operatorConfiguration": {
            "operatorType": "webhook",
            "webhook": {"executionUrl": "https://hooks.example.com/run"}
        }
    })
}

fn connection(connection_id: &str) -> serde_json::Value {
    json!({
        "connectionId": connection_id,
        "sourceId": "src-1",
        "destinationId": "dst-1",
        "status": "active",
        "name": "warehouse sync",
        "scheduleType": "cron",
        "scheduleData": {"cron": {"cronExpression": "0 0 * * * ?", "cronTimeZone": "UTC"}},
        "geography": "auto"
    })
}

fn connection_plan() -> ConnectionModel {
    ConnectionModel {
        source_id: Attr::known("src-1"),
        destination_id: Attr::known("dst-1"),
        status: Attr::Known(ConnectionStatus::Active),
        name: Attr::known("warehouse sync"),
        schedule_type: Attr::Known(ScheduleType::Cron),
        cron_schedule: Some(CronScheduleModel {
            cron_expression: Attr::known("0 0 * * * ?"),
            cron_time_zone: Attr::known("UTC"),
        }),
        ..ConnectionModel::default()
    }
}

#[tokio::test]
async fn test_source_create_keeps_planned_configuration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/sources/create"))
        .and(body_json(json!({
            "sourceDefinitionId": "def-postgres",
            "workspaceId": "ws-1",
            "name": "warehouse",
            "connectionConfiguration": {"host": "db.internal", "password": "hunter2"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(masked_source("src-1", "warehouse")))
        .expect(1)
        .mount(&server)
        .await;

    let sources = provider_for(&server).connectors(ConnectorKind::Source);
    let state = sources.create(&source_plan()).await.unwrap();

    assert_eq!(state.id, Attr::known("src-1"));
    assert_eq!(state.definition_name, Attr::known("Postgres"));
    assert_eq!(state.connection_configuration, Attr::known(SECRET_CONFIGURATION));
}

#[tokio::test]
async fn test_source_read_keeps_prior_configuration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/sources/get"))
        .and(body_json(json!({"sourceId": "src-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(masked_source("src-1", "renamed")))
        .expect(1)
        .mount(&server)
        .await;

    let prior = ConnectorModel {
        id: Attr::known("src-1"),
        ..source_plan()
    };
    let sources = provider_for(&server).connectors(ConnectorKind::Source);
    let state = sources.read(&prior).await.unwrap();

    assert_eq!(state.name, Attr::known("renamed"));
    assert_eq!(state.connection_configuration, Attr::known(SECRET_CONFIGURATION));
}

#[tokio::test]
async fn test_source_update_sends_only_mutable_fields() {
    let server = MockServer::start().await;

    let rotated = r#"{"host":"db.internal","password":"rotated"}"#;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/update"))
        .and(body_json(json!({
            "sourceId": "src-1",
            "name": "warehouse",
            "connectionConfiguration": {"host": "db.internal", "password": "rotated"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(masked_source("src-1", "warehouse")))
        .expect(1)
        .mount(&server)
        .await;

    let prior = ConnectorModel {
        id: Attr::known("src-1"),
        ..source_plan()
    };
    let plan = ConnectorModel {
        id: Attr::Unknown,
        connection_configuration: Attr::known(rotated),
        ..source_plan()
    };
    let sources = provider_for(&server).connectors(ConnectorKind::Source);
    let state = sources.update(&prior, &plan).await.unwrap();

    assert_eq!(state.id, Attr::known("src-1"));
    assert_eq!(state.connection_configuration, Attr::known(rotated));
}

#[tokio::test]
async fn test_failed_connector_check_blocks_create() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/scheduler/sources/check_connection"))
        .and(body_json(json!({
            "sourceDefinitionId": "def-postgres",
            "workspaceId": "ws-1",
            "connectionConfiguration": {"host": "db.internal", "password": "hunter2"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failed",
            "message": "Connection refused",
            "jobInfo": {"id": "job-7", "succeeded": true}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(masked_source("src-1", "warehouse")))
        .expect(0)
        .mount(&server)
        .await;

    let sources = provider_with_connector_checks(&server).connectors(ConnectorKind::Source);
    let err = sources.create(&source_plan()).await.unwrap_err();

    assert_eq!(err.action, Action::Create);
    assert!(matches!(err.source, ProviderError::CheckFailed { .. }));
    assert!(
        err.to_string()
            .ends_with("source check failed: Connection refused")
    );
}

#[tokio::test]
async fn test_connector_checks_are_opt_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/scheduler/destinations/check_connection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "failed"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/destinations/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "destinationId": "dst-1",
            "destinationDefinitionId": "def-bigquery",
            "destinationName": "BigQuery",
            "workspaceId": "ws-1",
            "name": "lake",
            "connectionConfiguration": {"credentials": "**********"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plan = ConnectorModel {
        definition_id: Attr::known("def-bigquery"),
        name: Attr::known("lake"),
        connection_configuration: Attr::known(r#"{"credentials":"key"}"#),
        ..source_plan()
    };
    let destinations = provider_for(&server).connectors(ConnectorKind::Destination);
    let state = destinations.create(&plan).await.unwrap();

    assert_eq!(state.id, Attr::known("dst-1"));
    assert_eq!(state.connection_configuration, Attr::known(r#"{"credentials":"key"}"#));
}

#[tokio::test]
async fn test_operation_check_failure_aborts_create() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/operations/check"))
        .and(body_json(json!({
            "operatorType": "webhook",
            "webhook": {"executionUrl": "https://hooks.example.com/run"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failed",
            "message": "webhook url is not reachable"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/operations/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(webhook_operation("op-1")))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .operations()
        .create(&webhook_plan())
        .await
        .unwrap_err();

    assert_eq!(err.target, "notify");
    assert!(
        err.to_string()
            .contains("operation check failed: webhook url is not reachable")
    );
}

#[tokio::test]
async fn test_operation_created_after_successful_check() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/operations/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "succeeded"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/operations/create"))
        .and(body_json(json!({
            "workspaceId": "ws-1",
            "name": "notify",
            "operatorConfiguration": {
                "operatorType": "webhook",
                "webhook": {"executionUrl": "https://hooks.example.com/run"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(webhook_operation("op-1")))
        .expect(1)
        .mount(&server)
        .await;

    let state = provider_for(&server)
        .operations()
        .create(&webhook_plan())
        .await
        .unwrap();

    assert_eq!(state.id, Attr::known("op-1"));
    assert_eq!(state.operator_type, Attr::Known(OperatorType::Webhook));
    assert_eq!(state.normalization_option, Attr::Null);
    assert!(state.dbt.is_none());
}

#[tokio::test]
async fn test_operation_update_skips_check() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/operations/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "failed"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/operations/update"))
        .and(body_json(json!({
            "operationId": "op-1",
            "name": "notify",
            "operatorConfiguration": {
                "operatorType": "webhook",
                "webhook": {"executionUrl": "https://hooks.example.com/run"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(webhook_operation("op-1")))
        .expect(1)
        .mount(&server)
        .await;

    let prior = OperationModel {
        id: Attr::known("op-1"),
        ..webhook_plan()
    };
    let state = provider_for(&server)
        .operations()
        .update(&prior, &webhook_plan())
        .await
        .unwrap();
    assert_eq!(state.id, Attr::known("op-1"));
}

#[tokio::test]
async fn test_definition_workspace_is_carried_forward() {
    let server = MockServer::start().await;

    let definition = json!({
        "destinationDefinitionId": "ddef-1",
        "name": "Internal Lake",
        "dockerRepository": "acme/destination-lake",
        "dockerImageTag": "0.3.1",
        "protocolVersion": "0.2.0",
        "releaseStage": "custom"
    });
    Mock::given(method("POST"))
        .and(path("/api/v1/destination_definitions/create"))
        .and(body_json(json!({
            "workspaceId": "ws-1",
            "destinationDefinition": {
                "name": "Internal Lake",
                "dockerRepository": "acme/destination-lake",
                "dockerImageTag": "0.3.1"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(definition.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/destination_definitions/get"))
        .and(body_json(json!({"destinationDefinitionId": "ddef-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(definition))
        .expect(1)
        .mount(&server)
        .await;

    let plan = ConnectorDefinitionModel {
        workspace_id: Attr::known("ws-1"),
        name: Attr::known("Internal Lake"),
        docker_repository: Attr::known("acme/destination-lake"),
        docker_image_tag: Attr::known("0.3.1"),
        ..ConnectorDefinitionModel::default()
    };
    let definitions = provider_for(&server).connector_definitions(ConnectorKind::Destination);

    let state = definitions.create(&plan).await.unwrap();
    assert_eq!(state.id, Attr::known("ddef-1"));
    assert_eq!(state.workspace_id, Attr::known("ws-1"));
    assert_eq!(state.release_stage, Attr::known("custom"));
    assert_eq!(state.documentation_url, Attr::Null);

    let refreshed = definitions.read(&state).await.unwrap();
    assert_eq!(refreshed.workspace_id, Attr::known("ws-1"));
}

#[tokio::test]
async fn test_connection_create_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/connections/create"))
        .and(body_json(json!({
            "sourceId": "src-1",
            "destinationId": "dst-1",
            "status": "active",
            "name": "warehouse sync",
            "scheduleType": "cron",
            "scheduleData": {"cron": {"cronExpression": "0 0 * * * ?", "cronTimeZone": "UTC"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(connection("conn-1")))
        .expect(1)
        .mount(&server)
        .await;

    let state = provider_for(&server)
        .connections()
        .create(&connection_plan())
        .await
        .unwrap();

    assert_eq!(state.id, Attr::known("conn-1"));
    assert_eq!(state.schedule_type, Attr::Known(ScheduleType::Cron));
    assert_eq!(state.cron_schedule, connection_plan().cron_schedule);
    assert!(state.basic_schedule.is_none());
    assert_eq!(state.geography, Attr::known("auto"));
}

#[tokio::test]
async fn test_invalid_connection_plan_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/connections/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(connection("conn-1")))
        .expect(0)
        .mount(&server)
        .await;

    let plan = ConnectionModel {
        cron_schedule: None,
        ..connection_plan()
    };
    let err = provider_for(&server)
        .connections()
        .create(&plan)
        .await
        .unwrap_err();

    assert!(matches!(err.source, ProviderError::Validation(_)));
    assert_eq!(err.target, "warehouse sync");
}

#[tokio::test]
async fn test_connection_update_refuses_replacement() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/connections/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(connection("conn-1")))
        .expect(0)
        .mount(&server)
        .await;

    let prior = ConnectionModel {
        id: Attr::known("conn-1"),
        ..connection_plan()
    };
    let plan = ConnectionModel {
        destination_id: Attr::known("dst-2"),
        ..prior.clone()
    };
    let connections = provider_for(&server).connections();
    assert_eq!(connections.requires_replace(&prior, &plan), vec!["destination_id"]);

    let err = connections.update(&prior, &plan).await.unwrap_err();
    assert_eq!(err.action, Action::Update);
    assert!(matches!(err.source, ProviderError::RequiresReplace { .. }));
}

#[tokio::test]
async fn test_delete_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/connections/delete"))
        .and(body_json(json!({"connectionId": "conn-1"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/connections/delete"))
        .and(body_json(json!({"connectionId": "conn-9"})))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let connections = provider_for(&server).connections();
    let existing = ConnectionModel {
        id: Attr::known("conn-1"),
        ..connection_plan()
    };
    connections.delete(&existing).await.unwrap();

    let missing = ConnectionModel {
        id: Attr::known("conn-9"),
        ..connection_plan()
    };
    let err = connections.delete(&missing).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(
        err.to_string()
            .starts_with("Could not delete connection conn-9, unexpected error:")
    );
}

#[tokio::test]
async fn test_passing_connector_checks_allow_create_and_update() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/scheduler/sources/check_connection"))
        .and(body_json(json!({
            "sourceDefinitionId": "def-postgres",
            "workspaceId": "ws-1",
            "connectionConfiguration": {"host": "db.internal", "password": "hunter2"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "jobInfo": {"id": "job-8", "succeeded": true}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/check_connection"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(masked_source("src-1", "warehouse")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/check_connection_for_update"))
        .and(body_json(json!({
            "sourceId": "src-1",
            "name": "warehouse",
            "connectionConfiguration": {"host": "db.internal", "password": "hunter2"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "succeeded"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sources/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(masked_source("src-1", "warehouse")))
        .expect(1)
        .mount(&server)
        .await;

    let sources = provider_with_connector_checks(&server).connectors(ConnectorKind::Source);
    let state = sources.create(&source_plan()).await.unwrap();
    assert_eq!(state.id, Attr::known("src-1"));

    let updated = sources.update(&state, &source_plan()).await.unwrap();
    assert_eq!(updated.connection_configuration, Attr::known(SECRET_CONFIGURATION));
}
