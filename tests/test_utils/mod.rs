//! Shared fixtures for integration tests against a mocked Airbyte API.

#![allow(dead_code)]

use std::sync::Arc;

use airbyte_provider::Provider;
use airbyte_provider::client::{AirbyteApi, ApiClient};
use airbyte_provider::config::{ProviderConfig, RetryConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Configuration pointing at the mock server, with short retry delays.
pub fn config_for(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        host_url: server.uri(),
        timeout_seconds: 5,
        retry: RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 5,
            jitter_factor: 0.0,
        },
        ..ProviderConfig::default()
    }
}

pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&config_for(server)).expect("client builds")
}

pub fn api_for(server: &MockServer) -> AirbyteApi {
    AirbyteApi::new(Arc::new(client_for(server)))
}

/// Provider wired to the mock server without running the health check.
pub fn provider_for(server: &MockServer) -> Provider {
    let config = config_for(server);
    let client = ApiClient::new(&config).expect("client builds");
    Provider::with_transport(config, Arc::new(client))
}

pub fn provider_with_connector_checks(server: &MockServer) -> Provider {
    let config = ProviderConfig {
        check_connectors: true,
        ..config_for(server)
    };
    let client = ApiClient::new(&config).expect("client builds");
    Provider::with_transport(config, Arc::new(client))
}

/// Source response whose configuration is masked the way the API masks secrets.
pub fn masked_source(source_id: &str, name: &str) -> Value {
    json!({
        "sourceId": source_id,
        "sourceDefinitionId": "def-postgres",
        "sourceName": "Postgres",
        "workspaceId": "ws-1",
        "name": name,
        "connectionConfiguration": {"host": "db.internal", "password": "**********"}
    })
}

pub fn workspace(workspace_id: &str, slug: &str) -> Value {
    json!({
        "workspaceId": workspace_id,
        "customerId": "cust-1",
        "name": "Analytics",
        "slug": slug,
        "initialSetupComplete": true,
        "displaySetupWizard": false,
        "anonymousDataCollection": false,
        "news": false,
        "securityUpdates": true,
        "notifications": [],
        "firstCompletedSync": true,
        "feedbackDone": false,
        "defaultGeography": "auto"
    })
}

/// `sources/discover_schema` response carrying the appliances stream.
pub fn appliances_discovery(succeeded: bool) -> Value {
    json!({
        "catalog": {
            "streams": [{
                "stream": {
                    "name": "appliances",
                    "jsonSchema": {"type": "object", "properties": {"uid": {"type": "string"}}},
                    "supportedSyncModes": ["incremental", "full_refresh"],
                    "sourceDefinedCursor": false,
                    "defaultCursorField": ["uid"],
                    "sourceDefinedPrimaryKey": [["uid"]]
                },
                "config": {
                    "syncMode": "incremental",
                    "destinationSyncMode": "append",
                    "cursorField": ["uid"],
                    "primaryKey": [["uid"]],
                    "aliasName": "appliances",
                    "selected": true
                }
            }]
        },
        "jobInfo": {"id": "job-42", "succeeded": succeeded}
    })
}
