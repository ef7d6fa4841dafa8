//! Source and destination instance wire shapes.
//!
//! `connectionConfiguration` is carried as raw JSON in every direction. Its shape is defined by
//! each connector's own configuration schema and is never parsed here.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::ConnectorKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_definition_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_definition_id: Option<String>,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_configuration: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Kind-specific view of a connector response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorIdentity<'a> {
    pub kind: ConnectorKind,
    pub id: &'a str,
    pub definition_id: &'a str,
    pub definition_name: Option<&'a str>,
}

impl Connector {
    /// Resolves which side of the pipeline this connector belongs to from its populated ids.
    pub fn identity(&self) -> Option<ConnectorIdentity<'_>> {
        fn non_empty(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if let Some(id) = non_empty(&self.source_id) {
            return Some(ConnectorIdentity {
                kind: ConnectorKind::Source,
                id,
                definition_id: non_empty(&self.source_definition_id).unwrap_or_default(),
                definition_name: non_empty(&self.source_name),
            });
        }
        non_empty(&self.destination_id).map(|id| ConnectorIdentity {
            kind: ConnectorKind::Destination,
            id,
            definition_id: non_empty(&self.destination_definition_id).unwrap_or_default(),
            definition_name: non_empty(&self.destination_name),
        })
    }
}

/// Create body, also used (with the name removed) for `check_connection`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_definition_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_definition_id: Option<String>,
    pub workspace_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub connection_configuration: Box<RawValue>,
}

impl NewConnector {
    pub fn new(
        kind: ConnectorKind,
        definition_id: String,
        workspace_id: String,
        name: String,
        connection_configuration: Box<RawValue>,
    ) -> Self {
        let (source_definition_id, destination_definition_id) = match kind {
            ConnectorKind::Source => (Some(definition_id), None),
            ConnectorKind::Destination => (None, Some(definition_id)),
        };
        Self {
            source_definition_id,
            destination_definition_id,
            workspace_id,
            name: Some(name),
            connection_configuration,
        }
    }

    /// Body accepted by `check_connection`, which rejects the name attribute.
    pub fn without_name(&self) -> Self {
        Self {
            name: None,
            ..self.clone()
        }
    }
}

/// Update body, also used for `check_connection_for_update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedConnector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    pub name: String,
    pub connection_configuration: Box<RawValue>,
}

impl UpdatedConnector {
    pub fn new(
        kind: ConnectorKind,
        id: String,
        name: String,
        connection_configuration: Box<RawValue>,
    ) -> Self {
        let (source_id, destination_id) = match kind {
            ConnectorKind::Source => (Some(id), None),
            ConnectorKind::Destination => (None, Some(id)),
        };
        Self {
            source_id,
            destination_id,
            name,
            connection_configuration,
        }
    }
}
