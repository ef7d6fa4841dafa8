//! Source and destination definition wire shapes.

use serde::{Deserialize, Serialize};

use super::{ConnectorKind, ResourceRequirements};

/// Definition as returned by the `source_definitions` and `destination_definitions` endpoints.
///
/// Exactly one of the two id fields is populated, depending on which endpoint family answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_definition_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_definition_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub docker_repository: String,
    #[serde(default)]
    pub docker_image_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<ResourceRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl ConnectorDefinition {
    /// The populated id together with the endpoint family it belongs to.
    pub fn identity(&self) -> Option<(ConnectorKind, &str)> {
        match (
            self.source_definition_id.as_deref().filter(|id| !id.is_empty()),
            self.destination_definition_id.as_deref().filter(|id| !id.is_empty()),
        ) {
            (Some(id), _) => Some((ConnectorKind::Source, id)),
            (None, Some(id)) => Some((ConnectorKind::Destination, id)),
            (None, None) => None,
        }
    }
}

/// User-settable definition fields sent on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorDefinitionFields {
    pub name: String,
    pub docker_repository: String,
    pub docker_image_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<ResourceRequirements>,
}

/// Create body: the definition nested under a kind-specific key, scoped to a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnectorDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_definition: Option<ConnectorDefinitionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_definition: Option<ConnectorDefinitionFields>,
}

impl NewConnectorDefinition {
    pub fn new(
        kind: ConnectorKind,
        workspace_id: Option<String>,
        fields: ConnectorDefinitionFields,
    ) -> Self {
        match kind {
            ConnectorKind::Source => Self {
                workspace_id,
                source_definition: Some(fields),
                destination_definition: None,
            },
            ConnectorKind::Destination => Self {
                workspace_id,
                source_definition: None,
                destination_definition: Some(fields),
            },
        }
    }
}

/// Update body. Only the image tag and resource requirements are mutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedConnectorDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_definition_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_definition_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_requirements: Option<ResourceRequirements>,
}

impl UpdatedConnectorDefinition {
    pub fn new(
        kind: ConnectorKind,
        id: String,
        docker_image_tag: Option<String>,
        resource_requirements: Option<ResourceRequirements>,
    ) -> Self {
        let (source_definition_id, destination_definition_id) = match kind {
            ConnectorKind::Source => (Some(id), None),
            ConnectorKind::Destination => (None, Some(id)),
        };
        Self {
            source_definition_id,
            destination_definition_id,
            docker_image_tag,
            resource_requirements,
        }
    }
}
