use super::MapperError;
use super::resource_requirements::{flatten_definition_requirements, unflatten_definition_requirements};
use crate::models::{
    ConnectorDefinition, ConnectorDefinitionFields, ConnectorKind, NewConnectorDefinition,
    UpdatedConnectorDefinition,
};
use crate::state::{Attr, ConnectorDefinitionModel};

/// Flattens a definition response. `workspace_id` is not part of the response and is left null
/// for the caller to carry forward.
pub fn flatten_connector_definition(
    definition: &ConnectorDefinition,
) -> Result<ConnectorDefinitionModel, MapperError> {
    let (_, id) = definition
        .identity()
        .ok_or(MapperError::MissingIdentifier {
            first: "sourceDefinitionId",
            second: "destinationDefinitionId",
        })?;
    let (default_resource_requirements, job_specific_resource_requirements) =
        flatten_definition_requirements(definition.resource_requirements.as_ref());

    Ok(ConnectorDefinitionModel {
        id: Attr::known(id),
        workspace_id: Attr::Null,
        name: Attr::known(definition.name.clone()),
        docker_repository: Attr::known(definition.docker_repository.clone()),
        docker_image_tag: Attr::known(definition.docker_image_tag.clone()),
        documentation_url: Attr::non_empty(definition.documentation_url.clone()),
        protocol_version: Attr::non_empty(definition.protocol_version.clone()),
        release_stage: Attr::non_empty(definition.release_stage.clone()),
        release_date: Attr::non_empty(definition.release_date.clone()),
        default_resource_requirements,
        job_specific_resource_requirements,
    })
}

pub fn unflatten_new_connector_definition(
    kind: ConnectorKind,
    model: &ConnectorDefinitionModel,
) -> Result<NewConnectorDefinition, MapperError> {
    let fields = ConnectorDefinitionFields {
        name: model.name.required("name")?,
        docker_repository: model.docker_repository.required("docker_repository")?,
        docker_image_tag: model.docker_image_tag.required("docker_image_tag")?,
        documentation_url: model.documentation_url.optional("documentation_url")?,
        resource_requirements: unflatten_definition_requirements(
            model.default_resource_requirements.as_ref(),
            model.job_specific_resource_requirements.as_deref(),
        )?,
    };

    Ok(NewConnectorDefinition::new(
        kind,
        model.workspace_id.optional("workspace_id")?,
        fields,
    ))
}

/// Only the image tag and resource requirements can change in place.
pub fn unflatten_updated_connector_definition(
    kind: ConnectorKind,
    model: &ConnectorDefinitionModel,
) -> Result<UpdatedConnectorDefinition, MapperError> {
    Ok(UpdatedConnectorDefinition::new(
        kind,
        model.id.required("id")?,
        Some(model.docker_image_tag.required("docker_image_tag")?),
        unflatten_definition_requirements(
            model.default_resource_requirements.as_ref(),
            model.job_specific_resource_requirements.as_deref(),
        )?,
    ))
}
