use super::{MapperError, ensure_single_variant};
use crate::models::{
    DbtConfig, NewOperation, NormalizationOption, Operation, OperationFields, OperatorConfiguration,
    OperatorType, UpdatedOperation, WebhookConfig,
};
use crate::state::{Attr, DbtModel, OperationModel, WebhookModel};

const UNION: &str = "operator_configuration";

pub fn flatten_operation(operation: &Operation) -> Result<OperationModel, MapperError> {
    let configuration = &operation.operator_configuration;
    let operator_type = configuration.operator_type;

    let mut present = Vec::with_capacity(3);
    if configuration.normalization.is_some() {
        present.push(OperatorType::Normalization.as_str());
    }
    if configuration.dbt.is_some() {
        present.push(OperatorType::Dbt.as_str());
    }
    if configuration.webhook.is_some() {
        present.push(OperatorType::Webhook.as_str());
    }
    ensure_single_variant(UNION, Some(operator_type.as_str()), &present)?;

    let mut model = OperationModel {
        id: Attr::known(operation.operation_id.clone()),
        workspace_id: Attr::known(operation.workspace_id.clone()),
        name: Attr::known(operation.name.clone()),
        operator_type: Attr::Known(operator_type),
        ..OperationModel::default()
    };

    match operator_type {
        OperatorType::Normalization => {
            model.normalization_option = Attr::non_empty(
                configuration
                    .normalization
                    .as_ref()
                    .and_then(|normalization| normalization.option.clone()),
            );
        }
        OperatorType::Dbt => {
            let dbt = configuration.dbt.as_ref().ok_or(MapperError::MissingVariant {
                union: UNION,
                variant: "dbt",
            })?;
            model.dbt = Some(DbtModel {
                git_repo_url: Attr::non_empty(Some(dbt.git_repo_url.clone())),
                git_repo_branch: Attr::non_empty(dbt.git_repo_branch.clone()),
                docker_image: Attr::non_empty(dbt.docker_image.clone()),
                dbt_arguments: Attr::non_empty(dbt.dbt_arguments.clone()),
            });
        }
        OperatorType::Webhook => {
            let webhook = configuration
                .webhook
                .as_ref()
                .ok_or(MapperError::MissingVariant {
                    union: UNION,
                    variant: "webhook",
                })?;
            model.webhook = Some(WebhookModel {
                execution_url: Attr::non_empty(Some(webhook.execution_url.clone())),
                execution_body: Attr::non_empty(webhook.execution_body.clone()),
                webhook_config_id: Attr::non_empty(webhook.webhook_config_id.clone()),
            });
        }
    }

    Ok(model)
}

/// Builds the operator configuration from the branch `operator_type` selects. Any other populated
/// branch is a conflict.
pub fn unflatten_operator_configuration(
    model: &OperationModel,
) -> Result<OperatorConfiguration, MapperError> {
    let operator_type = model.operator_type.required("operator_type")?;

    let mut present = Vec::with_capacity(3);
    if !model.normalization_option.is_null() {
        present.push(OperatorType::Normalization.as_str());
    }
    if model.dbt.is_some() {
        present.push(OperatorType::Dbt.as_str());
    }
    if model.webhook.is_some() {
        present.push(OperatorType::Webhook.as_str());
    }
    ensure_single_variant(UNION, Some(operator_type.as_str()), &present)?;

    let mut configuration = OperatorConfiguration {
        operator_type,
        normalization: None,
        dbt: None,
        webhook: None,
    };

    match operator_type {
        OperatorType::Normalization => {
            configuration.normalization = Some(NormalizationOption {
                option: model.normalization_option.optional("normalization_option")?,
            });
        }
        OperatorType::Dbt => {
            let dbt = model.dbt.as_ref().ok_or(MapperError::MissingVariant {
                union: UNION,
                variant: "dbt",
            })?;
            configuration.dbt = Some(DbtConfig {
                git_repo_url: dbt.git_repo_url.required("git_repo_url")?,
                git_repo_branch: dbt.git_repo_branch.optional("git_repo_branch")?,
                docker_image: dbt.docker_image.optional("docker_image")?,
                dbt_arguments: dbt.dbt_arguments.optional("dbt_arguments")?,
            });
        }
        OperatorType::Webhook => {
            let webhook = model.webhook.as_ref().ok_or(MapperError::MissingVariant {
                union: UNION,
                variant: "webhook",
            })?;
            configuration.webhook = Some(WebhookConfig {
                execution_url: webhook.execution_url.required("execution_url")?,
                execution_body: webhook.execution_body.optional("execution_body")?,
                webhook_config_id: webhook.webhook_config_id.optional("webhook_config_id")?,
            });
        }
    }

    Ok(configuration)
}

fn operation_fields(model: &OperationModel) -> Result<OperationFields, MapperError> {
    Ok(OperationFields {
        name: model.name.required("name")?,
        operator_configuration: unflatten_operator_configuration(model)?,
    })
}

pub fn unflatten_new_operation(model: &OperationModel) -> Result<NewOperation, MapperError> {
    Ok(NewOperation {
        workspace_id: model.workspace_id.required("workspace_id")?,
        fields: operation_fields(model)?,
    })
}

pub fn unflatten_updated_operation(model: &OperationModel) -> Result<UpdatedOperation, MapperError> {
    Ok(UpdatedOperation {
        operation_id: model.id.required("id")?,
        fields: operation_fields(model)?,
    })
}
