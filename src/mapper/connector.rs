use super::{MapperError, raw_json};
use crate::models::{Connector, ConnectorKind, NewConnector, UpdatedConnector};
use crate::state::{Attr, ConnectorModel};

/// Flattens a source or destination response.
///
/// `connection_configuration` is the caller's last known value and is copied into the result
/// as-is. The configuration in the response is ignored because the server masks secrets in it.
pub fn flatten_connector(
    connector: &Connector,
    connection_configuration: Attr<String>,
) -> Result<ConnectorModel, MapperError> {
    let identity = connector
        .identity()
        .ok_or(MapperError::MissingIdentifier {
            first: "sourceId",
            second: "destinationId",
        })?;

    Ok(ConnectorModel {
        id: Attr::known(identity.id),
        definition_id: Attr::known(identity.definition_id),
        definition_name: Attr::non_empty(identity.definition_name.map(str::to_string)),
        workspace_id: Attr::known(connector.workspace_id.clone()),
        name: Attr::known(connector.name.clone()),
        icon: Attr::non_empty(connector.icon.clone()),
        connection_configuration,
    })
}

pub fn unflatten_new_connector(
    kind: ConnectorKind,
    model: &ConnectorModel,
) -> Result<NewConnector, MapperError> {
    Ok(NewConnector::new(
        kind,
        model.definition_id.required("definition_id")?,
        model.workspace_id.required("workspace_id")?,
        model.name.required("name")?,
        configuration(model)?,
    ))
}

pub fn unflatten_updated_connector(
    kind: ConnectorKind,
    model: &ConnectorModel,
) -> Result<UpdatedConnector, MapperError> {
    Ok(UpdatedConnector::new(
        kind,
        model.id.required("id")?,
        model.name.required("name")?,
        configuration(model)?,
    ))
}

fn configuration(model: &ConnectorModel) -> Result<Box<serde_json::value::RawValue>, MapperError> {
    raw_json(
        model.connection_configuration.required("connection_configuration")?,
        "connection_configuration",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{"host":"db.internal","password":"hunter2"}"#;

    fn plan() -> ConnectorModel {
        ConnectorModel {
            definition_id: Attr::known("def-1"),
            workspace_id: Attr::known("ws-1"),
            name: Attr::known("orders-db"),
            connection_configuration: Attr::known(CONFIG),
            ..ConnectorModel::default()
        }
    }

    #[test]
    fn test_configuration_is_sent_verbatim() {
        let body = unflatten_new_connector(ConnectorKind::Source, &plan()).unwrap();
        let text = serde_json::to_string(&body).unwrap();
        assert_eq!(
            text,
            format!(
                r#"{{"sourceDefinitionId":"def-1","workspaceId":"ws-1","name":"orders-db","connectionConfiguration":{CONFIG}}}"#
            )
        );
    }

    #[test]
    fn test_flatten_keeps_caller_configuration() {
        let response: Connector = serde_json::from_str(
            r#"{
                "destinationId": "dst-1",
                "destinationDefinitionId": "def-9",
                "destinationName": "BigQuery",
                "workspaceId": "ws-1",
                "name": "warehouse",
                "connectionConfiguration": {"password": "**********"}
            }"#,
        )
        .unwrap();

        let state = flatten_connector(&response, Attr::known(CONFIG)).unwrap();
        assert_eq!(state.id, Attr::known("dst-1"));
        assert_eq!(state.definition_id, Attr::known("def-9"));
        assert_eq!(state.definition_name, Attr::known("BigQuery"));
        assert_eq!(state.icon, Attr::Null);
        assert_eq!(state.connection_configuration, Attr::known(CONFIG));
    }

    #[test]
    fn test_flatten_without_identifier_fails() {
        let response = Connector {
            workspace_id: "ws-1".to_string(),
            ..Connector::default()
        };
        assert!(matches!(
            flatten_connector(&response, Attr::Null),
            Err(MapperError::MissingIdentifier { first: "sourceId", .. })
        ));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let model = ConnectorModel {
            id: Attr::known("src-1"),
            connection_configuration: Attr::known("{host: db}"),
            ..plan()
        };
        assert!(matches!(
            unflatten_updated_connector(ConnectorKind::Source, &model),
            Err(MapperError::InvalidJson { attribute: "connection_configuration", .. })
        ));
    }

    #[test]
    fn test_unknown_configuration_is_rejected() {
        let model = ConnectorModel {
            connection_configuration: Attr::Unknown,
            ..plan()
        };
        assert!(matches!(
            unflatten_new_connector(ConnectorKind::Destination, &model),
            Err(MapperError::UnknownValue { .. })
        ));
    }
}
