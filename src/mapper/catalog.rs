use super::{MapperError, json_text, raw_json};
use crate::models::{DestinationStreamConfig, SourceStreamSchema, StreamAndConfiguration, SyncCatalog};
use crate::state::{Attr, DestinationStreamConfigModel, SourceStreamSchemaModel, SyncCatalogModel};

/// Flattens every stream of a catalog, in order. A catalog without streams flattens to `None`.
///
/// List attributes (sync modes, cursor fields, primary keys) are always known; an absent wire
/// list becomes an empty one.
pub fn flatten_sync_catalog(catalog: &SyncCatalog) -> Option<Vec<SyncCatalogModel>> {
    if catalog.streams.is_empty() {
        return None;
    }
    Some(catalog.streams.iter().map(flatten_stream).collect())
}

fn flatten_stream(entry: &StreamAndConfiguration) -> SyncCatalogModel {
    let stream = &entry.stream;
    let config = &entry.config;

    SyncCatalogModel {
        source_schema: SourceStreamSchemaModel {
            name: Attr::known(stream.name.clone()),
            json_schema: json_text(stream.json_schema.as_deref()),
            supported_sync_modes: Attr::list(stream.supported_sync_modes.clone()),
            source_defined_cursor: stream.source_defined_cursor.into(),
            default_cursor_field: Attr::list(stream.default_cursor_field.clone()),
            source_defined_primary_key: Attr::list(stream.source_defined_primary_key.clone()),
            namespace: Attr::non_empty(stream.namespace.clone()),
        },
        destination_config: DestinationStreamConfigModel {
            sync_mode: Attr::Known(config.sync_mode),
            destination_sync_mode: Attr::Known(config.destination_sync_mode),
            cursor_field: Attr::list(config.cursor_field.clone()),
            primary_key: Attr::list(config.primary_key.clone()),
            alias_name: Attr::non_empty(config.alias_name.clone()),
            selected: config.selected.into(),
        },
    }
}

pub fn unflatten_sync_catalog(streams: &[SyncCatalogModel]) -> Result<SyncCatalog, MapperError> {
    let streams = streams
        .iter()
        .map(unflatten_stream)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SyncCatalog { streams })
}

fn unflatten_stream(model: &SyncCatalogModel) -> Result<StreamAndConfiguration, MapperError> {
    let schema = &model.source_schema;
    let config = &model.destination_config;

    let json_schema = schema
        .json_schema
        .optional("json_schema")?
        .map(|text| raw_json(text, "json_schema"))
        .transpose()?;

    Ok(StreamAndConfiguration {
        stream: SourceStreamSchema {
            name: schema.name.required("name")?,
            json_schema,
            supported_sync_modes: schema.supported_sync_modes.optional("supported_sync_modes")?,
            source_defined_cursor: schema.source_defined_cursor.optional("source_defined_cursor")?,
            default_cursor_field: schema.default_cursor_field.optional("default_cursor_field")?,
            source_defined_primary_key: schema
                .source_defined_primary_key
                .optional("source_defined_primary_key")?,
            namespace: schema.namespace.optional("namespace")?,
        },
        config: DestinationStreamConfig {
            sync_mode: config.sync_mode.required("sync_mode")?,
            destination_sync_mode: config.destination_sync_mode.required("destination_sync_mode")?,
            cursor_field: config.cursor_field.optional("cursor_field")?,
            primary_key: config.primary_key.optional("primary_key")?,
            alias_name: config.alias_name.optional("alias_name")?,
            selected: config.selected.optional("selected")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DestinationSyncMode, SyncMode};

    const APPLIANCES: &str = r#"{
        "streams": [{
            "stream": {
                "name": "appliances",
                "jsonSchema": {"type": "object", "properties": {"uid": {"type": "string"}}},
                "supportedSyncModes": ["incremental", "full_refresh"]
            },
            "config": {
                "syncMode": "incremental",
                "destinationSyncMode": "append",
                "cursorField": ["uid"]
            }
        }]
    }"#;

    #[test]
    fn test_appliances_stream_flattens_with_cursor() {
        let catalog: SyncCatalog = serde_json::from_str(APPLIANCES).unwrap();
        let streams = flatten_sync_catalog(&catalog).unwrap();

        assert_eq!(streams.len(), 1);
        let entry = &streams[0];
        assert_eq!(entry.source_schema.name, Attr::known("appliances"));
        assert_eq!(
            entry.source_schema.supported_sync_modes,
            Attr::Known(vec![SyncMode::Incremental, SyncMode::FullRefresh])
        );
        assert_eq!(
            entry.destination_config.cursor_field,
            Attr::Known(vec!["uid".to_string()])
        );
        assert_eq!(entry.destination_config.primary_key, Attr::Known(vec![]));
        assert_eq!(entry.source_schema.source_defined_cursor, Attr::Null);
        assert_eq!(entry.source_schema.namespace, Attr::Null);
        assert_eq!(entry.destination_config.alias_name, Attr::Null);
    }

    #[test]
    fn test_empty_catalog_flattens_to_none() {
        assert_eq!(flatten_sync_catalog(&SyncCatalog::default()), None);
    }

    #[test]
    fn test_catalog_round_trip() {
        let catalog: SyncCatalog = serde_json::from_str(APPLIANCES).unwrap();
        let streams = flatten_sync_catalog(&catalog).unwrap();

        let wire = unflatten_sync_catalog(&streams).unwrap();
        let reread: SyncCatalog =
            serde_json::from_str(&serde_json::to_string(&wire).unwrap()).unwrap();

        assert_eq!(flatten_sync_catalog(&reread).unwrap(), streams);
    }

    #[test]
    fn test_composite_primary_keys_keep_order() {
        let model = SyncCatalogModel {
            source_schema: SourceStreamSchemaModel {
                name: Attr::known("orders"),
                ..SourceStreamSchemaModel::default()
            },
            destination_config: DestinationStreamConfigModel {
                sync_mode: Attr::Known(SyncMode::Incremental),
                destination_sync_mode: Attr::Known(DestinationSyncMode::AppendDedup),
                cursor_field: Attr::Known(vec!["updated_at".to_string()]),
                primary_key: Attr::Known(vec![
                    vec!["tenant".to_string()],
                    vec!["order".to_string(), "id".to_string()],
                ]),
                ..DestinationStreamConfigModel::default()
            },
        };

        let wire = unflatten_sync_catalog(std::slice::from_ref(&model)).unwrap();
        assert_eq!(
            wire.streams[0].config.primary_key,
            Some(vec![
                vec!["tenant".to_string()],
                vec!["order".to_string(), "id".to_string()],
            ])
        );
        let back = flatten_sync_catalog(&wire).unwrap();
        assert_eq!(back[0].destination_config.primary_key, model.destination_config.primary_key);
    }

    #[test]
    fn test_missing_sync_mode_is_rejected() {
        let model = SyncCatalogModel {
            source_schema: SourceStreamSchemaModel {
                name: Attr::known("orders"),
                ..SourceStreamSchemaModel::default()
            },
            destination_config: DestinationStreamConfigModel::default(),
        };
        assert!(matches!(
            unflatten_sync_catalog(&[model]),
            Err(MapperError::MissingValue { attribute: "sync_mode" })
        ));
    }
}
