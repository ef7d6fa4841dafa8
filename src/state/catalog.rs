use serde::{Deserialize, Serialize};

use super::Attr;
use crate::models::{DestinationSyncMode, SyncMode};

/// One stream pair of a sync catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncCatalogModel {
    pub source_schema: SourceStreamSchemaModel,
    pub destination_config: DestinationStreamConfigModel,
}

/// Stream as discovered from the source. `json_schema` is JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceStreamSchemaModel {
    pub name: Attr<String>,
    pub json_schema: Attr<String>,
    pub supported_sync_modes: Attr<Vec<SyncMode>>,
    pub source_defined_cursor: Attr<bool>,
    pub default_cursor_field: Attr<Vec<String>>,
    pub source_defined_primary_key: Attr<Vec<Vec<String>>>,
    pub namespace: Attr<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationStreamConfigModel {
    pub sync_mode: Attr<SyncMode>,
    pub destination_sync_mode: Attr<DestinationSyncMode>,
    pub cursor_field: Attr<Vec<String>>,
    pub primary_key: Attr<Vec<Vec<String>>>,
    pub alias_name: Attr<String>,
    pub selected: Attr<bool>,
}

/// Result of the `source_schema_catalog` data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSchemaCatalogModel {
    pub id: Attr<String>,
    pub source_id: Attr<String>,
    pub sync_catalog: Option<Vec<SyncCatalogModel>>,
}
