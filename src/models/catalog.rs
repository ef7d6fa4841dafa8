//! Sync catalog wire shapes: stream schemas discovered from a source paired with the destination
//! configuration chosen for each stream.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::JobInfo;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncCatalog {
    #[serde(default)]
    pub streams: Vec<StreamAndConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamAndConfiguration {
    pub stream: SourceStreamSchema,
    pub config: DestinationStreamConfig,
}

/// Source-defined description of a stream. Read-only from the user's point of view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStreamSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_sync_modes: Option<Vec<SyncMode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_defined_cursor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cursor_field: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// How a stream is replicated into the destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationStreamConfig {
    pub sync_mode: SyncMode,
    pub destination_sync_mode: DestinationSyncMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_field: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    FullRefresh,
    Incremental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    Append,
    Overwrite,
    AppendDedup,
}

impl DestinationSyncMode {
    /// Dedup modes need a primary key to merge records on.
    pub fn is_dedup(self) -> bool {
        matches!(self, Self::AppendDedup)
    }
}

/// Response of `sources/discover_schema`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDiscoverSchemaResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<SyncCatalog>,
    #[serde(default)]
    pub job_info: JobInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
}
