use serde::{Deserialize, Serialize};

use super::{Attr, ResourceRequirementsModel, SyncCatalogModel};
use crate::models::{ConnectionStatus, NamespaceDefinition, ScheduleType, TimeUnit};

/// Connection model. At most one of `basic_schedule` and `cron_schedule` may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionModel {
    pub id: Attr<String>,
    pub source_id: Attr<String>,
    pub destination_id: Attr<String>,
    pub status: Attr<ConnectionStatus>,
    pub name: Attr<String>,
    pub namespace_definition: Attr<NamespaceDefinition>,
    pub namespace_format: Attr<String>,
    pub prefix: Attr<String>,
    pub operation_ids: Attr<Vec<String>>,
    pub sync_catalog: Option<Vec<SyncCatalogModel>>,
    pub schedule_type: Attr<ScheduleType>,
    pub basic_schedule: Option<BasicScheduleModel>,
    pub cron_schedule: Option<CronScheduleModel>,
    pub resource_requirements: Option<ResourceRequirementsModel>,
    pub source_catalog_id: Attr<String>,
    pub geography: Attr<String>,
    pub breaking_change: Attr<bool>,
}

impl ConnectionModel {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Attr::known(id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicScheduleModel {
    pub units: Attr<i64>,
    pub time_unit: Attr<TimeUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CronScheduleModel {
    pub cron_expression: Attr<String>,
    pub cron_time_zone: Attr<String>,
}
