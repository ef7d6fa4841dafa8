use serde::{Deserialize, Serialize};

use super::Attr;

/// Source or destination instance model.
///
/// `connection_configuration` is JSON text owned by the caller. Reads never take it from the
/// server, which redacts secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorModel {
    pub id: Attr<String>,
    pub definition_id: Attr<String>,
    pub definition_name: Attr<String>,
    pub workspace_id: Attr<String>,
    pub name: Attr<String>,
    pub icon: Attr<String>,
    pub connection_configuration: Attr<String>,
}

impl ConnectorModel {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Attr::known(id.into()),
            ..Self::default()
        }
    }
}
