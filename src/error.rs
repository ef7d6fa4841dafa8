//! # Error Handling
//!
//! Each layer has its own error enum; [`ProviderError`] aggregates them. Lifecycle and data-source
//! operations wrap the cause in a [`ResourceError`] that names the operation and the entity it
//! was working on, so a failure can always be traced back to one resource.

use std::fmt;

use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::mapper::MapperError;
use crate::provider::RegistryError;
use crate::telemetry::TelemetryInitError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Mapper(#[from] MapperError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryInitError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A check call returned 2xx but reported a failed status.
    #[error("{what} check failed: {message}")]
    CheckFailed { what: &'static str, message: String },
    #[error("cannot change {} in place, the resource must be replaced", .attributes.join(", "))]
    RequiresReplace { attributes: Vec<&'static str> },
    /// A plan or state document handed over by the harness did not decode.
    #[error("invalid {document} document: {source}")]
    Document {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    pub(crate) fn check_failed(what: &'static str, message: Option<String>) -> Self {
        Self::CheckFailed {
            what,
            message: message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "no message returned".to_string()),
        }
    }
}

/// Lifecycle step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Could not {action} {resource} {target}, unexpected error: {source}")]
pub struct ResourceError {
    pub action: Action,
    pub resource: &'static str,
    /// Id of the entity, or its name when it has no id yet.
    pub target: String,
    #[source]
    pub source: ProviderError,
}

impl ResourceError {
    pub fn new(
        action: Action,
        resource: &'static str,
        target: impl Into<String>,
        source: impl Into<ProviderError>,
    ) -> Self {
        Self {
            action,
            resource,
            target: target.into(),
            source: source.into(),
        }
    }

    /// HTTP status of the underlying API error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.source {
            ProviderError::Client(err) => err.status(),
            _ => None,
        }
    }
}
