//! Conversion between wire shapes ([`crate::models`]) and the plan/state model ([`crate::state`]).
//!
//! `flatten_*` turns an API response into state: absent or empty optional strings become null,
//! absent lists become known empty lists, and exactly one union branch is selected.
//! `unflatten_*` builds a request from a plan: only known values are sent, and an unknown value
//! in a field that has no server default is an error rather than being dropped.

use serde_json::value::RawValue;
use thiserror::Error;

use crate::state::Attr;

pub mod catalog;
pub mod connection;
pub mod connector;
pub mod connector_definition;
pub mod operation;
pub mod resource_requirements;
pub mod workspace;

pub use catalog::{flatten_sync_catalog, unflatten_sync_catalog};
pub use connection::{flatten_connection, unflatten_new_connection, unflatten_updated_connection};
pub use connector::{flatten_connector, unflatten_new_connector, unflatten_updated_connector};
pub use connector_definition::{
    flatten_connector_definition, unflatten_new_connector_definition,
    unflatten_updated_connector_definition,
};
pub use operation::{
    flatten_operation, unflatten_new_operation, unflatten_operator_configuration,
    unflatten_updated_operation,
};
pub use workspace::{flatten_workspace, unflatten_new_workspace, unflatten_updated_workspace};

/// Errors raised while converting between the two models.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("attribute `{attribute}` is unknown and cannot be sent to the API")]
    UnknownValue { attribute: &'static str },
    #[error("attribute `{attribute}` is required")]
    MissingValue { attribute: &'static str },
    #[error("only one of {} can be set in `{union}`", .variants.join(", "))]
    ConflictingVariants {
        union: &'static str,
        variants: Vec<&'static str>,
    },
    #[error("`{union}` selects `{variant}` but no `{variant}` block is present")]
    MissingVariant {
        union: &'static str,
        variant: &'static str,
    },
    #[error("either {first} or {second} must be set, not empty")]
    MissingIdentifier {
        first: &'static str,
        second: &'static str,
    },
    #[error("attribute `{attribute}` is not valid JSON: {source}")]
    InvalidJson {
        attribute: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejects more than one populated branch of an exactly-one-of union.
///
/// `present` lists the populated branches. When `declared` names the selected branch (a tag such
/// as `operator_type`), a single populated branch must match it.
pub(crate) fn ensure_single_variant(
    union: &'static str,
    declared: Option<&'static str>,
    present: &[&'static str],
) -> Result<(), MapperError> {
    match (present, declared) {
        ([], _) => Ok(()),
        ([_], None) => Ok(()),
        ([only], Some(declared)) if *only == declared => Ok(()),
        ([only], Some(declared)) => Err(MapperError::ConflictingVariants {
            union,
            variants: vec![declared, *only],
        }),
        (many, _) => Err(MapperError::ConflictingVariants {
            union,
            variants: many.to_vec(),
        }),
    }
}

/// Parses a JSON text attribute into a raw payload without interpreting it.
pub(crate) fn raw_json(text: String, attribute: &'static str) -> Result<Box<RawValue>, MapperError> {
    RawValue::from_string(text).map_err(|source| MapperError::InvalidJson { attribute, source })
}

/// JSON text of a raw payload, or null when absent.
pub(crate) fn json_text(raw: Option<&RawValue>) -> Attr<String> {
    raw.map(|raw| raw.get().to_string()).into()
}
