//! Cross-field plan validation.
//!
//! These rules span several attributes, so they cannot be expressed by the typed models alone.
//! Every rule is evaluated before a request is sent and all violations are reported together.
//! Attributes that are still unknown are skipped; they are checked again once resolved.

use thiserror::Error;

use crate::models::{OperatorType, ScheduleType, SyncMode};
use crate::state::{Attr, ConnectionModel, OperationModel, SyncCatalogModel, WorkspaceModel};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {resource} configuration: {}", .issues.join("; "))]
pub struct ValidationError {
    pub resource: &'static str,
    pub issues: Vec<String>,
}

#[derive(Default)]
struct Issues(Vec<String>);

impl Issues {
    fn push(&mut self, issue: impl Into<String>) {
        self.0.push(issue.into());
    }

    fn finish(self, resource: &'static str) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                resource,
                issues: self.0,
            })
        }
    }
}

pub fn validate_connection(model: &ConnectionModel) -> Result<(), ValidationError> {
    let mut issues = Issues::default();

    let basic = model.basic_schedule.is_some();
    let cron = model.cron_schedule.is_some();
    if basic && cron {
        issues.push("only one of `basic_schedule` and `cron_schedule` can be set");
    }
    match model.schedule_type {
        Attr::Known(ScheduleType::Basic) if !basic => {
            issues.push("`basic_schedule` must be set when `schedule_type` is basic");
        }
        Attr::Known(ScheduleType::Cron) if !cron => {
            issues.push("`cron_schedule` must be set when `schedule_type` is cron");
        }
        Attr::Known(ScheduleType::Manual) if basic || cron => {
            issues.push("no schedule block can be set when `schedule_type` is manual");
        }
        _ => {}
    }

    for (index, stream) in model.sync_catalog.iter().flatten().enumerate() {
        stream_issues(stream, index, &mut issues);
    }

    issues.finish("connection")
}

fn stream_issues(stream: &SyncCatalogModel, index: usize, issues: &mut Issues) {
    let schema = &stream.source_schema;
    let config = &stream.destination_config;
    let name = schema
        .name
        .as_known()
        .map(String::as_str)
        .unwrap_or("<unknown>");

    let source_defines_cursor = matches!(schema.source_defined_cursor, Attr::Known(true));
    if matches!(config.sync_mode, Attr::Known(SyncMode::Incremental))
        && !source_defines_cursor
        && is_empty_list(&config.cursor_field)
    {
        issues.push(format!(
            "sync_catalog[{index}] ({name}): `cursor_field` is required for incremental sync"
        ));
    }

    let source_defines_key = schema
        .source_defined_primary_key
        .as_known()
        .is_some_and(|key| !key.is_empty());
    if config
        .destination_sync_mode
        .as_known()
        .is_some_and(|mode| mode.is_dedup())
        && !source_defines_key
        && is_empty_list(&config.primary_key)
    {
        issues.push(format!(
            "sync_catalog[{index}] ({name}): `primary_key` is required for deduplicated sync"
        ));
    }
}

/// Null and known-empty both count as missing. Unknown does not.
fn is_empty_list<T>(value: &Attr<Vec<T>>) -> bool {
    match value {
        Attr::Known(items) => items.is_empty(),
        Attr::Null => true,
        Attr::Unknown => false,
    }
}

pub fn validate_operation(model: &OperationModel) -> Result<(), ValidationError> {
    let mut issues = Issues::default();

    let mut present = Vec::new();
    if model.normalization_option.is_known() {
        present.push(OperatorType::Normalization);
    }
    if model.dbt.is_some() {
        present.push(OperatorType::Dbt);
    }
    if model.webhook.is_some() {
        present.push(OperatorType::Webhook);
    }
    let any_unknown = model.normalization_option.is_unknown();

    match present.as_slice() {
        [] if !any_unknown => {
            issues.push("one of `normalization_option`, `dbt` and `webhook` must be set");
        }
        [single] => {
            if let Attr::Known(operator_type) = model.operator_type
                && operator_type != *single
            {
                issues.push(format!(
                    "`operator_type` is {} but the {} block is set",
                    operator_type.as_str(),
                    single.as_str()
                ));
            }
        }
        [] => {}
        _ => issues.push("only one of `normalization_option`, `dbt` and `webhook` can be set"),
    }

    issues.finish("operation")
}

/// A workspace lookup names the workspace by exactly one of `id` and `slug`.
pub fn validate_workspace_lookup(model: &WorkspaceModel) -> Result<(), ValidationError> {
    let mut issues = Issues::default();

    if model.id.is_unknown() || model.slug.is_unknown() {
        return Ok(());
    }
    match (model.id.is_known(), model.slug.is_known()) {
        (true, true) => issues.push("Only one of `id` and `slug` can be set"),
        (false, false) => issues.push("One of `id` and `slug` must be set"),
        _ => {}
    }

    issues.finish("workspace")
}
