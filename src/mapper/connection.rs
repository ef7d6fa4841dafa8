use super::catalog::{flatten_sync_catalog, unflatten_sync_catalog};
use super::resource_requirements::{flatten_resource_requirements, unflatten_resource_requirements};
use super::{MapperError, ensure_single_variant};
use crate::models::{
    BasicSchedule, Connection, ConnectionFields, CronSchedule, NewConnection, ScheduleData,
    UpdatedConnection,
};
use crate::state::{Attr, BasicScheduleModel, ConnectionModel, CronScheduleModel};

pub fn flatten_connection(connection: &Connection) -> Result<ConnectionModel, MapperError> {
    let (basic_schedule, cron_schedule) = match &connection.schedule_data {
        Some(schedule) => flatten_schedule(schedule)?,
        None => (None, None),
    };

    Ok(ConnectionModel {
        id: Attr::known(connection.connection_id.clone()),
        source_id: Attr::known(connection.source_id.clone()),
        destination_id: Attr::known(connection.destination_id.clone()),
        status: Attr::Known(connection.status),
        name: Attr::non_empty(connection.name.clone()),
        namespace_definition: connection.namespace_definition.into(),
        namespace_format: Attr::non_empty(connection.namespace_format.clone()),
        prefix: Attr::non_empty(connection.prefix.clone()),
        operation_ids: Attr::list(connection.operation_ids.clone()),
        sync_catalog: connection
            .sync_catalog
            .as_ref()
            .and_then(flatten_sync_catalog),
        schedule_type: connection.schedule_type.into(),
        basic_schedule,
        cron_schedule,
        resource_requirements: connection
            .resource_requirements
            .as_ref()
            .map(flatten_resource_requirements),
        source_catalog_id: Attr::non_empty(connection.source_catalog_id.clone()),
        geography: Attr::non_empty(connection.geography.clone()),
        breaking_change: connection.breaking_change.into(),
    })
}

/// Selects the populated schedule branch. A response carrying both is rejected.
fn flatten_schedule(
    schedule: &ScheduleData,
) -> Result<(Option<BasicScheduleModel>, Option<CronScheduleModel>), MapperError> {
    ensure_single_variant("schedule_data", None, &schedule_branches(schedule))?;

    let basic = schedule.basic_schedule.as_ref().map(|basic| BasicScheduleModel {
        units: Attr::Known(basic.units),
        time_unit: Attr::Known(basic.time_unit),
    });
    let cron = schedule.cron.as_ref().map(|cron| CronScheduleModel {
        cron_expression: Attr::known(cron.cron_expression.clone()),
        cron_time_zone: Attr::known(cron.cron_time_zone.clone()),
    });
    Ok((basic, cron))
}

fn schedule_branches(schedule: &ScheduleData) -> Vec<&'static str> {
    let mut present = Vec::with_capacity(2);
    if schedule.basic_schedule.is_some() {
        present.push("basic_schedule");
    }
    if schedule.cron.is_some() {
        present.push("cron");
    }
    present
}

pub fn unflatten_new_connection(model: &ConnectionModel) -> Result<NewConnection, MapperError> {
    Ok(NewConnection {
        source_id: model.source_id.required("source_id")?,
        destination_id: model.destination_id.required("destination_id")?,
        fields: connection_fields(model)?,
    })
}

/// The source/destination pair is immutable and never part of an update.
pub fn unflatten_updated_connection(model: &ConnectionModel) -> Result<UpdatedConnection, MapperError> {
    Ok(UpdatedConnection {
        connection_id: model.id.required("id")?,
        fields: connection_fields(model)?,
    })
}

fn connection_fields(model: &ConnectionModel) -> Result<ConnectionFields, MapperError> {
    Ok(ConnectionFields {
        status: model.status.required("status")?,
        // name, namespace_definition, operation_ids and schedule_type default on the server
        name: model.name.resolved(),
        namespace_definition: model.namespace_definition.resolved(),
        namespace_format: model.namespace_format.optional("namespace_format")?,
        prefix: model.prefix.optional("prefix")?,
        operation_ids: model.operation_ids.resolved(),
        sync_catalog: model
            .sync_catalog
            .as_deref()
            .map(unflatten_sync_catalog)
            .transpose()?,
        schedule_type: model.schedule_type.resolved(),
        schedule_data: unflatten_schedule(
            model.basic_schedule.as_ref(),
            model.cron_schedule.as_ref(),
        )?,
        resource_requirements: model
            .resource_requirements
            .as_ref()
            .map(unflatten_resource_requirements)
            .transpose()?,
        source_catalog_id: model.source_catalog_id.optional("source_catalog_id")?,
        breaking_change: model.breaking_change.optional("breaking_change")?,
    })
}

fn unflatten_schedule(
    basic: Option<&BasicScheduleModel>,
    cron: Option<&CronScheduleModel>,
) -> Result<Option<ScheduleData>, MapperError> {
    match (basic, cron) {
        (None, None) => Ok(None),
        (Some(_), Some(_)) => Err(MapperError::ConflictingVariants {
            union: "schedule",
            variants: vec!["basic_schedule", "cron_schedule"],
        }),
        (Some(basic), None) => Ok(Some(ScheduleData {
            basic_schedule: Some(BasicSchedule {
                units: basic.units.required("units")?,
                time_unit: basic.time_unit.required("time_unit")?,
            }),
            cron: None,
        })),
        (None, Some(cron)) => Ok(Some(ScheduleData {
            basic_schedule: None,
            cron: Some(CronSchedule {
                cron_expression: cron.cron_expression.required("cron_expression")?,
                cron_time_zone: cron.cron_time_zone.required("cron_time_zone")?,
            }),
        })),
    }
}
