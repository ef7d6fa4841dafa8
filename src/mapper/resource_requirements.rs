use super::MapperError;
use crate::models::{JobSpecificResourceRequirements, ResourceRequirements, ResourceRequirementsOptions};
use crate::state::{
    Attr, JobSpecificResourceRequirementsModel, ResourceRequirementsModel,
};

pub fn flatten_resource_requirements(options: &ResourceRequirementsOptions) -> ResourceRequirementsModel {
    ResourceRequirementsModel {
        cpu_request: Attr::non_empty(options.cpu_request.clone()),
        cpu_limit: Attr::non_empty(options.cpu_limit.clone()),
        memory_request: Attr::non_empty(options.memory_request.clone()),
        memory_limit: Attr::non_empty(options.memory_limit.clone()),
    }
}

pub fn unflatten_resource_requirements(
    model: &ResourceRequirementsModel,
) -> Result<ResourceRequirementsOptions, MapperError> {
    Ok(ResourceRequirementsOptions {
        cpu_request: model.cpu_request.optional("cpu_request")?,
        cpu_limit: model.cpu_limit.optional("cpu_limit")?,
        memory_request: model.memory_request.optional("memory_request")?,
        memory_limit: model.memory_limit.optional("memory_limit")?,
    })
}

/// Splits definition requirements into the default block and the per-job list.
///
/// An absent and an empty per-job list both flatten to `None`.
pub fn flatten_definition_requirements(
    requirements: Option<&ResourceRequirements>,
) -> (
    Option<ResourceRequirementsModel>,
    Option<Vec<JobSpecificResourceRequirementsModel>>,
) {
    let Some(requirements) = requirements else {
        return (None, None);
    };

    let default = requirements
        .default
        .as_ref()
        .map(flatten_resource_requirements);
    let job_specific = requirements
        .job_specific
        .as_deref()
        .filter(|jobs| !jobs.is_empty())
        .map(|jobs| {
            jobs.iter()
                .map(|job| {
                    JobSpecificResourceRequirementsModel::from_requirements(
                        Attr::Known(job.job_type),
                        flatten_resource_requirements(&job.resource_requirements),
                    )
                })
                .collect()
        });

    (default, job_specific)
}

/// Builds definition requirements, or `None` when neither block is configured. An empty per-job
/// list is never sent.
pub fn unflatten_definition_requirements(
    default: Option<&ResourceRequirementsModel>,
    job_specific: Option<&[JobSpecificResourceRequirementsModel]>,
) -> Result<Option<ResourceRequirements>, MapperError> {
    let job_specific = job_specific.filter(|jobs| !jobs.is_empty());
    if default.is_none() && job_specific.is_none() {
        return Ok(None);
    }

    let default = default.map(unflatten_resource_requirements).transpose()?;
    let job_specific = job_specific
        .map(|jobs| {
            jobs.iter()
                .map(|job| {
                    Ok(JobSpecificResourceRequirements {
                        job_type: job.job_type.required("job_type")?,
                        resource_requirements: unflatten_resource_requirements(&job.requirements())?,
                    })
                })
                .collect::<Result<Vec<_>, MapperError>>()
        })
        .transpose()?;

    Ok(Some(ResourceRequirements {
        default,
        job_specific,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobType;

    fn limits() -> ResourceRequirementsModel {
        ResourceRequirementsModel {
            cpu_request: Attr::known("250m"),
            cpu_limit: Attr::known("1"),
            memory_request: Attr::Null,
            memory_limit: Attr::known("2Gi"),
        }
    }

    #[test]
    fn test_empty_quantities_flatten_to_null() {
        let model = flatten_resource_requirements(&ResourceRequirementsOptions {
            cpu_request: Some(String::new()),
            cpu_limit: Some("2".to_string()),
            memory_request: None,
            memory_limit: None,
        });
        assert_eq!(model.cpu_request, Attr::Null);
        assert_eq!(model.cpu_limit, Attr::known("2"));
        assert_eq!(model.memory_request, Attr::Null);
    }

    #[test]
    fn test_unknown_quantity_is_rejected() {
        let model = ResourceRequirementsModel {
            cpu_limit: Attr::Unknown,
            ..limits()
        };
        assert!(matches!(
            unflatten_resource_requirements(&model),
            Err(MapperError::UnknownValue { attribute: "cpu_limit" })
        ));
    }

    #[test]
    fn test_absent_and_empty_job_lists_are_equivalent() {
        let absent = ResourceRequirements {
            default: Some(unflatten_resource_requirements(&limits()).unwrap()),
            job_specific: None,
        };
        let empty = ResourceRequirements {
            job_specific: Some(vec![]),
            ..absent.clone()
        };

        assert_eq!(
            flatten_definition_requirements(Some(&absent)),
            flatten_definition_requirements(Some(&empty))
        );
        assert_eq!(flatten_definition_requirements(Some(&empty)).1, None);

        let wire = unflatten_definition_requirements(Some(&limits()), Some(&[][..])).unwrap().unwrap();
        assert_eq!(wire.job_specific, None);
        assert_eq!(unflatten_definition_requirements(None, Some(&[][..])).unwrap(), None);
    }

    #[test]
    fn test_definition_requirements_round_trip() {
        let jobs = vec![JobSpecificResourceRequirementsModel::from_requirements(
            Attr::Known(JobType::Sync),
            limits(),
        )];

        let wire = unflatten_definition_requirements(Some(&limits()), Some(jobs.as_slice()))
            .unwrap()
            .unwrap();
        let (default, job_specific) = flatten_definition_requirements(Some(&wire));

        assert_eq!(default, Some(limits()));
        assert_eq!(job_specific, Some(jobs));
    }
}
