use serde::{Deserialize, Serialize};

use super::Attr;
use crate::models::JobType;

/// Source or destination definition model.
///
/// `workspace_id` scopes a custom definition to one workspace. The API never returns it, so it
/// is carried forward from the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorDefinitionModel {
    pub id: Attr<String>,
    pub workspace_id: Attr<String>,
    pub name: Attr<String>,
    pub docker_repository: Attr<String>,
    pub docker_image_tag: Attr<String>,
    pub documentation_url: Attr<String>,
    pub protocol_version: Attr<String>,
    pub release_stage: Attr<String>,
    pub release_date: Attr<String>,
    pub default_resource_requirements: Option<ResourceRequirementsModel>,
    pub job_specific_resource_requirements: Option<Vec<JobSpecificResourceRequirementsModel>>,
}

impl ConnectorDefinitionModel {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Attr::known(id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirementsModel {
    pub cpu_request: Attr<String>,
    pub cpu_limit: Attr<String>,
    pub memory_request: Attr<String>,
    pub memory_limit: Attr<String>,
}

/// Per-job-type override. Kept as a flat block with the same four quantities as
/// [`ResourceRequirementsModel`] plus the job type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSpecificResourceRequirementsModel {
    pub job_type: Attr<JobType>,
    pub cpu_request: Attr<String>,
    pub cpu_limit: Attr<String>,
    pub memory_request: Attr<String>,
    pub memory_limit: Attr<String>,
}

impl JobSpecificResourceRequirementsModel {
    pub fn requirements(&self) -> ResourceRequirementsModel {
        ResourceRequirementsModel {
            cpu_request: self.cpu_request.clone(),
            cpu_limit: self.cpu_limit.clone(),
            memory_request: self.memory_request.clone(),
            memory_limit: self.memory_limit.clone(),
        }
    }

    pub fn from_requirements(job_type: Attr<JobType>, requirements: ResourceRequirementsModel) -> Self {
        Self {
            job_type,
            cpu_request: requirements.cpu_request,
            cpu_limit: requirements.cpu_limit,
            memory_request: requirements.memory_request,
            memory_limit: requirements.memory_limit,
        }
    }
}
