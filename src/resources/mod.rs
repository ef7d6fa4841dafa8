//! Resource lifecycle controllers.
//!
//! Each managed entity type implements [`Resource`]: create, read, update and delete round trips
//! through [`crate::client::AirbyteApi`] and the [`crate::mapper`] conversions. Values the API
//! never echoes back (connector secrets, a definition's workspace) are carried forward from the
//! plan or prior state.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Action, ProviderError, ResourceError};
use crate::state::Attr;

pub mod connection;
pub mod connector;
pub mod connector_definition;
pub mod operation;
pub mod workspace;

pub use connection::ConnectionResource;
pub use connector::ConnectorResource;
pub use connector_definition::ConnectorDefinitionResource;
pub use operation::OperationResource;
pub use workspace::WorkspaceResource;

/// Lifecycle of one managed entity type.
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Clone + Default + Serialize + DeserializeOwned + Send + Sync;

    /// Type name without the provider prefix, e.g. `source`.
    fn type_name(&self) -> &'static str;

    async fn create(&self, plan: &Self::Model) -> Result<Self::Model, ResourceError>;

    /// Refreshes `state` from the API.
    async fn read(&self, state: &Self::Model) -> Result<Self::Model, ResourceError>;

    /// Applies `plan` to the entity recorded in `prior`. Plans that change an attribute listed by
    /// [`Resource::requires_replace`] are refused.
    async fn update(
        &self,
        prior: &Self::Model,
        plan: &Self::Model,
    ) -> Result<Self::Model, ResourceError>;

    async fn delete(&self, state: &Self::Model) -> Result<(), ResourceError>;

    /// Attributes whose change forces a destroy and re-create.
    fn requires_replace(&self, prior: &Self::Model, plan: &Self::Model) -> Vec<&'static str>;

    /// State holding only `id`; a following [`Resource::read`] fills in the rest.
    fn import_state(&self, id: &str) -> Self::Model;
}

/// Collects the names of immutable attributes that differ between prior state and plan.
#[derive(Default)]
pub(crate) struct ReplaceCheck(Vec<&'static str>);

impl ReplaceCheck {
    pub(crate) fn attr<T: PartialEq>(
        mut self,
        attribute: &'static str,
        prior: &Attr<T>,
        plan: &Attr<T>,
    ) -> Self {
        if prior != plan {
            self.0.push(attribute);
        }
        self
    }

    pub(crate) fn finish(self) -> Vec<&'static str> {
        self.0
    }
}

pub(crate) fn ensure_in_place(attributes: Vec<&'static str>) -> Result<(), ProviderError> {
    if attributes.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::RequiresReplace { attributes })
    }
}

/// How an entity is named in errors: its id when known, else its name.
pub(crate) fn target(id: &Attr<String>, name: &Attr<String>) -> String {
    id.as_known()
        .or_else(|| name.as_known())
        .cloned()
        .unwrap_or_else(|| "(unknown)".to_string())
}

/// Plan for an update, keyed by the id recorded in prior state.
pub(crate) fn keyed_by(plan_id: &Attr<String>, prior_id: &Attr<String>) -> Attr<String> {
    if plan_id.is_known() {
        plan_id.clone()
    } else {
        prior_id.clone()
    }
}

pub(crate) fn wrap(
    action: Action,
    resource: &'static str,
    target: String,
) -> impl FnOnce(ProviderError) -> ResourceError {
    move |source| ResourceError::new(action, resource, target, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_check_collects_changed_attributes() {
        let changed = ReplaceCheck::default()
            .attr("source_id", &Attr::Known("a".to_string()), &Attr::Known("a".to_string()))
            .attr("destination_id", &Attr::Known("b".to_string()), &Attr::Known("c".to_string()))
            .attr("workspace_id", &Attr::<String>::Null, &Attr::Unknown)
            .finish();
        assert_eq!(changed, vec!["destination_id", "workspace_id"]);
        assert!(ensure_in_place(changed).is_err());
        assert!(ensure_in_place(Vec::new()).is_ok());
    }

    #[test]
    fn test_target_prefers_id() {
        let id = Attr::Known("src-1".to_string());
        let name = Attr::Known("orders".to_string());
        assert_eq!(target(&id, &name), "src-1");
        assert_eq!(target(&Attr::Unknown, &name), "orders");
        assert_eq!(target(&Attr::Unknown, &Attr::Null), "(unknown)");
    }

    #[test]
    fn test_keyed_by_falls_back_to_prior_id() {
        let prior = Attr::Known("op-1".to_string());
        assert_eq!(keyed_by(&Attr::Unknown, &prior), prior);
        assert_eq!(
            keyed_by(&Attr::Known("op-2".to_string()), &prior),
            Attr::Known("op-2".to_string())
        );
    }
}
