//! HCI Environments
//!
//! Environment lookup and resolution of the service-scoped API handle
//! used by every network ACL rule call.

use super::client::HciClient;
use super::error::HciError;
use super::network_acl_rules::NetworkAclRuleApi;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Service connection owning an environment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConnection {
    #[serde(default)]
    pub id: String,
    pub service_code: String,
}

/// Environment information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub service_connection: ServiceConnection,
}

/// Resolves an environment id to the API handle scoped to that environment
#[async_trait]
pub trait EnvironmentResolver: Send + Sync {
    async fn resolve(&self, environment_id: &str) -> Result<Arc<dyn NetworkAclRuleApi>, HciError>;
}

/// Client bound to one service code and environment name
#[derive(Clone)]
pub struct ServiceResources {
    pub client: HciClient,
    pub service_code: String,
    pub environment_name: String,
}

impl ServiceResources {
    pub fn entity_url(&self, entity: &str, id: Option<&str>) -> String {
        self.client
            .service_url(&self.service_code, &self.environment_name, entity, id)
    }
}

impl HciClient {
    /// Fetch an environment by id
    pub async fn get_environment(&self, environment_id: &str) -> Result<Environment, HciError> {
        let url = self.environment_url(environment_id);
        self.get(&url).await
    }

    /// Look up an environment and bind a client to its service and name
    pub async fn resources_for_environment(
        &self,
        environment_id: &str,
    ) -> Result<ServiceResources, HciError> {
        let environment = self.get_environment(environment_id).await?;
        tracing::debug!(
            "Resolved environment {} to {}/{}",
            environment_id,
            environment.service_connection.service_code,
            environment.name
        );

        Ok(ServiceResources {
            client: self.clone(),
            service_code: environment.service_connection.service_code,
            environment_name: environment.name,
        })
    }
}

#[async_trait]
impl EnvironmentResolver for HciClient {
    async fn resolve(&self, environment_id: &str) -> Result<Arc<dyn NetworkAclRuleApi>, HciError> {
        let resources = self.resources_for_environment(environment_id).await?;
        Ok(Arc::new(resources))
    }
}
