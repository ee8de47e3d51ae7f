//! HCI Network ACL Rules
//!
//! Wire representation of a network ACL rule and the CRUD endpoints
//! exposed by a service-scoped client.

use super::environments::ServiceResources;
use super::error::HciError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Entity path segment for network ACL rules
pub const NETWORK_ACL_RULE_ENTITY: &str = "networkaclrules";

fn is_empty(value: &str) -> bool {
    value.is_empty()
}

/// Network ACL rule as sent to and returned by the API.
/// Empty strings are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkAclRule {
    #[serde(skip_serializing_if = "is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub rule_number: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub cidr: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub action: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub protocol: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub traffic_type: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub icmp_type: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub icmp_code: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub start_port: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub end_port: String,
    #[serde(skip_serializing_if = "is_empty")]
    pub network_acl_id: String,
}

/// Network ACL rule endpoints of an environment
#[async_trait]
pub trait NetworkAclRuleApi: Send + Sync {
    async fn create(&self, rule: &NetworkAclRule) -> Result<NetworkAclRule, HciError>;

    async fn get(&self, id: &str) -> Result<NetworkAclRule, HciError>;

    async fn update(&self, id: &str, rule: &NetworkAclRule) -> Result<NetworkAclRule, HciError>;

    async fn delete(&self, id: &str) -> Result<(), HciError>;
}

#[async_trait]
impl NetworkAclRuleApi for ServiceResources {
    async fn create(&self, rule: &NetworkAclRule) -> Result<NetworkAclRule, HciError> {
        let url = self.entity_url(NETWORK_ACL_RULE_ENTITY, None);
        self.client.post(&url, rule).await
    }

    async fn get(&self, id: &str) -> Result<NetworkAclRule, HciError> {
        let url = self.entity_url(NETWORK_ACL_RULE_ENTITY, Some(id));
        self.client.get(&url).await
    }

    async fn update(&self, id: &str, rule: &NetworkAclRule) -> Result<NetworkAclRule, HciError> {
        let url = self.entity_url(NETWORK_ACL_RULE_ENTITY, Some(id));
        self.client.put(&url, rule).await
    }

    async fn delete(&self, id: &str) -> Result<(), HciError> {
        let url = self.entity_url(NETWORK_ACL_RULE_ENTITY, Some(id));
        self.client.delete(&url).await
    }
}
