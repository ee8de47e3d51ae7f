//! Network ACL rule resource
//!
//! Lifecycle operations for `hci_network_acl_rule`. Each operation resolves
//! the environment-scoped API handle first, then translates between
//! [`ResourceData`] and the API's [`NetworkAclRule`].

use super::acl_rule::AclRuleSpec;
use super::data::ResourceData;
use super::schema::{network_acl_rule_schema, Schema};
use crate::hci::{EnvironmentResolver, HciError, NetworkAclRule, NetworkAclRuleApi};
use std::sync::Arc;

const ENTITY: &str = "Network ACL rule";

/// Network ACL rule resource bound to an environment resolver
pub struct NetworkAclRuleResource<R> {
    resolver: R,
}

impl<R: EnvironmentResolver> NetworkAclRuleResource<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn schema(&self) -> &'static Schema {
        network_acl_rule_schema()
    }

    /// Resolve the API handle for the data's environment
    async fn resources_for_environment(
        &self,
        data: &ResourceData,
    ) -> Result<Arc<dyn NetworkAclRuleApi>, HciError> {
        self.resolver.resolve(data.get("environment_id")).await
    }

    /// Create the rule, store its id, then read it back into `data`
    pub async fn create(&self, data: &mut ResourceData) -> Result<(), HciError> {
        let spec = AclRuleSpec::from_resource_data(data)?;
        let api = self.resources_for_environment(data).await?;

        tracing::info!(
            "Creating network ACL rule {} in ACL {}",
            spec.rule_number,
            spec.network_acl_id
        );
        let created = api
            .create(&spec.to_create_request())
            .await
            .map_err(|e| HciError::operation("creating", &spec.rule_number, e))?;

        data.set_id(&created.id);
        self.read_with(api.as_ref(), data).await
    }

    /// Refresh `data` from the API; a rule that no longer exists clears `data`
    pub async fn read(&self, data: &mut ResourceData) -> Result<(), HciError> {
        let api = self.resources_for_environment(data).await?;
        self.read_with(api.as_ref(), data).await
    }

    async fn read_with(
        &self,
        api: &dyn NetworkAclRuleApi,
        data: &mut ResourceData,
    ) -> Result<(), HciError> {
        let result = api.get(data.id()).await;
        let rule = match result {
            Ok(rule) => rule,
            Err(e) => return handle_not_found(e, false, data, "reading"),
        };

        apply_rule(&rule, data);
        self.schema().normalize(data);
        Ok(())
    }

    /// Send the mutable fields to the API. State is not re-read afterwards.
    pub async fn update(&self, data: &mut ResourceData) -> Result<(), HciError> {
        let spec = AclRuleSpec::from_resource_data(data)?;
        let api = self.resources_for_environment(data).await?;

        tracing::info!("Updating network ACL rule {} ({})", spec.rule_number, data.id());
        api.update(data.id(), &spec.to_update_request(data.id()))
            .await
            .map_err(|e| HciError::operation("updating", &spec.rule_number, e))?;

        self.schema().normalize(data);
        Ok(())
    }

    /// Delete the rule; a rule that is already gone counts as deleted
    pub async fn delete(&self, data: &mut ResourceData) -> Result<(), HciError> {
        let api = self.resources_for_environment(data).await?;

        tracing::info!("Deleting network ACL rule {}", data.id());
        let result = api.delete(data.id()).await;
        if let Err(e) = result {
            return handle_not_found(e, true, data, "deleting");
        }

        data.clear();
        Ok(())
    }

    /// Pass-through import: the returned data carries only the identifier
    pub fn import(&self, id: &str) -> ResourceData {
        ResourceData::with_id(id)
    }
}

/// Copy an API rule into resource data. The environment id is not part of
/// the API representation and is left as is.
fn apply_rule(rule: &NetworkAclRule, data: &mut ResourceData) {
    data.set("rule_number", rule.rule_number.as_str());
    data.set("cidr", rule.cidr.as_str());
    data.set("action", rule.action.as_str());
    data.set("protocol", rule.protocol.as_str());
    data.set("traffic_type", rule.traffic_type.as_str());
    data.set("icmp_type", rule.icmp_type.as_str());
    data.set("icmp_code", rule.icmp_code.as_str());
    data.set("start_port", rule.start_port.as_str());
    data.set("end_port", rule.end_port.as_str());
    data.set("network_acl_id", rule.network_acl_id.as_str());
}

/// A not-found error means the rule is gone: clear `data` and succeed.
/// Anything else is returned with the operation and rule number attached.
fn handle_not_found(
    err: HciError,
    deleting: bool,
    data: &mut ResourceData,
    operation: &'static str,
) -> Result<(), HciError> {
    if err.is_not_found() {
        if deleting {
            tracing::info!("{} (id={}) was already deleted", ENTITY, data.id());
        } else {
            tracing::warn!("{} (id={}) not found, removing from state", ENTITY, data.id());
        }
        data.clear();
        return Ok(());
    }

    // Imported data has no rule number until the first successful read
    let label = data.get_ok("rule_number").unwrap_or(data.id());
    Err(HciError::operation(operation, label, err))
}
