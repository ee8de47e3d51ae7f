//! Resource schema
//!
//! Attribute declarations for `hci_network_acl_rule`: which attributes are
//! required, which force a new resource when changed, and how values are
//! normalised before they are stored in state.

use super::data::ResourceData;
use crate::hci::HciError;
use serde::Serialize;
use std::sync::OnceLock;

pub const NETWORK_ACL_RULE_RESOURCE: &str = "hci_network_acl_rule";

/// How a value is rewritten before it is stored in state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateFunc {
    Identity,
    LowerCase,
}

impl StateFunc {
    pub fn apply(self, value: &str) -> String {
        match self {
            StateFunc::Identity => value.to_string(),
            StateFunc::LowerCase => value.trim().to_lowercase(),
        }
    }
}

/// A single string attribute
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub force_new: bool,
    pub state_func: StateFunc,
}

impl Attribute {
    fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
            force_new: false,
            state_func: StateFunc::Identity,
        }
    }

    fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, description)
        }
    }

    fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    fn lower_case(mut self) -> Self {
        self.state_func = StateFunc::LowerCase;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub resource_type: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration: every required attribute set, no unknown attributes
    pub fn validate(&self, data: &ResourceData) -> Result<(), HciError> {
        if let Some((unknown, _)) = data
            .attributes()
            .find(|(key, _)| self.attribute(key).is_none())
        {
            return Err(HciError::validation(format!(
                "Unsupported argument \"{}\" for {}",
                unknown, self.resource_type
            )));
        }

        let missing: Vec<&str> = self
            .attributes
            .iter()
            .filter(|a| a.required && data.get_ok(a.name).is_none())
            .map(|a| a.name)
            .collect();
        if !missing.is_empty() {
            return Err(HciError::validation(format!(
                "Missing required argument(s) for {}: {}",
                self.resource_type,
                missing.join(", ")
            )));
        }

        Ok(())
    }

    /// Apply each attribute's state function in place
    pub fn normalize(&self, data: &mut ResourceData) {
        for attribute in &self.attributes {
            if let Some(value) = data.get_ok(attribute.name) {
                let normalized = attribute.state_func.apply(value);
                data.set(attribute.name, normalized);
            }
        }
    }

    /// Force-new attributes whose normalised values differ between prior state
    /// and the proposed configuration
    pub fn requires_replace(&self, prior: &ResourceData, proposed: &ResourceData) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.force_new)
            .filter(|a| {
                a.state_func.apply(prior.get(a.name)) != a.state_func.apply(proposed.get(a.name))
            })
            .map(|a| a.name)
            .collect()
    }
}

/// Schema of the network ACL rule resource
pub fn network_acl_rule_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| Schema {
        resource_type: NETWORK_ACL_RULE_RESOURCE,
        attributes: vec![
            Attribute::required(
                "environment_id",
                "ID of environment where the network ACL rule should be created",
            )
            .force_new(),
            Attribute::required("rule_number", "The rule number of network ACL"),
            Attribute::required("cidr", "The network ACL rule cidr"),
            Attribute::required(
                "action",
                "The network ACL rule action (i.e. Allow or Deny)",
            )
            .lower_case(),
            Attribute::required(
                "protocol",
                "The network ACL rule protocol (i.e. TCP, UDP, ICMP or All)",
            )
            .force_new()
            .lower_case(),
            Attribute::required(
                "traffic_type",
                "The network ACL rule traffic type (i.e. Ingress or Egress)",
            )
            .lower_case(),
            Attribute::optional(
                "icmp_type",
                "The ICMP type. Can only be used with ICMP protocol.",
            ),
            Attribute::optional(
                "icmp_code",
                "The ICMP code. Can only be used with ICMP protocol.",
            ),
            Attribute::optional(
                "start_port",
                "The start port. Can only be used with TCP/UDP protocol.",
            ),
            Attribute::optional(
                "end_port",
                "The end port. Can only be used with TCP/UDP protocol.",
            ),
            Attribute::required(
                "network_acl_id",
                "Id of the network ACL of the network ACL rule",
            )
            .force_new(),
        ],
    })
}
