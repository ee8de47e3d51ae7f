//! Resource abstraction layer
//!
//! This module implements the `hci_network_acl_rule` resource on top of the
//! HCI client.
//!
//! # Architecture
//!
//! - [`data`] - Attribute map passed into each lifecycle operation
//! - [`schema`] - Attribute declarations (required, force-new, normalisation)
//! - [`acl_rule`] - Typed rule model built from resource data
//! - [`network_acl_rule`] - Create/Read/Update/Delete/Import operations
//!
//! # Example
//!
//! ```ignore
//! use hci_acl::hci::HciClient;
//! use hci_acl::resource::{NetworkAclRuleResource, ResourceData};
//!
//! async fn create(client: HciClient) -> Result<ResourceData, hci_acl::hci::HciError> {
//!     let resource = NetworkAclRuleResource::new(client);
//!     let mut data = ResourceData::new()
//!         .with("environment_id", "env-id")
//!         .with("network_acl_id", "acl-id")
//!         .with("rule_number", "10")
//!         .with("cidr", "10.0.0.0/24")
//!         .with("action", "Allow")
//!         .with("protocol", "TCP")
//!         .with("traffic_type", "Ingress")
//!         .with("start_port", "443");
//!     resource.create(&mut data).await?;
//!     Ok(data)
//! }
//! ```

pub mod acl_rule;
pub mod data;
pub mod network_acl_rule;
pub mod schema;

pub use acl_rule::{Action, AclRuleSpec, IcmpMatch, PortRange, Protocol, ProtocolRule, TrafficType};
pub use data::ResourceData;
pub use network_acl_rule::NetworkAclRuleResource;
pub use schema::{network_acl_rule_schema, Schema};
