//! HCI API interaction module
//!
//! This module provides the pieces needed to talk to the HCI cloud API:
//! an API-key authenticated HTTP client, environment resolution and the
//! network ACL rule endpoints.
//!
//! # Module Structure
//!
//! - [`client`] - Main HCI client and URL helpers
//! - [`environments`] - Environment lookup and service-scoped handles
//! - [`error`] - Error type shared by API calls and resource operations
//! - [`http`] - HTTP utilities for REST API calls
//! - [`network_acl_rules`] - Network ACL rule wire type and endpoints
//!
//! # Example
//!
//! ```ignore
//! use hci_acl::hci::{HciClient, NetworkAclRuleApi};
//!
//! async fn example() -> Result<(), hci_acl::hci::HciError> {
//!     let client = HciClient::new("https://api.example.test/v1", "api-key")?;
//!     let resources = client.resources_for_environment("env-id").await?;
//!     let rule = resources.get("rule-id").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod environments;
pub mod error;
pub mod http;
pub mod network_acl_rules;

pub use client::HciClient;
pub use environments::{Environment, EnvironmentResolver, ServiceResources};
pub use error::HciError;
pub use network_acl_rules::{NetworkAclRule, NetworkAclRuleApi};
