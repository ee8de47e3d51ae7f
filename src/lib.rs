//! Network ACL rule resource for the HCI cloud API.
//!
//! - [`hci`] talks to the API: HTTP transport, environment resolution and
//!   the network ACL rule endpoints.
//! - [`resource`] maps resource configuration and state onto those calls.
//! - [`config`] holds persisted provider settings.

pub mod config;
pub mod hci;
pub mod resource;
