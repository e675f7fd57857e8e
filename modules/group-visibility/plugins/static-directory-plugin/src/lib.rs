//! Static Directory Plugin
//!
//! This plugin serves the group visibility backends from configuration:
//! directory groups and users, organization filters, default subscribers,
//! the context hierarchy and permission grants.
//! Useful for testing, development, and simple deployments.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   static_directory_plugin:
//!     groups:
//!       - id: "esco:staff"
//!         display_name: "Staff"
//!         member_ids: ["esco:teachers"]
//!       - id: "esco:teachers"
//!         display_name: "Teachers"
//!         user_ids: ["jdoe"]
//!     users:
//!       - id: "jdoe"
//!         display_name: "John Doe"
//!     filters:
//!       - organization_id: 1
//!         kind: GROUP
//!         pattern: "esco:*"
//!     contexts:
//!       - id: 1
//!         type: ORGANIZATION
//!       - id: 10
//!         type: PUBLISHER
//!         parent: { id: 1, type: ORGANIZATION }
//!     grants:
//!       - subject_id: "jdoe"
//!         context: { id: 10, type: PUBLISHER }
//!         tier: CONTRIBUTOR
//!         grant: { kind: context }
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

use std::sync::Arc;

use tracing::info;

pub use config::StaticDirectoryPluginConfig;
pub use domain::{Client, Service};

/// Build the plugin client from configuration.
///
/// # Errors
///
/// Returns an error if the configuration is inconsistent (duplicate ids,
/// invalid filter patterns, conflicting grants).
pub fn init(cfg: &StaticDirectoryPluginConfig) -> anyhow::Result<Arc<Client>> {
    info!("Initializing static_directory_plugin");
    let service = Service::new(cfg)?;
    info!(
        groups = cfg.groups.len(),
        users = cfg.users.len(),
        filters = cfg.filters.len(),
        grants = cfg.grants.len(),
        "Static directory plugin initialized"
    );
    Ok(Arc::new(Client::new(Arc::new(service))))
}
