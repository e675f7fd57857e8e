//! Configuration for the static directory plugin.

use std::collections::BTreeSet;

use group_visibility_sdk::{
    ContextKey, ContextType, Filter, PermissionGrant, PermissionTier, Subscriber, UserRef,
};
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticDirectoryPluginConfig {
    /// Directory groups, in the order the directory returns them.
    pub groups: Vec<GroupConfig>,

    /// Directory users.
    pub users: Vec<UserRef>,

    /// Organization directory filters.
    pub filters: Vec<Filter>,

    /// Default subscribers of contexts.
    pub subscribers: Vec<Subscriber>,

    /// Context hierarchy.
    pub contexts: Vec<ContextConfig>,

    /// Permission grants per (subject, context).
    pub grants: Vec<GrantConfig>,
}

/// Configuration for a single directory group.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub id: String,

    pub display_name: String,

    /// Directly nested groups.
    #[serde(default)]
    pub member_ids: BTreeSet<String>,

    /// Directly contained users.
    #[serde(default)]
    pub user_ids: BTreeSet<String>,
}

/// Configuration for a single context of the hierarchy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    pub id: i64,

    #[serde(rename = "type")]
    pub context_type: ContextType,

    /// Enclosing context. `None` for top-level contexts.
    #[serde(default)]
    pub parent: Option<ContextKey>,
}

impl ContextConfig {
    #[must_use]
    pub fn key(&self) -> ContextKey {
        ContextKey::new(self.id, self.context_type)
    }
}

/// Configuration for a single permission grant.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantConfig {
    pub subject_id: String,

    pub context: ContextKey,

    pub tier: PermissionTier,

    /// Grant payload. May be omitted for ADMIN.
    #[serde(default)]
    pub grant: Option<PermissionGrant>,
}
