//! Service implementation for the static directory plugin.

use std::collections::{BTreeSet, HashMap, HashSet};

use anyhow::{Context as _, bail};
use group_visibility_sdk::{
    ContextKey, ContextType, EffectivePermission, ExternalGroup, Filter, FilterKind,
    GroupVisibilityError, Subscriber, UserRef,
};

use crate::config::{GroupConfig, StaticDirectoryPluginConfig};

/// In-memory snapshot of the configured directory and stores.
pub struct Service {
    groups: Vec<GroupConfig>,
    group_index: HashMap<String, usize>,
    users: HashMap<String, UserRef>,
    filters: HashMap<(i64, FilterKind), Filter>,
    subscribers: Vec<Subscriber>,
    parents: HashMap<ContextKey, Option<ContextKey>>,
    grants: HashMap<(String, ContextKey), EffectivePermission>,
}

impl Service {
    /// Build the snapshot, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate group, user, context, filter or grant
    /// entries and on invalid filter patterns.
    pub fn new(cfg: &StaticDirectoryPluginConfig) -> anyhow::Result<Self> {
        let mut group_index = HashMap::new();
        for (idx, group) in cfg.groups.iter().enumerate() {
            if group_index.insert(group.id.clone(), idx).is_some() {
                bail!("duplicate group id '{}'", group.id);
            }
        }

        let mut users = HashMap::new();
        for user in &cfg.users {
            if users.insert(user.id.clone(), user.clone()).is_some() {
                bail!("duplicate user id '{}'", user.id);
            }
        }

        let mut filters = HashMap::new();
        for filter in &cfg.filters {
            glob::Pattern::new(&filter.pattern)
                .with_context(|| format!("invalid filter pattern '{}'", filter.pattern))?;
            let key = (filter.organization_id, filter.kind);
            if filters.insert(key, filter.clone()).is_some() {
                bail!(
                    "more than one filter of the same kind for organization {}",
                    filter.organization_id
                );
            }
        }

        let mut parents = HashMap::new();
        for ctx in &cfg.contexts {
            if parents.insert(ctx.key(), ctx.parent).is_some() {
                bail!("duplicate context {}", ctx.key());
            }
        }

        let mut grants = HashMap::new();
        for grant in &cfg.grants {
            let key = (grant.subject_id.clone(), grant.context);
            let permission = EffectivePermission::new(grant.tier, grant.grant.clone());
            if grants.insert(key, permission).is_some() {
                bail!(
                    "duplicate grant for '{}' on {}",
                    grant.subject_id,
                    grant.context
                );
            }
        }

        Ok(Self {
            groups: cfg.groups.clone(),
            group_index,
            users,
            filters,
            subscribers: cfg.subscribers.clone(),
            parents,
            grants,
        })
    }

    /// Groups with the given ids, in configuration order.
    ///
    /// An empty id set returns every group.
    #[must_use]
    pub fn groups_by_ids(&self, ids: &BTreeSet<String>, include_details: bool) -> Vec<ExternalGroup> {
        self.groups
            .iter()
            .filter(|g| ids.is_empty() || ids.contains(&g.id))
            .map(|g| to_external(g, include_details))
            .collect()
    }

    /// Groups whose id matches the glob `pattern`, optionally restricted to
    /// ids starting with `scope`.
    ///
    /// # Errors
    ///
    /// Returns `Directory` if `pattern` is not a valid glob.
    pub fn groups_by_filter(
        &self,
        pattern: &str,
        scope: Option<&str>,
        include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError> {
        let pattern = glob::Pattern::new(pattern).map_err(|e| {
            GroupVisibilityError::directory_with_source(format!("invalid filter '{pattern}'"), e)
        })?;
        Ok(self
            .groups
            .iter()
            .filter(|g| scope.is_none_or(|s| g.id.starts_with(s)))
            .filter(|g| pattern.matches(&g.id))
            .map(|g| to_external(g, include_details))
            .collect())
    }

    #[must_use]
    pub fn direct_members(&self, group_id: &str, include_details: bool) -> Vec<ExternalGroup> {
        let Some(parent) = self.group(group_id) else {
            return Vec::new();
        };
        parent
            .member_ids
            .iter()
            .filter_map(|id| self.group(id))
            .map(|g| to_external(g, include_details))
            .collect()
    }

    #[must_use]
    pub fn direct_user_members(&self, group_id: &str) -> Vec<UserRef> {
        let Some(group) = self.group(group_id) else {
            return Vec::new();
        };
        group
            .user_ids
            .iter()
            .filter_map(|id| self.users.get(id).cloned())
            .collect()
    }

    #[must_use]
    pub fn filter(&self, organization_id: i64, kind: FilterKind) -> Option<Filter> {
        self.filters.get(&(organization_id, kind)).cloned()
    }

    #[must_use]
    pub fn default_subscribers(&self, context: &ContextKey) -> Vec<Subscriber> {
        self.subscribers
            .iter()
            .filter(|s| s.context == *context)
            .cloned()
            .collect()
    }

    /// Walk up the hierarchy until an ORGANIZATION context.
    ///
    /// Unknown contexts, dangling parents and cycles resolve to `None`.
    #[must_use]
    pub fn organization_root_of(&self, context: &ContextKey) -> Option<ContextKey> {
        let mut current = *context;
        let mut seen = HashSet::new();
        loop {
            if current.context_type == ContextType::Organization {
                return self.parents.contains_key(&current).then_some(current);
            }
            if !seen.insert(current) {
                return None;
            }
            current = (*self.parents.get(&current)?)?;
        }
    }

    #[must_use]
    pub fn grant_for(&self, subject_id: &str, context: &ContextKey) -> Option<EffectivePermission> {
        self.grants
            .get(&(subject_id.to_owned(), *context))
            .cloned()
    }

    fn group(&self, id: &str) -> Option<&GroupConfig> {
        self.group_index.get(id).map(|&idx| &self.groups[idx])
    }
}

/// Without details, nested member ids are not loaded.
fn to_external(group: &GroupConfig, include_details: bool) -> ExternalGroup {
    ExternalGroup {
        id: group.id.clone(),
        display_name: group.display_name.clone(),
        has_members: !group.member_ids.is_empty(),
        member_ids: if include_details {
            group.member_ids.clone()
        } else {
            BTreeSet::new()
        },
    }
}
