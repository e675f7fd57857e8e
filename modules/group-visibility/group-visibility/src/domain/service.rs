//! Domain service for group visibility.
//!
//! Turns an effective permission into the set of directory groups the
//! principal may browse, then flattens it to roots only.

use std::collections::BTreeSet;
use std::sync::Arc;

use group_visibility_sdk::{
    ContextHierarchy, ContextKey, DirectoryClient, ExternalGroup, FilterKind, FilterStore, GroupNode,
    PermissionGrant, PermissionStore, PermissionTier, Principal, RawContextKey, SubjectRef,
    SubscriberStore, UserRef,
};
use tracing::{debug, warn};

use super::error::DomainError;
use super::flatten::flatten_roots;
use super::permission::{PermissionResolver, ResolvedPermission};
use crate::config::GroupVisibilityConfig;

/// Backend clients the service reads from.
#[derive(Clone)]
pub struct Backends {
    pub directory: Arc<dyn DirectoryClient>,
    pub filters: Arc<dyn FilterStore>,
    pub subscribers: Arc<dyn SubscriberStore>,
    pub hierarchy: Arc<dyn ContextHierarchy>,
    pub permissions: Arc<dyn PermissionStore>,
}

impl Backends {
    /// Use one plugin for every backend.
    #[must_use]
    pub fn uniform<P>(plugin: &Arc<P>) -> Self
    where
        P: DirectoryClient
            + FilterStore
            + SubscriberStore
            + ContextHierarchy
            + PermissionStore
            + 'static,
    {
        Self {
            directory: plugin.clone(),
            filters: plugin.clone(),
            subscribers: plugin.clone(),
            hierarchy: plugin.clone(),
            permissions: plugin.clone(),
        }
    }
}

/// Group visibility service.
///
/// Holds no mutable state; every call is an independent read-only
/// resolution against the backends.
pub struct Service {
    backends: Backends,
    resolver: PermissionResolver,
    config: GroupVisibilityConfig,
}

impl Service {
    #[must_use]
    pub fn new(backends: Backends, config: GroupVisibilityConfig) -> Self {
        let resolver =
            PermissionResolver::new(backends.permissions.clone(), config.strict_context_keys);
        Self {
            backends,
            resolver,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GroupVisibilityConfig {
        &self.config
    }

    /// Root groups `principal` may browse from `primary`.
    ///
    /// # Errors
    ///
    /// - `InvalidContext` for a malformed `primary` with strict keys enabled
    /// - `UnsupportedGrant` if the effective grant kind is not handled
    /// - `Backend` if any backend call fails
    pub async fn list_visible_groups(
        &self,
        principal: &Principal,
        primary: RawContextKey,
        fallback: &[RawContextKey],
    ) -> Result<Vec<GroupNode>, DomainError> {
        let Some(ResolvedPermission {
            context,
            permission,
        }) = self.resolver.resolve(principal, primary, fallback).await?
        else {
            return Ok(Vec::new());
        };

        if permission.tier >= PermissionTier::Admin {
            debug!(context = %context, "Admin group search");
            let ids = self.filtered_group_ids(&context).await?.unwrap_or_default();
            if ids.is_empty() {
                warn!(
                    context = %context,
                    "Admin search without group ids, enumerating the whole directory"
                );
            }
            return self.fetch_roots(&ids).await;
        }

        if permission.tier < PermissionTier::Contributor {
            return Ok(Vec::new());
        }

        match permission.grant {
            Some(PermissionGrant::SubjectList {
                authorized_subjects,
            }) => {
                let ids = group_ids(&authorized_subjects);
                debug!(context = %context, groups = ?ids, "Subject list group search");
                self.fetch_bounded_roots(&ids).await
            }
            Some(PermissionGrant::Context) => {
                debug!(context = %context, "Context grant group search");
                if let Some(ids) = self.filtered_group_ids(&context).await? {
                    return self.fetch_bounded_roots(&ids).await;
                }

                warn!(
                    context = %context,
                    "No group filter defined, proceeding on default subscribers"
                );
                let subscribers = self.backends.subscribers.defaults_for(&context).await?;
                let ids = group_ids(subscribers.iter().map(|s| &s.subject));
                self.fetch_bounded_roots(&ids).await
            }
            Some(PermissionGrant::Unsupported { kind }) => {
                Err(DomainError::UnsupportedGrant { kind })
            }
            None => Ok(Vec::new()),
        }
    }

    /// Direct group members of `group_id`, roots only.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the directory call fails.
    pub async fn list_group_members(&self, group_id: &str) -> Result<Vec<GroupNode>, DomainError> {
        let members = self
            .backends
            .directory
            .direct_members(group_id, self.config.fetch_group_details)
            .await?;
        Ok(into_nodes(flatten_roots(members)))
    }

    /// Direct user members of `group_id`.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the directory call fails.
    pub async fn list_user_members(&self, group_id: &str) -> Result<Vec<UserRef>, DomainError> {
        Ok(self
            .backends
            .directory
            .direct_user_members(group_id)
            .await?)
    }

    /// Ids of the groups matched by the organization's GROUP filter.
    ///
    /// `None` when the context has no organization root or the organization
    /// has no GROUP filter configured.
    async fn filtered_group_ids(
        &self,
        context: &ContextKey,
    ) -> Result<Option<BTreeSet<String>>, DomainError> {
        let Some(root) = self.backends.hierarchy.organization_root_of(context).await? else {
            return Ok(None);
        };
        let Some(filter) = self
            .backends
            .filters
            .find(root.id, FilterKind::Group)
            .await?
        else {
            return Ok(None);
        };

        let matches = self
            .backends
            .directory
            .fetch_by_filter(&filter.pattern, None, false)
            .await?;
        Ok(Some(matches.into_iter().map(|g| g.id).collect()))
    }

    /// Like [`Self::fetch_roots`], but an empty id set yields nothing
    /// instead of an unfiltered enumeration.
    async fn fetch_bounded_roots(
        &self,
        ids: &BTreeSet<String>,
    ) -> Result<Vec<GroupNode>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_roots(ids).await
    }

    async fn fetch_roots(&self, ids: &BTreeSet<String>) -> Result<Vec<GroupNode>, DomainError> {
        let groups = self
            .backends
            .directory
            .fetch_by_ids(ids, self.config.fetch_group_details)
            .await?;
        Ok(into_nodes(flatten_roots(groups)))
    }
}

fn group_ids<'a>(subjects: impl IntoIterator<Item = &'a SubjectRef>) -> BTreeSet<String> {
    subjects
        .into_iter()
        .filter(|s| s.is_group())
        .map(|s| s.key_id.clone())
        .collect()
}

fn into_nodes(groups: Vec<ExternalGroup>) -> Vec<GroupNode> {
    groups.into_iter().map(GroupNode::from).collect()
}
