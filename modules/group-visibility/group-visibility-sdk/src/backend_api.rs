//! Backend traits consumed by the group visibility resolver.
//!
//! Plugins implement these to expose the external directory and the
//! permission, filter, subscriber and context stores. Implementations must
//! be safe to call concurrently; the resolver does not retry failures.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::GroupVisibilityError;
use crate::models::{
    ContextKey, EffectivePermission, ExternalGroup, Filter, FilterKind, Principal, Subscriber,
    UserRef,
};

/// Read access to the external group directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Fetch groups by id, in directory order.
    ///
    /// An empty `ids` set is an unfiltered enumeration of the directory.
    ///
    /// # Errors
    ///
    /// Returns `Directory` if the directory cannot be queried.
    async fn fetch_by_ids(
        &self,
        ids: &BTreeSet<String>,
        include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError>;

    /// Fetch groups matching a directory filter pattern.
    ///
    /// # Errors
    ///
    /// Returns `Directory` if the pattern is rejected or the directory
    /// cannot be queried.
    async fn fetch_by_filter(
        &self,
        pattern: &str,
        scope: Option<&str>,
        include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError>;

    /// Fetch the groups directly nested in `group_id`.
    ///
    /// # Errors
    ///
    /// Returns `Directory` if the directory cannot be queried.
    async fn direct_members(
        &self,
        group_id: &str,
        include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError>;

    /// Fetch the users directly in `group_id`.
    ///
    /// # Errors
    ///
    /// Returns `Directory` if the directory cannot be queried.
    async fn direct_user_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<UserRef>, GroupVisibilityError>;
}

/// Directory filters configured per organization.
#[async_trait]
pub trait FilterStore: Send + Sync {
    /// Find the filter of `kind` for an organization, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the lookup fails.
    async fn find(
        &self,
        organization_id: i64,
        kind: FilterKind,
    ) -> Result<Option<Filter>, GroupVisibilityError>;
}

/// Default subscribers of contexts.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `Store` if the lookup fails.
    async fn defaults_for(
        &self,
        context: &ContextKey,
    ) -> Result<Vec<Subscriber>, GroupVisibilityError>;
}

/// Context hierarchy lookups.
#[async_trait]
pub trait ContextHierarchy: Send + Sync {
    /// Resolve the organization a context belongs to.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the lookup fails.
    async fn organization_root_of(
        &self,
        context: &ContextKey,
    ) -> Result<Option<ContextKey>, GroupVisibilityError>;
}

/// Stored permission grants.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// The (tier, grant) pair `principal` holds on `context`, if any.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the lookup fails.
    async fn grant_for(
        &self,
        principal: &Principal,
        context: &ContextKey,
    ) -> Result<Option<EffectivePermission>, GroupVisibilityError>;
}
