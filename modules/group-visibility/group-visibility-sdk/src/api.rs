//! Public API trait for group visibility.
//!
//! This is the surface consumed by the web layer. The module's local client
//! implements it on top of the domain service.

use async_trait::async_trait;

use crate::error::GroupVisibilityError;
use crate::models::{GroupNode, Principal, RawContextKey, UserRef};

/// Public API trait for group visibility.
///
/// ```ignore
/// let client: Arc<dyn GroupVisibilityClient> = ...;
///
/// // Root groups the principal may browse in a publisher context
/// let roots = client.list_visible_groups(&principal, primary, &sub_contexts).await?;
///
/// // Expand a node
/// let children = client.list_group_members(&roots[0].id).await?;
/// let users = client.list_user_members(&roots[0].id).await?;
/// ```
#[async_trait]
pub trait GroupVisibilityClient: Send + Sync {
    /// List the root groups `principal` may browse from `primary`.
    ///
    /// `fallback` contexts are consulted when the principal holds no grant,
    /// or only a `LOOKOVER` grant, on `primary`. Insufficient permission and
    /// missing configuration both produce an empty list.
    ///
    /// # Errors
    ///
    /// - `InvalidContext` for a malformed `primary` key when strict context
    ///   keys are enabled
    /// - `UnsupportedGrant` if the effective grant kind is not handled
    /// - `Directory` / `Store` when a backend call fails
    /// - `Timeout` when a resolution limit is configured and exceeded
    async fn list_visible_groups(
        &self,
        principal: &Principal,
        primary: RawContextKey,
        fallback: &[RawContextKey],
    ) -> Result<Vec<GroupNode>, GroupVisibilityError>;

    /// List the direct group members of `group_id`, roots only.
    ///
    /// # Errors
    ///
    /// - `Directory` when the directory call fails
    /// - `Timeout` when a resolution limit is configured and exceeded
    async fn list_group_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<GroupNode>, GroupVisibilityError>;

    /// List the direct user members of `group_id`.
    ///
    /// # Errors
    ///
    /// - `Directory` when the directory call fails
    /// - `Timeout` when a resolution limit is configured and exceeded
    async fn list_user_members(&self, group_id: &str)
    -> Result<Vec<UserRef>, GroupVisibilityError>;
}
