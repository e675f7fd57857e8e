//! Effective permission resolution across a primary context and its
//! fallback sub-contexts.

use std::sync::Arc;

use group_visibility_sdk::{
    ContextKey, EffectivePermission, PermissionStore, PermissionTier, Principal, RawContextKey,
};
use tracing::debug;

use super::error::DomainError;

/// Effective permission together with the validated primary context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPermission {
    pub context: ContextKey,
    pub permission: EffectivePermission,
}

/// Computes the (tier, grant) pair a principal holds for a browse request.
pub struct PermissionResolver {
    store: Arc<dyn PermissionStore>,
    strict_context_keys: bool,
}

impl PermissionResolver {
    #[must_use]
    pub fn new(store: Arc<dyn PermissionStore>, strict_context_keys: bool) -> Self {
        Self {
            store,
            strict_context_keys,
        }
    }

    /// Resolve the effective permission of `principal` on `primary`.
    ///
    /// A missing or `LOOKOVER` grant on `primary` defers to the most
    /// restrictive grant found on `fallback`. Returns `None` when nothing
    /// usable is held, or when a non-ADMIN tier carries no grant payload.
    ///
    /// # Errors
    ///
    /// - `InvalidContext` for a malformed `primary` with strict keys enabled
    /// - `Backend` if the permission store fails
    pub async fn resolve(
        &self,
        principal: &Principal,
        primary: RawContextKey,
        fallback: &[RawContextKey],
    ) -> Result<Option<ResolvedPermission>, DomainError> {
        let context = match ContextKey::try_from(primary) {
            Ok(key) => key,
            Err(err) if self.strict_context_keys => {
                return Err(DomainError::InvalidContext {
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                debug!(error = %err, "Malformed primary context, nothing visible");
                return Ok(None);
            }
        };

        let mut permission = self.store.grant_for(principal, &context).await?;

        let too_weak = permission
            .as_ref()
            .is_none_or(|p| p.tier == PermissionTier::Lookover);
        if too_weak
            && !fallback.is_empty()
            && let Some(lowest) = self.lowest_fallback(principal, fallback).await?
        {
            permission = Some(lowest);
        }

        let Some(permission) = permission else {
            return Ok(None);
        };

        debug!(
            context = %context,
            tier = ?permission.tier,
            grant = ?permission.grant,
            "Resolved effective permission"
        );

        if permission.tier < PermissionTier::Admin && permission.grant.is_none() {
            return Ok(None);
        }

        Ok(Some(ResolvedPermission {
            context,
            permission,
        }))
    }

    /// Most restrictive grant held on any of `fallback`.
    ///
    /// Contexts without a grant are skipped. The scan stops as soon as a
    /// CONTRIBUTOR grant becomes the lowest seen.
    async fn lowest_fallback(
        &self,
        principal: &Principal,
        fallback: &[RawContextKey],
    ) -> Result<Option<EffectivePermission>, DomainError> {
        let mut lowest: Option<EffectivePermission> = None;

        for raw in fallback {
            let Ok(context) = ContextKey::try_from(*raw) else {
                debug!(?raw, "Skipping malformed fallback context");
                continue;
            };
            let Some(candidate) = self.store.grant_for(principal, &context).await? else {
                continue;
            };
            if lowest.as_ref().is_none_or(|l| candidate.tier < l.tier) {
                let reached_floor = candidate.tier == PermissionTier::Contributor;
                lowest = Some(candidate);
                if reached_floor {
                    break;
                }
            }
        }

        Ok(lowest)
    }
}
