//! Local client implementation of the group visibility API.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use group_visibility_sdk::{
    GroupNode, GroupVisibilityClient, GroupVisibilityError, Principal, RawContextKey, UserRef,
};

use super::error::DomainError;
use super::service::Service;

/// Local implementation of the group visibility client.
///
/// Wraps the domain service, applies the configured resolution timeout and
/// converts domain errors at the API boundary.
pub struct LocalClient {
    service: Arc<Service>,
    timeout: Option<Duration>,
}

impl LocalClient {
    /// Create a new local client wrapping the service.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        let timeout = service.config().resolution_timeout;
        Self { service, timeout }
    }

    async fn bounded<T, F>(&self, op: &str, call: F) -> Result<T, GroupVisibilityError>
    where
        F: Future<Output = Result<T, DomainError>> + Send,
    {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(DomainError::Timeout { elapsed: limit })),
            None => call.await,
        };
        result.map_err(|e| log_and_convert(op, e))
    }
}

fn log_and_convert(op: &str, e: DomainError) -> GroupVisibilityError {
    tracing::error!(operation = op, error = ?e, "group-visibility call failed");
    e.into()
}

#[async_trait]
impl GroupVisibilityClient for LocalClient {
    #[tracing::instrument(skip_all, fields(
        subject = %principal.subject_id(),
        fallback_count = fallback.len()
    ))]
    async fn list_visible_groups(
        &self,
        principal: &Principal,
        primary: RawContextKey,
        fallback: &[RawContextKey],
    ) -> Result<Vec<GroupNode>, GroupVisibilityError> {
        self.bounded(
            "list_visible_groups",
            self.service.list_visible_groups(principal, primary, fallback),
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(group_id = %group_id))]
    async fn list_group_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<GroupNode>, GroupVisibilityError> {
        self.bounded(
            "list_group_members",
            self.service.list_group_members(group_id),
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(group_id = %group_id))]
    async fn list_user_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<UserRef>, GroupVisibilityError> {
        self.bounded("list_user_members", self.service.list_user_members(group_id))
            .await
    }
}
