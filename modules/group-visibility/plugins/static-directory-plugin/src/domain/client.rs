//! Client implementation of the backend traits.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use group_visibility_sdk::{
    ContextHierarchy, ContextKey, DirectoryClient, EffectivePermission, ExternalGroup, Filter,
    FilterKind, FilterStore, GroupVisibilityError, PermissionStore, Principal, Subscriber,
    SubscriberStore, UserRef,
};

use super::service::Service;

/// Client implementation for the static directory plugin.
///
/// One client serves every backend trait.
pub struct Client {
    service: Arc<Service>,
}

impl Client {
    /// Create a new client wrapping the service.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DirectoryClient for Client {
    async fn fetch_by_ids(
        &self,
        ids: &BTreeSet<String>,
        include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError> {
        Ok(self.service.groups_by_ids(ids, include_details))
    }

    async fn fetch_by_filter(
        &self,
        pattern: &str,
        scope: Option<&str>,
        include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError> {
        self.service
            .groups_by_filter(pattern, scope, include_details)
    }

    async fn direct_members(
        &self,
        group_id: &str,
        include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError> {
        Ok(self.service.direct_members(group_id, include_details))
    }

    async fn direct_user_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<UserRef>, GroupVisibilityError> {
        Ok(self.service.direct_user_members(group_id))
    }
}

#[async_trait]
impl FilterStore for Client {
    async fn find(
        &self,
        organization_id: i64,
        kind: FilterKind,
    ) -> Result<Option<Filter>, GroupVisibilityError> {
        Ok(self.service.filter(organization_id, kind))
    }
}

#[async_trait]
impl SubscriberStore for Client {
    async fn defaults_for(
        &self,
        context: &ContextKey,
    ) -> Result<Vec<Subscriber>, GroupVisibilityError> {
        Ok(self.service.default_subscribers(context))
    }
}

#[async_trait]
impl ContextHierarchy for Client {
    async fn organization_root_of(
        &self,
        context: &ContextKey,
    ) -> Result<Option<ContextKey>, GroupVisibilityError> {
        Ok(self.service.organization_root_of(context))
    }
}

#[async_trait]
impl PermissionStore for Client {
    async fn grant_for(
        &self,
        principal: &Principal,
        context: &ContextKey,
    ) -> Result<Option<EffectivePermission>, GroupVisibilityError> {
        Ok(self.service.grant_for(principal.subject_id(), context))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use group_visibility_sdk::{ContextType, PermissionGrant, PermissionTier};

    use super::*;
    use crate::config::StaticDirectoryPluginConfig;

    fn client() -> Client {
        let cfg: StaticDirectoryPluginConfig = serde_json::from_value(serde_json::json!({
            "groups": [{ "id": "g1", "display_name": "G1" }],
            "filters": [{ "organization_id": 1, "kind": "GROUP", "pattern": "g*" }],
            "subscribers": [{
                "context": { "id": 10, "type": "PUBLISHER" },
                "subject": { "key_id": "g1", "key_type": "GROUP" },
                "subscribe_type": "FORCED"
            }],
            "grants": [{
                "subject_id": "jdoe",
                "context": { "id": 10, "type": "PUBLISHER" },
                "tier": "EDITOR",
                "grant": { "kind": "context" }
            }]
        }))
        .unwrap();
        Client::new(Arc::new(Service::new(&cfg).unwrap()))
    }

    #[tokio::test]
    async fn grant_lookup_is_per_subject() {
        let client = client();
        let publisher = ContextKey::new(10, ContextType::Publisher);

        let grant = client
            .grant_for(&Principal::new("jdoe"), &publisher)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(grant.tier, PermissionTier::Editor);
        assert_eq!(grant.grant, Some(PermissionGrant::Context));

        let other = client
            .grant_for(&Principal::new("someone"), &publisher)
            .await
            .unwrap();
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn filter_and_subscriber_lookups() {
        let client = client();

        let filter = client.find(1, FilterKind::Group).await.unwrap().unwrap();
        assert_eq!(filter.pattern, "g*");
        assert_eq!(client.find(1, FilterKind::User).await.unwrap(), None);
        assert_eq!(client.find(2, FilterKind::Group).await.unwrap(), None);

        let subs = client
            .defaults_for(&ContextKey::new(10, ContextType::Publisher))
            .await
            .unwrap();
        assert_eq!(subs.len(), 1);
        assert!(subs[0].subject.is_group());
    }
}
