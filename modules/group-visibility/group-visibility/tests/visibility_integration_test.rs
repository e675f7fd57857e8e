//! Integration tests for group visibility wiring.
//!
//! These tests build the static directory plugin from YAML and drive the
//! local client end to end through the public `GroupVisibilityClient` API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use group_visibility::{
    Backends, ContextKey, ContextType, DirectoryClient, ExternalGroup, GroupNode,
    GroupVisibilityClient, GroupVisibilityConfig, GroupVisibilityError, LocalClient, Principal,
    RawContextKey, Service, UserRef,
};
use static_directory_plugin::StaticDirectoryPluginConfig;

const CONFIG: &str = r#"
groups:
  - id: "esco:staff"
    display_name: "Staff"
    member_ids: ["esco:teachers"]
  - id: "esco:teachers"
    display_name: "Teachers"
    user_ids: ["jdoe", "asmith"]
  - id: "esco:students"
    display_name: "Students"
  - id: "g1"
    display_name: "Default readers"
  - id: "g2"
    display_name: "Authorized writers"
users:
  - id: "jdoe"
    display_name: "John Doe"
  - id: "asmith"
    display_name: "Alice Smith"
    email: "asmith@example.org"
filters:
  - organization_id: 1
    kind: GROUP
    pattern: "esco:*"
subscribers:
  - context: { id: 20, type: PUBLISHER }
    subject: { key_id: "g1", key_type: GROUP }
    subscribe_type: FORCED
  - context: { id: 20, type: PUBLISHER }
    subject: { key_id: "u1", key_type: USER }
    subscribe_type: FREE
contexts:
  - id: 1
    type: ORGANIZATION
  - id: 2
    type: ORGANIZATION
  - id: 10
    type: PUBLISHER
    parent: { id: 1, type: ORGANIZATION }
  - id: 11
    type: CATEGORY
    parent: { id: 10, type: PUBLISHER }
  - id: 12
    type: CATEGORY
    parent: { id: 10, type: PUBLISHER }
  - id: 13
    type: CATEGORY
    parent: { id: 10, type: PUBLISHER }
  - id: 20
    type: PUBLISHER
    parent: { id: 2, type: ORGANIZATION }
grants:
  - subject_id: "admin"
    context: { id: 10, type: PUBLISHER }
    tier: ADMIN
  - subject_id: "writer"
    context: { id: 10, type: PUBLISHER }
    tier: CONTRIBUTOR
    grant:
      kind: subject_list
      authorized_subjects:
        - { key_id: "g2", key_type: GROUP }
        - { key_id: "u2", key_type: USER }
  - subject_id: "editor"
    context: { id: 10, type: PUBLISHER }
    tier: EDITOR
    grant: { kind: context }
  - subject_id: "reader"
    context: { id: 20, type: PUBLISHER }
    tier: CONTRIBUTOR
    grant: { kind: context }
  - subject_id: "viewer"
    context: { id: 10, type: PUBLISHER }
    tier: LOOKOVER
    grant: { kind: context }
  - subject_id: "viewer"
    context: { id: 11, type: CATEGORY }
    tier: MANAGER
    grant: { kind: context }
  - subject_id: "viewer"
    context: { id: 12, type: CATEGORY }
    tier: CONTRIBUTOR
    grant:
      kind: subject_list
      authorized_subjects:
        - { key_id: "esco:students", key_type: GROUP }
  - subject_id: "viewer"
    context: { id: 13, type: CATEGORY }
    tier: ADMIN
  - subject_id: "legacy"
    context: { id: 10, type: PUBLISHER }
    tier: CONTRIBUTOR
    grant: { kind: on_classification_with_subjects }
"#;

fn plugin() -> Arc<static_directory_plugin::Client> {
    let cfg: StaticDirectoryPluginConfig = serde_saphyr::from_str(CONFIG).unwrap();
    static_directory_plugin::init(&cfg).unwrap()
}

fn client_with(config: GroupVisibilityConfig) -> LocalClient {
    let backends = Backends::uniform(&plugin());
    LocalClient::new(Arc::new(Service::new(backends, config)))
}

fn client() -> LocalClient {
    client_with(GroupVisibilityConfig::default())
}

fn publisher(id: i64) -> RawContextKey {
    ContextKey::new(id, ContextType::Publisher).into()
}

fn category(id: i64) -> RawContextKey {
    ContextKey::new(id, ContextType::Category).into()
}

fn ids(nodes: &[GroupNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

#[tokio::test]
async fn admin_sees_filtered_roots() {
    let roots = client()
        .list_visible_groups(&Principal::new("admin"), publisher(10), &[])
        .await
        .unwrap();

    assert_eq!(ids(&roots), vec!["esco:staff", "esco:students"]);
    assert_eq!(roots[0].display_name, "Staff");
    assert!(roots[0].has_children);
    assert!(!roots[1].has_children);
}

#[tokio::test]
async fn subject_list_grant_sees_only_listed_groups() {
    let roots = client()
        .list_visible_groups(&Principal::new("writer"), publisher(10), &[])
        .await
        .unwrap();

    assert_eq!(ids(&roots), vec!["g2"]);
}

#[tokio::test]
async fn context_grant_uses_organization_filter() {
    let roots = client()
        .list_visible_groups(&Principal::new("editor"), publisher(10), &[])
        .await
        .unwrap();

    assert_eq!(ids(&roots), vec!["esco:staff", "esco:students"]);
}

#[tokio::test]
async fn context_grant_without_filter_uses_default_subscribers() {
    let roots = client()
        .list_visible_groups(&Principal::new("reader"), publisher(20), &[])
        .await
        .unwrap();

    assert_eq!(ids(&roots), vec!["g1"]);
}

#[tokio::test]
async fn lookover_defers_to_most_restrictive_sub_context() {
    let roots = client()
        .list_visible_groups(
            &Principal::new("viewer"),
            publisher(10),
            &[category(11), category(12), category(13)],
        )
        .await
        .unwrap();

    // Category 12 (CONTRIBUTOR, subject list) wins over MANAGER and ADMIN.
    assert_eq!(ids(&roots), vec!["esco:students"]);
}

#[tokio::test]
async fn lookover_alone_sees_nothing() {
    let roots = client()
        .list_visible_groups(&Principal::new("viewer"), publisher(10), &[])
        .await
        .unwrap();

    assert!(roots.is_empty());
}

#[tokio::test]
async fn unknown_principal_sees_nothing() {
    let roots = client()
        .list_visible_groups(&Principal::new("nobody"), publisher(10), &[category(11)])
        .await
        .unwrap();

    assert!(roots.is_empty());
}

#[tokio::test]
async fn unsupported_grant_kind_is_reported() {
    let err = client()
        .list_visible_groups(&Principal::new("legacy"), publisher(10), &[])
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        GroupVisibilityError::UnsupportedGrant { kind } if kind == "on_classification_with_subjects"
    ));
    assert_eq!(
        err.to_string(),
        "unsupported grant payload: on_classification_with_subjects"
    );
}

#[tokio::test]
async fn malformed_context_depends_on_strictness() {
    let malformed = RawContextKey {
        id: Some(10),
        context_type: None,
    };

    let roots = client()
        .list_visible_groups(&Principal::new("admin"), malformed, &[])
        .await
        .unwrap();
    assert!(roots.is_empty());

    let strict = client_with(GroupVisibilityConfig {
        strict_context_keys: true,
        ..GroupVisibilityConfig::default()
    });
    let err = strict
        .list_visible_groups(&Principal::new("admin"), malformed, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, GroupVisibilityError::InvalidContext { .. }));
}

#[tokio::test]
async fn members_are_browsable() {
    let client = client();

    let groups = client.list_group_members("esco:staff").await.unwrap();
    assert_eq!(ids(&groups), vec!["esco:teachers"]);

    let users = client.list_user_members("esco:teachers").await.unwrap();
    let user_ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(user_ids, vec!["asmith", "jdoe"]);

    assert!(client.list_group_members("unknown").await.unwrap().is_empty());
}

/// Directory that never answers in time.
struct SlowDirectory {
    delay: Duration,
}

#[async_trait]
impl DirectoryClient for SlowDirectory {
    async fn fetch_by_ids(
        &self,
        _ids: &BTreeSet<String>,
        _include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn fetch_by_filter(
        &self,
        _pattern: &str,
        _scope: Option<&str>,
        _include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn direct_members(
        &self,
        _group_id: &str,
        _include_details: bool,
    ) -> Result<Vec<ExternalGroup>, GroupVisibilityError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn direct_user_members(
        &self,
        _group_id: &str,
    ) -> Result<Vec<UserRef>, GroupVisibilityError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn resolution_timeout_is_enforced() {
    let mut backends = Backends::uniform(&plugin());
    backends.directory = Arc::new(SlowDirectory {
        delay: Duration::from_secs(5),
    });
    let limit = Duration::from_millis(20);
    let client = LocalClient::new(Arc::new(Service::new(
        backends,
        GroupVisibilityConfig {
            resolution_timeout: Some(limit),
            ..GroupVisibilityConfig::default()
        },
    )));

    let err = client
        .list_visible_groups(&Principal::new("admin"), publisher(10), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, GroupVisibilityError::Timeout { elapsed } if elapsed == limit));

    let err = client.list_group_members("esco:staff").await.unwrap_err();
    assert!(matches!(err, GroupVisibilityError::Timeout { .. }));
}
