//! Domain models for group visibility resolution.
//!
//! Context keys, permission tiers and grants describe what a principal is
//! allowed to see; external groups, filters and subscribers are read views
//! over data owned by backend plugins.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GroupVisibilityError;

/// The authenticated requester.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    subject_id: String,
}

impl Principal {
    #[must_use]
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

/// Kind of addressable scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextType {
    Organization,
    Publisher,
    Category,
    Feed,
    Item,
}

impl ContextType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "ORGANIZATION",
            Self::Publisher => "PUBLISHER",
            Self::Category => "CATEGORY",
            Self::Feed => "FEED",
            Self::Item => "ITEM",
        }
    }
}

/// Validated identifier of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextKey {
    pub id: i64,
    #[serde(rename = "type")]
    pub context_type: ContextType,
}

impl ContextKey {
    #[must_use]
    pub const fn new(id: i64, context_type: ContextType) -> Self {
        Self { id, context_type }
    }

    #[must_use]
    pub const fn organization(id: i64) -> Self {
        Self::new(id, ContextType::Organization)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.context_type.as_str(), self.id)
    }
}

/// Context key as received from a caller, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContextKey {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "type")]
    pub context_type: Option<ContextType>,
}

impl From<ContextKey> for RawContextKey {
    fn from(key: ContextKey) -> Self {
        Self {
            id: Some(key.id),
            context_type: Some(key.context_type),
        }
    }
}

impl TryFrom<RawContextKey> for ContextKey {
    type Error = GroupVisibilityError;

    fn try_from(raw: RawContextKey) -> Result<Self, Self::Error> {
        match (raw.id, raw.context_type) {
            (Some(id), Some(context_type)) => Ok(Self { id, context_type }),
            (None, _) => Err(GroupVisibilityError::InvalidContext {
                reason: "missing context id".to_owned(),
            }),
            (Some(_), None) => Err(GroupVisibilityError::InvalidContext {
                reason: "missing context type".to_owned(),
            }),
        }
    }
}

/// Ranked permission level.
///
/// Ordering is defined by [`PermissionTier::rank`], not by declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionTier {
    None,
    Lookover,
    Contributor,
    Editor,
    Manager,
    Admin,
}

impl PermissionTier {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Lookover => 1,
            Self::Contributor => 2,
            Self::Editor => 3,
            Self::Manager => 4,
            Self::Admin => 5,
        }
    }
}

impl PartialOrd for PermissionTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PermissionTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Kind of subject a grant or subscription refers to.
///
/// Subject kinds this build does not know (attribute-based subjects and the
/// like) deserialize to [`SubjectType::Other`] and never reach the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    User,
    Group,
    #[serde(other)]
    Other,
}

/// Reference to a user or a group in the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectRef {
    pub key_id: String,
    pub key_type: SubjectType,
}

impl SubjectRef {
    #[must_use]
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            key_id: id.into(),
            key_type: SubjectType::Group,
        }
    }

    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            key_id: id.into(),
            key_type: SubjectType::User,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.key_type == SubjectType::Group
    }
}

/// Stored authorization payload attached to a (principal, context) pair.
///
/// Stored as an object tagged by `kind`. Any kind this build does not know
/// deserializes to [`PermissionGrant::Unsupported`], keeping the stored tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredGrant", into = "StoredGrant")]
pub enum PermissionGrant {
    /// Applies to the whole context; visibility is bounded by the
    /// organization's directory filter.
    Context,
    /// Explicit allow-list of subjects.
    SubjectList {
        authorized_subjects: BTreeSet<SubjectRef>,
    },
    Unsupported {
        kind: String,
    },
}

impl PermissionGrant {
    const CONTEXT: &'static str = "context";
    const SUBJECT_LIST: &'static str = "subject_list";

    /// Stored tag of the payload.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Context => Self::CONTEXT,
            Self::SubjectList { .. } => Self::SUBJECT_LIST,
            Self::Unsupported { kind } => kind,
        }
    }
}

/// Wire shape of [`PermissionGrant`].
#[derive(Serialize, Deserialize)]
struct StoredGrant {
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    authorized_subjects: Option<BTreeSet<SubjectRef>>,
}

impl TryFrom<StoredGrant> for PermissionGrant {
    type Error = String;

    fn try_from(stored: StoredGrant) -> Result<Self, Self::Error> {
        match stored.kind.as_str() {
            Self::CONTEXT => Ok(Self::Context),
            Self::SUBJECT_LIST => {
                let authorized_subjects = stored.authorized_subjects.ok_or_else(|| {
                    "missing field `authorized_subjects` for subject_list grant".to_owned()
                })?;
                Ok(Self::SubjectList {
                    authorized_subjects,
                })
            }
            _ => Ok(Self::Unsupported { kind: stored.kind }),
        }
    }
}

impl From<PermissionGrant> for StoredGrant {
    fn from(grant: PermissionGrant) -> Self {
        match grant {
            PermissionGrant::Context => Self {
                kind: PermissionGrant::CONTEXT.to_owned(),
                authorized_subjects: None,
            },
            PermissionGrant::SubjectList {
                authorized_subjects,
            } => Self {
                kind: PermissionGrant::SUBJECT_LIST.to_owned(),
                authorized_subjects: Some(authorized_subjects),
            },
            PermissionGrant::Unsupported { kind } => Self {
                kind,
                authorized_subjects: None,
            },
        }
    }
}

/// The (tier, grant) pair a principal holds on a context.
///
/// `grant` may be `None` only for [`PermissionTier::Admin`], meaning
/// unrestricted access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermission {
    pub tier: PermissionTier,
    #[serde(default)]
    pub grant: Option<PermissionGrant>,
}

impl EffectivePermission {
    #[must_use]
    pub fn new(tier: PermissionTier, grant: Option<PermissionGrant>) -> Self {
        Self { tier, grant }
    }
}

/// Group record owned by the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalGroup {
    pub id: String,
    pub display_name: String,
    pub has_members: bool,
    /// Ids of the groups directly nested in this one.
    pub member_ids: BTreeSet<String>,
}

/// User record owned by the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Kind of directory filter configured on an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterKind {
    Group,
    User,
}

/// Organization-scoped directory query pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub organization_id: i64,
    pub kind: FilterKind,
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscribeType {
    Free,
    Forced,
}

/// Default subscriber of a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub context: ContextKey,
    pub subject: SubjectRef,
    pub subscribe_type: SubscribeType,
}

/// Tree node returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: String,
    pub display_name: String,
    /// Whether the node can be expanded with a member lookup.
    pub has_children: bool,
}

impl From<ExternalGroup> for GroupNode {
    fn from(group: ExternalGroup) -> Self {
        Self {
            id: group.id,
            display_name: group.display_name,
            has_children: group.has_members,
        }
    }
}
