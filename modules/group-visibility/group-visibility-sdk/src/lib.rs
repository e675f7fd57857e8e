//! Group Visibility SDK
//!
//! This crate provides the public API for the `group-visibility` module:
//!
//! - [`GroupVisibilityClient`] - Public API trait for consumers
//! - [`DirectoryClient`], [`FilterStore`], [`SubscriberStore`],
//!   [`ContextHierarchy`], [`PermissionStore`] - Backend traits for plugins
//! - Domain models for contexts, permissions and directory groups
//! - [`GroupVisibilityError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use group_visibility_sdk::{GroupVisibilityClient, Principal, RawContextKey};
//!
//! let roots = client
//!     .list_visible_groups(&Principal::new("jdoe"), primary, &[])
//!     .await?;
//! ```
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod backend_api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::GroupVisibilityClient;
pub use backend_api::{
    ContextHierarchy, DirectoryClient, FilterStore, PermissionStore, SubscriberStore,
};
pub use error::GroupVisibilityError;
pub use models::{
    ContextKey, ContextType, EffectivePermission, ExternalGroup, Filter, FilterKind, GroupNode,
    PermissionGrant, PermissionTier, Principal, RawContextKey, SubjectRef, SubjectType,
    SubscribeType, Subscriber, UserRef,
};
