//! Group Visibility Module
//!
//! Resolves which externally managed groups a principal may browse from a
//! context, and flattens the result so nested subgroups are not shown twice.
//!
//! ## Architecture
//!
//! - **Permission resolution**: picks the effective (tier, grant) pair across
//!   a primary context and its fallback sub-contexts
//! - **Visibility resolution**: turns that pair into a set of group ids via
//!   directory filters, explicit allow-lists or default subscribers
//! - **Flattening**: keeps only the groups no other returned group contains
//!
//! Backends (directory, stores) are supplied by plugins through the traits
//! in `group-visibility-sdk`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Re-export SDK types
pub use group_visibility_sdk::*;

pub mod config;
#[doc(hidden)]
pub mod domain;

pub use config::GroupVisibilityConfig;
pub use domain::{Backends, LocalClient, Service};
