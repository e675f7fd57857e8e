//! Domain layer for group visibility.

pub mod error;
pub mod flatten;
pub mod local_client;
pub mod permission;
pub mod service;


pub use error::DomainError;
pub use flatten::flatten_roots;
pub use local_client::LocalClient;
pub use permission::{PermissionResolver, ResolvedPermission};
pub use service::{Backends, Service};
