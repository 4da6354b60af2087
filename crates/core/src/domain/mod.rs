// Domain Layer - Identity value types

pub mod error;
pub mod group;
pub mod user;

// Re-exports
pub use error::DomainError;
pub use group::{GroupId, GroupList};
pub use user::{Account, UserId, Username};
