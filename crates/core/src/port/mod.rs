// Port Layer - Interfaces for the operating system

pub mod group_credentials;
pub mod os_error;
pub mod process_identity;

// Re-exports
pub use group_credentials::GroupCredentials;
pub use os_error::OsError;
pub use process_identity::ProcessIdentity;
