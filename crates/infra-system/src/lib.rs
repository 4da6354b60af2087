// credgroups Infrastructure - System Adapters
// Implements: GroupCredentials, ProcessIdentity

#[cfg(unix)]
pub mod group_credentials_impl;
#[cfg(unix)]
pub mod process_identity_impl;

#[cfg(unix)]
pub use group_credentials_impl::NixGroupCredentials;
#[cfg(unix)]
pub use process_identity_impl::NixProcessIdentity;
