// Process identity adapter
// reason: nix for getpwnam_r / setuid / setgid
use nix::unistd::{self, Gid, Uid, User};
use tracing::debug;

use credgroups_core::domain::{Account, GroupId, UserId, Username};
use credgroups_core::port::process_identity::ProcessIdentity;
use credgroups_core::port::OsError;

use crate::group_credentials_impl::os_error;

/// ProcessIdentity backed by the password database and the real ids
#[derive(Debug, Default, Clone, Copy)]
pub struct NixProcessIdentity;

impl NixProcessIdentity {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessIdentity for NixProcessIdentity {
    fn lookup_user(&self, name: &Username) -> Result<Option<Account>, OsError> {
        let user = User::from_name(name.as_str()).map_err(|errno| os_error("getpwnam", errno))?;

        debug!(user = %name, found = user.is_some(), "Password database lookup");

        Ok(user.map(|user| {
            Account::new(
                name.clone(),
                UserId::new(user.uid.as_raw()),
                GroupId::new(user.gid.as_raw()),
            )
        }))
    }

    fn set_gid(&self, gid: GroupId) -> Result<(), OsError> {
        unistd::setgid(Gid::from_raw(gid.as_raw())).map_err(|errno| os_error("setgid", errno))
    }

    fn set_uid(&self, uid: UserId) -> Result<(), OsError> {
        unistd::setuid(Uid::from_raw(uid.as_raw())).map_err(|errno| os_error("setuid", errno))
    }

    fn current_uid(&self) -> UserId {
        UserId::new(unistd::getuid().as_raw())
    }

    fn current_gid(&self) -> GroupId {
        GroupId::new(unistd::getgid().as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_root() {
        let identity = NixProcessIdentity::new();
        let root = identity
            .lookup_user(&Username::new("root").unwrap())
            .unwrap()
            .expect("root is always in the password database");

        assert!(root.uid.is_root());
        assert_eq!(root.name.as_str(), "root");
    }

    #[test]
    fn test_lookup_missing_user() {
        let identity = NixProcessIdentity::new();
        let missing = identity
            .lookup_user(&Username::new("nonexistent_user_xyz").unwrap())
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_current_ids_match_nix() {
        let identity = NixProcessIdentity::new();
        assert_eq!(identity.current_uid().as_raw(), unistd::getuid().as_raw());
        assert_eq!(identity.current_gid().as_raw(), unistd::getgid().as_raw());
    }
}
