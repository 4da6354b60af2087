// Privilege drop: become another user, supplementary groups included

use super::groups::GroupService;
use crate::domain::{Account, Username};
use crate::error::{AppError, Result};
use crate::port::ProcessIdentity;
use std::sync::Arc;
use tracing::{info, warn};

/// Switches the process to a target user account
///
/// Order matters: the gid and supplementary groups are changed while the
/// process still holds privilege, and setuid comes last.
pub struct PrivilegeService {
    identity: Arc<dyn ProcessIdentity>,
    groups: GroupService,
}

impl PrivilegeService {
    pub fn new(identity: Arc<dyn ProcessIdentity>, groups: GroupService) -> Self {
        Self { identity, groups }
    }

    /// Change the real uid, gid and supplementary groups to those of `name`
    ///
    /// Steps: lookup, setgid, initgroups, setuid, then confirm the new ids.
    /// Stops at the first failing step.
    ///
    /// # Errors
    /// - AppError::InvalidArgument if `name` is not a valid user name
    /// - AppError::UnknownUser if the password database has no such user
    /// - AppError::Os if any of the system calls fails
    /// - AppError::IdentityMismatch if the process did not end up as the target
    pub fn change_to_user(&self, name: &str) -> Result<Account> {
        let name = Username::new(name)?;

        let account = self
            .identity
            .lookup_user(&name)?
            .ok_or_else(|| AppError::UnknownUser(name.to_string()))?;

        info!(
            user = %account.name,
            uid = %account.uid,
            gid = %account.gid,
            "Switching to user"
        );

        self.identity.set_gid(account.gid)?;
        self.groups.initgroups(&account.name, account.gid)?;
        self.identity.set_uid(account.uid)?;

        let actual_uid = self.identity.current_uid();
        let actual_gid = self.identity.current_gid();
        if actual_uid != account.uid || actual_gid != account.gid {
            warn!(
                expected_uid = %account.uid,
                expected_gid = %account.gid,
                actual_uid = %actual_uid,
                actual_gid = %actual_gid,
                "Identity after switch does not match target"
            );
            return Err(AppError::IdentityMismatch {
                expected_uid: account.uid,
                expected_gid: account.gid,
                actual_uid,
                actual_gid,
            });
        }

        Ok(account)
    }
}
