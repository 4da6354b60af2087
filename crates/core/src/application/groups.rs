// Group-identity use cases: getgroups / setgroups / initgroups

use crate::domain::{GroupId, GroupList, Username};
use crate::error::Result;
use crate::port::GroupCredentials;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Group-identity adapter
///
/// Validates caller input, issues exactly one request against the
/// [`GroupCredentials`] port and reports the outcome. Input errors are raised
/// before the port is touched, so a rejected call never has a partial effect.
/// Nothing is retried.
#[derive(Clone)]
pub struct GroupService {
    credentials: Arc<dyn GroupCredentials>,
}

impl GroupService {
    pub fn new(credentials: Arc<dyn GroupCredentials>) -> Self {
        Self { credentials }
    }

    /// Current supplementary groups of the process
    ///
    /// The list is sized and filled in two steps by the adapter; if it grows
    /// in between, the OS error is returned as-is and the caller may retry.
    pub fn getgroups(&self) -> Result<GroupList> {
        match self.credentials.get_groups() {
            Ok(groups) => {
                debug!(count = groups.len(), groups = %groups, "Supplementary groups queried");
                Ok(groups)
            }
            Err(e) => {
                warn!(errno = e.errno, error = %e, "getgroups failed");
                Err(e.into())
            }
        }
    }

    /// Replace the supplementary groups with exactly `groups`
    pub fn setgroups(&self, groups: &GroupList) -> Result<()> {
        debug!(count = groups.len(), groups = %groups, "Setting supplementary groups");

        if let Err(e) = self.credentials.set_groups(groups) {
            warn!(errno = e.errno, error = %e, "setgroups failed");
            return Err(e.into());
        }

        info!(count = groups.len(), "Supplementary groups replaced");
        Ok(())
    }

    /// Replace the supplementary groups with those of `user`, plus `primary_gid`
    pub fn initgroups(&self, user: &Username, primary_gid: GroupId) -> Result<()> {
        debug!(user = %user, primary_gid = %primary_gid, "Initializing supplementary groups");

        if let Err(e) = self.credentials.init_groups(user, primary_gid) {
            warn!(user = %user, errno = e.errno, error = %e, "initgroups failed");
            return Err(e.into());
        }

        info!(user = %user, primary_gid = %primary_gid, "Supplementary groups initialized");
        Ok(())
    }

    /// `setgroups` from untyped items, e.g. command-line arguments
    ///
    /// # Returns
    /// The list that was applied
    ///
    /// # Errors
    /// - AppError::InvalidArgument if any item is not a group id; no syscall is made
    pub fn setgroups_from_args<S: AsRef<str>>(&self, items: &[S]) -> Result<GroupList> {
        let groups = GroupList::parse_all(items)?;
        self.setgroups(&groups)?;
        Ok(groups)
    }

    /// `setgroups` from a JSON array of integers, returning the applied list
    ///
    /// # Example
    /// ```text
    /// let applied = service.setgroups_from_json("[100, 200, 300]")?;
    /// ```
    pub fn setgroups_from_json(&self, document: &str) -> Result<GroupList> {
        let groups = GroupList::from_json(document)?;
        self.setgroups(&groups)?;
        Ok(groups)
    }

    /// `initgroups` from untyped arguments, returning them validated
    pub fn initgroups_from_args(&self, user: &str, primary_gid: &str) -> Result<(Username, GroupId)> {
        let user = Username::new(user)?;
        let primary_gid = GroupId::parse(primary_gid)?;
        self.initgroups(&user, primary_gid)?;
        Ok((user, primary_gid))
    }
}
