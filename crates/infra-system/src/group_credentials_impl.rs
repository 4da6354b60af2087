// Supplementary group adapter
// reason: libc for the raw two-step getgroups, nix for setgroups/initgroups
use nix::errno::Errno;
use nix::unistd::Gid;
use std::ffi::CString;
use tracing::{debug, warn};

use credgroups_core::domain::{GroupId, GroupList, Username};
use credgroups_core::port::group_credentials::GroupCredentials;
use credgroups_core::port::OsError;

/// GroupCredentials backed by the real process credentials
///
/// Stateless: every call goes straight to the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct NixGroupCredentials;

impl NixGroupCredentials {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn os_error(operation: &'static str, errno: Errno) -> OsError {
    OsError::new(operation, errno as i32)
}

/// Two-step getgroups: size with a zero-length query, then fill a buffer of
/// exactly that size. `getgroups` has the libc signature and errno contract.
///
/// A change of the group list between the two calls is reported, never
/// retried: a shrink truncates, a growth fails with the OS errno (EINVAL).
fn size_then_fill(
    mut getgroups: impl FnMut(libc::c_int, *mut libc::gid_t) -> libc::c_int,
) -> Result<GroupList, OsError> {
    // Step 1: ask for the count only
    let count = getgroups(0, std::ptr::null_mut());
    if count < 0 {
        return Err(os_error("getgroups", Errno::last()));
    }

    // Step 2: fill a buffer of exactly that size. The Vec owns the memory,
    // so it is released on every return below.
    let mut buffer: Vec<libc::gid_t> = vec![0; count as usize];
    let filled = getgroups(count, buffer.as_mut_ptr());
    if filled < 0 {
        // Typically EINVAL: the list grew past `count` in between
        let errno = Errno::last();
        warn!(sized_for = count, errno = %errno, "Group list changed while querying");
        return Err(os_error("getgroups", errno));
    }

    // With a zero size the second call only reports the new count and
    // writes nothing, so a count above the buffer is the same race.
    let filled = filled as usize;
    if filled > buffer.len() {
        warn!(sized_for = count, reported = filled, "Group list grew while querying");
        return Err(os_error("getgroups", Errno::EINVAL));
    }
    buffer.truncate(filled);

    debug!(count = filled, "getgroups completed");
    Ok(buffer.into_iter().map(GroupId::new).collect())
}

impl GroupCredentials for NixGroupCredentials {
    fn get_groups(&self) -> Result<GroupList, OsError> {
        // SAFETY: size_then_fill passes either a zero size or a pointer to
        // `size` writable gid_t slots
        size_then_fill(|size, list| unsafe { libc::getgroups(size, list) })
    }

    fn set_groups(&self, groups: &GroupList) -> Result<(), OsError> {
        let gids: Vec<Gid> = groups.iter().map(|gid| Gid::from_raw(gid.as_raw())).collect();

        nix::unistd::setgroups(&gids).map_err(|errno| os_error("setgroups", errno))?;

        debug!(count = gids.len(), "setgroups completed");
        Ok(())
    }

    fn init_groups(&self, user: &Username, primary_gid: GroupId) -> Result<(), OsError> {
        let c_user =
            CString::new(user.as_str()).map_err(|_| os_error("initgroups", Errno::EINVAL))?;

        nix::unistd::initgroups(&c_user, Gid::from_raw(primary_gid.as_raw()))
            .map_err(|errno| os_error("initgroups", errno))?;

        debug!(user = %user, primary_gid = %primary_gid, "initgroups completed");
        Ok(())
    }
}
