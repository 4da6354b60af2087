// Process identity port
// Password database lookup plus setuid(2) / setgid(2)

use super::os_error::OsError;
use crate::domain::{Account, GroupId, UserId, Username};

/// Real user/group identity of the calling process
pub trait ProcessIdentity: Send + Sync {
    /// Resolve `name` through the password database
    ///
    /// # Returns
    /// `Ok(None)` when no such user exists
    fn lookup_user(&self, name: &Username) -> Result<Option<Account>, OsError>;

    fn set_gid(&self, gid: GroupId) -> Result<(), OsError>;

    fn set_uid(&self, uid: UserId) -> Result<(), OsError>;

    fn current_uid(&self) -> UserId;

    fn current_gid(&self) -> GroupId;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::port::group_credentials::mocks::{Journal, EPERM};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct MockState {
        uid: UserId,
        gid: GroupId,
        accounts: HashMap<String, Account>,
        // uid/gid actually installed by set_uid/set_gid, when they lie
        uid_override: Option<UserId>,
        gid_override: Option<GroupId>,
    }

    /// In-memory process identity, starting as root
    pub struct MockProcessIdentity {
        state: Mutex<MockState>,
        journal: Journal,
    }

    impl MockProcessIdentity {
        pub fn new(uid: u32, gid: u32) -> Self {
            Self {
                state: Mutex::new(MockState {
                    uid: UserId::new(uid),
                    gid: GroupId::new(gid),
                    accounts: HashMap::new(),
                    uid_override: None,
                    gid_override: None,
                }),
                journal: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn root() -> Self {
            Self::new(0, 0)
        }

        pub fn with_journal(mut self, journal: Journal) -> Self {
            self.journal = journal;
            self
        }

        pub fn with_account(self, name: &str, uid: u32, gid: u32) -> Self {
            let account = Account::new(
                Username::new(name).unwrap(),
                UserId::new(uid),
                GroupId::new(gid),
            );
            self.state
                .lock()
                .unwrap()
                .accounts
                .insert(name.to_string(), account);
            self
        }

        /// Make set_uid report success but install `uid` instead
        pub fn misreport_uid(&self, uid: u32) {
            self.state.lock().unwrap().uid_override = Some(UserId::new(uid));
        }

        /// Make set_gid report success but install `gid` instead
        pub fn misreport_gid(&self, gid: u32) {
            self.state.lock().unwrap().gid_override = Some(GroupId::new(gid));
        }

        fn record(&self, entry: String) {
            self.journal.lock().unwrap().push(entry);
        }
    }

    impl ProcessIdentity for MockProcessIdentity {
        fn lookup_user(&self, name: &Username) -> Result<Option<Account>, OsError> {
            Ok(self.state.lock().unwrap().accounts.get(name.as_str()).cloned())
        }

        fn set_gid(&self, gid: GroupId) -> Result<(), OsError> {
            self.record(format!("setgid {}", gid));
            let mut state = self.state.lock().unwrap();
            if !state.uid.is_root() && state.gid != gid {
                return Err(OsError::new("setgid", EPERM));
            }
            state.gid = state.gid_override.take().unwrap_or(gid);
            Ok(())
        }

        fn set_uid(&self, uid: UserId) -> Result<(), OsError> {
            self.record(format!("setuid {}", uid));
            let mut state = self.state.lock().unwrap();
            if !state.uid.is_root() && state.uid != uid {
                return Err(OsError::new("setuid", EPERM));
            }
            state.uid = state.uid_override.take().unwrap_or(uid);
            Ok(())
        }

        fn current_uid(&self) -> UserId {
            self.state.lock().unwrap().uid
        }

        fn current_gid(&self) -> GroupId {
            self.state.lock().unwrap().gid
        }
    }
}
