// Supplementary group port
// Abstraction over getgroups(2) / setgroups(2) / initgroups(3)

use super::os_error::OsError;
use crate::domain::{GroupId, GroupList, Username};

/// Access to the calling process's supplementary group list
///
/// Implementations:
/// - NixGroupCredentials: real syscalls (infra-system)
/// - MockGroupCredentials: in-memory, for tests
///
/// Every method is one synchronous request against the OS. Implementations
/// must not retry, and must surface the errno of a failed call unchanged.
pub trait GroupCredentials: Send + Sync {
    /// Current supplementary groups of the process
    ///
    /// # Errors
    /// - OsError if the OS rejects the query (e.g. EINVAL when the list grew
    ///   between sizing and filling the buffer)
    fn get_groups(&self) -> Result<GroupList, OsError>;

    /// Replace the supplementary groups with exactly `groups`
    ///
    /// # Errors
    /// - OsError with EPERM without privilege, EINVAL when the list is too long
    fn set_groups(&self, groups: &GroupList) -> Result<(), OsError>;

    /// Replace the supplementary groups with the groups `user` belongs to,
    /// plus `primary_gid`
    fn init_groups(&self, user: &Username, primary_gid: GroupId) -> Result<(), OsError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    pub const EPERM: i32 = 1;
    pub const ENOENT: i32 = 2;
    pub const EINVAL: i32 = 22;

    /// Shared call log, so tests can assert ordering across several mocks
    pub type Journal = Arc<Mutex<Vec<String>>>;

    struct MockState {
        groups: GroupList,
        privileged: bool,
        max_groups: usize,
        membership: HashMap<String, Vec<GroupId>>,
        fail_next_get: Option<i32>,
    }

    /// In-memory group credential table
    pub struct MockGroupCredentials {
        state: Mutex<MockState>,
        journal: Journal,
    }

    impl MockGroupCredentials {
        pub fn new(initial: GroupList, privileged: bool) -> Self {
            Self {
                state: Mutex::new(MockState {
                    groups: initial,
                    privileged,
                    max_groups: 65536,
                    membership: HashMap::new(),
                    fail_next_get: None,
                }),
                journal: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_journal(mut self, journal: Journal) -> Self {
            self.journal = journal;
            self
        }

        pub fn with_max_groups(self, max_groups: usize) -> Self {
            self.state.lock().unwrap().max_groups = max_groups;
            self
        }

        /// Register `user` as a member of `groups` in the mock group database
        pub fn with_member(self, user: &str, groups: &[u32]) -> Self {
            self.state
                .lock()
                .unwrap()
                .membership
                .insert(user.to_string(), groups.iter().copied().map(GroupId::new).collect());
            self
        }

        /// Make the next `get_groups` fail, as if the list grew mid-query
        pub fn fail_next_get(&self, errno: i32) {
            self.state.lock().unwrap().fail_next_get = Some(errno);
        }

        pub fn set_privileged(&self, privileged: bool) {
            self.state.lock().unwrap().privileged = privileged;
        }

        pub fn snapshot(&self) -> GroupList {
            self.state.lock().unwrap().groups.clone()
        }

        pub fn journal(&self) -> Vec<String> {
            self.journal.lock().unwrap().clone()
        }

        fn record(&self, entry: String) {
            self.journal.lock().unwrap().push(entry);
        }
    }

    impl GroupCredentials for MockGroupCredentials {
        fn get_groups(&self) -> Result<GroupList, OsError> {
            let mut state = self.state.lock().unwrap();
            if let Some(errno) = state.fail_next_get.take() {
                return Err(OsError::new("getgroups", errno));
            }
            Ok(state.groups.clone())
        }

        fn set_groups(&self, groups: &GroupList) -> Result<(), OsError> {
            self.record(format!("setgroups {}", groups));
            let mut state = self.state.lock().unwrap();
            if !state.privileged {
                return Err(OsError::new("setgroups", EPERM));
            }
            if groups.len() > state.max_groups {
                return Err(OsError::new("setgroups", EINVAL));
            }
            state.groups = groups.clone();
            Ok(())
        }

        fn init_groups(&self, user: &Username, primary_gid: GroupId) -> Result<(), OsError> {
            self.record(format!("initgroups {} {}", user, primary_gid));
            let mut state = self.state.lock().unwrap();
            if !state.privileged {
                return Err(OsError::new("initgroups", EPERM));
            }
            let members = state
                .membership
                .get(user.as_str())
                .cloned()
                .ok_or(OsError::new("initgroups", ENOENT))?;

            let mut groups = vec![primary_gid];
            groups.extend(members.into_iter().filter(|gid| *gid != primary_gid));
            if groups.len() > state.max_groups {
                return Err(OsError::new("initgroups", EINVAL));
            }
            state.groups = GroupList::new(groups);
            Ok(())
        }
    }
}
