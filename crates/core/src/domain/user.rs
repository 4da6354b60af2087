// User Domain Model

use super::error::{DomainError, Result};
use super::group::GroupId;
use serde::{Deserialize, Serialize};

/// User name as handed to the system group database
///
/// Only checked for being non-empty and free of NUL bytes, since it has to
/// cross into a C string. Whether the user exists is the OS's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidUsername {
                value: name,
                reason: "must not be empty".to_string(),
            });
        }
        if name.contains('\0') {
            return Err(DomainError::InvalidUsername {
                value: name,
                reason: "must not contain NUL bytes".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<Username> for String {
    fn from(name: Username) -> Self {
        name.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// POSIX user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u32);

impl UserId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u32 {
        self.0
    }

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Password database entry, reduced to what a privilege drop needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: Username,
    pub uid: UserId,
    pub gid: GroupId,
}

impl Account {
    pub fn new(name: Username, uid: UserId, gid: GroupId) -> Self {
        Self { name, uid, gid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert_eq!(Username::new("daemon").unwrap().as_str(), "daemon");

        let err = Username::new("").unwrap_err();
        assert!(err.to_string().contains("empty"));

        let err = Username::new("ro\0ot").unwrap_err();
        assert!(err.to_string().contains("NUL"));
    }

    #[test]
    fn test_username_deserialize_validates() {
        let ok: Username = serde_json::from_str("\"nobody\"").unwrap();
        assert_eq!(ok.to_string(), "nobody");
        assert!(serde_json::from_str::<Username>("\"\"").is_err());
    }

    #[test]
    fn test_account_serializes_flat_ids() {
        let account = Account::new(Username::new("www").unwrap(), UserId::new(33), GroupId::new(33));
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json, serde_json::json!({"name": "www", "uid": 33, "gid": 33}));
        assert!(!account.uid.is_root());
    }
}
