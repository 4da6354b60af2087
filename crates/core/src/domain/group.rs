// Group Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// POSIX group id
///
/// Stored as `u32`, the width of `gid_t` on every supported target. Inputs
/// are parsed as wide signed integers and range-checked so that values that
/// do not fit are rejected instead of truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u32);

impl GroupId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Parse a group id from caller-supplied text
    ///
    /// # Example
    /// ```
    /// use credgroups_core::domain::GroupId;
    ///
    /// assert_eq!(GroupId::parse("100").unwrap().as_raw(), 100);
    /// assert!(GroupId::parse("wheel").is_err());
    /// assert!(GroupId::parse("-1").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let wide: i64 = text.trim().parse().map_err(|_| DomainError::InvalidGroupId {
            value: text.to_string(),
            reason: "not an integer".to_string(),
        })?;
        Self::try_from(wide)
    }
}

impl TryFrom<i64> for GroupId {
    type Error = DomainError;

    fn try_from(wide: i64) -> Result<Self> {
        u32::try_from(wide)
            .map(Self)
            .map_err(|_| DomainError::InvalidGroupId {
                value: wide.to_string(),
                reason: format!("out of range 0..={}", u32::MAX),
            })
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered sequence of group ids (the process's supplementary group list)
///
/// Order is kept as given, but the OS does not promise to preserve it, so
/// comparisons against what the OS reports should use [`GroupList::same_members`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupList(Vec<GroupId>);

impl GroupList {
    pub fn new(ids: Vec<GroupId>) -> Self {
        Self(ids)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parse every item, aborting on the first one that is not a group id
    pub fn parse_all<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .map(|item| GroupId::parse(item.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Parse a JSON document that must be an array of integers
    ///
    /// # Example
    /// ```
    /// use credgroups_core::domain::GroupList;
    ///
    /// let list = GroupList::from_json("[100, 200, 300]").unwrap();
    /// assert_eq!(list.len(), 3);
    /// assert!(GroupList::from_json("{\"gid\": 1}").is_err());
    /// assert!(GroupList::from_json("[1, \"two\"]").is_err());
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| DomainError::InvalidGroupList(format!("malformed JSON: {}", e)))?;

        let items = value.as_array().ok_or_else(|| {
            DomainError::InvalidGroupList(format!("expected an array, got {}", json_kind(&value)))
        })?;

        items
            .iter()
            .map(|item| match (item.as_i64(), item.as_u64()) {
                (Some(wide), _) => GroupId::try_from(wide),
                (None, Some(huge)) => Err(DomainError::InvalidGroupId {
                    value: huge.to_string(),
                    reason: format!("out of range 0..={}", u32::MAX),
                }),
                (None, None) => Err(DomainError::InvalidGroupId {
                    value: item.to_string(),
                    reason: "not an integer".to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupId> {
        self.0.iter()
    }

    pub fn contains(&self, gid: GroupId) -> bool {
        self.0.contains(&gid)
    }

    /// Set equality, ignoring order and duplicates
    pub fn same_members(&self, other: &GroupList) -> bool {
        self.members() == other.members()
    }

    pub fn members(&self) -> BTreeSet<GroupId> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<GroupId> for GroupList {
    fn from_iter<T: IntoIterator<Item = GroupId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for GroupList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|gid| gid.to_string()).collect();
        write!(f, "{}", joined.join(" "))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
