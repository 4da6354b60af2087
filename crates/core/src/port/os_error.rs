// OS failure reported by a port implementation

use thiserror::Error;

/// A system call failed
///
/// Carries the raw errno so callers can tell permission problems from
/// resource limits or missing names. Never generalized into a string.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{operation} failed: {}", describe(.errno))]
pub struct OsError {
    pub operation: &'static str,
    pub errno: i32,
}

impl OsError {
    pub fn new(operation: &'static str, errno: i32) -> Self {
        Self { operation, errno }
    }

    /// Portable classification of the errno
    pub fn kind(&self) -> std::io::ErrorKind {
        std::io::Error::from_raw_os_error(self.errno).kind()
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind() == std::io::ErrorKind::PermissionDenied
    }
}

fn describe(errno: &i32) -> std::io::Error {
    std::io::Error::from_raw_os_error(*errno)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_operation_and_errno() {
        let err = OsError::new("setgroups", 1);
        let text = err.to_string();
        assert!(text.starts_with("setgroups failed: "));
        assert!(text.contains("os error 1"));
    }

    #[test]
    fn test_eperm_is_permission_denied() {
        assert!(OsError::new("initgroups", 1).is_permission_denied());
        assert!(!OsError::new("getgroups", 22).is_permission_denied());
    }
}
