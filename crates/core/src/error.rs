// Central Error Type for the Application

use crate::domain::{GroupId, UserId};
use thiserror::Error;

/// Coarse failure category, stable for callers and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input could not be converted; nothing was sent to the OS
    InvalidArgument,
    /// The OS refused or failed the request
    OsFailure,
}

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] crate::domain::DomainError),

    #[error("OS error: {0}")]
    Os(#[from] crate::port::OsError),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Identity mismatch after switching user: expected uid={expected_uid} gid={expected_gid}, got uid={actual_uid} gid={actual_gid}")]
    IdentityMismatch {
        expected_uid: UserId,
        expected_gid: GroupId,
        actual_uid: UserId,
        actual_gid: GroupId,
    },
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AppError::Os(_) | AppError::UnknownUser(_) | AppError::IdentityMismatch { .. } => {
                ErrorKind::OsFailure
            }
        }
    }

    /// errno of the failed system call, if this error came from one
    pub fn errno(&self) -> Option<i32> {
        match self {
            AppError::Os(err) => Some(err.errno),
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
