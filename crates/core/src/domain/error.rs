// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid group id {value:?}: {reason}")]
    InvalidGroupId { value: String, reason: String },

    #[error("Invalid group list: {0}")]
    InvalidGroupList(String),

    #[error("Invalid user name {value:?}: {reason}")]
    InvalidUsername { value: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;
