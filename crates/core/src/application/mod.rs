// Application Layer - Use Cases

pub mod groups;
pub mod privilege;

// Re-exports
pub use groups::GroupService;
pub use privilege::PrivilegeService;
