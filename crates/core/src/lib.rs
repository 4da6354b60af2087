// credgroups Core - Domain Logic & Ports
// NO system dependencies: syscalls live behind the ports in infra-system

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, ErrorKind, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
