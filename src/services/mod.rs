//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - The approval backend and its JSON file implementation
//! - Remote fault messages
//! - Background job execution
//! - Preference storage
//! - Browser navigation

pub mod backend;
pub mod error;
pub mod job_runner;
pub mod navigation;
pub mod storage;

pub use backend::{ApprovalBackend, ApprovalSettings, JsonFileBackend};
pub use error::{build_error_message, RemoteFault};
pub use job_runner::{JobMessage, JobRunner};
pub use navigation::Navigator;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
