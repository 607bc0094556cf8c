//! Forgejo Quota Common - Shared types and utilities
//!
//! This crate provides the foundational pieces used by the quota crates:
//! - Error types and error codes
//! - Human readable size parsing for configured limits
//! - Common constants

pub mod error;
pub mod size;

// Re-exports for convenience
pub use error::{ErrorCode, QuotaError, Result};
pub use size::{format_size, parse_size};

/// Limit value meaning "no limit at all"
pub const UNLIMITED: i64 = -1;

/// Name of the group evaluated when a user belongs to no quota group
pub const BUILTIN_DEFAULT_GROUP: &str = "builtin-default-group";

/// Name of the single rule inside the built-in default group
pub const BUILTIN_DEFAULT_RULE: &str = "builtin-default-rule";
