//! Forgejo Quota Service - Configuration and user-level quota checks
//!
//! This crate provides:
//! - Quota settings loaded with the `config` crate
//! - Collaborator traits for group lookup and usage aggregation
//! - `QuotaService`, the entry point call sites use to check a user

pub mod config;
pub mod service;
pub mod source;

// Re-exports for convenience
pub use crate::config::{Configuration, QuotaSettings};
pub use service::QuotaService;
pub use source::{QuotaGroupSource, UsageSource};
