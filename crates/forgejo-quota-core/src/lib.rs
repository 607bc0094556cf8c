//! Forgejo Quota Core - Quota rule evaluation
//!
//! This crate provides the pure evaluation engine:
//! - `LimitSubject`: the tree of storage categories
//! - `Used`: a snapshot of bytes used per category
//! - `Rule`: a pooled limit over a set of subjects
//! - `Group` / `GroupList`: rule bundles and the groups of one user
//! - `DefaultQuota`: the instance fallback for users without groups
//!
//! Evaluation never fails and never mutates its inputs; all types are plain
//! values that can be shared across threads.

pub mod default;
pub mod group;
pub mod rule;
pub mod subject;
pub mod used;

// Re-exports for convenience
pub use default::{DefaultQuota, evaluate_default};
pub use group::{Group, GroupList};
pub use rule::{Rule, Verdict};
pub use subject::{LimitSubject, LimitSubjects};
pub use used::{
    Used, UsedSize, UsedSizeAssets, UsedSizeAssetsAttachments, UsedSizeAssetsPackages,
    UsedSizeGit, UsedSizeRepos,
};

pub use forgejo_quota_common::{QuotaError, UNLIMITED};
