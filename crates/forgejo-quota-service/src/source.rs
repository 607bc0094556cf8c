//! Collaborator traits
//!
//! The quota engine does not store rules or measure repositories itself.
//! Hosts plug their storage and usage aggregation in through these traits.

use async_trait::async_trait;

use forgejo_quota_core::{GroupList, Used};

/// Lookup of quota groups, with their rules loaded
#[async_trait]
pub trait QuotaGroupSource: Send + Sync {
    /// Groups the user is mapped to
    async fn groups_for_user(&self, user_id: i64) -> anyhow::Result<GroupList>;

    /// Groups with the given names; names without a group are skipped
    async fn groups_by_name(&self, names: &[String]) -> anyhow::Result<GroupList>;
}

/// Aggregation of the storage a user currently consumes
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn used_for_user(&self, user_id: i64) -> anyhow::Result<Used>;
}
