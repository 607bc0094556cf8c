//! Quota service
//!
//! Resolves a user's groups and usage through the collaborator traits and
//! runs the evaluation engine on them.

use std::sync::Arc;

use forgejo_quota_common::{QuotaError, Result};
use forgejo_quota_core::{GroupList, LimitSubject, Used};

use crate::config::QuotaSettings;
use crate::source::{QuotaGroupSource, UsageSource};

#[derive(Clone)]
pub struct QuotaService {
    settings: QuotaSettings,
    groups: Arc<dyn QuotaGroupSource>,
    usage: Arc<dyn UsageSource>,
}

impl QuotaService {
    pub fn new(
        settings: QuotaSettings,
        groups: Arc<dyn QuotaGroupSource>,
        usage: Arc<dyn UsageSource>,
    ) -> Self {
        Self {
            settings,
            groups,
            usage,
        }
    }

    pub fn settings(&self) -> &QuotaSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Groups that apply to the user
    ///
    /// Users mapped to no group get the configured default groups. An empty
    /// result means the instance default policy applies.
    pub async fn groups_for_user(&self, user_id: i64) -> Result<GroupList> {
        let groups = self.groups.groups_for_user(user_id).await?;
        if !groups.is_empty() || self.settings.default_groups.is_empty() {
            return Ok(groups);
        }

        let defaults = self
            .groups
            .groups_by_name(&self.settings.default_groups)
            .await?;
        if defaults.len() < self.settings.default_groups.len() {
            let found = defaults.names();
            let missing: Vec<&str> = self
                .settings
                .default_groups
                .iter()
                .map(String::as_str)
                .filter(|name| !found.contains(name))
                .collect();
            tracing::warn!(?missing, "configured default quota groups not found");
        }

        Ok(defaults)
    }

    /// Whether the user's current usage is within quota for `subject`
    pub async fn evaluate_for_user(&self, user_id: i64, subject: LimitSubject) -> Result<bool> {
        if !self.is_enabled() {
            return Ok(true);
        }

        let used = self.usage.used_for_user(user_id).await?;
        self.evaluate_used(user_id, &used, subject).await
    }

    /// Check that the user may consume `additional_bytes` more of `subject`
    ///
    /// With `additional_bytes == 0` the current usage is checked as-is, which
    /// also works for subjects without a usage counter of their own.
    /// A negative `additional_bytes` is rejected with `NegativeBytes`.
    pub async fn check_for_user(
        &self,
        user_id: i64,
        subject: LimitSubject,
        additional_bytes: i64,
    ) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut used = self.usage.used_for_user(user_id).await?;
        if additional_bytes != 0 {
            used.add(subject, additional_bytes)?;
        }

        if self.evaluate_used(user_id, &used, subject).await? {
            return Ok(());
        }

        tracing::warn!(
            user_id,
            %subject,
            additional_bytes,
            used = used.calculate_for(subject),
            "quota exceeded"
        );
        Err(QuotaError::QuotaExceeded {
            user_id,
            subject: subject.to_string(),
        })
    }

    async fn evaluate_used(&self, user_id: i64, used: &Used, subject: LimitSubject) -> Result<bool> {
        let groups = self.groups_for_user(user_id).await?;
        let allowed = groups.evaluate(used, subject, &self.settings.default);

        tracing::debug!(
            user_id,
            %subject,
            groups = ?groups.names(),
            allowed,
            "quota evaluated"
        );

        Ok(allowed)
    }
}
