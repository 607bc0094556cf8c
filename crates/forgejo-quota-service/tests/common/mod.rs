//! Common test utilities for quota service tests
//!
//! This module provides an in-memory stand-in for the group and usage
//! collaborators a host would normally back with its database.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use forgejo_quota_core::{Group, GroupList, Used};
use forgejo_quota_service::{QuotaGroupSource, QuotaService, QuotaSettings, UsageSource};

#[derive(Default)]
pub struct MemorySource {
    pub groups: HashMap<String, Group>,
    pub memberships: HashMap<i64, Vec<String>>,
    pub usage: HashMap<i64, Used>,
    pub failing: bool,
    pub usage_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MemorySource {
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.insert(group.name.clone(), group);
        self
    }

    pub fn with_member(mut self, user_id: i64, group: &str) -> Self {
        self.memberships
            .entry(user_id)
            .or_default()
            .push(group.to_string());
        self
    }

    pub fn with_usage(mut self, user_id: i64, used: Used) -> Self {
        self.usage.insert(user_id, used);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    fn resolve(&self, names: &[String]) -> GroupList {
        names
            .iter()
            .filter_map(|name| self.groups.get(name).cloned())
            .collect()
    }
}

#[async_trait]
impl QuotaGroupSource for MemorySource {
    async fn groups_for_user(&self, user_id: i64) -> anyhow::Result<GroupList> {
        if self.failing {
            anyhow::bail!("group store unavailable");
        }
        Ok(self
            .memberships
            .get(&user_id)
            .map(|names| self.resolve(names))
            .unwrap_or_default())
    }

    async fn groups_by_name(&self, names: &[String]) -> anyhow::Result<GroupList> {
        if self.failing {
            anyhow::bail!("group store unavailable");
        }
        Ok(self.resolve(names))
    }
}

#[async_trait]
impl UsageSource for MemorySource {
    async fn used_for_user(&self, user_id: i64) -> anyhow::Result<Used> {
        self.usage_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            anyhow::bail!("usage aggregation failed");
        }
        Ok(self.usage.get(&user_id).copied().unwrap_or_default())
    }
}

pub fn service(settings: QuotaSettings, source: MemorySource) -> (QuotaService, Arc<MemorySource>) {
    let source = Arc::new(source);
    let service = QuotaService::new(settings, source.clone(), source.clone());
    (service, source)
}

pub fn enabled() -> QuotaSettings {
    QuotaSettings {
        enabled: true,
        ..Default::default()
    }
}
