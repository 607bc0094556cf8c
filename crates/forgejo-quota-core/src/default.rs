//! Instance default policy
//!
//! Users without any quota group are evaluated against a built-in group with
//! a single `size:all` rule. Every subject falls back to `size:all`, so the
//! configured total bounds every kind of storage.

use serde::{Deserialize, Serialize};

use forgejo_quota_common::{BUILTIN_DEFAULT_GROUP, BUILTIN_DEFAULT_RULE, UNLIMITED};

use crate::group::{Group, GroupList};
use crate::rule::Rule;
use crate::subject::{LimitSubject, LimitSubjects};
use crate::used::Used;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultQuota {
    /// Total bytes a groupless user may use, `-1` for unlimited
    #[serde(default = "DefaultQuota::default_total")]
    pub total: i64,
}

impl DefaultQuota {
    pub fn new(total: i64) -> Self {
        Self { total }
    }

    pub fn unlimited() -> Self {
        Self::new(UNLIMITED)
    }

    fn default_total() -> i64 {
        UNLIMITED
    }

    pub fn builtin_groups(&self) -> GroupList {
        let rule = Rule {
            name: BUILTIN_DEFAULT_RULE.to_string(),
            limit: self.total,
            subjects: LimitSubjects::from([LimitSubject::SizeAll]),
        };
        GroupList::from(vec![Group::with_rules(BUILTIN_DEFAULT_GROUP, vec![rule])])
    }

    pub fn evaluate(&self, used: &Used, subject: LimitSubject) -> bool {
        self.builtin_groups().evaluate_groups(used, subject)
    }
}

impl Default for DefaultQuota {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Evaluate `subject` against the instance default policy
pub fn evaluate_default(used: &Used, subject: LimitSubject, defaults: &DefaultQuota) -> bool {
    defaults.evaluate(used, subject)
}
