//! Quota rules
//!
//! A rule pairs a byte limit with the subjects it governs. The limit is
//! pooled: consumption of any listed subject draws from the same budget.

use serde::{Deserialize, Serialize};

use forgejo_quota_common::{QuotaError, Result, UNLIMITED};

use crate::subject::{LimitSubject, LimitSubjects};
use crate::used::Used;

/// Outcome of evaluating a rule or group for one subject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Whether any rule covers the subject
    pub matched: bool,
    /// Whether the covering rules allow the action; false when unmatched
    pub allowed: bool,
}

impl Verdict {
    pub const NO_MATCH: Verdict = Verdict {
        matched: false,
        allowed: false,
    };
    pub const ALLOW: Verdict = Verdict {
        matched: true,
        allowed: true,
    };
    pub const DENY: Verdict = Verdict {
        matched: true,
        allowed: false,
    };

    pub fn is_allowed(&self) -> bool {
        self.matched && self.allowed
    }

    pub fn is_denied(&self) -> bool {
        self.matched && !self.allowed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub limit: i64,
    #[serde(default)]
    pub subjects: LimitSubjects,
}

fn validate_limit(limit: i64) -> Result<i64> {
    if limit < UNLIMITED {
        return Err(QuotaError::InvalidLimit(limit));
    }
    Ok(limit)
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        limit: i64,
        subjects: impl Into<LimitSubjects>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            limit: validate_limit(limit)?,
            subjects: subjects.into(),
        })
    }

    pub fn unlimited(name: impl Into<String>, subjects: impl Into<LimitSubjects>) -> Self {
        Self {
            name: name.into(),
            limit: UNLIMITED,
            subjects: subjects.into(),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit == UNLIMITED
    }

    /// Replace the limit and/or the subjects, leaving `None` fields as they are
    pub fn edit(&mut self, limit: Option<i64>, subjects: Option<LimitSubjects>) -> Result<&Self> {
        if let Some(limit) = limit {
            self.limit = validate_limit(limit)?;
        }
        if let Some(subjects) = subjects {
            self.subjects = subjects;
        }
        Ok(self)
    }

    /// Pooled usage across every subject of this rule
    pub fn sum(&self, used: &Used) -> i64 {
        self.subjects
            .iter()
            .fold(0i64, |sum, subject| sum.saturating_add(used.calculate_for(subject)))
    }

    /// Whether the current usage fits the limit, inclusive of the limit itself
    pub fn acceptable(&self, used: &Used) -> bool {
        self.is_unlimited() || self.sum(used) <= self.limit
    }

    /// Evaluate the rule for `subject`
    ///
    /// A subject the rule does not list is looked up through its ancestors.
    /// Usage must stay strictly below the limit: callers pass usage that
    /// already includes the consumption being checked.
    pub fn evaluate(&self, used: &Used, subject: LimitSubject) -> Verdict {
        if !subject.lineage().any(|s| self.subjects.contains(s)) {
            return Verdict::NO_MATCH;
        }

        if self.is_unlimited() || self.sum(used) < self.limit {
            Verdict::ALLOW
        } else {
            Verdict::DENY
        }
    }
}
