//! Quota groups
//!
//! Inside a group every matching rule must allow: one deny vetoes the whole
//! group. Across a group list any allowing group is enough.

use serde::{Deserialize, Serialize};

use forgejo_quota_common::{QuotaError, Result};

use crate::default::{DefaultQuota, evaluate_default};
use crate::rule::{Rule, Verdict};
use crate::subject::LimitSubject;
use crate::used::Used;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_rules(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Append a rule; rule names are unique within a group
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        if self.rule(&rule.name).is_some() {
            return Err(QuotaError::RuleAlreadyInGroup {
                group: self.name.clone(),
                rule: rule.name,
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn remove_rule(&mut self, name: &str) -> Result<Rule> {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.name == name)
            .ok_or_else(|| QuotaError::RuleNotInGroup {
                group: self.name.clone(),
                rule: name.to_string(),
            })?;
        Ok(self.rules.remove(index))
    }

    /// Whether the group covers `subject`, and if so whether it allows it
    pub fn evaluate(&self, used: &Used, subject: LimitSubject) -> Verdict {
        let mut verdict = Verdict::NO_MATCH;

        for rule in &self.rules {
            let rule_verdict = rule.evaluate(used, subject);
            if !rule_verdict.matched {
                continue;
            }
            if !rule_verdict.allowed {
                return Verdict::DENY;
            }
            verdict = Verdict::ALLOW;
        }

        verdict
    }
}

/// The groups one user belongs to
///
/// An empty list is meaningful: it selects the instance default policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupList(Vec<Group>);

impl GroupList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, group: Group) {
        self.0.push(group);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|group| group.name.as_str()).collect()
    }

    /// Whether the action is allowed for `subject`
    ///
    /// Falls back to `defaults` when the list is empty.
    pub fn evaluate(&self, used: &Used, subject: LimitSubject, defaults: &DefaultQuota) -> bool {
        if self.is_empty() {
            tracing::debug!(%subject, "no quota groups, evaluating instance default");
            return evaluate_default(used, subject, defaults);
        }

        self.evaluate_groups(used, subject)
    }

    pub(crate) fn evaluate_groups(&self, used: &Used, subject: LimitSubject) -> bool {
        match self
            .0
            .iter()
            .find(|group| group.evaluate(used, subject).is_allowed())
        {
            Some(group) => {
                tracing::debug!(%subject, group = %group.name, "quota group allows");
                true
            }
            None => {
                tracing::debug!(%subject, groups = ?self.names(), "no quota group allows");
                false
            }
        }
    }
}

impl From<Vec<Group>> for GroupList {
    fn from(groups: Vec<Group>) -> Self {
        Self(groups)
    }
}

impl FromIterator<Group> for GroupList {
    fn from_iter<I: IntoIterator<Item = Group>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for GroupList {
    type Item = Group;
    type IntoIter = std::vec::IntoIter<Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a GroupList {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
