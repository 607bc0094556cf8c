//! Quota limit subjects
//!
//! Subjects name the categories of storage a rule can limit. They form a
//! tree rooted at `size:all`; a rule that does not list a subject may still
//! cover it through one of the subject's ancestors.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use forgejo_quota_common::QuotaError;

/// A category of storage consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LimitSubject {
    #[serde(rename = "size:all")]
    SizeAll,
    #[serde(rename = "size:repos:all")]
    SizeReposAll,
    #[serde(rename = "size:repos:public")]
    SizeReposPublic,
    #[serde(rename = "size:repos:private")]
    SizeReposPrivate,
    #[serde(rename = "size:git:all")]
    SizeGitAll,
    #[serde(rename = "size:git:lfs")]
    SizeGitLfs,
    #[serde(rename = "size:assets:all")]
    SizeAssetsAll,
    #[serde(rename = "size:assets:attachments:all")]
    SizeAssetsAttachmentsAll,
    #[serde(rename = "size:assets:attachments:issues")]
    SizeAssetsAttachmentsIssues,
    #[serde(rename = "size:assets:attachments:releases")]
    SizeAssetsAttachmentsReleases,
    #[serde(rename = "size:assets:artifacts")]
    SizeAssetsArtifacts,
    #[serde(rename = "size:assets:packages:all")]
    SizeAssetsPackagesAll,
    #[serde(rename = "size:wiki")]
    SizeWiki,
}

impl LimitSubject {
    /// Every subject, root first
    pub const ALL: [LimitSubject; 13] = [
        LimitSubject::SizeAll,
        LimitSubject::SizeReposAll,
        LimitSubject::SizeReposPublic,
        LimitSubject::SizeReposPrivate,
        LimitSubject::SizeGitAll,
        LimitSubject::SizeGitLfs,
        LimitSubject::SizeAssetsAll,
        LimitSubject::SizeAssetsAttachmentsAll,
        LimitSubject::SizeAssetsAttachmentsIssues,
        LimitSubject::SizeAssetsAttachmentsReleases,
        LimitSubject::SizeAssetsArtifacts,
        LimitSubject::SizeAssetsPackagesAll,
        LimitSubject::SizeWiki,
    ];

    pub fn iter() -> impl Iterator<Item = LimitSubject> {
        Self::ALL.into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitSubject::SizeAll => "size:all",
            LimitSubject::SizeReposAll => "size:repos:all",
            LimitSubject::SizeReposPublic => "size:repos:public",
            LimitSubject::SizeReposPrivate => "size:repos:private",
            LimitSubject::SizeGitAll => "size:git:all",
            LimitSubject::SizeGitLfs => "size:git:lfs",
            LimitSubject::SizeAssetsAll => "size:assets:all",
            LimitSubject::SizeAssetsAttachmentsAll => "size:assets:attachments:all",
            LimitSubject::SizeAssetsAttachmentsIssues => "size:assets:attachments:issues",
            LimitSubject::SizeAssetsAttachmentsReleases => "size:assets:attachments:releases",
            LimitSubject::SizeAssetsArtifacts => "size:assets:artifacts",
            LimitSubject::SizeAssetsPackagesAll => "size:assets:packages:all",
            LimitSubject::SizeWiki => "size:wiki",
        }
    }

    /// The enclosing subject, `None` for the root `size:all`
    pub fn parent(&self) -> Option<LimitSubject> {
        match self {
            LimitSubject::SizeAll => None,
            LimitSubject::SizeGitAll | LimitSubject::SizeAssetsAll => Some(LimitSubject::SizeAll),
            LimitSubject::SizeGitLfs | LimitSubject::SizeReposAll => {
                Some(LimitSubject::SizeGitAll)
            }
            LimitSubject::SizeReposPublic | LimitSubject::SizeReposPrivate => {
                Some(LimitSubject::SizeReposAll)
            }
            LimitSubject::SizeAssetsAttachmentsAll
            | LimitSubject::SizeAssetsArtifacts
            | LimitSubject::SizeAssetsPackagesAll
            | LimitSubject::SizeWiki => Some(LimitSubject::SizeAssetsAll),
            LimitSubject::SizeAssetsAttachmentsIssues
            | LimitSubject::SizeAssetsAttachmentsReleases => {
                Some(LimitSubject::SizeAssetsAttachmentsAll)
            }
        }
    }

    /// The subject itself followed by its ancestors up to `size:all`
    pub fn lineage(self) -> impl Iterator<Item = LimitSubject> {
        std::iter::successors(Some(self), |subject| subject.parent())
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Whether `self` lies under `ancestor` in the tree, or is `ancestor`
    pub fn is_within(&self, ancestor: LimitSubject) -> bool {
        self.lineage().any(|subject| subject == ancestor)
    }
}

impl Display for LimitSubject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LimitSubject {
    type Err = QuotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LimitSubject::iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| QuotaError::UnrecognizedSubject(s.to_string()))
    }
}

/// Ordered set of subjects governed by one rule
///
/// Duplicates are dropped on construction, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LimitSubject>", into = "Vec<LimitSubject>")]
pub struct LimitSubjects(Vec<LimitSubject>);

impl LimitSubjects {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a subject unless already present; returns whether it was added
    pub fn insert(&mut self, subject: LimitSubject) -> bool {
        if self.0.contains(&subject) {
            return false;
        }
        self.0.push(subject);
        true
    }

    pub fn contains(&self, subject: LimitSubject) -> bool {
        self.0.contains(&subject)
    }

    pub fn iter(&self) -> impl Iterator<Item = LimitSubject> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[LimitSubject] {
        &self.0
    }
}

impl From<Vec<LimitSubject>> for LimitSubjects {
    fn from(subjects: Vec<LimitSubject>) -> Self {
        subjects.into_iter().collect()
    }
}

impl<const N: usize> From<[LimitSubject; N]> for LimitSubjects {
    fn from(subjects: [LimitSubject; N]) -> Self {
        subjects.into_iter().collect()
    }
}

impl From<LimitSubjects> for Vec<LimitSubject> {
    fn from(subjects: LimitSubjects) -> Self {
        subjects.0
    }
}

impl FromIterator<LimitSubject> for LimitSubjects {
    fn from_iter<I: IntoIterator<Item = LimitSubject>>(iter: I) -> Self {
        let mut subjects = LimitSubjects::new();
        for subject in iter {
            subjects.insert(subject);
        }
        subjects
    }
}

impl<'a> IntoIterator for &'a LimitSubjects {
    type Item = LimitSubject;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, LimitSubject>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl Display for LimitSubjects {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(LimitSubject::as_str)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}", joined)
    }
}

impl FromStr for LimitSubjects {
    type Err = QuotaError;

    /// Parse a comma-separated subject list; blank entries are skipped
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<LimitSubject>)
            .collect()
    }
}
