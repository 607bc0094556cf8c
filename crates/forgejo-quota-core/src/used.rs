//! Usage accumulator
//!
//! A `Used` snapshot holds the bytes a user currently consumes, one counter
//! per leaf category. Totals for composite subjects are derived by summing
//! the counters below them in the subject tree.

use serde::{Deserialize, Serialize};

use forgejo_quota_common::{QuotaError, Result};

use crate::subject::LimitSubject;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Used {
    pub size: UsedSize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSize {
    pub repos: UsedSizeRepos,
    pub git: UsedSizeGit,
    pub assets: UsedSizeAssets,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSizeRepos {
    pub public: i64,
    pub private: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSizeGit {
    pub lfs: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSizeAssets {
    pub attachments: UsedSizeAssetsAttachments,
    pub artifacts: i64,
    pub packages: UsedSizeAssetsPackages,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSizeAssetsAttachments {
    pub issues: i64,
    pub releases: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSizeAssetsPackages {
    pub all: i64,
}

impl UsedSizeRepos {
    pub fn all(&self) -> i64 {
        self.public.saturating_add(self.private)
    }
}

impl UsedSizeGit {
    /// LFS objects plus the repositories themselves
    pub fn all(&self, repos: &UsedSizeRepos) -> i64 {
        self.lfs.saturating_add(repos.all())
    }
}

impl UsedSizeAssetsAttachments {
    pub fn all(&self) -> i64 {
        self.issues.saturating_add(self.releases)
    }
}

impl UsedSizeAssets {
    pub fn all(&self) -> i64 {
        self.attachments
            .all()
            .saturating_add(self.artifacts)
            .saturating_add(self.packages.all)
    }
}

impl UsedSize {
    pub fn all(&self) -> i64 {
        self.git.all(&self.repos).saturating_add(self.assets.all())
    }
}

impl Used {
    /// Total bytes used under `subject`
    ///
    /// Wiki size is not tracked and always counts as zero.
    pub fn calculate_for(&self, subject: LimitSubject) -> i64 {
        let size = &self.size;
        match subject {
            LimitSubject::SizeAll => size.all(),
            LimitSubject::SizeReposAll => size.repos.all(),
            LimitSubject::SizeReposPublic => size.repos.public,
            LimitSubject::SizeReposPrivate => size.repos.private,
            LimitSubject::SizeGitAll => size.git.all(&size.repos),
            LimitSubject::SizeGitLfs => size.git.lfs,
            LimitSubject::SizeAssetsAll => size.assets.all(),
            LimitSubject::SizeAssetsAttachmentsAll => size.assets.attachments.all(),
            LimitSubject::SizeAssetsAttachmentsIssues => size.assets.attachments.issues,
            LimitSubject::SizeAssetsAttachmentsReleases => size.assets.attachments.releases,
            LimitSubject::SizeAssetsArtifacts => size.assets.artifacts,
            LimitSubject::SizeAssetsPackagesAll => size.assets.packages.all,
            LimitSubject::SizeWiki => 0,
        }
    }

    /// Counter backing a leaf subject, if the subject has one
    pub fn counter_mut(&mut self, subject: LimitSubject) -> Option<&mut i64> {
        let size = &mut self.size;
        match subject {
            LimitSubject::SizeReposPublic => Some(&mut size.repos.public),
            LimitSubject::SizeReposPrivate => Some(&mut size.repos.private),
            LimitSubject::SizeGitLfs => Some(&mut size.git.lfs),
            LimitSubject::SizeAssetsAttachmentsIssues => Some(&mut size.assets.attachments.issues),
            LimitSubject::SizeAssetsAttachmentsReleases => {
                Some(&mut size.assets.attachments.releases)
            }
            LimitSubject::SizeAssetsArtifacts => Some(&mut size.assets.artifacts),
            LimitSubject::SizeAssetsPackagesAll => Some(&mut size.assets.packages.all),
            _ => None,
        }
    }

    /// Add prospective consumption to the counter of `subject`
    ///
    /// Counters never go down: a negative `bytes` is rejected and leaves the
    /// snapshot unchanged.
    pub fn add(&mut self, subject: LimitSubject, bytes: i64) -> Result<()> {
        if bytes < 0 {
            return Err(QuotaError::NegativeBytes(bytes));
        }
        let counter = self
            .counter_mut(subject)
            .ok_or_else(|| QuotaError::UncountedSubject(subject.to_string()))?;
        *counter = counter.saturating_add(bytes);
        Ok(())
    }

    /// Copy of this snapshot with `bytes` added to `subject`
    pub fn with_added(mut self, subject: LimitSubject, bytes: i64) -> Result<Used> {
        self.add(subject, bytes)?;
        Ok(self)
    }
}
