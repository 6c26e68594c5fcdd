use crate::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Full repository name in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoName {
    full_name: String,
    split: usize,
}

impl RepoName {
    /// Parses an `owner/repo` string.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::ConfigError` when the value does not contain exactly
    /// one `/` separating two non-empty parts.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        match trimmed.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    full_name: trimmed.to_string(),
                    split: owner.len(),
                })
            }
            _ => Err(FinderError::ConfigError(format!(
                "Invalid repository name '{value}', expected owner/repo"
            ))),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.full_name[..self.split]
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.full_name[self.split + 1..]
    }

    /// Repository-level Actions overview page, used when no run/attempt can be
    /// linked to an artifact.
    #[must_use]
    pub fn actions_url(&self, web_base_url: &str) -> String {
        format!(
            "{}/{}/actions",
            web_base_url.trim_end_matches('/'),
            self.full_name
        )
    }
}

impl FromStr for RepoName {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RepoName {
    type Error = FinderError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RepoName> for String {
    fn from(value: RepoName) -> Self {
        value.full_name
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(u64);

impl ArtifactId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based retry number of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AttemptNumber(u32);

impl AttemptNumber {
    pub const FIRST: Self = Self(1);

    /// Returns `None` for 0; attempts are numbered from 1.
    #[must_use]
    pub const fn new(number: u32) -> Option<Self> {
        if number == 0 {
            None
        } else {
            Some(Self(number))
        }
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for AttemptNumber {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "attempt numbers start at 1".to_string())
    }
}

impl From<AttemptNumber> for u32 {
    fn from(value: AttemptNumber) -> Self {
        value.0
    }
}

impl fmt::Display for AttemptNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
