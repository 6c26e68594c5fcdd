use super::identifiers::{ArtifactId, AttemptNumber, RepoName, RunId};
use serde::{Deserialize, Serialize};

const BYTES_PER_MEBIBYTE: f64 = 1024.0 * 1024.0;

/// Where an artifact came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvenanceLink {
    /// The run attempt whose artifact set contained the artifact.
    Attempt {
        run_id: RunId,
        attempt: AttemptNumber,
        url: String,
    },
    /// Nothing in the run history claimed the artifact.
    RepositoryFallback { url: String },
}

impl ProvenanceLink {
    #[must_use]
    pub fn for_attempt(run_id: RunId, run_html_url: &str, attempt: AttemptNumber) -> Self {
        Self::Attempt {
            run_id,
            attempt,
            url: format!(
                "{}/attempts/{}",
                run_html_url.trim_end_matches('/'),
                attempt
            ),
        }
    }

    #[must_use]
    pub fn fallback(repo: &RepoName, web_base_url: &str) -> Self {
        Self::RepositoryFallback {
            url: repo.actions_url(web_base_url),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Attempt { url, .. } | Self::RepositoryFallback { url } => url,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::RepositoryFallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub name: String,
    pub size_in_bytes: u64,
    pub expired: bool,
    /// Unset until a provenance pass runs over the owning inventory.
    #[serde(default)]
    pub link: Option<ProvenanceLink>,
}

impl Artifact {
    #[must_use]
    pub fn new(id: ArtifactId, name: impl Into<String>, size_in_bytes: u64) -> Self {
        Self {
            id,
            name: name.into(),
            size_in_bytes,
            expired: false,
            link: None,
        }
    }

    #[must_use]
    pub const fn expired(mut self, expired: bool) -> Self {
        self.expired = expired;
        self
    }

    #[must_use]
    pub fn size_in_mebibytes(&self) -> f64 {
        bytes_to_mebibytes(self.size_in_bytes)
    }
}

/// Every live artifact of one repository, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInventory {
    pub repo: RepoName,
    pub artifacts: Vec<Artifact>,
}

impl RepoInventory {
    /// Drops expired artifacts and orders the rest by size, largest first.
    /// Equal sizes keep their listing order.
    #[must_use]
    pub fn new(repo: RepoName, artifacts: Vec<Artifact>) -> Self {
        let mut artifacts: Vec<Artifact> = artifacts.into_iter().filter(|a| !a.expired).collect();
        artifacts.sort_by(|a, b| b.size_in_bytes.cmp(&a.size_in_bytes));
        Self { repo, artifacts }
    }

    #[must_use]
    pub fn total_size_in_bytes(&self) -> u64 {
        self.artifacts
            .iter()
            .fold(0_u64, |sum, artifact| sum.saturating_add(artifact.size_in_bytes))
    }

    #[must_use]
    pub fn total_size_in_mebibytes(&self) -> f64 {
        bytes_to_mebibytes(self.total_size_in_bytes())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    #[must_use]
    pub fn has_unlinked(&self) -> bool {
        self.artifacts.iter().any(|a| a.link.is_none())
    }

    #[must_use]
    pub fn has_links(&self) -> bool {
        self.artifacts.iter().any(|a| a.link.is_some())
    }
}

#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn bytes_to_mebibytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MEBIBYTE
}
