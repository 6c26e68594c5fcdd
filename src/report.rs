use crate::types::{RepoInventory, RepoName};
use serde::Serialize;

/// Repositories ranked by total artifact size, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    repos: Vec<RepoInventory>,
}

impl ArtifactReport {
    /// Drops repositories without artifacts and ranks the rest. Artifacts
    /// inside each repository are re-sorted largest first.
    #[must_use]
    pub fn rank(inventories: impl IntoIterator<Item = RepoInventory>) -> Self {
        let mut repos: Vec<RepoInventory> = inventories
            .into_iter()
            .filter(|inventory| !inventory.is_empty())
            .map(|mut inventory| {
                inventory
                    .artifacts
                    .sort_by(|a, b| b.size_in_bytes.cmp(&a.size_in_bytes));
                inventory
            })
            .collect();
        repos.sort_by_key(|inventory| std::cmp::Reverse(inventory.total_size_in_bytes()));
        Self { repos }
    }

    #[must_use]
    pub fn repos(&self) -> &[RepoInventory] {
        &self.repos
    }

    #[must_use]
    pub fn get(&self, repo: &RepoName) -> Option<&RepoInventory> {
        self.repos.iter().find(|inventory| &inventory.repo == repo)
    }

    #[must_use]
    pub fn total_size_in_bytes(&self) -> u64 {
        self.repos
            .iter()
            .fold(0_u64, |sum, inventory| sum.saturating_add(inventory.total_size_in_bytes()))
    }

    #[must_use]
    pub fn artifact_count(&self) -> usize {
        self.repos.iter().map(|inventory| inventory.artifacts.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    #[must_use]
    pub fn into_repos(self) -> Vec<RepoInventory> {
        self.repos
    }
}
