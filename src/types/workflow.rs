use super::artifact::Artifact;
use super::identifiers::{ArtifactId, AttemptNumber, RunId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: RunId,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

/// One entry of a run's attempts listing as the API returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub number: AttemptNumber,
    /// Present when the listing embedded the attempt's artifacts.
    pub artifacts: Option<Vec<Artifact>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactSource {
    /// Embedded in the attempts listing.
    Inline,
    /// Fetched from the attempt's own artifact collection.
    AttemptListing,
    /// The run has no attempts collection; its run-level artifacts stand in
    /// for a single synthetic attempt 1.
    LegacyRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub run_id: RunId,
    pub number: AttemptNumber,
    pub artifacts: Vec<ArtifactId>,
    pub source: ArtifactSource,
}

impl Attempt {
    #[must_use]
    pub fn legacy(run_id: RunId, artifacts: &[Artifact]) -> Self {
        Self {
            run_id,
            number: AttemptNumber::FIRST,
            artifacts: artifacts.iter().map(|a| a.id).collect(),
            source: ArtifactSource::LegacyRun,
        }
    }

    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self.source, ArtifactSource::LegacyRun)
    }
}
