use crate::types::{Artifact, ArtifactId, AttemptNumber, AttemptRecord, RunId, WorkflowRun};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtifactPayload {
    pub id: u64,
    pub name: String,
    pub size_in_bytes: u64,
    #[serde(default)]
    pub expired: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtifactListPayload {
    #[serde(default)]
    pub artifacts: Vec<ArtifactPayload>,
}

#[derive(Debug, Deserialize)]
pub struct WorkflowRunPayload {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkflowRunListPayload {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRunPayload>,
}

#[derive(Debug, Deserialize)]
pub struct AttemptPayload {
    pub run_attempt: u32,
    #[serde(default)]
    pub artifacts: Option<Vec<ArtifactPayload>>,
}

/// The attempts listing comes back either as a bare array or wrapped in an
/// object, depending on the API version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AttemptListPayload {
    Bare(Vec<AttemptPayload>),
    Wrapped {
        #[serde(default)]
        attempts: Vec<AttemptPayload>,
    },
}

impl From<ArtifactPayload> for Artifact {
    fn from(payload: ArtifactPayload) -> Self {
        Self::new(ArtifactId::new(payload.id), payload.name, payload.size_in_bytes)
            .expired(payload.expired)
    }
}

impl From<WorkflowRunPayload> for WorkflowRun {
    fn from(payload: WorkflowRunPayload) -> Self {
        Self {
            id: RunId::new(payload.id),
            created_at: payload.created_at,
            html_url: payload.html_url,
        }
    }
}

pub fn into_full_names(payload: Vec<RepositoryPayload>) -> Vec<String> {
    payload.into_iter().map(|repo| repo.full_name).collect()
}

pub fn into_artifacts(payload: ArtifactListPayload) -> Vec<Artifact> {
    payload.artifacts.into_iter().map(Artifact::from).collect()
}

pub fn into_runs(payload: WorkflowRunListPayload) -> Vec<WorkflowRun> {
    payload.workflow_runs.into_iter().map(WorkflowRun::from).collect()
}

pub fn into_attempts(payload: AttemptListPayload) -> Vec<AttemptRecord> {
    let entries = match payload {
        AttemptListPayload::Bare(entries) | AttemptListPayload::Wrapped { attempts: entries } => {
            entries
        }
    };
    entries
        .into_iter()
        .filter_map(|entry| {
            let Some(number) = AttemptNumber::new(entry.run_attempt) else {
                debug!("ignoring attempt entry numbered 0");
                return None;
            };
            Some(AttemptRecord {
                number,
                artifacts: entry
                    .artifacts
                    .map(|inline| inline.into_iter().map(Artifact::from).collect()),
            })
        })
        .collect()
}
