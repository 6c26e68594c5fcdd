#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use crate::error::FetchError;
use crate::ports::{ActionsApi, FetchFuture, PageRequest};
use crate::types::{
    Artifact, ArtifactId, AttemptNumber, AttemptRecord, RepoName, RunId, WorkflowRun,
};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiCall {
    Repositories { page: u32 },
    Artifacts { repo: String, page: u32 },
    WorkflowRuns { repo: String, page: u32 },
    RunAttempts { run_id: u64 },
    RunArtifacts { run_id: u64, page: u32 },
    AttemptArtifacts { run_id: u64, attempt: u32, page: u32 },
}

impl ApiCall {
    pub const fn run_id(&self) -> Option<u64> {
        match self {
            Self::RunAttempts { run_id }
            | Self::RunArtifacts { run_id, .. }
            | Self::AttemptArtifacts { run_id, .. } => Some(*run_id),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    repos: Vec<String>,
    artifacts: HashMap<RepoName, Vec<Artifact>>,
    runs: HashMap<RepoName, Vec<WorkflowRun>>,
    // A run without an entry answers its attempts listing with NotFound.
    attempts: HashMap<RunId, Vec<AttemptRecord>>,
    run_artifacts: HashMap<RunId, Vec<Artifact>>,
    attempt_artifacts: HashMap<(RunId, AttemptNumber), Vec<Artifact>>,
    failures: HashMap<ApiCall, FetchError>,
    calls: Vec<ApiCall>,
}

/// Scripted in-memory Actions API that records every call.
#[derive(Debug, Default)]
pub struct FakeActionsApi {
    state: Mutex<FakeState>,
}

impl FakeActionsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(self, repo: &RepoName) -> Self {
        self.with_listed_repo(repo.value())
    }

    /// Adds a repository listing entry verbatim, malformed or not.
    pub fn with_listed_repo(mut self, full_name: &str) -> Self {
        self.state.get_mut().repos.push(full_name.to_string());
        self
    }

    pub fn with_artifacts(mut self, repo: &RepoName, artifacts: Vec<Artifact>) -> Self {
        self.state
            .get_mut()
            .artifacts
            .insert(repo.clone(), artifacts);
        self
    }

    pub fn with_runs(mut self, repo: &RepoName, runs: Vec<WorkflowRun>) -> Self {
        self.state.get_mut().runs.insert(repo.clone(), runs);
        self
    }

    pub fn with_attempts(mut self, run_id: u64, attempts: Vec<AttemptRecord>) -> Self {
        self.state
            .get_mut()
            .attempts
            .insert(RunId::new(run_id), attempts);
        self
    }

    pub fn with_run_artifacts(mut self, run_id: u64, artifacts: Vec<Artifact>) -> Self {
        self.state
            .get_mut()
            .run_artifacts
            .insert(RunId::new(run_id), artifacts);
        self
    }

    pub fn with_attempt_artifacts(
        mut self,
        run_id: u64,
        attempt: u32,
        artifacts: Vec<Artifact>,
    ) -> Self {
        self.state
            .get_mut()
            .attempt_artifacts
            .insert((RunId::new(run_id), attempt_no(attempt)), artifacts);
        self
    }

    pub fn failing(mut self, call: ApiCall, error: FetchError) -> Self {
        self.state.get_mut().failures.insert(call, error);
        self
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().await.calls.clone()
    }

    /// Distinct runs whose attempts or artifacts were requested, in order.
    pub async fn runs_touched(&self) -> Vec<u64> {
        let mut touched = Vec::new();
        for run_id in self.calls().await.iter().filter_map(ApiCall::run_id) {
            if !touched.contains(&run_id) {
                touched.push(run_id);
            }
        }
        touched
    }

    async fn record(&self, call: ApiCall) -> Result<MutexGuard<'_, FakeState>, FetchError> {
        let mut state = self.state.lock().await;
        state.calls.push(call.clone());
        if let Some(error) = state.failures.get(&call).cloned() {
            return Err(error);
        }
        Ok(state)
    }
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    let per_page = page.per_page as usize;
    let start = (page.page as usize - 1) * per_page;
    items.iter().skip(start).take(per_page).cloned().collect()
}

impl ActionsApi for FakeActionsApi {
    fn list_repositories(&self, page: PageRequest) -> FetchFuture<'_, Vec<String>> {
        Box::pin(async move {
            let state = self
                .record(ApiCall::Repositories { page: page.page })
                .await?;
            Ok(page_of(&state.repos, page))
        })
    }

    fn list_artifacts<'a>(
        &'a self,
        repo: &'a RepoName,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>> {
        Box::pin(async move {
            let state = self
                .record(ApiCall::Artifacts {
                    repo: repo.to_string(),
                    page: page.page,
                })
                .await?;
            Ok(state
                .artifacts
                .get(repo)
                .map(|items| page_of(items, page))
                .unwrap_or_default())
        })
    }

    fn list_workflow_runs<'a>(
        &'a self,
        repo: &'a RepoName,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<WorkflowRun>> {
        Box::pin(async move {
            let state = self
                .record(ApiCall::WorkflowRuns {
                    repo: repo.to_string(),
                    page: page.page,
                })
                .await?;
            Ok(state
                .runs
                .get(repo)
                .map(|items| page_of(items, page))
                .unwrap_or_default())
        })
    }

    fn list_run_attempts<'a>(
        &'a self,
        repo: &'a RepoName,
        run_id: RunId,
    ) -> FetchFuture<'a, Vec<AttemptRecord>> {
        Box::pin(async move {
            let state = self
                .record(ApiCall::RunAttempts {
                    run_id: run_id.value(),
                })
                .await?;
            state
                .attempts
                .get(&run_id)
                .cloned()
                .ok_or_else(|| FetchError::NotFound {
                    url: format!("/repos/{repo}/actions/runs/{run_id}/attempts"),
                })
        })
    }

    fn list_run_artifacts<'a>(
        &'a self,
        _repo: &'a RepoName,
        run_id: RunId,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>> {
        Box::pin(async move {
            let state = self
                .record(ApiCall::RunArtifacts {
                    run_id: run_id.value(),
                    page: page.page,
                })
                .await?;
            Ok(state
                .run_artifacts
                .get(&run_id)
                .map(|items| page_of(items, page))
                .unwrap_or_default())
        })
    }

    fn list_attempt_artifacts<'a>(
        &'a self,
        _repo: &'a RepoName,
        run_id: RunId,
        attempt: AttemptNumber,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>> {
        Box::pin(async move {
            let state = self
                .record(ApiCall::AttemptArtifacts {
                    run_id: run_id.value(),
                    attempt: attempt.value(),
                    page: page.page,
                })
                .await?;
            Ok(state
                .attempt_artifacts
                .get(&(run_id, attempt))
                .map(|items| page_of(items, page))
                .unwrap_or_default())
        })
    }
}

pub fn repo(name: &str) -> RepoName {
    RepoName::parse(name).unwrap()
}

pub fn artifact(id: u64, size_in_bytes: u64) -> Artifact {
    Artifact::new(ArtifactId::new(id), format!("artifact-{id}"), size_in_bytes)
}

pub fn attempt_no(number: u32) -> AttemptNumber {
    AttemptNumber::new(number).unwrap()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

pub fn run(id: u64, repo: &RepoName, created_at: DateTime<Utc>) -> WorkflowRun {
    WorkflowRun {
        id: RunId::new(id),
        created_at,
        html_url: format!("https://github.com/{repo}/actions/runs/{id}"),
    }
}

pub fn attempt(number: u32, inline: Option<Vec<Artifact>>) -> AttemptRecord {
    AttemptRecord {
        number: attempt_no(number),
        artifacts: inline,
    }
}

pub fn decode_failure() -> FetchError {
    FetchError::Decode {
        url: "https://api.github.com/test".to_string(),
        message: "expected value at line 1 column 1".to_string(),
    }
}

pub fn transport_failure(status: u16) -> FetchError {
    FetchError::Transport {
        url: "https://api.github.com/test".to_string(),
        status: Some(status),
        message: "scripted failure".to_string(),
    }
}

/// Collects every progress report for later assertions.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    reports: std::sync::Mutex<Vec<(String, Option<u8>)>>,
}

impl RecordingProgress {
    pub fn messages(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, percent)| *percent)
            .collect()
    }
}

impl crate::progress::ProgressSink for RecordingProgress {
    fn report(&self, message: &str, percent: Option<u8>) {
        self.reports
            .lock()
            .unwrap()
            .push((message.to_string(), percent));
    }
}
