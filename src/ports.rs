use crate::error::FetchError;
use crate::types::{Artifact, AttemptNumber, AttemptRecord, RepoName, RunId, WorkflowRun};
use std::future::Future;
use std::pin::Pin;

pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// The platform maximum for `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

/// Read-only view of the GitHub Actions REST surface the finder needs.
///
/// Every list method returns one page; callers paginate with
/// [`crate::pagination::collect_pages`].
pub trait ActionsApi {
    /// Full names exactly as listed, malformed entries included, so the page
    /// length reflects what the API returned.
    fn list_repositories(&self, page: PageRequest) -> FetchFuture<'_, Vec<String>>;

    fn list_artifacts<'a>(
        &'a self,
        repo: &'a RepoName,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>>;

    fn list_workflow_runs<'a>(
        &'a self,
        repo: &'a RepoName,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<WorkflowRun>>;

    /// `FetchError::NotFound` means the run exposes no per-attempt breakdown.
    fn list_run_attempts<'a>(
        &'a self,
        repo: &'a RepoName,
        run_id: RunId,
    ) -> FetchFuture<'a, Vec<AttemptRecord>>;

    fn list_run_artifacts<'a>(
        &'a self,
        repo: &'a RepoName,
        run_id: RunId,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>>;

    fn list_attempt_artifacts<'a>(
        &'a self,
        repo: &'a RepoName,
        run_id: RunId,
        attempt: AttemptNumber,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>>;
}

/// Knobs shared by every fetcher and resolver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderSettings {
    pub per_page: u32,
    /// Base of human-facing URLs, used for fallback links.
    pub web_base_url: String,
}

impl FinderSettings {
    #[must_use]
    pub fn new(per_page: u32, web_base_url: impl Into<String>) -> Self {
        Self {
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            web_base_url: web_base_url.into(),
        }
    }
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self::new(MAX_PER_PAGE, "https://github.com")
    }
}
