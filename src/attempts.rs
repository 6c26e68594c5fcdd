use crate::error::FetchError;
use crate::pagination::collect_pages;
use crate::ports::{ActionsApi, FinderSettings};
use crate::progress::{percent_of, ProgressSink};
use crate::types::{ArtifactSource, Attempt, AttemptRecord, RepoName, WorkflowRun};
use tracing::{debug, warn};

/// Where a run sits in the scan, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPosition {
    /// 1-based.
    pub ordinal: usize,
    pub total: usize,
}

impl RunPosition {
    #[must_use]
    pub fn percent(self) -> u8 {
        percent_of(self.ordinal, self.total)
    }
}

/// Resolves the attempts of `run`, each with the artifact ids it produced.
///
/// Attempts come back in ascending attempt order. A run whose attempts
/// listing is `NotFound` is a legacy run and yields exactly one synthetic
/// attempt 1 carrying the run's own artifacts. Any other failure yields no
/// attempts, so the run contributes nothing.
pub async fn resolve_attempts<A>(
    api: &A,
    settings: &FinderSettings,
    repo: &RepoName,
    run: &WorkflowRun,
    position: RunPosition,
    progress: &dyn ProgressSink,
) -> Vec<Attempt>
where
    A: ActionsApi + ?Sized,
{
    match api.list_run_attempts(repo, run.id).await {
        Ok(records) => expand_attempts(api, settings, repo, run, records).await,
        Err(FetchError::NotFound { .. }) => {
            progress.report(
                &format!(
                    "Repo {repo}: Run {}/{} has no attempts endpoint; assuming attempt 1.",
                    position.ordinal, position.total
                ),
                Some(position.percent()),
            );
            legacy_attempt(api, settings, repo, run, position, progress)
                .await
                .into_iter()
                .collect()
        }
        Err(err) => {
            warn!(
                repo = %repo,
                run_id = %run.id,
                url = err.url(),
                "skipping run, attempts unavailable: {err}"
            );
            Vec::new()
        }
    }
}

async fn legacy_attempt<A>(
    api: &A,
    settings: &FinderSettings,
    repo: &RepoName,
    run: &WorkflowRun,
    position: RunPosition,
    progress: &dyn ProgressSink,
) -> Option<Attempt>
where
    A: ActionsApi + ?Sized,
{
    let listed = collect_pages(settings.per_page, |page| {
        api.list_run_artifacts(repo, run.id, page)
    })
    .await;

    if listed.failed_outright() {
        progress.report(
            &format!("Repo {repo}: Fallback fetch failed for run {}", run.id),
            Some(position.percent()),
        );
        return None;
    }
    Some(Attempt::legacy(run.id, &listed.items))
}

async fn expand_attempts<A>(
    api: &A,
    settings: &FinderSettings,
    repo: &RepoName,
    run: &WorkflowRun,
    mut records: Vec<AttemptRecord>,
) -> Vec<Attempt>
where
    A: ActionsApi + ?Sized,
{
    records.sort_by_key(|record| record.number);
    records.dedup_by_key(|record| record.number);

    let mut attempts = Vec::with_capacity(records.len());
    for record in records {
        let (artifacts, source) = match record.artifacts {
            Some(inline) => (inline, ArtifactSource::Inline),
            None => {
                let listed = collect_pages(settings.per_page, |page| {
                    api.list_attempt_artifacts(repo, run.id, record.number, page)
                })
                .await;
                if listed.failed_outright() {
                    debug!(
                        repo = %repo,
                        run_id = %run.id,
                        attempt = %record.number,
                        "skipping attempt, artifacts unavailable"
                    );
                    continue;
                }
                (listed.items, ArtifactSource::AttemptListing)
            }
        };
        attempts.push(Attempt {
            run_id: run.id,
            number: record.number,
            artifacts: artifacts.iter().map(|a| a.id).collect(),
            source,
        });
    }
    attempts
}
