//! Links each artifact of a repository to the workflow run attempt that
//! produced it.
//!
//! A pass owns the repository's inventory for its whole duration and hands it
//! back inside [`ResolutionResult`], so two passes can never touch the same
//! inventory at once. Runs are scanned newest first and attempts in ascending
//! order; the first attempt whose artifact set names an artifact claims it.
//! The scan stops as soon as every artifact is claimed. Whatever is left gets
//! the repository's Actions overview as a fallback, so no artifact ever
//! leaves a pass without a link.

use crate::attempts::{resolve_attempts, RunPosition};
use crate::ports::{ActionsApi, FinderSettings};
use crate::progress::ProgressSink;
use crate::run_history::fetch_run_history;
use crate::types::{Artifact, ArtifactId, Attempt, ProvenanceLink, RepoInventory, WorkflowRun};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    pub runs_available: usize,
    pub runs_scanned: usize,
    pub matched: usize,
    pub fallbacks: usize,
    /// True when the scan ended before the oldest run because nothing was
    /// left to match.
    pub stopped_early: bool,
}

/// The inventory handed back by a pass, every artifact carrying a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    inventory: RepoInventory,
    summary: ResolutionSummary,
}

impl ResolutionResult {
    #[must_use]
    pub const fn inventory(&self) -> &RepoInventory {
        &self.inventory
    }

    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.inventory.artifacts
    }

    #[must_use]
    pub const fn summary(&self) -> ResolutionSummary {
        self.summary
    }

    #[must_use]
    pub fn link_for(&self, id: ArtifactId) -> Option<&ProvenanceLink> {
        self.inventory
            .artifacts
            .iter()
            .find(|artifact| artifact.id == id)
            .and_then(|artifact| artifact.link.as_ref())
    }

    #[must_use]
    pub fn into_inventory(self) -> RepoInventory {
        self.inventory
    }
}

/// Artifacts of the inventory not yet claimed by any attempt, keyed by id.
///
/// Built once per pass; entries only ever leave.
struct UnresolvedSet {
    positions: HashMap<ArtifactId, usize>,
}

impl UnresolvedSet {
    fn new(artifacts: &[Artifact]) -> Self {
        let mut positions = HashMap::with_capacity(artifacts.len());
        for (position, artifact) in artifacts.iter().enumerate() {
            if artifact.link.is_some() {
                continue;
            }
            if positions.contains_key(&artifact.id) {
                debug!(artifact_id = %artifact.id, "duplicate artifact id in inventory");
                continue;
            }
            positions.insert(artifact.id, position);
        }
        Self { positions }
    }

    fn claim(&mut self, id: ArtifactId) -> Option<usize> {
        self.positions.remove(&id)
    }

    fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn len(&self) -> usize {
        self.positions.len()
    }
}

/// Runs one provenance pass over `inventory`.
///
/// Never fails: fetch errors only reduce the number of discovered links and
/// raise the number of fallbacks.
pub async fn resolve_provenance<A>(
    api: &A,
    settings: &FinderSettings,
    mut inventory: RepoInventory,
    progress: &dyn ProgressSink,
) -> ResolutionResult
where
    A: ActionsApi + ?Sized,
{
    let repo = inventory.repo.clone();
    progress.report(&format!("Generating links for {repo}..."), Some(0));

    let mut unresolved = UnresolvedSet::new(&inventory.artifacts);
    let mut summary = ResolutionSummary::default();

    if !unresolved.is_empty() {
        let runs = fetch_run_history(api, settings, &repo, progress).await;
        summary.runs_available = runs.len();

        for (index, run) in runs.iter().enumerate() {
            let position = RunPosition {
                ordinal: index + 1,
                total: runs.len(),
            };
            progress.report(
                &format!("Repo {repo}: Processing run {}/{}", position.ordinal, position.total),
                Some(position.percent()),
            );
            let attempts = resolve_attempts(api, settings, &repo, run, position, progress).await;
            summary.matched +=
                claim_from_run(run, &attempts, &mut unresolved, &mut inventory.artifacts);
            summary.runs_scanned = index + 1;

            if unresolved.is_empty() {
                summary.stopped_early = index + 1 < runs.len();
                break;
            }
        }
    }

    progress.report(&format!("Finished generating links for {repo}."), Some(100));

    for artifact in inventory.artifacts.iter_mut().filter(|a| a.link.is_none()) {
        artifact.link = Some(ProvenanceLink::fallback(&repo, &settings.web_base_url));
        summary.fallbacks += 1;
    }

    info!(
        repo = %repo,
        runs_scanned = summary.runs_scanned,
        matched = summary.matched,
        fallbacks = summary.fallbacks,
        unresolved_after_scan = unresolved.len(),
        "provenance pass complete"
    );

    ResolutionResult { inventory, summary }
}

fn claim_from_run(
    run: &WorkflowRun,
    attempts: &[Attempt],
    unresolved: &mut UnresolvedSet,
    artifacts: &mut [Artifact],
) -> usize {
    let mut matched = 0;
    for attempt in attempts {
        for id in &attempt.artifacts {
            let Some(position) = unresolved.claim(*id) else {
                continue;
            };
            artifacts[position].link = Some(ProvenanceLink::for_attempt(
                attempt.run_id,
                &run.html_url,
                attempt.number,
            ));
            matched += 1;
        }
    }
    matched
}
