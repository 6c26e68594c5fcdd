use crate::inventory::build_inventory;
use crate::pagination::{collect_pages, Paginated};
use crate::ports::{ActionsApi, FinderSettings};
use crate::progress::{percent_of, ProgressSink};
use crate::provenance::{resolve_provenance, ResolutionSummary};
use crate::report::ArtifactReport;
use crate::types::RepoName;
use tracing::{debug, info, warn};

/// Every repository the token can see, in API order.
///
/// Names are validated only after pagination ends: a page is short because
/// the API returned fewer entries, never because some of them were malformed.
pub async fn list_repositories<A>(api: &A, settings: &FinderSettings) -> Paginated<RepoName>
where
    A: ActionsApi + ?Sized,
{
    let listed = collect_pages(settings.per_page, |page| api.list_repositories(page)).await;
    if let Some(err) = &listed.interrupted {
        warn!(kept = listed.items.len(), "repository listing incomplete: {err}");
    }

    let items = listed
        .items
        .iter()
        .filter_map(|full_name| match RepoName::parse(full_name) {
            Ok(repo) => Some(repo),
            Err(err) => {
                debug!("ignoring repository entry: {err}");
                None
            }
        })
        .collect();
    Paginated {
        items,
        pages_fetched: listed.pages_fetched,
        interrupted: listed.interrupted,
    }
}

/// Lists the artifacts of every repository and ranks the repositories that
/// have any.
pub async fn scan_account<A>(
    api: &A,
    settings: &FinderSettings,
    progress: &dyn ProgressSink,
) -> ArtifactReport
where
    A: ActionsApi + ?Sized,
{
    progress.report("Fetching repositories...", Some(0));
    let repos = list_repositories(api, settings).await.items;
    progress.report(
        &format!("Found {} repos. Fetching artifact lists...", repos.len()),
        Some(10),
    );

    let mut inventories = Vec::with_capacity(repos.len());
    for (index, repo) in repos.iter().enumerate() {
        let percent = percent_of(index + 1, repos.len());
        progress.report(
            &format!("Processing repo {}/{}: {repo}", index + 1, repos.len()),
            Some(percent),
        );
        let inventory = build_inventory(api, settings, repo, progress).await;
        progress.report(
            &format!("Repo {repo}: Found {} artifact(s)", inventory.artifacts.len()),
            Some(percent),
        );
        inventories.push(inventory);
    }
    progress.report("Artifact lists fetched.", Some(100));

    let report = ArtifactReport::rank(inventories);
    info!(
        repos = report.repos().len(),
        artifacts = report.artifact_count(),
        "account scan complete"
    );
    report
}

/// Runs a provenance pass for each repository of `report` that still has
/// unlinked artifacts, one repository at a time.
pub async fn resolve_report_links<A>(
    api: &A,
    settings: &FinderSettings,
    report: ArtifactReport,
    progress: &dyn ProgressSink,
) -> (ArtifactReport, Vec<(RepoName, ResolutionSummary)>)
where
    A: ActionsApi + ?Sized,
{
    let mut resolved = Vec::new();
    let mut summaries = Vec::new();
    for inventory in report.into_repos() {
        if !inventory.has_unlinked() {
            resolved.push(inventory);
            continue;
        }
        let result = resolve_provenance(api, settings, inventory, progress).await;
        let summary = result.summary();
        let inventory = result.into_inventory();
        summaries.push((inventory.repo.clone(), summary));
        resolved.push(inventory);
    }
    (ArtifactReport::rank(resolved), summaries)
}
