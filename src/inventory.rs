use crate::pagination::collect_pages;
use crate::ports::{ActionsApi, FinderSettings};
use crate::progress::ProgressSink;
use crate::types::{RepoInventory, RepoName};
use tracing::debug;

/// Lists every live artifact of `repo`, largest first.
///
/// A failed page ends the listing early; the artifacts already seen are kept.
pub async fn build_inventory<A>(
    api: &A,
    settings: &FinderSettings,
    repo: &RepoName,
    progress: &dyn ProgressSink,
) -> RepoInventory
where
    A: ActionsApi + ?Sized,
{
    let listed = collect_pages(settings.per_page, |page| {
        progress.report(
            &format!("Repo {repo}: Fetching artifacts page {}", page.page),
            None,
        );
        api.list_artifacts(repo, page)
    })
    .await;

    let inventory = RepoInventory::new(repo.clone(), listed.items);
    debug!(
        repo = %repo,
        artifacts = inventory.artifacts.len(),
        complete = listed.interrupted.is_none(),
        "built artifact inventory"
    );
    inventory
}
