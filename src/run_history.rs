use crate::pagination::collect_pages;
use crate::ports::{ActionsApi, FinderSettings};
use crate::progress::ProgressSink;
use crate::types::{RepoName, WorkflowRun};
use tracing::{debug, warn};

/// Every workflow run of `repo`, newest first.
///
/// The order is established here with a stable sort on `created_at`; runs
/// created at the same instant keep the order the API listed them in. A
/// listing that fails part-way yields the runs seen so far, and one that
/// fails on the first page yields none.
pub async fn fetch_run_history<A>(
    api: &A,
    settings: &FinderSettings,
    repo: &RepoName,
    progress: &dyn ProgressSink,
) -> Vec<WorkflowRun>
where
    A: ActionsApi + ?Sized,
{
    progress.report("Fetching workflow runs (all pages)...", None);
    let listed = collect_pages(settings.per_page, |page| api.list_workflow_runs(repo, page)).await;

    if let Some(err) = &listed.interrupted {
        warn!(
            repo = %repo,
            kept = listed.items.len(),
            "workflow run listing incomplete: {err}"
        );
    }

    let mut runs = listed.items;
    sort_newest_first(&mut runs);
    debug!(repo = %repo, runs = runs.len(), "fetched workflow run history");
    runs
}

pub fn sort_newest_first(runs: &mut [WorkflowRun]) {
    runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::fetch_run_history;
    use crate::ports::FinderSettings;
    use crate::progress::SilentProgress;
    use crate::testing::{at, repo, run, transport_failure, ApiCall, FakeActionsApi};

    #[tokio::test]
    async fn sorts_newest_first_regardless_of_listing_order() {
        let acme = repo("acme/app");
        let api = FakeActionsApi::new().with_runs(
            &acme,
            vec![run(1, &acme, at(10)), run(3, &acme, at(30)), run(2, &acme, at(20))],
        );

        let runs = fetch_run_history(&api, &FinderSettings::default(), &acme, &SilentProgress).await;

        let ids: Vec<u64> = runs.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_listing_order() {
        let acme = repo("acme/app");
        let api = FakeActionsApi::new().with_runs(
            &acme,
            vec![run(5, &acme, at(0)), run(4, &acme, at(50)), run(6, &acme, at(0))],
        );

        let runs = fetch_run_history(&api, &FinderSettings::default(), &acme, &SilentProgress).await;

        let ids: Vec<u64> = runs.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn first_page_failure_means_no_history() {
        let acme = repo("acme/app");
        let api = FakeActionsApi::new()
            .with_runs(&acme, vec![run(1, &acme, at(0))])
            .failing(
                ApiCall::WorkflowRuns {
                    repo: "acme/app".to_string(),
                    page: 1,
                },
                transport_failure(401),
            );

        let runs = fetch_run_history(&api, &FinderSettings::default(), &acme, &SilentProgress).await;

        assert!(runs.is_empty());
    }

    #[tokio::test]
    async fn partial_history_is_still_sorted() {
        let acme = repo("acme/app");
        let api = FakeActionsApi::new()
            .with_runs(
                &acme,
                vec![run(1, &acme, at(1)), run(2, &acme, at(2)), run(3, &acme, at(3))],
            )
            .failing(
                ApiCall::WorkflowRuns {
                    repo: "acme/app".to_string(),
                    page: 2,
                },
                transport_failure(500),
            );

        let runs = fetch_run_history(
            &api,
            &FinderSettings::new(2, "https://github.com"),
            &acme,
            &SilentProgress,
        )
        .await;

        let ids: Vec<u64> = runs.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
