use super::payloads::{
    into_artifacts, into_attempts, into_full_names, into_runs, ArtifactListPayload,
    AttemptListPayload, RepositoryPayload, WorkflowRunListPayload,
};
use crate::error::{FetchError, FinderError, Result};
use crate::ports::{ActionsApi, FetchFuture, PageRequest};
use crate::types::{Artifact, AttemptNumber, AttemptRecord, RepoName, RunId, WorkflowRun};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const ACCEPT_V3_JSON: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = "gh-artifact-finder";

#[derive(Clone)]
pub struct ClientOptions {
    pub api_base_url: String,
    pub token: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientOptions {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token: token.into(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_base_url", &self.api_base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// `ActionsApi` over the GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: Url,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns `FinderError::ConfigError` when the base URL or token cannot be
    /// used, and `FinderError::HttpError` when the HTTP client fails to build.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let api_base = Url::parse(&options.api_base_url).map_err(|e| {
            FinderError::ConfigError(format!(
                "Invalid API base URL '{}': {e}",
                options.api_base_url
            ))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(FinderError::ConfigError(format!(
                "API base URL '{}' cannot carry a path",
                options.api_base_url
            )));
        }

        let mut authorization = HeaderValue::from_str(&format!("token {}", options.token.trim()))
            .map_err(|_| {
                FinderError::ConfigError("Token contains characters not allowed in a header".into())
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3_JSON));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(AUTHORIZATION, authorization);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self { http, api_base })
    }

    fn endpoint(&self, segments: &[&str], page: Option<PageRequest>) -> Url {
        endpoint_url(&self.api_base, segments, page)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, FetchError> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| transport_error(&url, &err))?;

        if let Some(err) = classify_status(&url, response.status()) {
            return Err(err);
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(&url, &err))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

/// Appends `segments` to the base path, so a base such as
/// `https://ghe.example.com/api/v3` keeps its prefix.
fn endpoint_url(base: &Url, segments: &[&str], page: Option<PageRequest>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if let Some(page) = page {
        url.query_pairs_mut()
            .append_pair("per_page", &page.per_page.to_string())
            .append_pair("page", &page.page.to_string());
    }
    url
}

fn classify_status(url: &Url, status: StatusCode) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::NOT_FOUND {
        return Some(FetchError::NotFound {
            url: url.to_string(),
        });
    }
    Some(FetchError::Transport {
        url: url.to_string(),
        status: Some(status.as_u16()),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    })
}

fn transport_error(url: &Url, err: &reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        status: err.status().map(|status| status.as_u16()),
        message: err.to_string(),
    }
}

impl ActionsApi for GitHubClient {
    fn list_repositories(&self, page: PageRequest) -> FetchFuture<'_, Vec<String>> {
        Box::pin(async move {
            let url = self.endpoint(&["user", "repos"], Some(page));
            let payload: Vec<RepositoryPayload> = self.get_json(url).await?;
            Ok(into_full_names(payload))
        })
    }

    fn list_artifacts<'a>(
        &'a self,
        repo: &'a RepoName,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>> {
        Box::pin(async move {
            let url = self.endpoint(
                &["repos", repo.owner(), repo.name(), "actions", "artifacts"],
                Some(page),
            );
            let payload: ArtifactListPayload = self.get_json(url).await?;
            Ok(into_artifacts(payload))
        })
    }

    fn list_workflow_runs<'a>(
        &'a self,
        repo: &'a RepoName,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<WorkflowRun>> {
        Box::pin(async move {
            let url = self.endpoint(
                &["repos", repo.owner(), repo.name(), "actions", "runs"],
                Some(page),
            );
            let payload: WorkflowRunListPayload = self.get_json(url).await?;
            Ok(into_runs(payload))
        })
    }

    fn list_run_attempts<'a>(
        &'a self,
        repo: &'a RepoName,
        run_id: RunId,
    ) -> FetchFuture<'a, Vec<AttemptRecord>> {
        Box::pin(async move {
            let run = run_id.to_string();
            let url = self.endpoint(
                &["repos", repo.owner(), repo.name(), "actions", "runs", run.as_str(), "attempts"],
                None,
            );
            let payload: AttemptListPayload = self.get_json(url).await?;
            Ok(into_attempts(payload))
        })
    }

    fn list_run_artifacts<'a>(
        &'a self,
        repo: &'a RepoName,
        run_id: RunId,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>> {
        Box::pin(async move {
            let run = run_id.to_string();
            let url = self.endpoint(
                &["repos", repo.owner(), repo.name(), "actions", "runs", run.as_str(), "artifacts"],
                Some(page),
            );
            let payload: ArtifactListPayload = self.get_json(url).await?;
            Ok(into_artifacts(payload))
        })
    }

    fn list_attempt_artifacts<'a>(
        &'a self,
        repo: &'a RepoName,
        run_id: RunId,
        attempt: AttemptNumber,
        page: PageRequest,
    ) -> FetchFuture<'a, Vec<Artifact>> {
        Box::pin(async move {
            let run = run_id.to_string();
            let attempt = attempt.to_string();
            let url = self.endpoint(
                &[
                    "repos",
                    repo.owner(),
                    repo.name(),
                    "actions",
                    "runs",
                    run.as_str(),
                    "attempts",
                    attempt.as_str(),
                    "artifacts",
                ],
                Some(page),
            );
            let payload: ArtifactListPayload = self.get_json(url).await?;
            Ok(into_artifacts(payload))
        })
    }
}
