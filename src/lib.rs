pub mod attempts;
pub mod error;
pub mod github;
pub mod inventory;
pub mod pagination;
pub mod ports;
pub mod progress;
pub mod provenance;
pub mod report;
pub mod run_history;
pub mod scan;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{FetchError, FinderError, Result};
pub use github::{ClientOptions, GitHubClient};
pub use ports::{ActionsApi, FinderSettings};
pub use progress::{ProgressSink, SilentProgress, TracingProgress};
pub use provenance::{resolve_provenance, ResolutionResult, ResolutionSummary};
pub use report::ArtifactReport;
pub use scan::{list_repositories, resolve_report_links, scan_account};
pub use types::*;
