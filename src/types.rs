mod artifact;
mod identifiers;
mod workflow;

pub use artifact::{bytes_to_mebibytes, Artifact, ProvenanceLink, RepoInventory};
pub use identifiers::{ArtifactId, AttemptNumber, RepoName, RunId};
pub use workflow::{ArtifactSource, Attempt, AttemptRecord, WorkflowRun};
