use crate::cli::OutputFormat;
use finder::{ProgressSink, RepoInventory, RepoName};
use serde_json::json;
use std::fmt::Write as _;
use std::io::Write as _;

pub fn emit_output(output: OutputFormat, command: &str, payload: serde_json::Value) {
    match output {
        OutputFormat::Text => payload
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| println!("{payload}"), |msg| println!("{msg}")),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "command": command,
                "status": "ok",
                "payload": payload,
            })
        ),
    }
}

pub fn render_repositories(repos: &[RepoName]) -> String {
    repos.iter().fold(String::new(), |mut out, repo| {
        let _ = writeln!(out, "{repo}");
        out
    })
}

/// One block per repository: a header with the total, then one row per
/// artifact. The link column appears only when some artifact carries a link.
pub fn render_inventories(inventories: &[RepoInventory]) -> String {
    if inventories.is_empty() {
        return "No artifacts found.\n".to_string();
    }

    let mut out = String::new();
    for inventory in inventories {
        let _ = writeln!(
            out,
            "{} | Total Artifact Size: {:.2} MB",
            inventory.repo,
            inventory.total_size_in_mebibytes()
        );
        let width = inventory
            .artifacts
            .iter()
            .map(|artifact| artifact.name.len())
            .max()
            .unwrap_or(0)
            .max("Artifact Name".len());
        let with_links = inventory.has_links();

        let _ = write!(out, "  {:<width$}  {:>12}", "Artifact Name", "Size (MB)");
        if with_links {
            let _ = write!(out, "  Link");
        }
        out.push('\n');

        for artifact in &inventory.artifacts {
            let _ = write!(
                out,
                "  {:<width$}  {:>12.2}",
                artifact.name,
                artifact.size_in_mebibytes()
            );
            if with_links {
                let link = artifact.link.as_ref().map_or("-", |link| link.url());
                let _ = write!(out, "  {link}");
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Progress lines on stderr, keeping stdout for results.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn report(&self, message: &str, percent: Option<u8>) {
        let mut stderr = std::io::stderr().lock();
        let _ = match percent {
            Some(percent) => writeln!(stderr, "[{percent:>3}%] {message}"),
            None => writeln!(stderr, "       {message}"),
        };
    }
}
