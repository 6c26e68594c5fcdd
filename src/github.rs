//! GitHub REST adapter for the [`crate::ports::ActionsApi`] port.

mod client;
mod payloads;

pub use client::{ClientOptions, GitHubClient, DEFAULT_API_BASE_URL};
