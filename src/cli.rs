use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finder")]
#[command(about = "Find GitHub Actions artifacts and the run attempts that produced them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (default: .finder/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// GitHub token; overrides GITHUB_TOKEN, GH_TOKEN and the config file
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Page size for list requests, clamped to 1..=100
    #[arg(long, global = true)]
    pub per_page: Option<u32>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List every repository the token can see
    Repos,

    /// Rank repositories by total artifact size
    Scan {
        /// Also link every artifact to the run attempt that produced it
        #[arg(long, default_value_t = false)]
        links: bool,
    },

    /// Link the artifacts of one repository to their run attempts
    Links {
        /// Repository in owner/repo form
        repo: String,
    },
}

impl Commands {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Repos => "repos",
            Self::Scan { .. } => "scan",
            Self::Links { .. } => "links",
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
