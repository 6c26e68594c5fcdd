#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use finder::github::DEFAULT_API_BASE_URL;
use finder::ports::MAX_PER_PAGE;
use finder::{ClientOptions, FinderError, FinderSettings, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = ".finder/config.toml";
const DEFAULT_WEB_BASE_URL: &str = "https://github.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

pub struct Config {
    pub token: String,
    pub api_base_url: String,
    pub web_base_url: String,
    pub per_page: u32,
    pub request_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("web_base_url", &self.web_base_url)
            .field("per_page", &self.per_page)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_base_url: self.api_base_url.clone(),
            token: self.token.clone(),
            request_timeout: self.request_timeout,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    pub fn settings(&self) -> FinderSettings {
        FinderSettings::new(self.per_page, self.web_base_url.clone())
    }
}

/// Values read from the config file. Every key is optional.
#[derive(Default, PartialEq, Eq)]
pub struct FileConfig {
    pub token: Option<String>,
    pub api_base_url: Option<String>,
    pub web_base_url: Option<String>,
    pub per_page: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("web_base_url", &self.web_base_url)
            .field("per_page", &self.per_page)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

pub async fn load_config(
    path: Option<PathBuf>,
    token_flag: Option<String>,
    per_page_flag: Option<u32>,
) -> Result<Config> {
    let config_path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let file = if config_path.exists() {
        let content = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|e| FinderError::ConfigError(format!("Failed to read config: {e}")))?;
        parse_config_content(&content)?
    } else {
        FileConfig::default()
    };

    let token = token_candidates(token_flag.as_deref(), file.token.as_deref(), non_empty_env_var)
        .into_iter()
        .next()
        .ok_or_else(|| {
            FinderError::ConfigError(
                "No GitHub token found; pass --token or set GITHUB_TOKEN or GH_TOKEN".to_string(),
            )
        })?;

    Ok(Config {
        token,
        api_base_url: file
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        web_base_url: file
            .web_base_url
            .unwrap_or_else(|| DEFAULT_WEB_BASE_URL.to_string()),
        per_page: per_page_flag
            .or(file.per_page)
            .unwrap_or(MAX_PER_PAGE)
            .clamp(1, MAX_PER_PAGE),
        request_timeout: Duration::from_secs(
            file.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
    })
}

pub fn parse_config_content(content: &str) -> Result<FileConfig> {
    let mut config = FileConfig::default();

    for line in content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        if let Some(value) = parse_key_value(line, "token") {
            config.token = Some(expand_env_vars(value)).filter(|token| !token.trim().is_empty());
        }
        if let Some(value) = parse_key_value(line, "api_base_url") {
            config.api_base_url = Some(expand_env_vars(value));
        }
        if let Some(value) = parse_key_value(line, "web_base_url") {
            config.web_base_url = Some(expand_env_vars(value));
        }
        if let Some(value) = parse_key_value(line, "per_page") {
            config.per_page = Some(parse_number(value, "per_page")?);
        }
        if let Some(value) = parse_key_value(line, "request_timeout_secs") {
            let secs: u64 = parse_number(value, "request_timeout_secs")?;
            if secs == 0 {
                return Err(FinderError::ConfigError(
                    "request_timeout_secs must be at least 1".to_string(),
                ));
            }
            config.request_timeout_secs = Some(secs);
        }
    }

    Ok(config)
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> Result<T> {
    expand_env_vars(value)
        .parse()
        .map_err(|_| FinderError::ConfigError(format!("{key} must be a number, got '{value}'")))
}

/// Expands `${VAR}` and `${VAR:-default}` in one left-to-right pass.
/// Substituted values are copied as-is and never expanded again.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_part = &rest[start + 2..start + end];
        let (var_name, default) = var_part.split_once(":-").unwrap_or((var_part, ""));
        result.push_str(&std::env::var(var_name).unwrap_or_else(|_| default.to_string()));
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

pub fn parse_key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split_once('=')
        .and_then(|(lhs, rhs)| (lhs.trim() == key).then_some(rhs.trim().trim_matches('"')))
}

/// Tokens in precedence order: flag, then environment, then config file.
fn token_candidates(
    flag: Option<&str>,
    file_token: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Vec<String> {
    let mut candidates = Vec::new();

    push_unique(&mut candidates, flag.and_then(trimmed_non_empty));
    for name in TOKEN_ENV_VARS {
        push_unique(&mut candidates, env(name));
    }
    push_unique(&mut candidates, file_token.and_then(trimmed_non_empty));

    candidates
}

fn trimmed_non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn push_unique(target: &mut Vec<String>, value: Option<String>) {
    if let Some(candidate) = value {
        if !target.iter().any(|existing| existing == &candidate) {
            target.push(candidate);
        }
    }
}

fn non_empty_env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
