use assert_cmd::Command;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCRUBBED_ENV: [&str; 7] = [
    "GITHUB_TOKEN",
    "GH_TOKEN",
    "RUST_LOG",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "http_proxy",
    "https_proxy",
];

/// Runs the `finder` binary inside a scratch directory with no ambient
/// credentials, so nothing from the developer's shell leaks into a test.
#[derive(Debug)]
pub struct FinderHarness {
    binary_path: PathBuf,
    workdir: TempDir,
}

impl FinderHarness {
    pub fn new() -> Result<Self, String> {
        Ok(Self {
            binary_path: PathBuf::from(assert_cmd::cargo::cargo_bin!("finder")),
            workdir: tempfile::tempdir().map_err(|err| format!("tempdir: {err}"))?,
        })
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    pub fn write_config(&self, content: &str) -> Result<PathBuf, String> {
        let path = self.workdir().join("config.toml");
        std::fs::write(&path, content).map_err(|err| format!("write config: {err}"))?;
        Ok(path)
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.binary_path);
        command.current_dir(self.workdir()).env("NO_PROXY", "127.0.0.1");
        for name in SCRUBBED_ENV {
            command.env_remove(name);
        }
        command
    }
}

/// Canned JSON responses keyed by request path (query string ignored).
/// Unknown paths answer 404.
pub struct FakeGitHub {
    base_url: String,
}

impl FakeGitHub {
    pub fn serve(routes: Vec<(&str, &str)>) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| format!("bind: {err}"))?;
        let port = listener
            .local_addr()
            .map_err(|err| format!("local addr: {err}"))?
            .port();
        let routes: HashMap<String, String> = routes
            .into_iter()
            .map(|(path, body)| (path.to_string(), body.to_string()))
            .collect();

        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let mut reader = BufReader::new(&stream);
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                let mut header = String::new();
                while reader.read_line(&mut header).is_ok_and(|read| read > 2) {
                    header.clear();
                }

                let target = request_line.split_whitespace().nth(1).unwrap_or("/");
                let path = target.split('?').next().unwrap_or(target);
                let (status, body) = routes.get(path).map_or(
                    ("404 Not Found", r#"{"message":"Not Found"}"#),
                    |body| ("200 OK", body.as_str()),
                );
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let mut stream = &stream;
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{port}"),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
