use crate::{EngineReport, Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use url::Url;

/// Categories requested from every engine run.
pub const CATEGORIES: [&str; 3] = ["performance", "seo", "accessibility"];

/// Capability boundary for the external performance-analysis engine.
/// The engine drives the browser listening on the given DevTools port
/// and is otherwise a black box.
#[async_trait]
pub trait PerformanceEngine: Send + Sync {
    async fn run(&self, url: &Url, devtools_port: u16) -> Result<EngineReport>;
}

/// Drives the Lighthouse CLI as a subprocess and parses its JSON
/// report from stdout.
#[derive(Debug)]
pub struct LighthouseCli {
    binary: PathBuf,
}

impl LighthouseCli {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Resolve the Lighthouse binary from an override path or the PATH.
    pub fn discover(custom_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(Error::Spawn(format!(
                    "Lighthouse not found at: {}",
                    path.display()
                )));
            }
            return Ok(Self::new(path.to_path_buf()));
        }

        let binary = which::which("lighthouse").map_err(|_| {
            Error::Spawn(
                "lighthouse command not found. Install the Lighthouse CLI or pass --lighthouse-path."
                    .to_string(),
            )
        })?;
        tracing::debug!(binary = %binary.display(), "Found Lighthouse on PATH");
        Ok(Self::new(binary))
    }

    fn build_args(url: &Url, devtools_port: u16) -> Vec<String> {
        vec![
            url.as_str().to_string(),
            format!("--port={}", devtools_port),
            "--output=json".to_string(),
            "--output-path=stdout".to_string(),
            format!("--only-categories={}", CATEGORIES.join(",")),
            "--quiet".to_string(),
        ]
    }
}

#[async_trait]
impl PerformanceEngine for LighthouseCli {
    async fn run(&self, url: &Url, devtools_port: u16) -> Result<EngineReport> {
        let args = Self::build_args(url, devtools_port);
        tracing::info!(url = %url, port = devtools_port, "Running Lighthouse");

        // kill_on_drop so that an audit-level timeout cancelling this
        // future also reaps the subprocess.
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Spawn(format!("Failed to run Lighthouse: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Failed(format!(
                "Lighthouse exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let report: EngineReport = serde_json::from_slice(&output.stdout)?;
        tracing::debug!(audits = report.audits.len(), "Parsed Lighthouse report");
        Ok(report)
    }
}
