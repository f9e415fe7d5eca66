use crate::{Error, Result, find_chrome};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};
use tokio::process::{Child, Command};

/// How often and how long to poll the DevTools port after launch.
/// Chrome opens the port a little after the process starts.
const READY_ATTEMPTS: u32 = 20;
const READY_BACKOFF: Duration = Duration::from_millis(250);

/// A running headless browser reachable on a DevTools port.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// DevTools control port of the running process.
    fn port(&self) -> u16;

    /// Terminate the browser. Safe to call more than once; failures
    /// are logged and swallowed so they can never mask the audit's own
    /// result or error.
    async fn release(&mut self);
}

/// Acquires browser sessions. One session per audit; sessions are
/// never pooled or shared across requests.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>>;
}

/// Launches isolated headless Chrome processes.
pub struct ChromeBrowser {
    chrome_path: Option<PathBuf>,
}

impl ChromeBrowser {
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>> {
        let binary = find_chrome(self.chrome_path.as_deref())?;
        let session = ChromeSession::launch(&binary).await?;
        Ok(Box::new(session))
    }
}

/// One launched Chrome process plus the temporary profile it runs in.
pub struct ChromeSession {
    child: Option<Child>,
    port: u16,
    // Held so the profile directory outlives the process.
    _profile: TempDir,
}

impl ChromeSession {
    /// Start Chrome headless on a freshly allocated DevTools port and
    /// wait until the port accepts connections.
    pub async fn launch(binary: &Path) -> Result<Self> {
        let profile = tempfile::tempdir()?;
        let port = allocate_port().await?;
        let args = build_args(port, profile.path());

        tracing::info!(binary = %binary.display(), port, "Launching headless Chrome");
        let child = Command::new(binary)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Launch(format!("Failed to launch Chrome: {}", e)))?;

        let mut session = Self {
            child: Some(child),
            port,
            _profile: profile,
        };

        if let Err(e) = wait_for_devtools(port).await {
            session.release().await;
            return Err(e);
        }

        Ok(session)
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    fn port(&self) -> u16 {
        self.port
    }

    async fn release(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        match child.kill().await {
            Ok(()) => tracing::info!(port = self.port, "Chrome terminated"),
            Err(e) => tracing::warn!(port = self.port, error = %e, "Failed to kill Chrome"),
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // Last-resort termination for paths that never released.
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.start_kill() {
                tracing::warn!(port = self.port, error = %e, "Failed to kill Chrome on drop");
            }
        }
    }
}

/// Reserve a free port for the DevTools endpoint. The listener is
/// dropped before Chrome starts; the readiness wait catches the rare
/// case where something else grabs the port first.
async fn allocate_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    Ok(listener.local_addr()?.port())
}

/// Chrome command-line arguments for one sandboxed audit session.
fn build_args(port: u16, profile: &Path) -> Vec<String> {
    vec![
        "--headless=new".to_string(),
        "--no-sandbox".to_string(),
        "--disable-gpu".to_string(),
        format!("--remote-debugging-port={}", port),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        format!("--user-data-dir={}", profile.display()),
        "about:blank".to_string(),
    ]
}

/// Poll the DevTools port until Chrome answers or attempts run out.
async fn wait_for_devtools(port: u16) -> Result<()> {
    for attempt in 1..=READY_ATTEMPTS {
        match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(_) => {
                tracing::debug!(port, attempt, "DevTools port is accepting connections");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(port, attempt, error = %e, "DevTools port not ready, retrying");
            }
        }
        tokio::time::sleep(READY_BACKOFF).await;
    }

    Err(Error::Launch(format!(
        "Chrome did not open DevTools port {} after {} attempts",
        port, READY_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_sets_headless_flags() {
        let profile = tempfile::tempdir().unwrap();
        let args = build_args(9222, profile.path());

        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-gpu".to_string()));
        assert!(args.contains(&"--remote-debugging-port=9222".to_string()));
        assert!(args.contains(&"--no-first-run".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--user-data-dir=")));
        assert!(args.contains(&"about:blank".to_string()));
    }

    #[tokio::test]
    async fn test_allocated_port_is_nonzero() {
        let port = allocate_port().await.unwrap();
        assert_ne!(port, 0);
    }

    #[tokio::test]
    async fn test_readiness_wait_succeeds_for_listening_port() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        wait_for_devtools(port).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_release_is_idempotent() {
        let child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();

        let mut session = ChromeSession {
            child: Some(child),
            port: 0,
            _profile: tempfile::tempdir().unwrap(),
        };

        session.release().await;
        assert!(session.child.is_none());

        // Second release is a no-op, not a panic or an error.
        session.release().await;
        assert!(session.child.is_none());
    }
}
