use crate::error::AuditError;
use osprey_browser::Browser;
use osprey_core::Report;
use osprey_engine::{PerformanceEngine, run_performance_audit};
use osprey_scanner::SecurityScanner;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Orchestrates one audit: input validation, browser acquisition, the
/// two concurrent scans, and the merge into a report.
pub struct Auditor {
    browser: Arc<dyn Browser>,
    engine: Arc<dyn PerformanceEngine>,
    scanner: Arc<dyn SecurityScanner>,
    scan_timeout: Duration,
}

impl Auditor {
    pub fn new(
        browser: Arc<dyn Browser>,
        engine: Arc<dyn PerformanceEngine>,
        scanner: Arc<dyn SecurityScanner>,
        scan_timeout: Duration,
    ) -> Self {
        Self {
            browser,
            engine,
            scanner,
            scan_timeout,
        }
    }

    /// Run the full audit for one URL. The browser session is released
    /// exactly once on every path out of this function, so a scan
    /// failure or timeout cannot leak a Chrome process.
    pub async fn run_audit(&self, raw_url: &str) -> Result<Report, AuditError> {
        let url = validate_url(raw_url)?;

        let mut session = self.browser.acquire().await?;
        tracing::info!(url = %url, port = session.port(), "Browser session acquired");

        let result = tokio::time::timeout(self.scan_timeout, self.run_scans(&url, session.port()))
            .await
            .unwrap_or_else(|_| {
                Err(AuditError::ScanExecution(format!(
                    "Scans did not finish within {}s",
                    self.scan_timeout.as_secs()
                )))
            });

        session.release().await;

        result
    }

    /// The two scans share nothing and run concurrently; the security
    /// scan cannot fail, so only the performance side decides success.
    async fn run_scans(&self, url: &Url, devtools_port: u16) -> Result<Report, AuditError> {
        let (performance, security) = tokio::join!(
            run_performance_audit(self.engine.as_ref(), url, devtools_port),
            self.scanner.scan(url),
        );
        let categories = performance?;

        Ok(Report {
            security,
            performance: categories.performance,
            seo: categories.seo,
            accessibility: categories.accessibility,
        })
    }
}

/// Accept only well-formed absolute HTTP(S) URLs.
fn validate_url(raw: &str) -> Result<Url, AuditError> {
    let url = Url::parse(raw).map_err(|_| AuditError::InvalidInput)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(AuditError::InvalidInput),
    }
}
