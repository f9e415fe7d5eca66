use thiserror::Error;

/// Failure taxonomy for one audit request. Security-scan problems are
/// absent on purpose: they degrade inside the scanner and never reach
/// this level.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Malformed or missing URL, rejected before any resource is
    /// acquired.
    #[error("A valid URL is required.")]
    InvalidInput,

    /// The headless browser could not be started.
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(#[from] osprey_browser::Error),

    /// The performance engine failed, returned a malformed report, or
    /// the scan phase timed out.
    #[error("Scan execution failed: {0}")]
    ScanExecution(String),
}

impl From<osprey_engine::Error> for AuditError {
    fn from(err: osprey_engine::Error) -> Self {
        AuditError::ScanExecution(err.to_string())
    }
}
