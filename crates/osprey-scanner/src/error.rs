use thiserror::Error;

/// Transport-level failure while probing the target. Never surfaces to
/// the audit caller; the scan degrades into an unreachable-host
/// category instead.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("TLS error: {0}")]
    Tls(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
