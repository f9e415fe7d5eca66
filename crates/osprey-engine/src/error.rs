use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to start Lighthouse: {0}")]
    Spawn(String),

    #[error("Lighthouse run failed: {0}")]
    Failed(String),

    #[error("Failed to parse Lighthouse report: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Category missing from Lighthouse report: {0}")]
    MissingCategory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
