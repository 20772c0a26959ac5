use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Startup problem: missing credential or unusable FAQ dataset.
    #[error("{0}")]
    Config(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The completion API answered with a non-success status.
    /// `status` is the upstream status line, `detail` the truncated error body.
    #[error("OpenAI error: {status}")]
    Upstream { status: String, detail: String },
    #[error("External API error: {0}")]
    External(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
