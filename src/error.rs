use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Missing API key. Set ANTHROPIC_API_KEY")]
    MissingApiKey,

    #[error("Anthropic API rejected the configured key")]
    UpstreamAuth,

    #[error("Anthropic API error: status {0}")]
    Upstream(u16),

    #[error("Anthropic API did not answer in time")]
    UpstreamTimeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}
