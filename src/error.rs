use thiserror::Error;

/// Failures talking to the referral backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Backend rejected request: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid referrals page pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid URL in config: {0}")]
    Url(#[from] url::ParseError),
}
