#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Subscribers API returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid subscribers response: {0}")]
    Decode(#[from] serde_json::Error),
}
