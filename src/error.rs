//! Error types for talk extraction

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Error types for talk extraction operations
///
/// Failures on the GraphQL path (`Transport`, `Graphql`, `NoData`, `Decode`)
/// trigger the HTML fallback inside the extractor; `NoData` from the fallback
/// itself is terminal.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("invalid TED talk URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no video or subtitle data found")]
    NoData,

    #[error("no talk found for: {0}")]
    NoResults(String),
}
