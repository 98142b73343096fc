use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Series too short for a requested window, lookback or split.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The upstream provider answered but had nothing for the request.
    #[error("No data: {0}")]
    NoData(String),

    /// Quote, overview or chat provider unreachable or returned a malformed payload.
    #[error("Upstream fetch error: {0}")]
    Upstream(String),

    #[error("Model error: {0}")]
    Model(String),
}
