//! Errors surfaced by a movie search.

use super::browser::DriverError;

/// Result type for scraping operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Errors that abort a query.
///
/// Absent optional controls (next page button, score) never show up here;
/// they end pagination or default the score instead.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Unsupported browser kind: {0}")]
    UnsupportedBrowserKind(String),

    #[error("Missing browser setting: {0}")]
    MissingSetting(&'static str),

    #[error("Required element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid score text: {0:?}")]
    InvalidScore(String),

    #[error(transparent)]
    Driver(DriverError),
}

impl From<DriverError> for ScrapeError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::ElementNotFound(selector) => ScrapeError::ElementNotFound(selector),
            other => ScrapeError::Driver(other),
        }
    }
}
