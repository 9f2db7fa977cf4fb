use reqwest::StatusCode;
use thiserror::Error;

pub type VacuumResult<T> = Result<T, VacuumError>;

/// Failures talking to the vacuum's web interface
#[derive(Debug, Error)]
pub enum VacuumError {
    /// The device answered with something other than 200
    #[error("{url} returned error: {}", status_text(.status))]
    Status { url: String, status: StatusCode },

    /// Connection, DNS or timeout failure
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The status body could not be decoded as JSON
    #[error("invalid status payload from {url}: {source}")]
    InvalidPayload {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl VacuumError {
    pub fn url(&self) -> &str {
        match self {
            VacuumError::Status { url, .. }
            | VacuumError::Request { url, .. }
            | VacuumError::InvalidPayload { url, .. } => url,
        }
    }

    /// Reason phrase of a non-200 response, if this is one
    pub fn status_text(&self) -> Option<String> {
        match self {
            VacuumError::Status { status, .. } => Some(status_text(status)),
            _ => None,
        }
    }
}

pub(crate) fn status_text(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.as_str().to_string(),
    }
}
