//! HAP status errors reported back to controllers

use thiserror::Error;

/// Result type for characteristic reads and writes
pub type HapStatusResult<T> = Result<T, HapStatusError>;

/// Errors a characteristic read or write can report to the host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapStatusError {
    #[error("unable to communicate with the requested service")]
    ServiceCommunicationFailure,

    #[error("cannot write to a read-only characteristic")]
    ReadOnlyCharacteristic,

    #[error("cannot read from a write-only characteristic")]
    WriteOnlyCharacteristic,

    #[error("the requested resource does not exist")]
    ResourceDoesNotExist,

    #[error("invalid value in request")]
    InvalidValueInRequest,
}

impl HapStatusError {
    /// Numeric HAP status code
    pub fn code(&self) -> i32 {
        match self {
            HapStatusError::ServiceCommunicationFailure => -70402,
            HapStatusError::ReadOnlyCharacteristic => -70404,
            HapStatusError::WriteOnlyCharacteristic => -70405,
            HapStatusError::ResourceDoesNotExist => -70409,
            HapStatusError::InvalidValueInRequest => -70410,
        }
    }
}
