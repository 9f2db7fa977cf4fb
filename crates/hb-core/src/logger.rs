//! Per-accessory logger handed to accessories by the host

use std::fmt::Display;
use std::sync::Arc;

use crate::LOG_TARGET;

/// Logger for a single accessory
///
/// Every event is emitted through `tracing` under the `homebridge` target
/// with the accessory's display name attached as the `accessory` field, so
/// subscribers can filter per accessory.
#[derive(Debug, Clone)]
pub struct Logger {
    prefix: Arc<str>,
}

impl Logger {
    /// Create a logger for the accessory with the given display name
    pub fn new(prefix: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn debug(&self, message: impl Display) {
        tracing::debug!(target: LOG_TARGET, accessory = %self.prefix, "{}", message);
    }

    pub fn info(&self, message: impl Display) {
        tracing::info!(target: LOG_TARGET, accessory = %self.prefix, "{}", message);
    }

    pub fn warn(&self, message: impl Display) {
        tracing::warn!(target: LOG_TARGET, accessory = %self.prefix, "{}", message);
    }

    pub fn error(&self, message: impl Display) {
        tracing::error!(target: LOG_TARGET, accessory = %self.prefix, "{}", message);
    }
}
