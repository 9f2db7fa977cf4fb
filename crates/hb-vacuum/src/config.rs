use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request timeout used when `requestTimeout` is not configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 10.0;

/// Configuration of one vacuum cleaner accessory
///
/// The URLs are used as given; they are not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacuumConfig {
    /// Display name of the switch
    pub name: String,

    /// Returns JSON with a `charging` field
    pub status_url: String,

    /// Starts a cleaning run
    pub clean_url: String,

    /// Sends the vacuum back to its charging station
    pub charge_url: String,

    /// Timeout for each request to the device, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: f64,
}

fn default_request_timeout() -> f64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl VacuumConfig {
    pub fn new(
        name: impl Into<String>,
        status_url: impl Into<String>,
        clean_url: impl Into<String>,
        charge_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status_url: status_url.into(),
            clean_url: clean_url.into(),
            charge_url: charge_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout.as_secs_f64();
        self
    }

    /// Effective request timeout; non-positive values fall back to the default
    pub fn timeout(&self) -> Duration {
        if self.request_timeout.is_finite() && self.request_timeout > 0.0 {
            Duration::from_secs_f64(self.request_timeout)
        } else {
            Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS)
        }
    }

    /// URL to call for the requested switch state
    pub fn command_url(&self, clean: bool) -> &str {
        if clean {
            &self.clean_url
        } else {
            &self.charge_url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case() {
        let config: VacuumConfig = serde_json::from_value(json!({
            "accessory": "MedionVacuumCleaner",
            "name": "Robot",
            "statusUrl": "http://10.0.0.5/status",
            "cleanUrl": "http://10.0.0.5/clean",
            "chargeUrl": "http://10.0.0.5/charge",
        }))
        .unwrap();

        assert_eq!(config.name, "Robot");
        assert_eq!(config.status_url, "http://10.0.0.5/status");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let result: Result<VacuumConfig, _> = serde_json::from_value(json!({
            "name": "Robot",
            "statusUrl": "http://10.0.0.5/status",
            "cleanUrl": "http://10.0.0.5/clean",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_timeout() {
        let config: VacuumConfig = serde_json::from_value(json!({
            "name": "Robot",
            "statusUrl": "a",
            "cleanUrl": "b",
            "chargeUrl": "c",
            "requestTimeout": 2.5,
        }))
        .unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let mut config = VacuumConfig::new("Robot", "a", "b", "c");
        config.request_timeout = -1.0;
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_urls_are_not_validated() {
        let config = VacuumConfig::new("Robot", "not a url", "", "ftp://odd");
        assert_eq!(config.command_url(true), "");
        assert_eq!(config.command_url(false), "ftp://odd");
    }
}
