//! HTTP client for the vacuum's local web interface

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{VacuumError, VacuumResult};
use crate::status::DeviceStatus;

/// Issues plain GET requests against the device
///
/// One request per call; no retries, headers or query parameters.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: Client,
}

impl DeviceClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
            Client::new()
        });

        Self { client }
    }

    /// GET the status URL and read the `charging` field of its JSON body
    pub async fn fetch_status(&self, url: &str) -> VacuumResult<DeviceStatus> {
        // A 200 whose body is not JSON (empty, "OK", HTML) is an error and
        // reads as off. JSON `null` or a non-object body has no `charging`
        // field and reads as on.
        let json: serde_json::Value = self.get(url).await?.json().await.map_err(|e| {
            if e.is_decode() {
                VacuumError::InvalidPayload {
                    url: url.to_string(),
                    source: e,
                }
            } else {
                VacuumError::Request {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = DeviceStatus::from_body(&json);
        debug!(url = %url, status = %status, "Device status received");
        Ok(status)
    }

    /// GET a command URL; the body is ignored
    pub async fn send_command(&self, url: &str) -> VacuumResult<()> {
        self.get(url).await.map(|_| ())
    }

    async fn get(&self, url: &str) -> VacuumResult<reqwest::Response> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VacuumError::Request {
                url: url.to_string(),
                source: e,
            })?;

        if response.status() != StatusCode::OK {
            return Err(VacuumError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response)
    }
}
