//! Medion robotic vacuum cleaner accessory
//!
//! HomeKit has no vacuum cleaner service, so the vacuum is published as a
//! switch: `On` means cleaning, `Off` means charging. Reads poll the
//! device's status URL; writes call its clean or charge URL.
//!
//! The accessory never reports errors to the host. Failed status queries
//! read as `Off`, failed commands still complete successfully, and the
//! failure is only visible in the logs.

mod accessory;
mod client;
mod config;
mod error;
mod status;

pub use accessory::{VacuumAccessory, MANUFACTURER, MODEL};
pub use client::DeviceClient;
pub use config::{VacuumConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::{VacuumError, VacuumResult};
pub use status::DeviceStatus;

use hb_hap::{AccessoryPlugin, AccessoryRegistry, HapError};
use std::sync::Arc;

/// Identifier used in the `accessory:` key of the bridge configuration
pub const PLUGIN_IDENTIFIER: &str = "MedionVacuumCleaner";

/// Register the vacuum accessory with the host's registry
pub fn register(registry: &AccessoryRegistry) {
    registry.register_accessory(PLUGIN_IDENTIFIER, |log, config, capabilities| {
        let config: VacuumConfig =
            serde_json::from_value(config).map_err(|e| HapError::InvalidConfig {
                identifier: PLUGIN_IDENTIFIER.to_string(),
                reason: e.to_string(),
            })?;

        let accessory = VacuumAccessory::new(log, config, capabilities.as_ref());
        Ok(Arc::new(accessory) as Arc<dyn AccessoryPlugin>)
    });
}
