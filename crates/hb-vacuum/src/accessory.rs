//! The vacuum cleaner accessory

use hb_core::{CharacteristicType, CharacteristicValue, Logger};
use hb_hap::{AccessoryPlugin, CapabilityFactory, Service};
use std::sync::Arc;

use crate::client::DeviceClient;
use crate::config::VacuumConfig;
use crate::error::{VacuumError, VacuumResult};

pub const MANUFACTURER: &str = "Medion";
pub const MODEL: &str = "Vacuum Cleaner";

/// A robotic vacuum cleaner published as a HomeKit switch
pub struct VacuumAccessory {
    device: Arc<Device>,
    information: Service,
    switch: Service,
}

/// State shared with the characteristic handlers; immutable after construction
struct Device {
    log: Logger,
    config: VacuumConfig,
    client: DeviceClient,
}

impl VacuumAccessory {
    /// Build the accessory and wire its `On` characteristic
    ///
    /// No requests are made here.
    pub fn new(log: Logger, config: VacuumConfig, capabilities: &dyn CapabilityFactory) -> Self {
        let client = DeviceClient::new(config.timeout());
        let device = Arc::new(Device {
            log,
            config,
            client,
        });

        let mut switch = capabilities.switch_service(&device.config.name);
        let get_device = device.clone();
        let set_device = device.clone();
        switch
            .get_characteristic(CharacteristicType::On)
            .on_get(move || {
                let device = get_device.clone();
                async move { Ok(CharacteristicValue::Bool(device.handle_get().await)) }
            })
            .on_set(move |value| {
                let device = set_device.clone();
                async move {
                    device.handle_set(value.as_bool().unwrap_or(false)).await;
                    Ok(())
                }
            });

        let information = capabilities
            .information_service()
            .set_characteristic(CharacteristicType::Manufacturer, MANUFACTURER)
            .set_characteristic(CharacteristicType::Model, MODEL);

        device.log.info("Vacuum cleaner finished initializing!");

        Self {
            device,
            information,
            switch,
        }
    }

    pub fn config(&self) -> &VacuumConfig {
        &self.device.config
    }

    /// Query the device; `true` while cleaning
    pub async fn query_status(&self) -> VacuumResult<bool> {
        self.device.query_status().await
    }

    /// Ask the device to clean (`true`) or return to its charger (`false`)
    pub async fn send_command(&self, clean: bool) -> VacuumResult<()> {
        self.device.send_command(clean).await
    }

    /// GET handler: the current `On` value, `false` if the query failed
    pub async fn handle_get(&self) -> bool {
        self.device.handle_get().await
    }

    /// SET handler: issue the command; failures are only logged
    pub async fn handle_set(&self, clean: bool) {
        self.device.handle_set(clean).await
    }
}

impl Device {
    async fn query_status(&self) -> VacuumResult<bool> {
        let status = self.client.fetch_status(&self.config.status_url).await?;
        Ok(status.is_on())
    }

    async fn send_command(&self, clean: bool) -> VacuumResult<()> {
        self.client
            .send_command(self.config.command_url(clean))
            .await
    }

    async fn handle_get(&self) -> bool {
        // Off on any failure
        let on = match self.query_status().await {
            Ok(on) => on,
            Err(VacuumError::Status { ref status, .. }) => {
                self.log.error(format!(
                    "Status URL returned error: {}",
                    crate::error::status_text(status)
                ));
                false
            }
            Err(err) => {
                self.log.error(format!("Failed to get the status: {}", err));
                false
            }
        };

        self.log.info(format!(
            "Current state of the vacuum was returned: {}",
            if on { "Cleaning" } else { "Charging" }
        ));
        on
    }

    async fn handle_set(&self, clean: bool) {
        match self.send_command(clean).await {
            Ok(()) => self.log.info(format!(
                "Switch state was set to: {}",
                if clean { "Clean" } else { "Charge" }
            )),
            Err(err @ VacuumError::Status { .. }) => self.log.error(err),
            Err(err) => self.log.error(format!(
                "Failed to send command to {}: {}",
                err.url(),
                err
            )),
        }
    }
}

impl AccessoryPlugin for VacuumAccessory {
    fn name(&self) -> &str {
        &self.device.config.name
    }

    fn identify(&self) {
        self.device.log.info("Identify!");
    }

    fn services(&self) -> Vec<&Service> {
        vec![&self.information, &self.switch]
    }
}
