//! Capability factories accessories use to build their services

use hb_core::{CharacteristicType, ServiceType, DEFAULT_SERIAL_NUMBER};

use crate::service::Service;

/// Host-provided constructors for service descriptors
///
/// Accessories depend on this trait rather than on concrete host types, so
/// tests can substitute a double.
pub trait CapabilityFactory: Send + Sync {
    /// Create an accessory information service
    fn information_service(&self) -> Service;

    /// Create a switch service with the given display name and an `On`
    /// characteristic
    fn switch_service(&self, name: &str) -> Service;
}

/// The bridge's own capability factory
#[derive(Debug, Clone, Copy, Default)]
pub struct HapCapabilities;

impl CapabilityFactory for HapCapabilities {
    fn information_service(&self) -> Service {
        let mut service = Service::new(ServiceType::AccessoryInformation, "")
            .set_characteristic(CharacteristicType::Manufacturer, "Default-Manufacturer")
            .set_characteristic(CharacteristicType::Model, "Default-Model")
            .set_characteristic(CharacteristicType::SerialNumber, DEFAULT_SERIAL_NUMBER);
        service.get_characteristic(CharacteristicType::Identify);
        service
    }

    fn switch_service(&self, name: &str) -> Service {
        Service::new(ServiceType::Switch, name)
            .set_characteristic(CharacteristicType::Name, name)
            .set_characteristic(CharacteristicType::On, false)
    }
}
