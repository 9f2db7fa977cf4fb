//! Core types for the HomeKit bridge
//!
//! This crate provides the HomeKit vocabulary shared by every other crate in
//! the workspace: service and characteristic types, characteristic values,
//! HAP status errors and the per-accessory [`Logger`].

mod logger;
mod status;
mod types;
mod value;

pub use logger::Logger;
pub use status::{HapStatusError, HapStatusResult};
pub use types::{CharacteristicType, Format, Permission, ServiceType};
pub use value::CharacteristicValue;

/// Base UUID suffix shared by all Apple-defined HAP types
pub const HAP_BASE_UUID_SUFFIX: &str = "-0000-1000-8000-0026BB765291";

/// Serial number reported when an accessory does not provide one
pub const DEFAULT_SERIAL_NUMBER: &str = "Default-SerialNumber";

/// Target used for all accessory log events
pub const LOG_TARGET: &str = "homebridge";
