//! HomeKit service and characteristic type definitions
//!
//! Only the types needed by the bridge's accessories are defined here. Short
//! codes and formats are the ones Apple assigns in HomeKit Accessory Protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::HAP_BASE_UUID_SUFFIX;

/// A HomeKit service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    AccessoryInformation,
    Switch,
}

impl ServiceType {
    /// Short HAP type code (e.g. "3E")
    pub fn short_code(&self) -> &'static str {
        match self {
            ServiceType::AccessoryInformation => "3E",
            ServiceType::Switch => "49",
        }
    }

    /// Full HAP type UUID
    pub fn uuid(&self) -> String {
        full_uuid(self.short_code())
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceType::AccessoryInformation => "AccessoryInformation",
            ServiceType::Switch => "Switch",
        };
        f.write_str(name)
    }
}

/// Value format of a characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Bool,
    String,
}

/// Access permission of a characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    /// Paired read
    #[serde(rename = "pr")]
    Read,
    /// Paired write
    #[serde(rename = "pw")]
    Write,
    /// Event notifications
    #[serde(rename = "ev")]
    Events,
}

/// A HomeKit characteristic type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacteristicType {
    Identify,
    Manufacturer,
    Model,
    Name,
    SerialNumber,
    FirmwareRevision,
    On,
}

impl CharacteristicType {
    /// Short HAP type code (e.g. "25" for On)
    pub fn short_code(&self) -> &'static str {
        match self {
            CharacteristicType::Identify => "14",
            CharacteristicType::Manufacturer => "20",
            CharacteristicType::Model => "21",
            CharacteristicType::Name => "23",
            CharacteristicType::SerialNumber => "30",
            CharacteristicType::FirmwareRevision => "52",
            CharacteristicType::On => "25",
        }
    }

    /// Full HAP type UUID
    pub fn uuid(&self) -> String {
        full_uuid(self.short_code())
    }

    pub fn format(&self) -> Format {
        match self {
            CharacteristicType::Identify | CharacteristicType::On => Format::Bool,
            _ => Format::String,
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            CharacteristicType::Identify => &[Permission::Write],
            CharacteristicType::On => &[Permission::Read, Permission::Write, Permission::Events],
            _ => &[Permission::Read],
        }
    }

    pub fn is_readable(&self) -> bool {
        self.permissions().contains(&Permission::Read)
    }

    pub fn is_writable(&self) -> bool {
        self.permissions().contains(&Permission::Write)
    }
}

impl fmt::Display for CharacteristicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharacteristicType::Identify => "Identify",
            CharacteristicType::Manufacturer => "Manufacturer",
            CharacteristicType::Model => "Model",
            CharacteristicType::Name => "Name",
            CharacteristicType::SerialNumber => "SerialNumber",
            CharacteristicType::FirmwareRevision => "FirmwareRevision",
            CharacteristicType::On => "On",
        };
        f.write_str(name)
    }
}

fn full_uuid(short_code: &str) -> String {
    format!("{:0>8}{}", short_code, HAP_BASE_UUID_SUFFIX)
}
