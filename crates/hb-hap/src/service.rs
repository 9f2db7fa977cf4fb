//! Service descriptors

use hb_core::{CharacteristicType, CharacteristicValue, ServiceType};

use crate::characteristic::Characteristic;

/// A bundle of characteristics representing one capability of an accessory
#[derive(Debug)]
pub struct Service {
    kind: ServiceType,
    name: String,
    characteristics: Vec<Characteristic>,
}

impl Service {
    pub fn new(kind: ServiceType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            characteristics: Vec::new(),
        }
    }

    pub fn kind(&self) -> ServiceType {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a static characteristic value, adding the characteristic if needed
    pub fn set_characteristic(
        mut self,
        kind: CharacteristicType,
        value: impl Into<CharacteristicValue>,
    ) -> Self {
        self.get_characteristic(kind).set_value(value);
        self
    }

    /// Get a characteristic for handler registration, adding it if needed
    pub fn get_characteristic(&mut self, kind: CharacteristicType) -> &mut Characteristic {
        let index = match self.characteristics.iter().position(|c| c.kind() == kind) {
            Some(index) => index,
            None => {
                self.characteristics.push(Characteristic::new(kind));
                self.characteristics.len() - 1
            }
        };
        &mut self.characteristics[index]
    }

    pub fn characteristic(&self, kind: CharacteristicType) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.kind() == kind)
    }

    /// Characteristics in insertion order
    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }
}
