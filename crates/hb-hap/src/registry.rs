//! Accessory plugin registry
//!
//! Plugins register a constructor under an identifier (e.g.
//! "MedionVacuumCleaner"). The host looks the identifier up for each
//! configured accessory and calls the constructor with the accessory's
//! logger, raw configuration and the capability factory.

use dashmap::DashMap;
use hb_core::Logger;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::capabilities::CapabilityFactory;
use crate::plugin::AccessoryPlugin;

/// Result type for registry operations
pub type HapResult<T> = Result<T, HapError>;

/// Accessory constructor function type
pub type AccessoryConstructor = Arc<
    dyn Fn(Logger, serde_json::Value, Arc<dyn CapabilityFactory>) -> HapResult<Arc<dyn AccessoryPlugin>>
        + Send
        + Sync,
>;

/// Errors that can occur when creating accessories
#[derive(Debug, Clone, Error)]
pub enum HapError {
    #[error("no accessory registered as '{identifier}'")]
    UnknownAccessory { identifier: String },

    #[error("invalid configuration for accessory '{identifier}': {reason}")]
    InvalidConfig { identifier: String, reason: String },
}

/// The registry of accessory plugins known to the host
pub struct AccessoryRegistry {
    constructors: DashMap<String, AccessoryConstructor>,
}

impl AccessoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            constructors: DashMap::new(),
        }
    }

    /// Register an accessory constructor under an identifier
    ///
    /// Registering the same identifier twice replaces the earlier constructor.
    #[instrument(skip(self, identifier, constructor))]
    pub fn register_accessory<F>(&self, identifier: impl Into<String>, constructor: F)
    where
        F: Fn(Logger, serde_json::Value, Arc<dyn CapabilityFactory>) -> HapResult<Arc<dyn AccessoryPlugin>>
            + Send
            + Sync
            + 'static,
    {
        let identifier = identifier.into();
        debug!(identifier = %identifier, "Registering accessory");

        if self
            .constructors
            .insert(identifier.clone(), Arc::new(constructor))
            .is_some()
        {
            warn!(identifier = %identifier, "Accessory was already registered, replacing it");
        }
    }

    /// Create an accessory instance from its raw configuration
    #[instrument(skip(self, config, capabilities), fields(accessory = %logger.prefix()))]
    pub fn create(
        &self,
        identifier: &str,
        logger: Logger,
        config: serde_json::Value,
        capabilities: Arc<dyn CapabilityFactory>,
    ) -> HapResult<Arc<dyn AccessoryPlugin>> {
        let constructor = self
            .constructors
            .get(identifier)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                warn!(identifier = %identifier, "Accessory not registered");
                HapError::UnknownAccessory {
                    identifier: identifier.to_string(),
                }
            })?;

        debug!(identifier = %identifier, "Creating accessory");
        constructor(logger, config, capabilities)
    }

    /// Check if an identifier is registered
    pub fn is_registered(&self, identifier: &str) -> bool {
        self.constructors.contains_key(identifier)
    }

    /// All registered identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<_> = self
            .constructors
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        identifiers.sort();
        identifiers
    }
}

impl Default for AccessoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
