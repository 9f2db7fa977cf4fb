//! Bridge configuration
//!
//! Parses `config.yaml`:
//!
//! ```yaml
//! bridge:
//!   name: Homebridge
//!   port: 51826
//! accessories:
//!   - accessory: MedionVacuumCleaner
//!     name: Robot
//!     statusUrl: http://10.0.0.5/status
//!     cleanUrl: http://10.0.0.5/clean
//!     chargeUrl: http://10.0.0.5/charge
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::loader::load_yaml;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Settings of the bridge itself, from the `bridge:` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Display name of the bridge
    #[serde(default = "default_name")]
    pub name: String,

    /// Address the API listens on
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the API listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_name() -> String {
    "Homebridge".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    51826
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl BridgeSettings {
    /// `host:port` to bind the API to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// One entry of the `accessories:` list
///
/// Only `accessory` (the plugin identifier) and `name` are interpreted by
/// the bridge; every other key is handed to the plugin untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryEntry {
    /// Identifier of the plugin providing this accessory
    pub accessory: String,

    /// Display name of the accessory
    pub name: String,

    /// Plugin-specific options
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl AccessoryEntry {
    /// The full entry as JSON, as passed to the plugin constructor
    pub fn to_value(&self) -> serde_json::Value {
        let mut object = self.options.clone();
        object.insert(
            "accessory".to_string(),
            serde_json::Value::String(self.accessory.clone()),
        );
        object.insert(
            "name".to_string(),
            serde_json::Value::String(self.name.clone()),
        );
        serde_json::Value::Object(object)
    }
}

/// The complete bridge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub bridge: BridgeSettings,

    #[serde(default)]
    pub accessories: Vec<AccessoryEntry>,
}

impl BridgeConfig {
    /// Load `config.yaml` from a config directory
    pub fn load(config_dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let yaml = load_yaml(config_dir.as_ref(), CONFIG_FILE)?;
        Self::from_yaml(yaml)
    }

    /// Build the configuration from an already resolved YAML value
    pub fn from_yaml(yaml: Value) -> ConfigResult<Self> {
        if yaml.is_null() {
            return Ok(Self::default());
        }
        if !yaml.is_mapping() {
            return Err(ConfigError::InvalidValue {
                key: "root".to_string(),
                reason: "configuration must be a mapping".to_string(),
            });
        }

        let config: BridgeConfig =
            serde_yaml::from_value(yaml).map_err(|e| ConfigError::InvalidValue {
                key: "root".to_string(),
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that accessory names are present and unique
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.accessories {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    message: format!("accessory of type '{}' has an empty name", entry.accessory),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    message: format!("duplicate accessory name '{}'", entry.name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn parse(yaml: &str) -> ConfigResult<BridgeConfig> {
        BridgeConfig::from_yaml(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse("accessories: []\n").unwrap();
        assert_eq!(config.bridge.name, "Homebridge");
        assert_eq!(config.bridge.bind_address(), "0.0.0.0:51826");
        assert!(config.accessories.is_empty());
    }

    #[test]
    fn test_parse_accessories() {
        let config = parse(
            r#"
bridge:
  name: Flat
  host: 127.0.0.1
  port: 8581
accessories:
  - accessory: MedionVacuumCleaner
    name: Robot
    statusUrl: http://10.0.0.5/status
    cleanUrl: http://10.0.0.5/clean
    chargeUrl: http://10.0.0.5/charge
"#,
        )
        .unwrap();

        assert_eq!(config.bridge.bind_address(), "127.0.0.1:8581");
        let entry = &config.accessories[0];
        assert_eq!(entry.accessory, "MedionVacuumCleaner");
        assert_eq!(entry.name, "Robot");
        assert_eq!(entry.options["statusUrl"], json!("http://10.0.0.5/status"));
    }

    #[test]
    fn test_entry_to_value_includes_name() {
        let config = parse(
            "accessories:\n  - accessory: MedionVacuumCleaner\n    name: Robot\n    cleanUrl: http://x/clean\n",
        )
        .unwrap();

        assert_eq!(
            config.accessories[0].to_value(),
            json!({
                "accessory": "MedionVacuumCleaner",
                "name": "Robot",
                "cleanUrl": "http://x/clean",
            })
        );
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result = parse("accessories:\n  - accessory: MedionVacuumCleaner\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = parse(
            r#"
accessories:
  - accessory: MedionVacuumCleaner
    name: Robot
  - accessory: MedionVacuumCleaner
    name: Robot
"#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let result = parse("accessories:\n  - accessory: MedionVacuumCleaner\n    name: ' '\n");
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let result = parse("- just\n- a list\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("secrets.yaml"), "vacuum: http://10.0.0.5\n").unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "accessories:\n  - accessory: MedionVacuumCleaner\n    name: Robot\n    statusUrl: !secret vacuum\n",
        )
        .unwrap();

        let config = BridgeConfig::load(dir.path()).unwrap();
        assert_eq!(
            config.accessories[0].options["statusUrl"],
            json!("http://10.0.0.5")
        );
    }
}
