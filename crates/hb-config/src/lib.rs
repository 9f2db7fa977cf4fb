//! Bridge configuration loading
//!
//! The bridge reads `config.yaml` from its config directory. The file may
//! use a few custom tags:
//!
//! - `!include path` - Include another YAML file (relative to the including file)
//! - `!secret key` - Substitute from `secrets.yaml` in the config directory
//! - `!env_var VAR` - Environment variable substitution
//!
//! # Example
//!
//! ```ignore
//! use hb_config::BridgeConfig;
//!
//! let config = BridgeConfig::load("/etc/homebridge")?;
//! for accessory in &config.accessories {
//!     println!("{} ({})", accessory.name, accessory.accessory);
//! }
//! ```

mod bridge_config;
mod error;
mod loader;
mod secrets;

pub use bridge_config::{AccessoryEntry, BridgeConfig, BridgeSettings, CONFIG_FILE};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use secrets::Secrets;

pub use serde_yaml::Value;
