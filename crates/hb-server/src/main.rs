//! Homebridge-style bridge server
//!
//! Loads `config.yaml` from the config directory, creates the configured
//! accessories and serves them over the HAP JSON API.

use anyhow::{Context, Result};
use hb_api::{AppState, Bridge};
use hb_config::BridgeConfig;
use hb_core::Logger;
use hb_hap::{AccessoryRegistry, CapabilityFactory, HapCapabilities, HapError};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the config directory
const CONFIG_DIR_ENV: &str = "HOMEBRIDGE_CONFIG_DIR";

/// Registry with every accessory plugin this binary ships
fn plugin_registry() -> AccessoryRegistry {
    let registry = AccessoryRegistry::new();
    hb_vacuum::register(&registry);
    registry
}

/// Create the configured accessories and publish them on a bridge
///
/// Entries naming an unknown plugin are skipped; invalid plugin
/// configuration aborts startup.
fn build_bridge(config: &BridgeConfig, registry: &AccessoryRegistry) -> Result<Bridge> {
    let capabilities: Arc<dyn CapabilityFactory> = Arc::new(HapCapabilities);
    let mut bridge = Bridge::new(config.bridge.name.clone());

    for entry in &config.accessories {
        let accessory = match registry.create(
            &entry.accessory,
            Logger::new(entry.name.as_str()),
            entry.to_value(),
            capabilities.clone(),
        ) {
            Ok(accessory) => accessory,
            Err(HapError::UnknownAccessory { identifier }) => {
                warn!(
                    accessory = %entry.name,
                    "No plugin registered for accessory type '{}', skipping",
                    identifier
                );
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create accessory '{}'", entry.name))
            }
        };
        bridge.add_accessory(accessory);
    }

    Ok(bridge)
}

fn config_dir() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_DIR_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_dir = config_dir();
    info!("Loading configuration from {}", config_dir.display());

    let config = BridgeConfig::load(&config_dir)
        .with_context(|| format!("Failed to load configuration from {}", config_dir.display()))?;

    let registry = plugin_registry();
    info!("Registered plugins: {:?}", registry.identifiers());

    let bridge = build_bridge(&config, &registry)?;
    if bridge.is_empty() {
        warn!("No accessories configured");
    }
    info!(
        "Bridge '{}' initialized with {} accessories",
        bridge.name(),
        bridge.len()
    );

    let addr = config.bridge.bind_address();
    let server = hb_api::start_server(AppState::new(bridge), &addr);

    tokio::select! {
        result = server => {
            if let Err(ref e) = result {
                error!("API server stopped: {}", e);
            }
            result.with_context(|| format!("Failed to serve on {}", addr))?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            info!("Shutting down...");
        }
    }

    Ok(())
}
