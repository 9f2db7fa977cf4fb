//! Host capability layer for HomeKit accessories
//!
//! This crate provides what an accessory plugin needs from its host:
//!
//! - [`Service`] and [`Characteristic`] descriptors, where characteristics
//!   carry async GET/SET handlers registered by the accessory
//! - the [`CapabilityFactory`] seam accessories use to build their services
//! - the [`AccessoryPlugin`] trait the host drives
//! - the [`AccessoryRegistry`] mapping plugin identifiers to constructors

mod capabilities;
mod characteristic;
mod plugin;
mod registry;
mod service;

pub use capabilities::{CapabilityFactory, HapCapabilities};
pub use characteristic::{Characteristic, GetFuture, GetHandler, SetFuture, SetHandler};
pub use plugin::AccessoryPlugin;
pub use registry::{AccessoryConstructor, AccessoryRegistry, HapError, HapResult};
pub use service::Service;
