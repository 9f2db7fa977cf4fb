use crate::service::Service;

/// An accessory the host can publish
pub trait AccessoryPlugin: Send + Sync {
    /// Display name of the accessory
    fn name(&self) -> &str;

    /// Called when a controller asks the accessory to identify itself,
    /// typically during pairing
    fn identify(&self);

    /// Services to attach to the accessory, in a stable order
    fn services(&self) -> Vec<&Service>;
}
