//! Accessories published by the bridge and their instance ids
//!
//! Accessory ids (`aid`) follow the order accessories were added, starting
//! at 1. Instance ids (`iid`) are numbered per accessory starting at 1:
//! each service takes one id, followed by one id per characteristic.

use hb_hap::{AccessoryPlugin, Characteristic, Service};
use std::sync::Arc;
use tracing::info;

/// A characteristic resolved from an `aid.iid` pair
pub struct Located<'a> {
    pub accessory: &'a dyn AccessoryPlugin,
    pub characteristic: &'a Characteristic,
}

/// The set of accessories the bridge publishes
pub struct Bridge {
    name: String,
    accessories: Vec<Arc<dyn AccessoryPlugin>>,
}

impl Bridge {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessories: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publish an accessory, returning its `aid`
    pub fn add_accessory(&mut self, accessory: Arc<dyn AccessoryPlugin>) -> u64 {
        self.accessories.push(accessory);
        let aid = self.accessories.len() as u64;
        info!(
            bridge = %self.name,
            accessory = %self.accessories[self.accessories.len() - 1].name(),
            aid,
            "Accessory published"
        );
        aid
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }

    pub fn accessory(&self, aid: u64) -> Option<&dyn AccessoryPlugin> {
        let index = usize::try_from(aid).ok()?.checked_sub(1)?;
        self.accessories.get(index).map(|a| a.as_ref())
    }

    /// Accessories with their `aid`
    pub fn accessories(&self) -> impl Iterator<Item = (u64, &dyn AccessoryPlugin)> {
        self.accessories
            .iter()
            .enumerate()
            .map(|(i, a)| (i as u64 + 1, a.as_ref()))
    }

    /// Resolve an `aid.iid` pair to a characteristic
    pub fn locate(&self, aid: u64, iid: u64) -> Option<Located<'_>> {
        let accessory = self.accessory(aid)?;
        let characteristic = numbered_services(accessory)
            .into_iter()
            .flat_map(numbered_characteristics)
            .find(|(id, _)| *id == iid)
            .map(|(_, c)| c)?;

        Some(Located {
            accessory,
            characteristic,
        })
    }
}

/// Services of an accessory with their `iid`
pub fn numbered_services(accessory: &dyn AccessoryPlugin) -> Vec<(u64, &Service)> {
    let mut next = 1;
    accessory
        .services()
        .into_iter()
        .map(|service| {
            let iid = next;
            next += 1 + service.characteristics().len() as u64;
            (iid, service)
        })
        .collect()
}

/// Characteristics of a numbered service with their `iid`
pub fn numbered_characteristics<'a>(
    (service_iid, service): (u64, &'a Service),
) -> impl Iterator<Item = (u64, &'a Characteristic)> + 'a {
    service
        .characteristics()
        .iter()
        .enumerate()
        .map(move |(i, c)| (service_iid + 1 + i as u64, c))
}
