//! Characteristics with host-driven GET/SET handlers

use hb_core::{CharacteristicType, CharacteristicValue, Format, HapStatusError, HapStatusResult};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

/// Future returned by a GET handler
pub type GetFuture = Pin<Box<dyn Future<Output = HapStatusResult<CharacteristicValue>> + Send>>;

/// GET handler function type
pub type GetHandler = Arc<dyn Fn() -> GetFuture + Send + Sync>;

/// Future returned by a SET handler
pub type SetFuture = Pin<Box<dyn Future<Output = HapStatusResult<()>> + Send>>;

/// SET handler function type
pub type SetHandler = Arc<dyn Fn(CharacteristicValue) -> SetFuture + Send + Sync>;

/// A single observable/settable value of a service
///
/// Reads go through the GET handler when one is registered, otherwise the
/// last stored value is returned. Writes are coerced to the characteristic's
/// format and passed to the SET handler. The written value is stored only
/// when there is no GET handler; a handler-backed characteristic keeps no
/// state of its own.
pub struct Characteristic {
    kind: CharacteristicType,
    value: RwLock<Option<CharacteristicValue>>,
    get_handler: Option<GetHandler>,
    set_handler: Option<SetHandler>,
}

impl Characteristic {
    pub fn new(kind: CharacteristicType) -> Self {
        Self {
            kind,
            value: RwLock::new(None),
            get_handler: None,
            set_handler: None,
        }
    }

    pub fn with_value(kind: CharacteristicType, value: impl Into<CharacteristicValue>) -> Self {
        Self {
            kind,
            value: RwLock::new(Some(value.into())),
            get_handler: None,
            set_handler: None,
        }
    }

    pub fn kind(&self) -> CharacteristicType {
        self.kind
    }

    /// Register the handler invoked when the host reads this characteristic
    pub fn on_get<F, Fut>(&mut self, handler: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HapStatusResult<CharacteristicValue>> + Send + 'static,
    {
        self.get_handler = Some(Arc::new(move || Box::pin(handler()) as GetFuture));
        self
    }

    /// Register the handler invoked when the host writes this characteristic
    pub fn on_set<F, Fut>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(CharacteristicValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HapStatusResult<()>> + Send + 'static,
    {
        self.set_handler = Some(Arc::new(move |value| Box::pin(handler(value)) as SetFuture));
        self
    }

    pub fn has_get_handler(&self) -> bool {
        self.get_handler.is_some()
    }

    pub fn has_set_handler(&self) -> bool {
        self.set_handler.is_some()
    }

    /// Replace the stored value without invoking any handler
    pub fn set_value(&self, value: impl Into<CharacteristicValue>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value.into());
    }

    /// The stored value, ignoring any GET handler
    pub fn value(&self) -> Option<CharacteristicValue> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read the current value as the host would
    pub async fn read(&self) -> HapStatusResult<CharacteristicValue> {
        if !self.kind.is_readable() {
            return Err(HapStatusError::WriteOnlyCharacteristic);
        }

        if let Some(handler) = self.get_handler.clone() {
            trace!(characteristic = %self.kind, "Invoking GET handler");
            return handler().await;
        }

        Ok(self.value().unwrap_or_else(|| default_value(self.kind.format())))
    }

    /// Write a value as the host would
    pub async fn write(&self, value: CharacteristicValue) -> HapStatusResult<()> {
        if !self.kind.is_writable() {
            return Err(HapStatusError::ReadOnlyCharacteristic);
        }

        let value = value
            .coerce(self.kind.format())
            .ok_or(HapStatusError::InvalidValueInRequest)?;

        if let Some(handler) = self.set_handler.clone() {
            trace!(characteristic = %self.kind, value = %value, "Invoking SET handler");
            handler(value.clone()).await?;
        }

        if self.get_handler.is_none() {
            self.set_value(value);
        }
        Ok(())
    }
}

impl fmt::Debug for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Characteristic")
            .field("kind", &self.kind)
            .field("value", &self.value())
            .field("get_handler", &self.get_handler.is_some())
            .field("set_handler", &self.set_handler.is_some())
            .finish()
    }
}

fn default_value(format: Format) -> CharacteristicValue {
    match format {
        Format::Bool => CharacteristicValue::Bool(false),
        Format::String => CharacteristicValue::String(String::new()),
    }
}
