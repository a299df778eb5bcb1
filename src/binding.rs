//! Binding of telemetry keys to channels.
//!
//! A widget model declares its bindings once, in
//! [`WidgetModel::bind_keys`](crate::model::WidgetModel::bind_keys). The
//! lifecycle replays that declaration through a [`Binder`] in one of three
//! passes:
//!
//! - **register**: subscribe every key on the bus and apply its cached value
//! - **deliver**: route one live value to the channel bound to its key
//! - **reset**: return every bound channel to its default on cleanup, except
//!   channels bound with [`Binder::bind_retained`]

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Vec;

use crate::bus::KeyRegistry;
use crate::channel::LatestValueChannel;
use crate::key::TelemetryKey;
use crate::value::{FromTelemetry, TelemetryValue};

/// Maximum number of keys a single model can register.
pub const MAX_KEYS: usize = 32;

/// Fixed-capacity list of keys.
pub type KeyList = Vec<TelemetryKey, MAX_KEYS>;

/// Errors raised while binding keys or routing values.
///
/// These are logged and swallowed by the lifecycle; the affected channel keeps
/// its previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingError {
    /// The bus is not ready to accept subscriptions.
    BusUnavailable,
    /// The connected hardware does not provide this key.
    KeyUnsupported(TelemetryKey),
    /// The bus delivered a value of the wrong type for the bound channel.
    TypeMismatch {
        key: TelemetryKey,
        /// Variant name the channel expects.
        expected: &'static str,
    },
    /// The model registered more than [`MAX_KEYS`] keys.
    CapacityExceeded,
}

impl core::fmt::Display for BindingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BindingError::BusUnavailable => write!(f, "telemetry bus unavailable"),
            BindingError::KeyUnsupported(key) => {
                write!(f, "key {:?}/{} not supported", key.domain, key.param)
            }
            BindingError::TypeMismatch { key, expected } => {
                write!(
                    f,
                    "type mismatch on {:?}/{}: expected {}",
                    key.domain, key.param, expected
                )
            }
            BindingError::CapacityExceeded => write!(f, "key capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BindingError {}

/// Result of routing one live value into a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    /// No active binding matched the key.
    Ignored,
    /// The value reached at least one channel.
    Applied {
        /// Whether derived state was recomputed.
        recompute: bool,
    },
    /// A binding matched but the value had the wrong type.
    Rejected(BindingError),
}

impl Delivery {
    fn merge(self, other: Delivery) -> Delivery {
        match (self, other) {
            (Delivery::Rejected(e), _) | (_, Delivery::Rejected(e)) => Delivery::Rejected(e),
            (Delivery::Applied { recompute: a }, Delivery::Applied { recompute: b }) => {
                Delivery::Applied { recompute: a || b }
            }
            (Delivery::Applied { recompute }, Delivery::Ignored)
            | (Delivery::Ignored, Delivery::Applied { recompute }) => Delivery::Applied { recompute },
            (Delivery::Ignored, Delivery::Ignored) => Delivery::Ignored,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    Cache,
    Live,
}

#[derive(Clone, Copy)]
enum Pass<'a> {
    Register {
        registry: &'a dyn KeyRegistry,
        registered: &'a RefCell<KeyList>,
        pending: &'a RefCell<KeyList>,
    },
    Deliver {
        key: &'a TelemetryKey,
        value: &'a TelemetryValue,
    },
    Reset,
}

/// Visitor handed to [`WidgetModel::bind_keys`](crate::model::WidgetModel::bind_keys).
///
/// Every `bind*` call declares one key/channel pair. What happens to the pair
/// depends on the pass the lifecycle is running.
pub struct Binder<'a> {
    pass: Pass<'a>,
    delivery: Delivery,
}

impl<'a> Binder<'a> {
    pub(crate) fn register(
        registry: &'a dyn KeyRegistry,
        registered: &'a RefCell<KeyList>,
        pending: &'a RefCell<KeyList>,
    ) -> Self {
        Self {
            pass: Pass::Register {
                registry,
                registered,
                pending,
            },
            delivery: Delivery::Ignored,
        }
    }

    pub(crate) fn deliver(key: &'a TelemetryKey, value: &'a TelemetryValue) -> Self {
        Self {
            pass: Pass::Deliver { key, value },
            delivery: Delivery::Ignored,
        }
    }

    pub(crate) fn reset() -> Self {
        Self {
            pass: Pass::Reset,
            delivery: Delivery::Ignored,
        }
    }

    pub(crate) fn finish(self) -> Delivery {
        self.delivery
    }

    /// Binds `key` to `channel`; live updates recompute derived state.
    pub fn bind<T, M>(&mut self, key: TelemetryKey, channel: &LatestValueChannel<T, M>) -> &mut Self
    where
        T: FromTelemetry + Clone,
        M: RawMutex,
    {
        self.visit(key, channel, true, |_, _, _| {})
    }

    /// Binds `key` to `channel` without recomputing derived state on updates.
    pub fn bind_passive<T, M>(
        &mut self,
        key: TelemetryKey,
        channel: &LatestValueChannel<T, M>,
    ) -> &mut Self
    where
        T: FromTelemetry + Clone,
        M: RawMutex,
    {
        self.visit(key, channel, false, |_, _, _| {})
    }

    /// Binds `key` to `channel` and runs `on_value` after each new value is
    /// published, including the cached value applied at registration.
    pub fn bind_with<T, M, F>(
        &mut self,
        key: TelemetryKey,
        channel: &LatestValueChannel<T, M>,
        on_value: F,
    ) -> &mut Self
    where
        T: FromTelemetry + Clone,
        M: RawMutex,
        F: FnOnce(&T),
    {
        self.visit(key, channel, true, |_, new, _| on_value(new))
    }

    /// Binds `key` to `channel` and runs `on_change` with the previous and the
    /// new value when a live update changes the value.
    ///
    /// Cached values applied at registration do not invoke `on_change`.
    pub fn bind_on_change<T, M, F>(
        &mut self,
        key: TelemetryKey,
        channel: &LatestValueChannel<T, M>,
        on_change: F,
    ) -> &mut Self
    where
        T: FromTelemetry + Clone + PartialEq,
        M: RawMutex,
        F: FnOnce(&T, &T),
    {
        self.visit(key, channel, true, |previous, new, origin| {
            if origin == Origin::Live && previous != new {
                on_change(previous, new);
            }
        })
    }

    /// Like [`bind_on_change`](Self::bind_on_change), but the channel keeps its
    /// value through cleanup.
    ///
    /// Use this for values that decide which keys the model binds: a restart
    /// triggered by such a value must rebuild its keys from the new value even
    /// when the bus has no cached copy.
    pub fn bind_retained<T, M, F>(
        &mut self,
        key: TelemetryKey,
        channel: &LatestValueChannel<T, M>,
        on_change: F,
    ) -> &mut Self
    where
        T: FromTelemetry + Clone + PartialEq,
        M: RawMutex,
        F: FnOnce(&T, &T),
    {
        if let Pass::Reset = self.pass {
            return self;
        }
        self.bind_on_change(key, channel, on_change)
    }

    fn visit<T, M, F>(
        &mut self,
        key: TelemetryKey,
        channel: &LatestValueChannel<T, M>,
        recompute: bool,
        hook: F,
    ) -> &mut Self
    where
        T: FromTelemetry + Clone,
        M: RawMutex,
        F: FnOnce(&T, &T, Origin),
    {
        match self.pass {
            Pass::Reset => channel.reset(),
            Pass::Register {
                registry,
                registered,
                pending,
            } => {
                if let Some(cached) = register_key(registry, registered, pending, key) {
                    // A stale cache entry of the wrong type is not fatal.
                    let _ = apply(key, channel, &cached, Origin::Cache, hook);
                }
            }
            Pass::Deliver { key: target, value } => {
                if *target == key {
                    let outcome = match apply(key, channel, value, Origin::Live, hook) {
                        Ok(()) => Delivery::Applied { recompute },
                        Err(e) => Delivery::Rejected(e),
                    };
                    self.delivery = self.delivery.merge(outcome);
                }
            }
        }
        self
    }
}

/// Subscribes `key` unless already registered and returns its cached value.
///
/// Keys are queued as pending while the bus is unavailable.
fn register_key(
    registry: &dyn KeyRegistry,
    registered: &RefCell<KeyList>,
    pending: &RefCell<KeyList>,
    key: TelemetryKey,
) -> Option<TelemetryValue> {
    if !registry.is_available() {
        let mut pending = pending.borrow_mut();
        if !pending.contains(&key) {
            if pending.push(key).is_err() {
                warn!("pending key dropped: {}", BindingError::CapacityExceeded);
            } else {
                trace!("key queued until bus is available: {}", key);
            }
        }
        return None;
    }

    if !registered.borrow().contains(&key) {
        if !registry.is_key_supported(&key) {
            warn!("bind failed: {}", BindingError::KeyUnsupported(key));
            return None;
        }
        if let Err(e) = registry.subscribe(&key) {
            warn!("bind failed: {}", e);
            return None;
        }
        if registered.borrow_mut().push(key).is_err() {
            warn!("bind failed: {}", BindingError::CapacityExceeded);
            registry.unsubscribe(&key);
            return None;
        }
    }

    registry.cached_value(&key)
}

/// Converts `value`, publishes it, then runs the hook.
fn apply<T, M, F>(
    key: TelemetryKey,
    channel: &LatestValueChannel<T, M>,
    value: &TelemetryValue,
    origin: Origin,
    hook: F,
) -> Result<(), BindingError>
where
    T: FromTelemetry + Clone,
    M: RawMutex,
    F: FnOnce(&T, &T, Origin),
{
    let Some(new) = T::from_telemetry(value) else {
        let error = BindingError::TypeMismatch {
            key,
            expected: T::EXPECTED,
        };
        warn!("value dropped: {}", error);
        return Err(error);
    };
    let previous = channel.get_value();
    channel.on_next(new.clone());
    hook(&previous, &new, origin);
    Ok(())
}
