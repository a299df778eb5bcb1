//! Telemetry bus abstraction.
//!
//! Implement these traits for the transport that talks to the aircraft (or
//! for a simulator). Models never own the bus; they borrow it for their whole
//! lifetime.

use crate::binding::BindingError;
use crate::key::TelemetryKey;
use crate::value::TelemetryValue;

/// Subscription side of the telemetry bus.
///
/// Object safe so that the lifecycle can hold it as `&dyn KeyRegistry`.
pub trait KeyRegistry {
    /// Returns `true` once the bus accepts subscriptions and writes.
    fn is_available(&self) -> bool;

    /// Returns `true` if the connected hardware provides `key`.
    fn is_key_supported(&self, _key: &TelemetryKey) -> bool {
        true
    }

    /// Starts forwarding live values of `key` to the host.
    ///
    /// # Errors
    /// Returns a [`BindingError`] if the subscription cannot be created.
    fn subscribe(&self, key: &TelemetryKey) -> Result<(), BindingError>;

    /// Stops forwarding `key`. Unknown keys are ignored.
    fn unsubscribe(&self, key: &TelemetryKey);

    /// Returns the last value the bus saw for `key`, if any.
    fn cached_value(&self, key: &TelemetryKey) -> Option<TelemetryValue>;
}

/// Full telemetry bus: subscriptions plus asynchronous writes and actions.
#[allow(async_fn_in_trait)]
pub trait TelemetryBus: KeyRegistry {
    /// Writes `value` to `key`.
    ///
    /// # Errors
    /// Returns an [`ActionError`] if the hardware rejects the write.
    async fn set_value(&self, key: TelemetryKey, value: TelemetryValue) -> Result<(), ActionError>;

    /// Triggers the stateless action addressed by `key`.
    ///
    /// # Errors
    /// Returns an [`ActionError`] if the hardware rejects the action.
    async fn perform_action(&self, key: TelemetryKey) -> Result<(), ActionError>;
}

/// Failure of a write or action forwarded to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionError {
    /// The bus is not ready.
    BusUnavailable,
    /// The component addressed by the key is disconnected.
    Disconnected,
    /// The hardware refused the request.
    Rejected,
    /// The bus gave up waiting for the hardware.
    Timeout,
    /// The request carried an out-of-range argument and was not sent.
    InvalidArgument,
    /// The key could not be resolved.
    Binding(BindingError),
}

impl core::fmt::Display for ActionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ActionError::BusUnavailable => write!(f, "telemetry bus unavailable"),
            ActionError::Disconnected => write!(f, "component disconnected"),
            ActionError::Rejected => write!(f, "request rejected by hardware"),
            ActionError::Timeout => write!(f, "request timed out"),
            ActionError::InvalidArgument => write!(f, "argument out of range"),
            ActionError::Binding(e) => write!(f, "binding error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ActionError {}

impl From<BindingError> for ActionError {
    fn from(error: BindingError) -> Self {
        ActionError::Binding(error)
    }
}
