//! One-shot commands forwarded to the telemetry bus.

use crate::bus::{ActionError, TelemetryBus};
use crate::key::TelemetryKey;
use crate::value::TelemetryValue;

/// What a request does with its key.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    /// Write a value.
    Set(TelemetryValue),
    /// Trigger a stateless action.
    Perform,
}

/// Command addressed to a single key.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub key: TelemetryKey,
    pub kind: RequestKind,
}

impl ActionRequest {
    /// Creates a write request.
    pub fn set(key: TelemetryKey, value: impl Into<TelemetryValue>) -> Self {
        Self {
            key,
            kind: RequestKind::Set(value.into()),
        }
    }

    /// Creates an action request.
    pub fn perform(key: TelemetryKey) -> Self {
        Self {
            key,
            kind: RequestKind::Perform,
        }
    }
}

/// Why a guarded request was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// The can-perform flag was false.
    GuardFalse,
    /// The bus was not available.
    BusUnavailable,
}

/// Successful completion of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionOutcome {
    /// The bus accepted the request.
    Performed,
    /// Nothing was sent.
    Skipped(SkipReason),
}

/// Forwards `request` to the bus.
///
/// # Errors
/// Returns the bus error unchanged.
pub async fn perform<B: TelemetryBus>(
    bus: &B,
    request: ActionRequest,
) -> Result<ActionOutcome, ActionError> {
    match request.kind {
        RequestKind::Set(value) => bus.set_value(request.key, value).await?,
        RequestKind::Perform => bus.perform_action(request.key).await?,
    }
    Ok(ActionOutcome::Performed)
}

/// Forwards `request` only if `guard` holds and the bus is available.
///
/// A failed guard completes successfully with [`ActionOutcome::Skipped`]
/// and leaves the bus untouched.
///
/// # Errors
/// Returns the bus error unchanged when the request was forwarded.
pub async fn perform_guarded<B: TelemetryBus>(
    bus: &B,
    guard: bool,
    request: ActionRequest,
) -> Result<ActionOutcome, ActionError> {
    if !guard {
        debug!("request skipped: guard is false");
        return Ok(ActionOutcome::Skipped(SkipReason::GuardFalse));
    }
    if !bus.is_available() {
        debug!("request skipped: bus unavailable");
        return Ok(ActionOutcome::Skipped(SkipReason::BusUnavailable));
    }
    perform(bus, request).await
}
