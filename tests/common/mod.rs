//! Shared test infrastructure for telemetry-widgets integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};

use telemetry_widgets::{
    ActionError, BindingError, Delivery, KeyRegistry, TelemetryBus, TelemetryKey, TelemetryValue,
    WidgetModel,
};

// ============================================================================
// Mock Bus
// ============================================================================

/// Mock telemetry bus that records subscriptions, writes and actions
pub struct MockBus {
    available: Cell<bool>,
    cache: RefCell<Vec<(TelemetryKey, TelemetryValue)>>,
    subscribed: RefCell<Vec<TelemetryKey>>,
    unsupported: RefCell<Vec<TelemetryKey>>,
    writes: RefCell<Vec<(TelemetryKey, TelemetryValue)>>,
    actions: RefCell<Vec<TelemetryKey>>,
    next_error: Cell<Option<ActionError>>,
    subscribe_calls: Cell<usize>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            available: Cell::new(true),
            cache: RefCell::new(Vec::new()),
            subscribed: RefCell::new(Vec::new()),
            unsupported: RefCell::new(Vec::new()),
            writes: RefCell::new(Vec::new()),
            actions: RefCell::new(Vec::new()),
            next_error: Cell::new(None),
            subscribe_calls: Cell::new(0),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Stores a value the bus reports as cached for `key`
    pub fn set_cached(&self, key: TelemetryKey, value: impl Into<TelemetryValue>) {
        let value = value.into();
        let mut cache = self.cache.borrow_mut();
        match cache.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => cache.push((key, value)),
        }
    }

    pub fn mark_unsupported(&self, key: TelemetryKey) {
        self.unsupported.borrow_mut().push(key);
    }

    /// Makes the next write or action fail with `error`
    pub fn fail_next(&self, error: ActionError) {
        self.next_error.set(Some(error));
    }

    pub fn subscribed(&self) -> Vec<TelemetryKey> {
        self.subscribed.borrow().clone()
    }

    pub fn is_subscribed(&self, key: &TelemetryKey) -> bool {
        self.subscribed.borrow().contains(key)
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.get()
    }

    pub fn writes(&self) -> Vec<(TelemetryKey, TelemetryValue)> {
        self.writes.borrow().clone()
    }

    pub fn actions(&self) -> Vec<TelemetryKey> {
        self.actions.borrow().clone()
    }

    /// Caches `value` and routes it into `model` as a live update
    pub fn push<W: WidgetModel>(
        &self,
        model: &W,
        key: TelemetryKey,
        value: impl Into<TelemetryValue>,
    ) -> Delivery {
        let value = value.into();
        self.set_cached(key, value.clone());
        model.on_telemetry(&key, &value)
    }

    fn take_error(&self) -> Result<(), ActionError> {
        match self.next_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl KeyRegistry for MockBus {
    fn is_available(&self) -> bool {
        self.available.get()
    }

    fn is_key_supported(&self, key: &TelemetryKey) -> bool {
        !self.unsupported.borrow().contains(key)
    }

    fn subscribe(&self, key: &TelemetryKey) -> Result<(), BindingError> {
        self.subscribe_calls.set(self.subscribe_calls.get() + 1);
        if !self.available.get() {
            return Err(BindingError::BusUnavailable);
        }
        let mut subscribed = self.subscribed.borrow_mut();
        if !subscribed.contains(key) {
            subscribed.push(*key);
        }
        Ok(())
    }

    fn unsubscribe(&self, key: &TelemetryKey) {
        self.subscribed.borrow_mut().retain(|k| k != key);
    }

    fn cached_value(&self, key: &TelemetryKey) -> Option<TelemetryValue> {
        self.cache
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl TelemetryBus for MockBus {
    async fn set_value(&self, key: TelemetryKey, value: TelemetryValue) -> Result<(), ActionError> {
        self.take_error()?;
        self.writes.borrow_mut().push((key, value));
        Ok(())
    }

    async fn perform_action(&self, key: TelemetryKey) -> Result<(), ActionError> {
        self.take_error()?;
        self.actions.borrow_mut().push(key);
        Ok(())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Runs a future to completion on the current thread
pub fn run<F: core::future::Future>(future: F) -> F::Output {
    embassy_futures::block_on(future)
}
