//! Widget model lifecycle.
//!
//! Provides the [`WidgetModel`] trait implemented by every widget model and
//! [`ModelCore`], the bookkeeping each model embeds. A model moves through
//! `Uninitialized -> Setup -> Active -> Cleanup -> Uninitialized`; value
//! changes flow through [`WidgetModel::on_telemetry`], addressing changes
//! through [`WidgetModel::restart`].

use core::cell::{Cell, RefCell};

use crate::binding::{Binder, Delivery, KeyList};
use crate::bus::KeyRegistry;
use crate::channel::LatestValueChannel;
use crate::key::{TelemetryKey, param};
use crate::value::TelemetryValue;

/// Interval at which a host should call
/// [`WidgetModel::resume_pending`] while keys are pending.
pub const PENDING_RETRY_INTERVAL_MS: u64 = 100;

/// Lifecycle state of a widget model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Constructed or cleaned up. No keys are bound.
    Uninitialized,
    /// Bindings are being registered.
    Setup,
    /// Bound and receiving values.
    Active,
    /// Bindings are being torn down.
    Cleanup,
}

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleError {
    /// Operation called from an invalid state.
    InvalidState {
        /// State the operation requires.
        expected: &'static str,
        /// The actual current state
        actual: LifecycleState,
    },
}

impl core::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LifecycleError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but model is {:?}",
                    expected, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LifecycleError {}

/// State shared by every widget model: the bus handle, the lifecycle state,
/// registered and pending keys, and the product connection flag.
pub struct ModelCore<'a> {
    registry: &'a dyn KeyRegistry,
    state: Cell<LifecycleState>,
    registered: RefCell<KeyList>,
    pending: RefCell<KeyList>,
    product_connection: LatestValueChannel<bool>,
}

impl<'a> ModelCore<'a> {
    /// Creates an uninitialized core bound to `registry`.
    pub fn new(registry: &'a dyn KeyRegistry) -> Self {
        Self {
            registry,
            state: Cell::new(LifecycleState::Uninitialized),
            registered: RefCell::new(KeyList::new()),
            pending: RefCell::new(KeyList::new()),
            product_connection: LatestValueChannel::new(false),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Whether the product is connected.
    pub fn product_connection(&self) -> &LatestValueChannel<bool> {
        &self.product_connection
    }

    /// Whether the bus accepts writes right now.
    pub fn is_bus_available(&self) -> bool {
        self.registry.is_available()
    }

    /// Keys currently subscribed on the bus.
    pub fn registered_keys(&self) -> KeyList {
        self.registered.borrow().clone()
    }

    /// Keys waiting for the bus to become available.
    pub fn pending_keys(&self) -> KeyList {
        self.pending.borrow().clone()
    }

    fn require(&self, expected: LifecycleState, name: &'static str) -> Result<(), LifecycleError> {
        let actual = self.state.get();
        if actual != expected {
            return Err(LifecycleError::InvalidState {
                expected: name,
                actual,
            });
        }
        Ok(())
    }

    fn register_binder(&self) -> Binder<'_> {
        Binder::register(self.registry, &self.registered, &self.pending)
    }

    fn unbind_all(&self) {
        let mut registered = self.registered.borrow_mut();
        for key in registered.iter() {
            self.registry.unsubscribe(key);
        }
        registered.clear();
        self.pending.borrow_mut().clear();
    }
}

/// A widget model: a set of key bindings plus derived state.
///
/// Implementors provide [`core`](Self::core), [`bind_keys`](Self::bind_keys)
/// and [`update_states`](Self::update_states); the lifecycle methods are
/// provided.
pub trait WidgetModel {
    /// Returns the embedded lifecycle bookkeeping.
    fn core(&self) -> &ModelCore<'_>;

    /// Declares every key/channel binding of this model and its modules.
    ///
    /// Called once per lifecycle pass, so it must bind the same keys in the
    /// same order for a given addressing.
    fn bind_keys(&self, binder: &mut Binder<'_>);

    /// Recomputes derived state from current channel values.
    fn update_states(&self);

    /// Runs before bindings are registered.
    fn in_setup(&self) {}

    /// Runs before bindings are torn down. Reset derived outputs here.
    fn in_cleanup(&self) {}

    /// Runs whenever the product connection flag is published.
    fn on_product_connection_changed(&self, _connected: bool) {}

    /// Returns `true` once if a binding asked for the model to be rebuilt.
    fn take_restart_request(&self) -> bool {
        false
    }

    /// Current lifecycle state.
    fn state(&self) -> LifecycleState {
        self.core().state()
    }

    /// Whether the product is connected.
    fn product_connection(&self) -> &LatestValueChannel<bool> {
        self.core().product_connection()
    }

    /// Binds every key and computes initial derived state.
    ///
    /// Must be called from `Uninitialized` state.
    ///
    /// # Errors
    /// Returns [`LifecycleError::InvalidState`] if the model is already set up.
    fn setup(&self) -> Result<(), LifecycleError> {
        let core = self.core();
        core.require(LifecycleState::Uninitialized, "Uninitialized")?;
        core.state.set(LifecycleState::Setup);
        debug!("widget model setup");

        self.in_setup();
        let mut binder = core.register_binder();
        bind_model(self, &mut binder);

        core.state.set(LifecycleState::Active);
        self.update_states();
        Ok(())
    }

    /// Unbinds every key and returns bound channels to their defaults.
    ///
    /// Must be called from `Active` state.
    ///
    /// # Errors
    /// Returns [`LifecycleError::InvalidState`] if the model is not active.
    fn cleanup(&self) -> Result<(), LifecycleError> {
        let core = self.core();
        core.require(LifecycleState::Active, "Active")?;
        core.state.set(LifecycleState::Cleanup);
        debug!("widget model cleanup");

        self.in_cleanup();
        core.unbind_all();
        let mut binder = Binder::reset();
        bind_model(self, &mut binder);

        core.state.set(LifecycleState::Uninitialized);
        Ok(())
    }

    /// Cleans up and sets up again, picking up new addressing.
    ///
    /// Old keys are fully unsubscribed before new ones are registered.
    ///
    /// # Errors
    /// Returns [`LifecycleError::InvalidState`] if the model is not active.
    fn restart(&self) -> Result<(), LifecycleError> {
        self.cleanup()?;
        self.setup()
    }

    /// Restarts if active, otherwise does nothing.
    fn restart_if_active(&self) {
        if self.state() == LifecycleState::Active && self.restart().is_err() {
            error!("widget model restart failed");
        }
    }

    /// Routes a live bus value into the matching bindings.
    ///
    /// Derived state is recomputed after the value is published when the
    /// matching binding is a trigger. Values arriving outside `Active` are
    /// ignored.
    fn on_telemetry(&self, key: &TelemetryKey, value: &TelemetryValue) -> Delivery {
        if self.state() != LifecycleState::Active {
            return Delivery::Ignored;
        }

        let mut binder = Binder::deliver(key, value);
        bind_model(self, &mut binder);
        let delivery = binder.finish();

        if let Delivery::Applied { recompute: true } = delivery {
            self.update_states();
        }
        if self.take_restart_request() {
            debug!("binding requested restart");
            self.restart_if_active();
        }
        delivery
    }

    /// Registers keys queued while the bus was unavailable.
    ///
    /// # Returns
    /// Number of keys that left the pending queue.
    fn resume_pending(&self) -> usize {
        let core = self.core();
        if core.state() != LifecycleState::Active || !core.registry.is_available() {
            return 0;
        }
        let before = core.pending.borrow().len();
        if before == 0 {
            return 0;
        }
        core.pending.borrow_mut().clear();

        let mut binder = core.register_binder();
        bind_model(self, &mut binder);
        self.update_states();

        before - core.pending.borrow().len()
    }
}

fn bind_model<W: WidgetModel + ?Sized>(model: &W, binder: &mut Binder<'_>) {
    binder.bind_with(
        TelemetryKey::product(param::CONNECTION),
        model.core().product_connection(),
        |connected| model.on_product_connection_changed(*connected),
    );
    model.bind_keys(binder);
}
