//! Spotlight accessory widget models: the control panel and the status
//! indicator.

use crate::binding::Binder;
use crate::bus::{ActionError, KeyRegistry, TelemetryBus};
use crate::channel::LatestValueChannel;
use crate::command::{ActionOutcome, ActionRequest, perform};
use crate::key::{TelemetryKey, param};
use crate::model::{ModelCore, WidgetModel};

/// Brightness reported while the spotlight is off.
pub const DEFAULT_BRIGHTNESS_PERCENTAGE: u8 = 0;

/// Temperature reported while the spotlight is off.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Highest accepted brightness percentage.
pub const MAX_BRIGHTNESS_PERCENTAGE: u8 = 100;

/// Spotlight state as shown by the control panel.
///
/// Brightness and temperature read as their defaults while the spotlight is
/// disabled.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpotlightState {
    pub enabled: bool,
    pub brightness_percentage: u8,
    /// Lamp temperature in degrees Celsius.
    pub temperature: f32,
}

impl SpotlightState {
    /// Builds the state, masking brightness and temperature when disabled.
    pub fn new(enabled: bool, brightness_percentage: u8, temperature: f32) -> Self {
        if enabled {
            Self {
                enabled,
                brightness_percentage,
                temperature,
            }
        } else {
            Self::default()
        }
    }
}

impl Default for SpotlightState {
    fn default() -> Self {
        Self {
            enabled: false,
            brightness_percentage: DEFAULT_BRIGHTNESS_PERCENTAGE,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Widget model behind the spotlight control panel.
pub struct SpotlightControlWidgetModel<'a, B: TelemetryBus> {
    core: ModelCore<'a>,
    bus: &'a B,
    connected: LatestValueChannel<bool>,
    enabled: LatestValueChannel<bool>,
    brightness: LatestValueChannel<u8>,
    temperature: LatestValueChannel<f32>,
    spotlight_state: LatestValueChannel<SpotlightState>,
}

impl<'a, B: TelemetryBus> SpotlightControlWidgetModel<'a, B> {
    pub fn new(bus: &'a B) -> Self {
        Self {
            core: ModelCore::new(bus),
            bus,
            connected: LatestValueChannel::new(false),
            enabled: LatestValueChannel::new(false),
            brightness: LatestValueChannel::new(DEFAULT_BRIGHTNESS_PERCENTAGE),
            temperature: LatestValueChannel::new(DEFAULT_TEMPERATURE),
            spotlight_state: LatestValueChannel::new(SpotlightState::default()),
        }
    }

    pub fn is_spotlight_connected(&self) -> &LatestValueChannel<bool> {
        &self.connected
    }

    pub fn spotlight_state(&self) -> &LatestValueChannel<SpotlightState> {
        &self.spotlight_state
    }

    /// Switches the spotlight to the opposite of its last reported state.
    ///
    /// # Errors
    /// Returns the bus error unchanged.
    pub async fn toggle_spotlight(&self) -> Result<ActionOutcome, ActionError> {
        let request = ActionRequest::set(
            TelemetryKey::spotlight(param::SPOTLIGHT_ENABLED),
            !self.enabled.get_value(),
        );
        perform(self.bus, request).await
    }

    /// Sets the brightness, in percent.
    ///
    /// # Errors
    /// Returns [`ActionError::InvalidArgument`] without touching the bus when
    /// `percentage` exceeds [`MAX_BRIGHTNESS_PERCENTAGE`]; otherwise the bus
    /// error unchanged.
    pub async fn set_brightness(&self, percentage: u8) -> Result<ActionOutcome, ActionError> {
        if percentage > MAX_BRIGHTNESS_PERCENTAGE {
            return Err(ActionError::InvalidArgument);
        }
        let request = ActionRequest::set(TelemetryKey::spotlight(param::SPOTLIGHT_BRIGHTNESS), percentage);
        perform(self.bus, request).await
    }
}

impl<B: TelemetryBus> WidgetModel for SpotlightControlWidgetModel<'_, B> {
    fn core(&self) -> &ModelCore<'_> {
        &self.core
    }

    fn bind_keys(&self, binder: &mut Binder<'_>) {
        binder
            .bind(TelemetryKey::spotlight(param::CONNECTION), &self.connected)
            .bind(TelemetryKey::spotlight(param::SPOTLIGHT_ENABLED), &self.enabled)
            .bind(TelemetryKey::spotlight(param::SPOTLIGHT_BRIGHTNESS), &self.brightness)
            .bind(TelemetryKey::spotlight(param::SPOTLIGHT_TEMPERATURE), &self.temperature);
    }

    fn in_cleanup(&self) {
        self.spotlight_state.reset();
    }

    fn update_states(&self) {
        self.spotlight_state.on_next(SpotlightState::new(
            self.enabled.get_value(),
            self.brightness.get_value(),
            self.temperature.get_value(),
        ));
    }
}

/// Status icon of the spotlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpotlightIndicatorState {
    /// No spotlight connected.
    #[default]
    Hidden,
    Inactive,
    Active,
}

/// Widget model behind the spotlight status icon.
pub struct SpotlightIndicatorWidgetModel<'a> {
    core: ModelCore<'a>,
    connected: LatestValueChannel<bool>,
    enabled: LatestValueChannel<bool>,
    indicator_state: LatestValueChannel<SpotlightIndicatorState>,
}

impl<'a> SpotlightIndicatorWidgetModel<'a> {
    pub fn new(registry: &'a dyn KeyRegistry) -> Self {
        Self {
            core: ModelCore::new(registry),
            connected: LatestValueChannel::new(false),
            enabled: LatestValueChannel::new(false),
            indicator_state: LatestValueChannel::new(SpotlightIndicatorState::Hidden),
        }
    }

    pub fn spotlight_state(&self) -> &LatestValueChannel<SpotlightIndicatorState> {
        &self.indicator_state
    }
}

impl WidgetModel for SpotlightIndicatorWidgetModel<'_> {
    fn core(&self) -> &ModelCore<'_> {
        &self.core
    }

    fn bind_keys(&self, binder: &mut Binder<'_>) {
        binder
            .bind(TelemetryKey::spotlight(param::CONNECTION), &self.connected)
            .bind(TelemetryKey::spotlight(param::SPOTLIGHT_ENABLED), &self.enabled);
    }

    fn in_cleanup(&self) {
        self.indicator_state.reset();
    }

    fn update_states(&self) {
        let state = if !self.connected.get_value() {
            SpotlightIndicatorState::Hidden
        } else if self.enabled.get_value() {
            SpotlightIndicatorState::Active
        } else {
            SpotlightIndicatorState::Inactive
        };
        self.indicator_state.on_next(state);
    }
}
