mod common;
use common::*;

use telemetry_widgets::key::param;
use telemetry_widgets::widget::spotlight::{SpotlightIndicatorState, SpotlightState};
use telemetry_widgets::widget::{SpotlightControlWidgetModel, SpotlightIndicatorWidgetModel};
use telemetry_widgets::{ActionError, ActionOutcome, TelemetryKey, TelemetryValue, WidgetModel};

fn spotlight(param: &'static str) -> TelemetryKey {
    TelemetryKey::spotlight(param)
}

fn control_model(bus: &MockBus) -> SpotlightControlWidgetModel<'_, MockBus> {
    let model = SpotlightControlWidgetModel::new(bus);
    model.setup().unwrap();
    bus.push(&model, spotlight(param::CONNECTION), true);
    model
}

// ============================================================================
// Control state
// ============================================================================

#[test]
fn enabled_spotlight_reports_brightness_and_temperature() {
    let bus = MockBus::new();
    let model = control_model(&bus);

    bus.push(&model, spotlight(param::SPOTLIGHT_TEMPERATURE), 41.5f32);
    bus.push(&model, spotlight(param::SPOTLIGHT_ENABLED), true);
    bus.push(&model, spotlight(param::SPOTLIGHT_BRIGHTNESS), 60u8);

    assert_eq!(
        model.spotlight_state().get_value(),
        SpotlightState {
            enabled: true,
            brightness_percentage: 60,
            temperature: 41.5,
        }
    );
}

#[test]
fn disabled_spotlight_masks_brightness_and_temperature() {
    let bus = MockBus::new();
    let model = control_model(&bus);
    bus.push(&model, spotlight(param::SPOTLIGHT_ENABLED), true);
    bus.push(&model, spotlight(param::SPOTLIGHT_BRIGHTNESS), 60u8);
    bus.push(&model, spotlight(param::SPOTLIGHT_TEMPERATURE), 38.0f32);

    bus.push(&model, spotlight(param::SPOTLIGHT_ENABLED), false);
    assert_eq!(model.spotlight_state().get_value(), SpotlightState::default());

    bus.push(&model, spotlight(param::SPOTLIGHT_BRIGHTNESS), 80u8);
    assert_eq!(model.spotlight_state().get_value().brightness_percentage, 0);

    bus.push(&model, spotlight(param::SPOTLIGHT_ENABLED), true);
    assert_eq!(model.spotlight_state().get_value().brightness_percentage, 80);
}

#[test]
fn connection_flag_follows_bus() {
    let bus = MockBus::new();
    let model = control_model(&bus);
    assert!(model.is_spotlight_connected().get_value());

    bus.push(&model, spotlight(param::CONNECTION), false);

    assert!(!model.is_spotlight_connected().get_value());
}

// ============================================================================
// Control actions
// ============================================================================

#[test]
fn toggle_writes_inverse_of_reported_state() {
    let bus = MockBus::new();
    let model = control_model(&bus);

    run(model.toggle_spotlight()).unwrap();
    bus.push(&model, spotlight(param::SPOTLIGHT_ENABLED), true);
    run(model.toggle_spotlight()).unwrap();

    assert_eq!(
        bus.writes(),
        vec![
            (spotlight(param::SPOTLIGHT_ENABLED), TelemetryValue::Bool(true)),
            (spotlight(param::SPOTLIGHT_ENABLED), TelemetryValue::Bool(false)),
        ]
    );
}

#[test]
fn brightness_is_written_as_percentage() {
    let bus = MockBus::new();
    let model = control_model(&bus);

    assert_eq!(run(model.set_brightness(100)), Ok(ActionOutcome::Performed));

    assert_eq!(
        bus.writes(),
        vec![(spotlight(param::SPOTLIGHT_BRIGHTNESS), TelemetryValue::Int(100))]
    );
}

#[test]
fn out_of_range_brightness_is_rejected_locally() {
    let bus = MockBus::new();
    let model = control_model(&bus);

    assert_eq!(run(model.set_brightness(101)), Err(ActionError::InvalidArgument));
    assert!(bus.writes().is_empty());
}

#[test]
fn write_failure_is_returned() {
    let bus = MockBus::new();
    let model = control_model(&bus);
    bus.fail_next(ActionError::Disconnected);

    assert_eq!(run(model.set_brightness(20)), Err(ActionError::Disconnected));
}

// ============================================================================
// Indicator
// ============================================================================

#[test]
fn indicator_tracks_connection_and_enabled_flag() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Hidden);

    bus.push(&model, spotlight(param::SPOTLIGHT_ENABLED), true);
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Hidden);

    bus.push(&model, spotlight(param::CONNECTION), true);
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Active);

    bus.push(&model, spotlight(param::SPOTLIGHT_ENABLED), false);
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Inactive);
}
