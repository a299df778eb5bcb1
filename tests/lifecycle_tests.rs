mod common;
use common::*;

use telemetry_widgets::key::param;
use telemetry_widgets::widget::spotlight::SpotlightIndicatorState;
use telemetry_widgets::widget::SpotlightIndicatorWidgetModel;
use telemetry_widgets::{
    BindingError, Delivery, LifecycleError, LifecycleState, TelemetryKey, TelemetryValue,
    WidgetModel,
};

fn connection() -> TelemetryKey {
    TelemetryKey::spotlight(param::CONNECTION)
}

fn enabled() -> TelemetryKey {
    TelemetryKey::spotlight(param::SPOTLIGHT_ENABLED)
}

fn product_connection() -> TelemetryKey {
    TelemetryKey::product(param::CONNECTION)
}

// ============================================================================
// State transitions
// ============================================================================

#[test]
fn setup_activates_model() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    assert_eq!(model.state(), LifecycleState::Uninitialized);

    model.setup().unwrap();

    assert_eq!(model.state(), LifecycleState::Active);
    assert!(bus.is_subscribed(&product_connection()));
    assert!(bus.is_subscribed(&connection()));
    assert!(bus.is_subscribed(&enabled()));
}

#[test]
fn setup_twice_is_rejected() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();

    let result = model.setup();

    assert!(matches!(
        result,
        Err(LifecycleError::InvalidState {
            actual: LifecycleState::Active,
            ..
        })
    ));
}

#[test]
fn cleanup_requires_active_model() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);

    assert!(model.cleanup().is_err());
    assert!(model.restart().is_err());
    assert_eq!(model.state(), LifecycleState::Uninitialized);
}

#[test]
fn cleanup_unsubscribes_every_key() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();
    assert_eq!(model.core().registered_keys().len(), 3);

    model.cleanup().unwrap();

    assert_eq!(model.state(), LifecycleState::Uninitialized);
    assert!(bus.subscribed().is_empty());
    assert!(model.core().registered_keys().is_empty());
}

#[test]
fn model_can_be_set_up_again_after_cleanup() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();
    model.cleanup().unwrap();

    model.setup().unwrap();

    assert_eq!(model.state(), LifecycleState::Active);
    assert_eq!(bus.subscribed().len(), 3);
}

#[test]
fn restart_keeps_one_subscription_per_key() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();

    model.restart().unwrap();
    model.restart().unwrap();

    assert_eq!(model.state(), LifecycleState::Active);
    assert_eq!(bus.subscribed().len(), 3);
    assert_eq!(bus.subscribe_calls(), 9);
}

// ============================================================================
// Value delivery
// ============================================================================

#[test]
fn cached_values_are_applied_at_setup() {
    let bus = MockBus::new();
    bus.set_cached(connection(), true);
    bus.set_cached(enabled(), true);
    let model = SpotlightIndicatorWidgetModel::new(&bus);

    model.setup().unwrap();

    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Active);
}

#[test]
fn live_values_recompute_derived_state() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Hidden);

    let delivery = bus.push(&model, connection(), true);

    assert_eq!(delivery, Delivery::Applied { recompute: true });
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Inactive);

    bus.push(&model, enabled(), true);
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Active);
}

#[test]
fn product_connection_is_bound_for_every_model() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();

    bus.push(&model, product_connection(), true);

    assert!(model.product_connection().get_value());
}

#[test]
fn wrong_value_type_is_rejected() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();
    bus.push(&model, connection(), true);

    let delivery = bus.push(&model, connection(), TelemetryValue::Int(1));

    assert_eq!(
        delivery,
        Delivery::Rejected(BindingError::TypeMismatch {
            key: connection(),
            expected: "bool",
        })
    );
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Inactive);
}

#[test]
fn unbound_key_is_ignored() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();

    let delivery = bus.push(&model, TelemetryKey::spotlight(param::SPOTLIGHT_BRIGHTNESS), 50u8);

    assert_eq!(delivery, Delivery::Ignored);
}

#[test]
fn values_outside_active_state_are_ignored() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);

    assert_eq!(bus.push(&model, connection(), true), Delivery::Ignored);
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Hidden);
}

#[test]
fn cleanup_resets_derived_and_bound_state() {
    let bus = MockBus::new();
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();
    bus.push(&model, product_connection(), true);
    bus.push(&model, connection(), true);
    bus.push(&model, enabled(), true);

    model.cleanup().unwrap();

    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Hidden);
    assert!(!model.product_connection().get_value());
}

// ============================================================================
// Bus availability
// ============================================================================

#[test]
fn keys_wait_while_bus_is_unavailable() {
    let bus = MockBus::new();
    bus.set_available(false);
    bus.set_cached(connection(), true);
    let model = SpotlightIndicatorWidgetModel::new(&bus);

    model.setup().unwrap();

    assert_eq!(model.state(), LifecycleState::Active);
    assert_eq!(model.core().pending_keys().len(), 3);
    assert_eq!(bus.subscribe_calls(), 0);
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Hidden);
}

#[test]
fn resume_pending_registers_waiting_keys() {
    let bus = MockBus::new();
    bus.set_available(false);
    bus.set_cached(connection(), true);
    let model = SpotlightIndicatorWidgetModel::new(&bus);
    model.setup().unwrap();

    assert_eq!(model.resume_pending(), 0);

    bus.set_available(true);
    assert_eq!(model.resume_pending(), 3);

    assert!(model.core().pending_keys().is_empty());
    assert_eq!(bus.subscribed().len(), 3);
    assert_eq!(model.spotlight_state().get_value(), SpotlightIndicatorState::Inactive);
    assert_eq!(model.resume_pending(), 0);
}

#[test]
fn unsupported_key_is_skipped() {
    let bus = MockBus::new();
    bus.mark_unsupported(enabled());
    let model = SpotlightIndicatorWidgetModel::new(&bus);

    model.setup().unwrap();

    assert_eq!(model.state(), LifecycleState::Active);
    assert!(!bus.is_subscribed(&enabled()));
    assert!(bus.is_subscribed(&connection()));
    assert_eq!(model.core().registered_keys().len(), 2);
}
