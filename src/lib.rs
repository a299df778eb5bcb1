#![cfg_attr(not(feature = "std"), no_std)]

//! Reactive state binding for drone UI widgets.
//!
//! # Core Concepts
//!
//! - **`LatestValueChannel`**: Broadcast cell holding the latest value of a stream and replaying it to new subscribers
//! - **`TelemetryKey`** / **`TelemetryValue`**: Address and payload of one value on the telemetry bus
//! - **`KeyRegistry`** / **`TelemetryBus`**: Traits to implement for your telemetry transport
//! - **`Binder`**: Declares which key feeds which channel; replayed by the lifecycle for registration, delivery and reset
//! - **`WidgetModel`**: Lifecycle (`setup`, `cleanup`, `restart`) plus derived state recomputation
//! - **`FlatCameraModule`** / **`LensModule`**: Sub-binders shared by camera widgets
//! - **`ActionRequest`**: A write or action, forwarded with `perform` or `perform_guarded`
//!
//! Models never own the bus. The host routes live values into a model with
//! [`WidgetModel::on_telemetry`] and reads derived state from the model's
//! channels, either by snapshot or through a [`Subscriber`].

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod binding;
pub mod bus;
pub mod channel;
pub mod colors;
pub mod command;
pub mod geo;
pub mod key;
pub mod model;
pub mod module;
pub mod types;
pub mod value;
pub mod widget;

pub use binding::{Binder, BindingError, Delivery, KeyList, MAX_KEYS};
pub use bus::{ActionError, KeyRegistry, TelemetryBus};
pub use channel::{LatestValueChannel, Subscriber, Termination};
pub use command::{ActionOutcome, ActionRequest, RequestKind, SkipReason, perform, perform_guarded};
pub use key::{CameraIndex, GimbalIndex, KeyDomain, LensType, TelemetryKey};
pub use model::{LifecycleError, LifecycleState, ModelCore, WidgetModel};
pub use module::{FlatCameraModule, LensModule};
pub use value::{FromTelemetry, TelemetryValue, Text};
