//! Widget models.
//!
//! Each model binds the telemetry keys its widget needs and publishes
//! UI-facing derived state through [`LatestValueChannel`](crate::channel::LatestValueChannel)s.

pub mod compass;
pub mod fly_zone;
pub mod iso_ei_config;
pub mod iso_ei_setting;
pub mod shoot_photo;
pub mod spotlight;

pub use compass::CompassWidgetModel;
pub use fly_zone::FlyZoneOverlay;
pub use iso_ei_config::IsoEiConfigWidgetModel;
pub use iso_ei_setting::IsoEiSettingWidgetModel;
pub use shoot_photo::ShootPhotoWidgetModel;
pub use spotlight::{SpotlightControlWidgetModel, SpotlightIndicatorWidgetModel};
