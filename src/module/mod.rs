//! Reusable sub-binders shared by several widget models.
//!
//! A module owns a handful of channels and binds them into its host model's
//! binding pass. Addressing (camera index) is passed in by the host, so a
//! module never needs to be told about a restart.

mod flat_camera;
mod lens;

pub use flat_camera::FlatCameraModule;
pub use lens::{LensModule, XT2_IR_CAMERA_INDEX};
