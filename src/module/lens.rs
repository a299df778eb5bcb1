use core::cell::Cell;

use crate::binding::Binder;
use crate::channel::LatestValueChannel;
use crate::key::{CameraIndex, KeyDomain, LensType, TelemetryKey, param};
use crate::value::Text;

/// Component index of the infrared camera on dual visual/thermal payloads
/// that do not report multi-lens support.
pub const XT2_IR_CAMERA_INDEX: u8 = 2;

const DISPLAY_NAME_XT2_VL: &str = "ZenmuseXT2 VL";
const DISPLAY_NAME_MAVIC_2_ENTERPRISE_DUAL_VL: &str = "Mavic 2 Enterprise Dual-Visual";

/// Resolves lens-specific keys for a camera.
///
/// A live change of the multi-lens flag or of the camera display name means
/// the camera's lens arrangement changed; the host model should then restart
/// so its lens keys are rebuilt. Both values survive the restart.
pub struct LensModule {
    multi_lens_supported: LatestValueChannel<bool>,
    display_name: LatestValueChannel<Text>,
    arrangement_updated: Cell<bool>,
}

impl LensModule {
    pub fn new() -> Self {
        Self {
            multi_lens_supported: LatestValueChannel::new(false),
            display_name: LatestValueChannel::new(Text::new()),
            arrangement_updated: Cell::new(false),
        }
    }

    /// Binds the module's keys for `camera`.
    pub fn bind_keys(&self, binder: &mut Binder<'_>, camera: CameraIndex) {
        binder
            .bind_retained(
                TelemetryKey::camera(param::IS_MULTI_LENS_CAMERA_SUPPORTED, camera),
                &self.multi_lens_supported,
                |_, _| self.arrangement_updated.set(true),
            )
            .bind_retained(
                TelemetryKey::camera(param::DISPLAY_NAME, camera),
                &self.display_name,
                |_, _| self.arrangement_updated.set(true),
            );
    }

    /// Returns and clears the arrangement-updated flag.
    pub fn take_arrangement_updated(&self) -> bool {
        self.arrangement_updated.replace(false)
    }

    pub fn is_multi_lens_supported(&self) -> bool {
        self.multi_lens_supported.get_value()
    }

    /// Current camera display name.
    pub fn display_name(&self) -> &LatestValueChannel<Text> {
        &self.display_name
    }

    /// Builds the key addressing `param_name` on `lens` of `camera`.
    ///
    /// # Returns
    /// * A lens-addressed key when the camera supports multiple lenses
    /// * The infrared component key for dual visual/thermal payloads when the
    ///   infrared lens is requested
    /// * A plain camera key otherwise
    pub fn lens_key(&self, param_name: &'static str, camera: CameraIndex, lens: LensType) -> TelemetryKey {
        if self.is_multi_lens_supported() {
            return TelemetryKey::camera_lens(param_name, camera, lens);
        }

        let dual_payload = self.display_name.with_value(|name| {
            name.as_str() == DISPLAY_NAME_XT2_VL
                || name.as_str() == DISPLAY_NAME_MAVIC_2_ENTERPRISE_DUAL_VL
        });
        if dual_payload && lens.value() == XT2_IR_CAMERA_INDEX {
            TelemetryKey::new(KeyDomain::Camera, param_name, XT2_IR_CAMERA_INDEX)
        } else {
            TelemetryKey::camera(param_name, camera)
        }
    }
}

impl Default for LensModule {
    fn default() -> Self {
        Self::new()
    }
}
