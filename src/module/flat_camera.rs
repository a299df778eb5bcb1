use crate::binding::Binder;
use crate::channel::LatestValueChannel;
use crate::command::ActionRequest;
use crate::key::{CameraIndex, TelemetryKey, param};
use crate::types::{CameraMode, FlatCameraMode, ShootPhotoMode};

/// Camera mode and photo mode, normalized across cameras with and without a
/// flat camera mode.
///
/// Cameras that support flat mode report a single [`FlatCameraMode`]; for
/// those, every flat mode update rewrites the camera mode and the photo mode
/// so consumers only ever read [`camera_mode`](Self::camera_mode) and
/// [`shoot_photo_mode`](Self::shoot_photo_mode).
pub struct FlatCameraModule {
    camera_mode: LatestValueChannel<CameraMode>,
    shoot_photo_mode: LatestValueChannel<ShootPhotoMode>,
    flat_mode_supported: LatestValueChannel<bool>,
    flat_camera_mode: LatestValueChannel<FlatCameraMode>,
}

impl FlatCameraModule {
    pub fn new() -> Self {
        Self {
            camera_mode: LatestValueChannel::new(CameraMode::Unknown),
            shoot_photo_mode: LatestValueChannel::new(ShootPhotoMode::Unknown),
            flat_mode_supported: LatestValueChannel::new(false),
            flat_camera_mode: LatestValueChannel::new(FlatCameraMode::Unknown),
        }
    }

    /// Binds the module's keys for `camera`.
    pub fn bind_keys(&self, binder: &mut Binder<'_>, camera: CameraIndex) {
        binder
            .bind(TelemetryKey::camera(param::MODE, camera), &self.camera_mode)
            .bind(
                TelemetryKey::camera(param::SHOOT_PHOTO_MODE, camera),
                &self.shoot_photo_mode,
            )
            .bind_with(
                TelemetryKey::camera(param::IS_FLAT_CAMERA_MODE_SUPPORTED, camera),
                &self.flat_mode_supported,
                |supported| {
                    if *supported {
                        self.update_modes(self.flat_camera_mode.get_value());
                    }
                },
            )
            .bind_with(
                TelemetryKey::camera(param::FLAT_CAMERA_MODE, camera),
                &self.flat_camera_mode,
                |mode| {
                    if self.flat_mode_supported.get_value() {
                        self.update_modes(*mode);
                    }
                },
            );
    }

    /// Current camera mode.
    pub fn camera_mode(&self) -> &LatestValueChannel<CameraMode> {
        &self.camera_mode
    }

    /// Current photo mode.
    pub fn shoot_photo_mode(&self) -> &LatestValueChannel<ShootPhotoMode> {
        &self.shoot_photo_mode
    }

    pub fn is_flat_camera_mode_supported(&self) -> bool {
        self.flat_mode_supported.get_value()
    }

    /// Request switching `camera` to `mode`.
    ///
    /// Flat cameras receive `PhotoSingle` for photo mode and `VideoNormal`
    /// for anything else.
    pub fn camera_mode_request(&self, camera: CameraIndex, mode: CameraMode) -> ActionRequest {
        if self.is_flat_camera_mode_supported() {
            let flat = if mode == CameraMode::ShootPhoto {
                FlatCameraMode::PhotoSingle
            } else {
                FlatCameraMode::VideoNormal
            };
            ActionRequest::set(TelemetryKey::camera(param::FLAT_CAMERA_MODE, camera), flat)
        } else {
            ActionRequest::set(TelemetryKey::camera(param::MODE, camera), mode)
        }
    }

    /// Request switching `camera` to photo mode `mode`.
    pub fn photo_mode_request(&self, camera: CameraIndex, mode: ShootPhotoMode) -> ActionRequest {
        if self.is_flat_camera_mode_supported() {
            ActionRequest::set(
                TelemetryKey::camera(param::FLAT_CAMERA_MODE, camera),
                mode.to_flat_camera_mode(),
            )
        } else {
            ActionRequest::set(TelemetryKey::camera(param::SHOOT_PHOTO_MODE, camera), mode)
        }
    }

    fn update_modes(&self, flat: FlatCameraMode) {
        self.camera_mode.on_next(if flat.is_picture_mode() {
            CameraMode::ShootPhoto
        } else {
            CameraMode::RecordVideo
        });
        self.shoot_photo_mode.on_next(flat.to_shoot_photo_mode());
    }
}

impl Default for FlatCameraModule {
    fn default() -> Self {
        Self::new()
    }
}
