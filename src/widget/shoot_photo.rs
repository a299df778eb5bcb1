//! Shoot-photo widget model.
//!
//! Derives the photo state (which photo mode is active and its parameters)
//! and the storage state (where pictures go and how many still fit), and
//! exposes guarded start/stop actions.

use core::cell::Cell;

use crate::binding::Binder;
use crate::bus::{ActionError, TelemetryBus};
use crate::channel::LatestValueChannel;
use crate::command::{ActionOutcome, ActionRequest, perform, perform_guarded};
use crate::key::{CameraIndex, TelemetryKey, param};
use crate::model::{ModelCore, WidgetModel};
use crate::module::FlatCameraModule;
use crate::types::{
    PhotoAebCount, PhotoBurstCount, PhotoIntervalSettings, PhotoPanoramaMode,
    SdCardOperationState, ShootPhotoMode, SsdOperationState, StorageLocation,
};
use crate::value::Text;

/// Capture count reported when the storage does not know it.
pub const INVALID_CAPTURE_COUNT: i64 = -1;

/// Photo mode together with the parameters that mode depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CameraPhotoState {
    /// No photo mode reported yet.
    #[default]
    Unknown,
    /// A mode without parameters: single, HDR, hyper light, shallow focus or EHDR.
    Simple(ShootPhotoMode),
    Burst(PhotoBurstCount),
    RawBurst(PhotoBurstCount),
    Aeb(PhotoAebCount),
    Interval(PhotoIntervalSettings),
    Panorama(PhotoPanoramaMode),
}

impl CameraPhotoState {
    /// Photo mode this state describes.
    pub const fn mode(&self) -> ShootPhotoMode {
        match self {
            CameraPhotoState::Unknown => ShootPhotoMode::Unknown,
            CameraPhotoState::Simple(mode) => *mode,
            CameraPhotoState::Burst(_) => ShootPhotoMode::Burst,
            CameraPhotoState::RawBurst(_) => ShootPhotoMode::RawBurst,
            CameraPhotoState::Aeb(_) => ShootPhotoMode::Aeb,
            CameraPhotoState::Interval(_) => ShootPhotoMode::Interval,
            CameraPhotoState::Panorama(_) => ShootPhotoMode::Panorama,
        }
    }
}

/// Storage the next picture will be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CameraStorageState {
    /// SD card or internal storage.
    Sd {
        location: StorageLocation,
        available_capture_count: i64,
        state: SdCardOperationState,
    },
    /// SSD, used for high-speed bursts.
    Ssd {
        available_capture_count: i64,
        state: SsdOperationState,
    },
}

impl Default for CameraStorageState {
    fn default() -> Self {
        CameraStorageState::Sd {
            location: StorageLocation::SdCard,
            available_capture_count: 0,
            state: SdCardOperationState::NotInserted,
        }
    }
}

/// Auxiliary values a photo state may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhotoInputs {
    pub burst_count: PhotoBurstCount,
    pub raw_burst_count: PhotoBurstCount,
    pub aeb_count: PhotoAebCount,
    pub interval_settings: PhotoIntervalSettings,
    pub panorama_mode: PhotoPanoramaMode,
}

/// Snapshot of every storage-related value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageInputs {
    pub location: StorageLocation,
    pub photo_mode: ShootPhotoMode,
    pub sd_card_state: SdCardOperationState,
    pub storage_state: SdCardOperationState,
    pub inner_storage_state: SdCardOperationState,
    pub ssd_state: SsdOperationState,
    pub sd_capture_count: i64,
    pub inner_storage_capture_count: i64,
    pub ssd_capture_count: i64,
}

/// Derives the photo state for `mode`.
///
/// # Returns
/// `None` while the parameter `mode` depends on is still unknown, or for
/// modes that have no photo state. The previous state should then be kept.
pub fn compose_photo_state(mode: ShootPhotoMode, inputs: &PhotoInputs) -> Option<CameraPhotoState> {
    match mode {
        ShootPhotoMode::Single
        | ShootPhotoMode::Hdr
        | ShootPhotoMode::HyperLight
        | ShootPhotoMode::ShallowFocus
        | ShootPhotoMode::Ehdr => Some(CameraPhotoState::Simple(mode)),
        ShootPhotoMode::Burst => {
            (inputs.burst_count != PhotoBurstCount::Unknown)
                .then_some(CameraPhotoState::Burst(inputs.burst_count))
        }
        ShootPhotoMode::RawBurst => {
            (inputs.raw_burst_count != PhotoBurstCount::Unknown)
                .then_some(CameraPhotoState::RawBurst(inputs.raw_burst_count))
        }
        ShootPhotoMode::Aeb => {
            (inputs.aeb_count != PhotoAebCount::Unknown).then_some(CameraPhotoState::Aeb(inputs.aeb_count))
        }
        ShootPhotoMode::Interval => inputs
            .interval_settings
            .is_known()
            .then_some(CameraPhotoState::Interval(inputs.interval_settings)),
        ShootPhotoMode::Panorama => {
            (inputs.panorama_mode != PhotoPanoramaMode::Unknown)
                .then_some(CameraPhotoState::Panorama(inputs.panorama_mode))
        }
        ShootPhotoMode::TimeLapse | ShootPhotoMode::Unknown => None,
    }
}

/// Derives the storage state.
///
/// High-speed burst always reports the SSD. Otherwise the location decides;
/// on the SD card the card-specific state wins over the generic storage state
/// unless it is unknown.
///
/// # Returns
/// `None` when the location or the capture count is unknown, or when no
/// operation state is known for the location.
pub fn compose_storage_state(inputs: &StorageInputs) -> Option<CameraStorageState> {
    if inputs.location == StorageLocation::Unknown {
        return None;
    }

    let raw_burst = inputs.photo_mode == ShootPhotoMode::RawBurst;
    let capture_count = if raw_burst {
        inputs.ssd_capture_count
    } else {
        match inputs.location {
            StorageLocation::SdCard => inputs.sd_capture_count,
            StorageLocation::InternalStorage => inputs.inner_storage_capture_count,
            StorageLocation::Ssd => inputs.ssd_capture_count,
            StorageLocation::Unknown => INVALID_CAPTURE_COUNT,
        }
    };
    if capture_count == INVALID_CAPTURE_COUNT {
        return None;
    }

    if raw_burst || inputs.location == StorageLocation::Ssd {
        return Some(CameraStorageState::Ssd {
            available_capture_count: capture_count,
            state: inputs.ssd_state,
        });
    }

    let sd = |state| CameraStorageState::Sd {
        location: inputs.location,
        available_capture_count: capture_count,
        state,
    };
    match inputs.location {
        StorageLocation::SdCard => {
            if inputs.sd_card_state != SdCardOperationState::UnknownError {
                Some(sd(inputs.sd_card_state))
            } else if inputs.storage_state != SdCardOperationState::UnknownError {
                Some(sd(inputs.storage_state))
            } else {
                None
            }
        }
        StorageLocation::InternalStorage => Some(sd(inputs.inner_storage_state)),
        _ => None,
    }
}

/// Widget model behind the shoot-photo button.
pub struct ShootPhotoWidgetModel<'a, B: TelemetryBus> {
    core: ModelCore<'a>,
    bus: &'a B,
    camera_index: Cell<CameraIndex>,
    flat_camera: FlatCameraModule,

    camera_connected: LatestValueChannel<bool>,
    burst_count: LatestValueChannel<PhotoBurstCount>,
    raw_burst_count: LatestValueChannel<PhotoBurstCount>,
    aeb_count: LatestValueChannel<PhotoAebCount>,
    interval_settings: LatestValueChannel<PhotoIntervalSettings>,
    panorama_mode: LatestValueChannel<PhotoPanoramaMode>,
    is_shooting_photo: LatestValueChannel<bool>,
    is_storing_photo: LatestValueChannel<bool>,
    can_start: LatestValueChannel<bool>,
    is_shooting_interval: LatestValueChannel<bool>,
    is_shooting_panorama: LatestValueChannel<bool>,
    display_name: LatestValueChannel<Text>,
    storage_location: LatestValueChannel<StorageLocation>,
    sd_card_state: LatestValueChannel<SdCardOperationState>,
    storage_state: LatestValueChannel<SdCardOperationState>,
    inner_storage_state: LatestValueChannel<SdCardOperationState>,
    ssd_state: LatestValueChannel<SsdOperationState>,
    sd_capture_count: LatestValueChannel<i64>,
    inner_storage_capture_count: LatestValueChannel<i64>,
    ssd_capture_count: LatestValueChannel<i64>,

    can_stop: LatestValueChannel<bool>,
    photo_state: LatestValueChannel<CameraPhotoState>,
    camera_storage_state: LatestValueChannel<CameraStorageState>,
}

impl<'a, B: TelemetryBus> ShootPhotoWidgetModel<'a, B> {
    pub fn new(bus: &'a B) -> Self {
        Self {
            core: ModelCore::new(bus),
            bus,
            camera_index: Cell::new(CameraIndex::Camera0),
            flat_camera: FlatCameraModule::new(),
            camera_connected: LatestValueChannel::new(false),
            burst_count: LatestValueChannel::new(PhotoBurstCount::Unknown),
            raw_burst_count: LatestValueChannel::new(PhotoBurstCount::Unknown),
            aeb_count: LatestValueChannel::new(PhotoAebCount::Unknown),
            interval_settings: LatestValueChannel::new(PhotoIntervalSettings::default()),
            panorama_mode: LatestValueChannel::new(PhotoPanoramaMode::Unknown),
            is_shooting_photo: LatestValueChannel::new(false),
            is_storing_photo: LatestValueChannel::new(false),
            can_start: LatestValueChannel::new(false),
            is_shooting_interval: LatestValueChannel::new(false),
            is_shooting_panorama: LatestValueChannel::new(false),
            display_name: LatestValueChannel::new(Text::new()),
            storage_location: LatestValueChannel::new(StorageLocation::SdCard),
            sd_card_state: LatestValueChannel::new(SdCardOperationState::UnknownError),
            storage_state: LatestValueChannel::new(SdCardOperationState::Normal),
            inner_storage_state: LatestValueChannel::new(SdCardOperationState::UnknownError),
            ssd_state: LatestValueChannel::new(SsdOperationState::Unknown),
            sd_capture_count: LatestValueChannel::new(INVALID_CAPTURE_COUNT),
            inner_storage_capture_count: LatestValueChannel::new(INVALID_CAPTURE_COUNT),
            ssd_capture_count: LatestValueChannel::new(INVALID_CAPTURE_COUNT),
            can_stop: LatestValueChannel::new(false),
            photo_state: LatestValueChannel::new(CameraPhotoState::Unknown),
            camera_storage_state: LatestValueChannel::new(CameraStorageState::default()),
        }
    }

    pub fn camera_index(&self) -> CameraIndex {
        self.camera_index.get()
    }

    /// Targets another camera. Restarts the model if it is active.
    pub fn set_camera_index(&self, index: CameraIndex) {
        self.camera_index.set(index);
        self.restart_if_active();
    }

    pub fn photo_state(&self) -> &LatestValueChannel<CameraPhotoState> {
        &self.photo_state
    }

    pub fn storage_state(&self) -> &LatestValueChannel<CameraStorageState> {
        &self.camera_storage_state
    }

    pub fn is_shooting_photo(&self) -> &LatestValueChannel<bool> {
        &self.is_shooting_photo
    }

    pub fn is_storing_photo(&self) -> &LatestValueChannel<bool> {
        &self.is_storing_photo
    }

    pub fn can_start_shooting_photo(&self) -> &LatestValueChannel<bool> {
        &self.can_start
    }

    pub fn can_stop_shooting_photo(&self) -> &LatestValueChannel<bool> {
        &self.can_stop
    }

    pub fn camera_display_name(&self) -> &LatestValueChannel<Text> {
        &self.display_name
    }

    pub fn flat_camera(&self) -> &FlatCameraModule {
        &self.flat_camera
    }

    /// Starts shooting if the camera allows it.
    ///
    /// # Errors
    /// Returns the bus error if the action was forwarded and failed.
    pub async fn start_shoot_photo(&self) -> Result<ActionOutcome, ActionError> {
        let request =
            ActionRequest::perform(TelemetryKey::camera(param::START_SHOOT_PHOTO, self.camera_index()));
        perform_guarded(self.bus, self.can_start.get_value(), request).await
    }

    /// Stops an interval or panorama capture if one is running.
    ///
    /// # Errors
    /// Returns the bus error if the action was forwarded and failed.
    pub async fn stop_shoot_photo(&self) -> Result<ActionOutcome, ActionError> {
        let request =
            ActionRequest::perform(TelemetryKey::camera(param::STOP_SHOOT_PHOTO, self.camera_index()));
        perform_guarded(self.bus, self.can_stop.get_value(), request).await
    }

    /// Switches the camera to photo mode `mode`.
    ///
    /// # Errors
    /// Returns the bus error unchanged.
    pub async fn set_photo_mode(&self, mode: ShootPhotoMode) -> Result<ActionOutcome, ActionError> {
        let request = self.flat_camera.photo_mode_request(self.camera_index(), mode);
        perform(self.bus, request).await
    }

    fn on_camera_connected(&self, connected: bool) {
        if !connected {
            self.sd_card_state.on_next(SdCardOperationState::UnknownError);
            self.storage_state.on_next(SdCardOperationState::UnknownError);
            self.inner_storage_state.on_next(SdCardOperationState::UnknownError);
            self.ssd_state.on_next(SsdOperationState::Unknown);
        }
    }

    fn update_photo_state(&self) {
        let inputs = PhotoInputs {
            burst_count: self.burst_count.get_value(),
            raw_burst_count: self.raw_burst_count.get_value(),
            aeb_count: self.aeb_count.get_value(),
            interval_settings: self.interval_settings.get_value(),
            panorama_mode: self.panorama_mode.get_value(),
        };
        let mode = self.flat_camera.shoot_photo_mode().get_value();
        if let Some(state) = compose_photo_state(mode, &inputs) {
            self.photo_state.on_next(state);
        }
    }

    fn update_storage_state(&self) {
        let inputs = StorageInputs {
            location: self.storage_location.get_value(),
            photo_mode: self.flat_camera.shoot_photo_mode().get_value(),
            sd_card_state: self.sd_card_state.get_value(),
            storage_state: self.storage_state.get_value(),
            inner_storage_state: self.inner_storage_state.get_value(),
            ssd_state: self.ssd_state.get_value(),
            sd_capture_count: self.sd_capture_count.get_value(),
            inner_storage_capture_count: self.inner_storage_capture_count.get_value(),
            ssd_capture_count: self.ssd_capture_count.get_value(),
        };
        if let Some(state) = compose_storage_state(&inputs) {
            self.camera_storage_state.on_next(state);
        }
    }
}

impl<B: TelemetryBus> WidgetModel for ShootPhotoWidgetModel<'_, B> {
    fn core(&self) -> &ModelCore<'_> {
        &self.core
    }

    fn bind_keys(&self, binder: &mut Binder<'_>) {
        let camera = self.camera_index();
        self.flat_camera.bind_keys(binder, camera);

        binder
            .bind_with(
                TelemetryKey::camera(param::CONNECTION, camera),
                &self.camera_connected,
                |connected| self.on_camera_connected(*connected),
            )
            .bind(TelemetryKey::camera(param::PHOTO_AEB_COUNT, camera), &self.aeb_count)
            .bind(TelemetryKey::camera(param::PHOTO_BURST_COUNT, camera), &self.burst_count)
            .bind(TelemetryKey::camera(param::PHOTO_RAW_BURST_COUNT, camera), &self.raw_burst_count)
            .bind(
                TelemetryKey::camera(param::PHOTO_TIME_INTERVAL_SETTINGS, camera),
                &self.interval_settings,
            )
            .bind(TelemetryKey::camera(param::PHOTO_PANORAMA_MODE, camera), &self.panorama_mode)
            .bind(TelemetryKey::camera(param::IS_SHOOTING_PHOTO, camera), &self.is_shooting_photo)
            .bind(TelemetryKey::camera(param::IS_STORING_PHOTO, camera), &self.is_storing_photo)
            .bind(TelemetryKey::camera(param::IS_SHOOTING_PHOTO_ENABLED, camera), &self.can_start)
            .bind_with(
                TelemetryKey::camera(param::IS_SHOOTING_INTERVAL_PHOTO, camera),
                &self.is_shooting_interval,
                |shooting| self.can_stop.on_next(*shooting),
            )
            .bind_with(
                TelemetryKey::camera(param::IS_SHOOTING_PANORAMA_PHOTO, camera),
                &self.is_shooting_panorama,
                |shooting| self.can_stop.on_next(*shooting),
            )
            .bind(TelemetryKey::camera(param::DISPLAY_NAME, camera), &self.display_name)
            .bind(TelemetryKey::camera(param::CAMERA_STORAGE_LOCATION, camera), &self.storage_location)
            .bind(TelemetryKey::camera(param::SDCARD_STATE, camera), &self.sd_card_state)
            .bind(TelemetryKey::camera(param::STORAGE_STATE, camera), &self.storage_state)
            .bind(TelemetryKey::camera(param::INNER_STORAGE_STATE, camera), &self.inner_storage_state)
            .bind(TelemetryKey::camera(param::SSD_OPERATION_STATE, camera), &self.ssd_state)
            .bind(
                TelemetryKey::camera(param::SDCARD_AVAILABLE_CAPTURE_COUNT, camera),
                &self.sd_capture_count,
            )
            .bind(
                TelemetryKey::camera(param::INNER_STORAGE_AVAILABLE_CAPTURE_COUNT, camera),
                &self.inner_storage_capture_count,
            )
            .bind(TelemetryKey::camera(param::RAW_PHOTO_BURST_COUNT, camera), &self.ssd_capture_count);
    }

    fn in_cleanup(&self) {
        self.can_stop.reset();
        self.photo_state.reset();
        self.camera_storage_state.reset();
    }

    fn update_states(&self) {
        self.update_photo_state();
        self.update_storage_state();
    }
}
