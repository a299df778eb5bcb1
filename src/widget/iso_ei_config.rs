use core::cell::Cell;

use crate::binding::Binder;
use crate::bus::KeyRegistry;
use crate::channel::LatestValueChannel;
use crate::key::{CameraIndex, LensType, TelemetryKey, param};
use crate::model::{ModelCore, WidgetModel};
use crate::module::LensModule;
use crate::types::{ExposureSensitivityMode, ExposureSettings, Iso};

/// ISO shown while the camera locks its ISO without reporting a value.
pub const LOCKED_ISO_VALUE: u32 = 500;

/// Sensitivity shown in the camera configuration bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IsoEiState {
    #[default]
    ProductDisconnected,
    CameraDisconnected,
    Ei(u32),
    Auto(u32),
    Fixed(u32),
    Iso(u32),
}

impl core::fmt::Display for IsoEiState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IsoEiState::ProductDisconnected | IsoEiState::CameraDisconnected => write!(f, "N/A"),
            IsoEiState::Ei(value)
            | IsoEiState::Auto(value)
            | IsoEiState::Fixed(value)
            | IsoEiState::Iso(value) => write!(f, "{}", value),
        }
    }
}

/// Read-only ISO/EI readout.
pub struct IsoEiConfigWidgetModel<'a> {
    core: ModelCore<'a>,
    camera_index: Cell<CameraIndex>,
    lens_type: Cell<LensType>,
    lens: LensModule,
    camera_connected: LatestValueChannel<bool>,
    exposure_settings: LatestValueChannel<ExposureSettings>,
    iso: LatestValueChannel<Iso>,
    sensitivity_mode: LatestValueChannel<ExposureSensitivityMode>,
    ei_value: LatestValueChannel<u32>,
    iso_ei_state: LatestValueChannel<IsoEiState>,
}

impl<'a> IsoEiConfigWidgetModel<'a> {
    pub fn new(registry: &'a dyn KeyRegistry) -> Self {
        Self {
            core: ModelCore::new(registry),
            camera_index: Cell::new(CameraIndex::Camera0),
            lens_type: Cell::new(LensType::Zoom),
            lens: LensModule::new(),
            camera_connected: LatestValueChannel::new(false),
            exposure_settings: LatestValueChannel::new(ExposureSettings::default()),
            iso: LatestValueChannel::new(Iso::Unknown),
            sensitivity_mode: LatestValueChannel::new(ExposureSensitivityMode::Unknown),
            ei_value: LatestValueChannel::new(0),
            iso_ei_state: LatestValueChannel::new(IsoEiState::ProductDisconnected),
        }
    }

    pub fn camera_index(&self) -> CameraIndex {
        self.camera_index.get()
    }

    pub fn set_camera_index(&self, index: CameraIndex) {
        self.camera_index.set(index);
        self.restart_if_active();
    }

    pub fn lens_type(&self) -> LensType {
        self.lens_type.get()
    }

    pub fn set_lens_type(&self, lens: LensType) {
        self.lens_type.set(lens);
        self.restart_if_active();
    }

    pub fn iso_ei_state(&self) -> &LatestValueChannel<IsoEiState> {
        &self.iso_ei_state
    }
}

impl WidgetModel for IsoEiConfigWidgetModel<'_> {
    fn core(&self) -> &ModelCore<'_> {
        &self.core
    }

    fn bind_keys(&self, binder: &mut Binder<'_>) {
        let camera = self.camera_index();
        let lens = self.lens_type();
        self.lens.bind_keys(binder, camera);

        binder
            .bind(TelemetryKey::camera(param::CONNECTION, camera), &self.camera_connected)
            .bind(
                self.lens.lens_key(param::EXPOSURE_SETTINGS, camera, lens),
                &self.exposure_settings,
            )
            .bind(self.lens.lens_key(param::ISO, camera, lens), &self.iso)
            .bind(
                TelemetryKey::camera(param::EXPOSURE_SENSITIVITY_MODE, camera),
                &self.sensitivity_mode,
            )
            .bind(TelemetryKey::camera(param::EI_VALUE, camera), &self.ei_value);
    }

    fn in_cleanup(&self) {
        self.iso_ei_state.reset();
    }

    fn take_restart_request(&self) -> bool {
        self.lens.take_arrangement_updated()
    }

    fn update_states(&self) {
        let exposure_iso = self.exposure_settings.get_value().iso;
        let state = if !self.product_connection().get_value() {
            IsoEiState::ProductDisconnected
        } else if !self.camera_connected.get_value() {
            IsoEiState::CameraDisconnected
        } else if self.sensitivity_mode.get_value() == ExposureSensitivityMode::Ei {
            IsoEiState::Ei(self.ei_value.get_value())
        } else {
            match self.iso.get_value() {
                Iso::Fixed if exposure_iso == 0 => IsoEiState::Fixed(LOCKED_ISO_VALUE),
                Iso::Auto => IsoEiState::Auto(exposure_iso),
                _ => IsoEiState::Iso(exposure_iso),
            }
        };
        self.iso_ei_state.on_next(state);
    }
}
