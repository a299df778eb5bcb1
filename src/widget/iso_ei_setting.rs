//! ISO and exposure index (EI) setting widget model.

use core::cell::Cell;
use core::fmt::Write;

use crate::binding::Binder;
use crate::bus::{ActionError, TelemetryBus};
use crate::channel::LatestValueChannel;
use crate::command::{ActionOutcome, ActionRequest, SkipReason, perform, perform_guarded};
use crate::key::{CameraIndex, LensType, TelemetryKey, param};
use crate::model::{ModelCore, WidgetModel};
use crate::module::{FlatCameraModule, LensModule};
use crate::types::{
    CameraMode, ExposureMode, ExposureSensitivityMode, ExposureSettings, Iso, ProductModel,
};
use crate::value::{EiRange, IsoRange, Text};

/// Text shown while the camera locks its ISO.
pub const LOCKED_ISO_TEXT: &str = "500";

/// ISO data for the seek bar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IsoInformation {
    /// Selectable manual values; `Auto` is reported through `is_auto` instead.
    pub range: IsoRange,
    /// Numeric ISO, 0 when not a manual value.
    pub value: u32,
    pub is_locked: bool,
    pub is_auto: bool,
}

impl IsoInformation {
    /// Builds the information for `iso` against the raw camera range.
    pub fn new(raw_range: &IsoRange, iso: Iso) -> Self {
        Self {
            range: raw_range.iter().copied().filter(|iso| *iso != Iso::Auto).collect(),
            value: iso.to_int(),
            is_locked: iso == Iso::Fixed,
            is_auto: iso == Iso::Auto,
        }
    }
}

/// EI data for the seek bar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EiInformation {
    pub range: EiRange,
    pub value: u32,
    pub recommended: u32,
}

/// Whether auto ISO can be offered: the range must contain `Auto`, the
/// camera must not be recording in EI mode, and the aircraft must support it.
pub fn is_auto_iso_supported(raw_range: &IsoRange, record_video_ei_mode: bool, product: ProductModel) -> bool {
    raw_range.contains(&Iso::Auto) && !record_video_ei_mode && product.supports_auto_iso()
}

/// Whether the camera must be switched to auto ISO: products without auto ISO
/// support only accept manual ISO values in manual exposure.
pub fn is_auto_iso_forced(product: ProductModel, exposure_mode: ExposureMode, iso: Iso) -> bool {
    !product.supports_auto_iso() && exposure_mode != ExposureMode::Manual && iso != Iso::Auto
}

fn default_iso_range() -> IsoRange {
    Iso::MANUAL.iter().copied().collect()
}

/// Widget model behind the ISO/EI seek bar.
pub struct IsoEiSettingWidgetModel<'a, B: TelemetryBus> {
    core: ModelCore<'a>,
    bus: &'a B,
    camera_index: Cell<CameraIndex>,
    lens_type: Cell<LensType>,
    flat_camera: FlatCameraModule,
    lens: LensModule,

    iso: LatestValueChannel<Iso>,
    exposure_settings: LatestValueChannel<ExposureSettings>,
    iso_range: LatestValueChannel<IsoRange>,
    sensitivity_mode: LatestValueChannel<ExposureSensitivityMode>,
    ei_value: LatestValueChannel<u32>,
    recommended_ei: LatestValueChannel<u32>,
    ei_range: LatestValueChannel<EiRange>,
    exposure_mode: LatestValueChannel<ExposureMode>,
    product_model: LatestValueChannel<ProductModel>,

    iso_information: LatestValueChannel<IsoInformation>,
    ei_information: LatestValueChannel<EiInformation>,
    record_video_ei_mode: LatestValueChannel<bool>,
    auto_iso_supported: LatestValueChannel<bool>,
    auto_iso_forced: LatestValueChannel<bool>,
}

impl<'a, B: TelemetryBus> IsoEiSettingWidgetModel<'a, B> {
    pub fn new(bus: &'a B) -> Self {
        Self {
            core: ModelCore::new(bus),
            bus,
            camera_index: Cell::new(CameraIndex::Camera0),
            lens_type: Cell::new(LensType::Zoom),
            flat_camera: FlatCameraModule::new(),
            lens: LensModule::new(),
            iso: LatestValueChannel::new(Iso::Unknown),
            exposure_settings: LatestValueChannel::new(ExposureSettings::default()),
            iso_range: LatestValueChannel::new(default_iso_range()),
            sensitivity_mode: LatestValueChannel::new(ExposureSensitivityMode::Unknown),
            ei_value: LatestValueChannel::new(0),
            recommended_ei: LatestValueChannel::new(0),
            ei_range: LatestValueChannel::new(EiRange::new()),
            exposure_mode: LatestValueChannel::new(ExposureMode::Unknown),
            product_model: LatestValueChannel::new(ProductModel::Unknown),
            iso_information: LatestValueChannel::new(IsoInformation::default()),
            ei_information: LatestValueChannel::new(EiInformation::default()),
            record_video_ei_mode: LatestValueChannel::new(false),
            auto_iso_supported: LatestValueChannel::new(false),
            auto_iso_forced: LatestValueChannel::new(false),
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

    pub fn lens_type(&self) -> LensType {
        self.lens_type.get()
    }

    /// Targets another lens. Restarts the model if it is active.
    pub fn set_lens_type(&self, lens: LensType) {
        self.lens_type.set(lens);
        self.restart_if_active();
    }

    pub fn iso_information(&self) -> &LatestValueChannel<IsoInformation> {
        &self.iso_information
    }

    pub fn ei_information(&self) -> &LatestValueChannel<EiInformation> {
        &self.ei_information
    }

    pub fn is_record_video_ei_mode(&self) -> &LatestValueChannel<bool> {
        &self.record_video_ei_mode
    }

    pub fn is_auto_iso_supported(&self) -> &LatestValueChannel<bool> {
        &self.auto_iso_supported
    }

    /// Whether the camera has to be switched to auto ISO, see
    /// [`enforce_auto_iso`](Self::enforce_auto_iso).
    pub fn is_auto_iso_forced(&self) -> &LatestValueChannel<bool> {
        &self.auto_iso_forced
    }

    /// Writes auto ISO while [`is_auto_iso_forced`](Self::is_auto_iso_forced)
    /// holds. The host calls this whenever the flag turns `true`.
    ///
    /// # Errors
    /// Returns the bus error unchanged.
    pub async fn enforce_auto_iso(&self) -> Result<ActionOutcome, ActionError> {
        let request = ActionRequest::set(self.iso_key(), Iso::Auto);
        perform_guarded(self.bus, self.auto_iso_forced.get_value(), request).await
    }

    /// Selects auto ISO, or the manual value at `index` of the camera's ISO
    /// range.
    ///
    /// An out-of-range index completes with
    /// [`SkipReason::GuardFalse`] without writing.
    ///
    /// # Errors
    /// Returns the bus error unchanged.
    pub async fn set_iso(&self, auto: bool, index: usize) -> Result<ActionOutcome, ActionError> {
        let iso = if auto {
            Some(Iso::Auto)
        } else {
            self.manual_iso(index)
        };
        let Some(iso) = iso else {
            debug!("ISO index {} out of range", index);
            return Ok(ActionOutcome::Skipped(SkipReason::GuardFalse));
        };
        perform(self.bus, ActionRequest::set(self.iso_key(), iso)).await
    }

    /// Writes the EI value at `index` of the EI range, or 0 when `index` is out
    /// of range.
    ///
    /// # Errors
    /// Returns the bus error unchanged.
    pub async fn set_ei(&self, index: usize) -> Result<ActionOutcome, ActionError> {
        let ei = self.ei_range.with_value(|range| range.get(index).copied().unwrap_or(0));
        let key = TelemetryKey::camera(param::EI_VALUE, self.camera_index());
        perform(self.bus, ActionRequest::set(key, ei)).await
    }

    /// Label for the ISO at `index`.
    ///
    /// # Returns
    /// [`LOCKED_ISO_TEXT`] while the ISO is locked, an empty string for an
    /// out-of-range index.
    pub fn iso_text(&self, index: usize) -> Text {
        if self.iso_information.with_value(|info| info.is_locked) {
            let mut text = Text::new();
            let _ = text.push_str(LOCKED_ISO_TEXT);
            return text;
        }
        self.manual_iso(index)
            .map(|iso| number_text(iso.to_int()))
            .unwrap_or_default()
    }

    /// Label for the EI value at `index`, empty when out of range.
    pub fn ei_text(&self, index: usize) -> Text {
        self.ei_range
            .with_value(|range| range.get(index).copied())
            .map(number_text)
            .unwrap_or_default()
    }

    /// Seek bar position `index` counts manual values only.
    fn manual_iso(&self, index: usize) -> Option<Iso> {
        self.iso_range
            .with_value(|range| range.iter().copied().filter(|iso| *iso != Iso::Auto).nth(index))
    }

    fn iso_key(&self) -> TelemetryKey {
        self.lens.lens_key(param::ISO, self.camera_index(), self.lens_type())
    }

    fn update_iso_information(&self, iso: Iso) {
        let info = self.iso_range.with_value(|range| IsoInformation::new(range, iso));
        self.iso_information.on_next(info);
    }

    fn update_ei_information(&self) {
        self.ei_information.on_next(EiInformation {
            range: self.ei_range.get_value(),
            value: self.ei_value.get_value(),
            recommended: self.recommended_ei.get_value(),
        });
    }
}

fn number_text(value: u32) -> Text {
    let mut text = Text::new();
    let _ = write!(text, "{}", value);
    text
}

impl<B: TelemetryBus> WidgetModel for IsoEiSettingWidgetModel<'_, B> {
    fn core(&self) -> &ModelCore<'_> {
        &self.core
    }

    fn bind_keys(&self, binder: &mut Binder<'_>) {
        let camera = self.camera_index();
        let lens = self.lens_type();
        self.flat_camera.bind_keys(binder, camera);
        self.lens.bind_keys(binder, camera);

        binder
            .bind(TelemetryKey::product(param::MODEL_NAME), &self.product_model)
            .bind_with(self.lens.lens_key(param::ISO, camera, lens), &self.iso, |iso| {
                self.update_iso_information(*iso)
            })
            .bind_with(
                self.lens.lens_key(param::EXPOSURE_SETTINGS, camera, lens),
                &self.exposure_settings,
                |settings| self.update_iso_information(Iso::from_int(settings.iso)),
            )
            .bind_with(self.lens.lens_key(param::ISO_RANGE, camera, lens), &self.iso_range, |_| {
                self.update_iso_information(self.iso.get_value())
            })
            .bind(
                TelemetryKey::camera(param::EXPOSURE_SENSITIVITY_MODE, camera),
                &self.sensitivity_mode,
            )
            .bind_with(TelemetryKey::camera(param::EI_VALUE, camera), &self.ei_value, |_| {
                self.update_ei_information()
            })
            .bind_with(
                TelemetryKey::camera(param::RECOMMENDED_EI_VALUE, camera),
                &self.recommended_ei,
                |_| self.update_ei_information(),
            )
            .bind_with(TelemetryKey::camera(param::EI_VALUE_RANGE, camera), &self.ei_range, |_| {
                self.update_ei_information()
            })
            .bind(self.lens.lens_key(param::EXPOSURE_MODE, camera, lens), &self.exposure_mode);
    }

    fn in_cleanup(&self) {
        self.iso_information.reset();
        self.ei_information.reset();
        self.record_video_ei_mode.reset();
        self.auto_iso_supported.reset();
        self.auto_iso_forced.reset();
    }

    fn take_restart_request(&self) -> bool {
        self.lens.take_arrangement_updated()
    }

    fn update_states(&self) {
        let record_video_ei = self.flat_camera.camera_mode().get_value() == CameraMode::RecordVideo
            && self.sensitivity_mode.get_value() == ExposureSensitivityMode::Ei;
        self.record_video_ei_mode.on_next(record_video_ei);

        let product = self.product_model.get_value();
        let supported = self
            .iso_range
            .with_value(|range| is_auto_iso_supported(range, record_video_ei, product));
        self.auto_iso_supported.on_next(supported);

        let forced = is_auto_iso_forced(product, self.exposure_mode.get_value(), self.iso.get_value());
        if forced && !self.auto_iso_forced.get_value() {
            debug!("auto ISO required by product");
        }
        self.auto_iso_forced.on_next(forced);
    }
}
