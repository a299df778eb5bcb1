//! Telemetry key addressing.

/// Component family a telemetry key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyDomain {
    /// Connected product as a whole.
    Product,
    /// A camera payload.
    Camera,
    /// A gimbal.
    Gimbal,
    /// The flight controller.
    FlightController,
    /// The remote controller.
    RemoteController,
    /// The spotlight accessory.
    Spotlight,
}

/// Address of a single named value on the telemetry bus.
///
/// Equality covers the domain, the parameter name, the component index and
/// the optional sub-component (lens) index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryKey {
    pub domain: KeyDomain,
    pub param: &'static str,
    pub index: u8,
    pub sub_index: Option<u8>,
}

impl TelemetryKey {
    /// Creates a key for component `index` of `domain`.
    #[inline]
    pub const fn new(domain: KeyDomain, param: &'static str, index: u8) -> Self {
        Self {
            domain,
            param,
            index,
            sub_index: None,
        }
    }

    /// Key on the connected product.
    #[inline]
    pub const fn product(param: &'static str) -> Self {
        Self::new(KeyDomain::Product, param, 0)
    }

    /// Key on camera `index`.
    #[inline]
    pub const fn camera(param: &'static str, index: CameraIndex) -> Self {
        Self::new(KeyDomain::Camera, param, index.value())
    }

    /// Key on lens `lens` of camera `index`.
    #[inline]
    pub const fn camera_lens(param: &'static str, index: CameraIndex, lens: LensType) -> Self {
        Self::new(KeyDomain::Camera, param, index.value()).with_sub_index(lens.value())
    }

    /// Key on gimbal `index`.
    #[inline]
    pub const fn gimbal(param: &'static str, index: GimbalIndex) -> Self {
        Self::new(KeyDomain::Gimbal, param, index.value())
    }

    /// Key on the flight controller.
    #[inline]
    pub const fn flight_controller(param: &'static str) -> Self {
        Self::new(KeyDomain::FlightController, param, 0)
    }

    /// Key on the remote controller.
    #[inline]
    pub const fn remote_controller(param: &'static str) -> Self {
        Self::new(KeyDomain::RemoteController, param, 0)
    }

    /// Key on the spotlight accessory.
    #[inline]
    pub const fn spotlight(param: &'static str) -> Self {
        Self::new(KeyDomain::Spotlight, param, 0)
    }

    /// Returns a copy addressing sub-component `sub_index`.
    #[inline]
    pub const fn with_sub_index(mut self, sub_index: u8) -> Self {
        self.sub_index = Some(sub_index);
        self
    }
}

/// Camera slot on the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CameraIndex {
    #[default]
    Camera0,
    Camera1,
    Camera2,
}

impl CameraIndex {
    /// Component index used in keys.
    #[inline]
    pub const fn value(self) -> u8 {
        match self {
            CameraIndex::Camera0 => 0,
            CameraIndex::Camera1 => 1,
            CameraIndex::Camera2 => 2,
        }
    }
}

/// Gimbal slot on the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GimbalIndex {
    #[default]
    Port,
    Starboard,
    Top,
}

impl GimbalIndex {
    /// Component index used in keys.
    #[inline]
    pub const fn value(self) -> u8 {
        match self {
            GimbalIndex::Port => 0,
            GimbalIndex::Starboard => 1,
            GimbalIndex::Top => 2,
        }
    }
}

/// Lens of a multi-lens camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LensType {
    #[default]
    Zoom,
    Wide,
    InfraredThermal,
}

impl LensType {
    /// Sub-component index used in keys.
    #[inline]
    pub const fn value(self) -> u8 {
        match self {
            LensType::Zoom => 0,
            LensType::Wide => 1,
            LensType::InfraredThermal => 2,
        }
    }
}

/// Parameter names understood by the bus.
pub mod param {
    pub const CONNECTION: &str = "Connection";
    pub const MODEL_NAME: &str = "ModelName";

    pub const MODE: &str = "Mode";
    pub const SHOOT_PHOTO_MODE: &str = "ShootPhotoMode";
    pub const IS_FLAT_CAMERA_MODE_SUPPORTED: &str = "IsFlatCameraModeSupported";
    pub const FLAT_CAMERA_MODE: &str = "FlatCameraMode";
    pub const IS_MULTI_LENS_CAMERA_SUPPORTED: &str = "IsMultiLensCameraSupported";
    pub const DISPLAY_NAME: &str = "DisplayName";

    pub const START_SHOOT_PHOTO: &str = "StartShootPhoto";
    pub const STOP_SHOOT_PHOTO: &str = "StopShootPhoto";
    pub const IS_SHOOTING_PHOTO: &str = "IsShootingPhoto";
    pub const IS_STORING_PHOTO: &str = "IsStoringPhoto";
    pub const IS_SHOOTING_PHOTO_ENABLED: &str = "IsShootingPhotoEnabled";
    pub const IS_SHOOTING_INTERVAL_PHOTO: &str = "IsShootingIntervalPhoto";
    pub const IS_SHOOTING_PANORAMA_PHOTO: &str = "IsShootingPanoramaPhoto";
    pub const PHOTO_AEB_COUNT: &str = "PhotoAEBCount";
    pub const PHOTO_BURST_COUNT: &str = "PhotoBurstCount";
    pub const PHOTO_RAW_BURST_COUNT: &str = "PhotoRawBurstCount";
    pub const PHOTO_TIME_INTERVAL_SETTINGS: &str = "PhotoTimeIntervalSettings";
    pub const PHOTO_PANORAMA_MODE: &str = "PhotoPanoramaMode";

    pub const CAMERA_STORAGE_LOCATION: &str = "CameraStorageLocation";
    pub const SDCARD_STATE: &str = "SDCardState";
    pub const STORAGE_STATE: &str = "StorageState";
    pub const INNER_STORAGE_STATE: &str = "InnerStorageState";
    pub const SSD_OPERATION_STATE: &str = "SSDOperationState";
    pub const SDCARD_AVAILABLE_CAPTURE_COUNT: &str = "SDCardAvailableCaptureCount";
    pub const INNER_STORAGE_AVAILABLE_CAPTURE_COUNT: &str = "InnerStorageAvailableCaptureCount";
    pub const RAW_PHOTO_BURST_COUNT: &str = "RawPhotoBurstCount";

    pub const ISO: &str = "ISO";
    pub const ISO_RANGE: &str = "ISORange";
    pub const EXPOSURE_SETTINGS: &str = "ExposureSettings";
    pub const EXPOSURE_SENSITIVITY_MODE: &str = "ExposureSensitivityMode";
    pub const EXPOSURE_MODE: &str = "ExposureMode";
    pub const EI_VALUE: &str = "EIValue";
    pub const RECOMMENDED_EI_VALUE: &str = "RecommendedEIValue";
    pub const EI_VALUE_RANGE: &str = "EIValueRange";

    pub const ATTITUDE_PITCH: &str = "AttitudePitch";
    pub const ATTITUDE_ROLL: &str = "AttitudeRoll";
    pub const ATTITUDE_YAW: &str = "AttitudeYaw";
    pub const HOME_LOCATION_LATITUDE: &str = "HomeLocationLatitude";
    pub const HOME_LOCATION_LONGITUDE: &str = "HomeLocationLongitude";
    pub const AIRCRAFT_LOCATION_LATITUDE: &str = "AircraftLocationLatitude";
    pub const AIRCRAFT_LOCATION_LONGITUDE: &str = "AircraftLocationLongitude";
    pub const GPS_DATA: &str = "GPSData";
    pub const YAW_ANGLE_WITH_AIRCRAFT_IN_DEGREE: &str = "YawAngleWithAircraftInDegree";

    pub const SPOTLIGHT_ENABLED: &str = "SpotlightEnabled";
    pub const SPOTLIGHT_BRIGHTNESS: &str = "SpotlightBrightness";
    pub const SPOTLIGHT_TEMPERATURE: &str = "SpotlightTemperature";
}
