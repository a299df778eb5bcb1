//! Value types reported by the aircraft and its payloads.

/// Top-level operating mode of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CameraMode {
    ShootPhoto,
    RecordVideo,
    Playback,
    MediaDownload,
    Broadcast,
    #[default]
    Unknown,
}

/// Photo capture mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShootPhotoMode {
    Single,
    Hdr,
    Burst,
    Aeb,
    Interval,
    TimeLapse,
    Panorama,
    /// High-speed burst written to the SSD.
    RawBurst,
    ShallowFocus,
    Ehdr,
    HyperLight,
    #[default]
    Unknown,
}

impl ShootPhotoMode {
    /// Flat camera mode selecting this photo mode.
    pub const fn to_flat_camera_mode(self) -> FlatCameraMode {
        match self {
            ShootPhotoMode::Single => FlatCameraMode::PhotoSingle,
            ShootPhotoMode::Hdr => FlatCameraMode::PhotoHdr,
            ShootPhotoMode::Burst => FlatCameraMode::PhotoBurst,
            ShootPhotoMode::Aeb => FlatCameraMode::PhotoAeb,
            ShootPhotoMode::Interval => FlatCameraMode::PhotoInterval,
            ShootPhotoMode::TimeLapse => FlatCameraMode::PhotoTimeLapse,
            ShootPhotoMode::Panorama => FlatCameraMode::PhotoPanorama,
            ShootPhotoMode::Ehdr => FlatCameraMode::PhotoEhdr,
            ShootPhotoMode::HyperLight => FlatCameraMode::PhotoHyperLight,
            _ => FlatCameraMode::Unknown,
        }
    }
}

/// Combined camera/photo mode used by cameras without a separate photo mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlatCameraMode {
    VideoNormal,
    VideoHdr,
    SlowMotion,
    PhotoTimeLapse,
    PhotoAeb,
    PhotoSingle,
    PhotoBurst,
    PhotoHdr,
    PhotoInterval,
    PhotoHyperLight,
    PhotoPanorama,
    PhotoEhdr,
    #[default]
    Unknown,
}

impl FlatCameraMode {
    /// Returns `true` for modes that take pictures rather than record video.
    pub const fn is_picture_mode(self) -> bool {
        matches!(
            self,
            FlatCameraMode::PhotoTimeLapse
                | FlatCameraMode::PhotoAeb
                | FlatCameraMode::PhotoSingle
                | FlatCameraMode::PhotoBurst
                | FlatCameraMode::PhotoHdr
                | FlatCameraMode::PhotoInterval
                | FlatCameraMode::PhotoHyperLight
                | FlatCameraMode::PhotoPanorama
                | FlatCameraMode::PhotoEhdr
        )
    }

    /// Photo mode equivalent, or `Unknown` for video and time-lapse modes.
    pub const fn to_shoot_photo_mode(self) -> ShootPhotoMode {
        match self {
            FlatCameraMode::PhotoSingle => ShootPhotoMode::Single,
            FlatCameraMode::PhotoHdr => ShootPhotoMode::Hdr,
            FlatCameraMode::PhotoBurst => ShootPhotoMode::Burst,
            FlatCameraMode::PhotoAeb => ShootPhotoMode::Aeb,
            FlatCameraMode::PhotoInterval => ShootPhotoMode::Interval,
            FlatCameraMode::PhotoPanorama => ShootPhotoMode::Panorama,
            FlatCameraMode::PhotoEhdr => ShootPhotoMode::Ehdr,
            FlatCameraMode::PhotoHyperLight => ShootPhotoMode::HyperLight,
            _ => ShootPhotoMode::Unknown,
        }
    }
}

/// Number of pictures taken per burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhotoBurstCount {
    Count(u8),
    Continuous,
    #[default]
    Unknown,
}

/// Number of pictures taken per auto-exposure-bracketing shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhotoAebCount {
    Count3,
    Count5,
    Count7,
    #[default]
    Unknown,
}

/// Interval shooting parameters. The all-zero value means "not reported yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhotoIntervalSettings {
    pub capture_count: u16,
    pub interval_seconds: u16,
}

impl PhotoIntervalSettings {
    #[inline]
    pub const fn new(capture_count: u16, interval_seconds: u16) -> Self {
        Self {
            capture_count,
            interval_seconds,
        }
    }

    /// Returns `true` unless both fields are zero.
    #[inline]
    pub const fn is_known(&self) -> bool {
        self.capture_count != 0 || self.interval_seconds != 0
    }
}

/// Panorama stitching layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhotoPanoramaMode {
    Mode3x1,
    Mode3x3,
    Mode180,
    Sphere,
    SuperResolution,
    #[default]
    Unknown,
}

/// Where the camera writes pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageLocation {
    #[default]
    SdCard,
    InternalStorage,
    Ssd,
    Unknown,
}

/// Operation state of an SD card or of internal storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdCardOperationState {
    Normal,
    NotInserted,
    Invalid,
    ReadOnly,
    FormatNeeded,
    Formatting,
    Full,
    Slow,
    Busy,
    #[default]
    UnknownError,
}

/// Operation state of an SSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SsdOperationState {
    NotFound,
    Idle,
    Saving,
    Formatting,
    Initializing,
    Full,
    Error,
    #[default]
    Unknown,
}

/// Camera sensor sensitivity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Iso {
    /// Chosen by the camera.
    Auto,
    Iso100,
    Iso200,
    Iso400,
    Iso800,
    Iso1600,
    Iso3200,
    Iso6400,
    Iso12800,
    Iso25600,
    /// Locked by the camera.
    Fixed,
    #[default]
    Unknown,
}

impl Iso {
    /// Manual values in ascending order.
    pub const MANUAL: [Iso; 9] = [
        Iso::Iso100,
        Iso::Iso200,
        Iso::Iso400,
        Iso::Iso800,
        Iso::Iso1600,
        Iso::Iso3200,
        Iso::Iso6400,
        Iso::Iso12800,
        Iso::Iso25600,
    ];

    /// Numeric sensitivity, or 0 for `Auto`, `Fixed` and `Unknown`.
    pub const fn to_int(self) -> u32 {
        match self {
            Iso::Iso100 => 100,
            Iso::Iso200 => 200,
            Iso::Iso400 => 400,
            Iso::Iso800 => 800,
            Iso::Iso1600 => 1600,
            Iso::Iso3200 => 3200,
            Iso::Iso6400 => 6400,
            Iso::Iso12800 => 12800,
            Iso::Iso25600 => 25600,
            Iso::Auto | Iso::Fixed | Iso::Unknown => 0,
        }
    }

    /// Buckets a raw sensitivity into the largest manual value not above it.
    ///
    /// Values between 1 and 199 map to `Iso100`; 0 maps to `Unknown`.
    pub const fn from_int(value: u32) -> Iso {
        match value {
            0 => Iso::Unknown,
            1..200 => Iso::Iso100,
            200..400 => Iso::Iso200,
            400..800 => Iso::Iso400,
            800..1600 => Iso::Iso800,
            1600..3200 => Iso::Iso1600,
            3200..6400 => Iso::Iso3200,
            6400..12800 => Iso::Iso6400,
            12800..25600 => Iso::Iso12800,
            _ => Iso::Iso25600,
        }
    }
}

/// Whether the camera exposes ISO or exposure index (EI) controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExposureSensitivityMode {
    Iso,
    Ei,
    #[default]
    Unknown,
}

/// Exposure program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExposureMode {
    Program,
    ShutterPriority,
    AperturePriority,
    Manual,
    #[default]
    Unknown,
}

/// Exposure values currently applied by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExposureSettings {
    /// Effective ISO, 0 when not reported.
    pub iso: u32,
}

/// Position fix reported by the remote controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsData {
    pub latitude: f64,
    pub longitude: f64,
    pub is_valid: bool,
}

/// Connected aircraft model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProductModel {
    MavicAir,
    MavicPro,
    MavicMini,
    Mavic2,
    Mavic2Enterprise,
    Phantom4,
    Matrice210,
    Matrice300,
    #[default]
    Unknown,
}

impl ProductModel {
    /// Returns `false` for aircraft whose cameras cannot run auto ISO.
    pub const fn supports_auto_iso(self) -> bool {
        !matches!(
            self,
            ProductModel::MavicAir | ProductModel::MavicPro | ProductModel::MavicMini
        )
    }
}
