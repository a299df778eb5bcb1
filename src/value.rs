//! Dynamically typed values carried by the telemetry bus.
//!
//! The bus hands out [`TelemetryValue`]s; each binding converts them into the
//! concrete type of its channel through [`FromTelemetry`]. A value of the
//! wrong variant never reaches the channel.

use heapless::{String, Vec};

use crate::types::{
    CameraMode, ExposureMode, ExposureSensitivityMode, ExposureSettings, FlatCameraMode, GpsData,
    Iso, PhotoAebCount, PhotoBurstCount, PhotoIntervalSettings, PhotoPanoramaMode, ProductModel,
    SdCardOperationState, ShootPhotoMode, SsdOperationState, StorageLocation,
};

/// Maximum number of entries in an ISO range.
pub const MAX_ISO_RANGE: usize = 16;

/// Maximum number of entries in an EI range.
pub const MAX_EI_RANGE: usize = 16;

/// Maximum length of a text value in bytes.
pub const MAX_TEXT_LEN: usize = 32;

/// ISO values offered by a camera.
pub type IsoRange = Vec<Iso, MAX_ISO_RANGE>;

/// Exposure index values offered by a camera.
pub type EiRange = Vec<u32, MAX_EI_RANGE>;

/// Short text such as a camera display name.
pub type Text = String<MAX_TEXT_LEN>;

/// A single value published on the telemetry bus.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Text),
    CameraMode(CameraMode),
    FlatCameraMode(FlatCameraMode),
    ShootPhotoMode(ShootPhotoMode),
    BurstCount(PhotoBurstCount),
    AebCount(PhotoAebCount),
    IntervalSettings(PhotoIntervalSettings),
    PanoramaMode(PhotoPanoramaMode),
    StorageLocation(StorageLocation),
    SdCardState(SdCardOperationState),
    SsdState(SsdOperationState),
    Iso(Iso),
    IsoRange(IsoRange),
    EiRange(EiRange),
    ExposureSensitivityMode(ExposureSensitivityMode),
    ExposureMode(ExposureMode),
    ExposureSettings(ExposureSettings),
    GpsData(GpsData),
    ProductModel(ProductModel),
}

impl TelemetryValue {
    /// Builds a text value, truncating at a character boundary if too long.
    pub fn text(s: &str) -> Self {
        let mut text = Text::new();
        for c in s.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        TelemetryValue::Text(text)
    }

    /// Name of the variant, used in diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            TelemetryValue::Bool(_) => "bool",
            TelemetryValue::Int(_) => "int",
            TelemetryValue::Float(_) => "float",
            TelemetryValue::Text(_) => "text",
            TelemetryValue::CameraMode(_) => "camera mode",
            TelemetryValue::FlatCameraMode(_) => "flat camera mode",
            TelemetryValue::ShootPhotoMode(_) => "shoot photo mode",
            TelemetryValue::BurstCount(_) => "burst count",
            TelemetryValue::AebCount(_) => "AEB count",
            TelemetryValue::IntervalSettings(_) => "interval settings",
            TelemetryValue::PanoramaMode(_) => "panorama mode",
            TelemetryValue::StorageLocation(_) => "storage location",
            TelemetryValue::SdCardState(_) => "SD card state",
            TelemetryValue::SsdState(_) => "SSD state",
            TelemetryValue::Iso(_) => "ISO",
            TelemetryValue::IsoRange(_) => "ISO range",
            TelemetryValue::EiRange(_) => "EI range",
            TelemetryValue::ExposureSensitivityMode(_) => "exposure sensitivity mode",
            TelemetryValue::ExposureMode(_) => "exposure mode",
            TelemetryValue::ExposureSettings(_) => "exposure settings",
            TelemetryValue::GpsData(_) => "GPS data",
            TelemetryValue::ProductModel(_) => "product model",
        }
    }
}

/// Conversion from a bus value into a channel's value type.
pub trait FromTelemetry: Sized {
    /// Variant name reported when a conversion fails.
    const EXPECTED: &'static str;

    /// Returns `None` when `value` holds a different type.
    fn from_telemetry(value: &TelemetryValue) -> Option<Self>;
}

macro_rules! telemetry_variant {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromTelemetry for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_telemetry(value: &TelemetryValue) -> Option<Self> {
                match value {
                    TelemetryValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$ty> for TelemetryValue {
            fn from(value: $ty) -> Self {
                TelemetryValue::$variant(value)
            }
        }
    };
}

telemetry_variant!(bool, Bool, "bool");
telemetry_variant!(Text, Text, "text");
telemetry_variant!(CameraMode, CameraMode, "camera mode");
telemetry_variant!(FlatCameraMode, FlatCameraMode, "flat camera mode");
telemetry_variant!(ShootPhotoMode, ShootPhotoMode, "shoot photo mode");
telemetry_variant!(PhotoBurstCount, BurstCount, "burst count");
telemetry_variant!(PhotoAebCount, AebCount, "AEB count");
telemetry_variant!(PhotoIntervalSettings, IntervalSettings, "interval settings");
telemetry_variant!(PhotoPanoramaMode, PanoramaMode, "panorama mode");
telemetry_variant!(StorageLocation, StorageLocation, "storage location");
telemetry_variant!(SdCardOperationState, SdCardState, "SD card state");
telemetry_variant!(SsdOperationState, SsdState, "SSD state");
telemetry_variant!(Iso, Iso, "ISO");
telemetry_variant!(IsoRange, IsoRange, "ISO range");
telemetry_variant!(EiRange, EiRange, "EI range");
telemetry_variant!(ExposureSensitivityMode, ExposureSensitivityMode, "exposure sensitivity mode");
telemetry_variant!(ExposureMode, ExposureMode, "exposure mode");
telemetry_variant!(ExposureSettings, ExposureSettings, "exposure settings");
telemetry_variant!(GpsData, GpsData, "GPS data");
telemetry_variant!(ProductModel, ProductModel, "product model");

macro_rules! telemetry_int {
    ($($ty:ty),*) => {
        $(
            impl FromTelemetry for $ty {
                const EXPECTED: &'static str = "int";

                fn from_telemetry(value: &TelemetryValue) -> Option<Self> {
                    match value {
                        TelemetryValue::Int(v) => <$ty>::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for TelemetryValue {
                fn from(value: $ty) -> Self {
                    TelemetryValue::Int(i64::from(value))
                }
            }
        )*
    };
}

telemetry_int!(i64, i32, u32, u8);

impl FromTelemetry for f64 {
    const EXPECTED: &'static str = "float";

    fn from_telemetry(value: &TelemetryValue) -> Option<Self> {
        match value {
            TelemetryValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for TelemetryValue {
    fn from(value: f64) -> Self {
        TelemetryValue::Float(value)
    }
}

impl FromTelemetry for f32 {
    const EXPECTED: &'static str = "float";

    fn from_telemetry(value: &TelemetryValue) -> Option<Self> {
        match value {
            TelemetryValue::Float(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl From<f32> for TelemetryValue {
    fn from(value: f32) -> Self {
        TelemetryValue::Float(f64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_rejects_other_variants() {
        let value = TelemetryValue::Bool(true);
        assert_eq!(bool::from_telemetry(&value), Some(true));
        assert_eq!(u8::from_telemetry(&value), None);
        assert_eq!(Iso::from_telemetry(&value), None);
    }

    #[test]
    fn integer_conversion_checks_range() {
        assert_eq!(u8::from_telemetry(&TelemetryValue::Int(60)), Some(60));
        assert_eq!(u8::from_telemetry(&TelemetryValue::Int(300)), None);
        assert_eq!(i64::from_telemetry(&TelemetryValue::Int(-1)), Some(-1));
    }

    #[test]
    fn text_truncates_long_input() {
        let TelemetryValue::Text(text) = TelemetryValue::text("a display name that is far too long for the buffer")
        else {
            panic!("expected text");
        };
        assert_eq!(text.len(), MAX_TEXT_LEN);
    }
}
