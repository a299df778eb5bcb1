//! Great-circle math and compass projection helpers.
//!
//! Coordinates are WGS84 degrees. Distances are meters.

use libm::{atan2, cos, fabs, sin, sqrt};

/// Equatorial earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Below this distance the compass does not zoom out.
pub const MAX_DISTANCE: f32 = 400.0;

/// At and beyond this distance the aircraft icon has its minimum scale.
pub const MAX_SCALE_DISTANCE: f32 = 2000.0;

/// Smallest aircraft icon scale.
pub const MIN_SCALE: f32 = 0.6;

/// Returns `true` for a usable latitude: within ±90 degrees and not exactly 0.
///
/// Zero is what the aircraft reports before it has a fix.
pub fn check_latitude(latitude: f64) -> bool {
    fabs(latitude) <= 90.0 && latitude != 0.0
}

/// Returns `true` for a usable longitude: within ±180 degrees and not exactly 0.
pub fn check_longitude(longitude: f64) -> bool {
    fabs(longitude) <= 180.0 && longitude != 0.0
}

/// Initial great-circle bearing from `from` to `to`, in degrees clockwise
/// from north, normalized to `[0, 360)`.
///
/// θ = atan2( sin Δλ ⋅ cos φ2 , cos φ1 ⋅ sin φ2 − sin φ1 ⋅ cos φ2 ⋅ cos Δλ )
#[allow(non_snake_case)]
pub fn bearing_deg(from: (f64, f64), to: (f64, f64)) -> f64 {
    let φ1 = from.0.to_radians();
    let φ2 = to.0.to_radians();
    let Δλ = (to.1 - from.1).to_radians();

    let y = sin(Δλ) * cos(φ2);
    let x = cos(φ1) * sin(φ2) - sin(φ1) * cos(φ2) * cos(Δλ);
    let bearing = atan2(y, x).to_degrees();
    if bearing < 0.0 { bearing + 360.0 } else { bearing }
}

/// Haversine distance between two points, in meters.
///
/// a = sin²(Δφ/2) + cos φ1 ⋅ cos φ2 ⋅ sin²(Δλ/2)
/// c = 2 ⋅ atan2( √a, √(1−a) )
/// d = R ⋅ c
#[allow(non_snake_case)]
pub fn distance_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let φ1 = from.0.to_radians();
    let φ2 = to.0.to_radians();
    let Δφ = φ2 - φ1;
    let Δλ = (to.1 - from.1).to_radians();

    let a = sin(Δφ / 2.) * sin(Δφ / 2.) + cos(φ1) * cos(φ2) * sin(Δλ / 2.) * sin(Δλ / 2.);
    let c = 2. * atan2(sqrt(a), sqrt(1. - a));

    EARTH_RADIUS_M * c
}

/// Bearing and distance from `from` to `to` as `(degrees, meters)`.
pub fn angle_and_distance(from: (f64, f64), to: (f64, f64)) -> (f32, f32) {
    (bearing_deg(from, to) as f32, distance_m(from, to) as f32)
}

/// Normalized compass coordinates. The compass rim is the unit circle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ViewCoordinates {
    pub x: f32,
    pub y: f32,
}

/// Distance that maps to the compass rim: the larger of both measured
/// distances, but at least [`MAX_DISTANCE`].
pub fn max_distance(aircraft_distance: f32, second_distance: f32) -> f32 {
    aircraft_distance.max(second_distance).max(MAX_DISTANCE)
}

fn project(angle: f32, azimuth: f32, factor: f32) -> ViewCoordinates {
    let radians = f64::from(angle + azimuth).to_radians();
    ViewCoordinates {
        x: (f64::from(factor) * cos(radians)) as f32,
        y: (f64::from(factor) * sin(radians)) as f32,
    }
}

/// Projects the aircraft onto the compass.
///
/// The aircraft sits on the rim when its distance reaches `max_distance`.
pub fn aircraft_coordinates(angle: f32, distance: f32, azimuth: f32, max_distance: f32) -> ViewCoordinates {
    if distance >= max_distance {
        project(angle, azimuth, 1.0)
    } else {
        project(angle, azimuth, distance / max_distance)
    }
}

/// Projects the second GPS position (remote controller or mobile device)
/// onto the compass, clamped to the rim like the aircraft.
pub fn second_gps_coordinates(angle: f32, distance: f32, azimuth: f32, max_distance: f32) -> ViewCoordinates {
    if distance >= max_distance {
        project(angle, azimuth, 1.0)
    } else {
        project(angle, azimuth, distance / max_distance)
    }
}

/// Aircraft icon scale for `distance`: 1.0 up to [`MAX_DISTANCE`], shrinking
/// linearly to [`MIN_SCALE`] at [`MAX_SCALE_DISTANCE`].
pub fn aircraft_scale(distance: f32) -> f32 {
    if distance >= MAX_SCALE_DISTANCE {
        MIN_SCALE
    } else if distance > MAX_DISTANCE {
        1.0 - MIN_SCALE
            + (MAX_SCALE_DISTANCE - distance) / (MAX_SCALE_DISTANCE - MAX_DISTANCE) * MIN_SCALE
    } else {
        1.0
    }
}
