//! Compass widget model.
//!
//! Tracks the aircraft attitude, the aircraft position relative to the
//! compass center (home point or remote controller/mobile device) and the
//! position of the second GPS source relative to home.

use core::cell::Cell;

use libm::fabsf;

use crate::binding::Binder;
use crate::bus::KeyRegistry;
use crate::channel::LatestValueChannel;
use crate::geo::{self, ViewCoordinates};
use crate::key::{GimbalIndex, TelemetryKey, param};
use crate::model::{LifecycleState, ModelCore, WidgetModel};
use crate::types::GpsData;

/// Minimum heading change, in degrees, that updates the device azimuth.
pub const SENSOR_SENSITIVITY_DEG: f32 = 2.0;

const QUARTER_TURN: f32 = 90.0;
const HALF_TURN: f32 = 180.0;

/// What the compass is centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CenterType {
    #[default]
    HomeGps,
    /// Remote controller GPS or the mobile device location.
    RcMobileGps,
}

/// Aircraft attitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AircraftAttitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Bearing (degrees) and distance (meters) of the aircraft from the center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AircraftState {
    pub angle: f32,
    pub distance: f32,
}

/// Bearing (degrees) and distance (meters) of home from the second GPS source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentLocationState {
    pub angle: f32,
    pub distance: f32,
}

/// Everything the compass draws.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompassWidgetState {
    pub attitude: AircraftAttitude,
    pub aircraft_state: AircraftState,
    pub current_location: CurrentLocationState,
    pub center_type: CenterType,
    /// Gimbal yaw relative to the aircraft, in degrees.
    pub gimbal_heading: f32,
    /// Heading of the device showing the compass, in degrees.
    pub device_azimuth: f32,
}

impl CompassWidgetState {
    /// Distance mapped to the compass rim.
    pub fn max_distance(&self) -> f32 {
        geo::max_distance(self.aircraft_state.distance, self.current_location.distance)
    }

    /// Aircraft position on the compass.
    pub fn aircraft_coordinates(&self) -> ViewCoordinates {
        geo::aircraft_coordinates(
            self.aircraft_state.angle,
            self.aircraft_state.distance,
            self.device_azimuth,
            self.max_distance(),
        )
    }

    /// Position of the second GPS source on the compass.
    pub fn second_gps_coordinates(&self) -> ViewCoordinates {
        geo::second_gps_coordinates(
            self.current_location.angle,
            self.current_location.distance,
            self.device_azimuth,
            self.max_distance(),
        )
    }

    /// Scale of the aircraft icon.
    pub fn aircraft_scale(&self) -> f32 {
        geo::aircraft_scale(self.aircraft_state.distance)
    }
}

fn is_valid_position((latitude, longitude): (f64, f64)) -> bool {
    geo::check_latitude(latitude) && geo::check_longitude(longitude)
}

/// Widget model behind the compass.
pub struct CompassWidgetModel<'a> {
    core: ModelCore<'a>,
    gimbal_index: Cell<GimbalIndex>,

    attitude_pitch: LatestValueChannel<f32>,
    attitude_roll: LatestValueChannel<f32>,
    attitude_yaw: LatestValueChannel<f32>,
    home_latitude: LatestValueChannel<f64>,
    home_longitude: LatestValueChannel<f64>,
    aircraft_latitude: LatestValueChannel<f64>,
    aircraft_longitude: LatestValueChannel<f64>,
    rc_gps_data: LatestValueChannel<GpsData>,
    gimbal_yaw: LatestValueChannel<f32>,

    aircraft_position: Cell<(f64, f64)>,
    second_position: Cell<(f64, f64)>,
    rc_gps_received: Cell<bool>,
    latest_sensor_value: Cell<f32>,

    center_type: LatestValueChannel<CenterType>,
    device_azimuth: LatestValueChannel<f32>,
    attitude: LatestValueChannel<AircraftAttitude>,
    aircraft_state: LatestValueChannel<AircraftState>,
    current_location: LatestValueChannel<CurrentLocationState>,
    compass_state: LatestValueChannel<CompassWidgetState>,
}

impl<'a> CompassWidgetModel<'a> {
    pub fn new(registry: &'a dyn KeyRegistry) -> Self {
        Self {
            core: ModelCore::new(registry),
            gimbal_index: Cell::new(GimbalIndex::Port),
            attitude_pitch: LatestValueChannel::new(0.0),
            attitude_roll: LatestValueChannel::new(0.0),
            attitude_yaw: LatestValueChannel::new(0.0),
            home_latitude: LatestValueChannel::new(0.0),
            home_longitude: LatestValueChannel::new(0.0),
            aircraft_latitude: LatestValueChannel::new(0.0),
            aircraft_longitude: LatestValueChannel::new(0.0),
            rc_gps_data: LatestValueChannel::new(GpsData::default()),
            gimbal_yaw: LatestValueChannel::new(0.0),
            aircraft_position: Cell::new((0.0, 0.0)),
            second_position: Cell::new((0.0, 0.0)),
            rc_gps_received: Cell::new(false),
            latest_sensor_value: Cell::new(0.0),
            center_type: LatestValueChannel::new(CenterType::HomeGps),
            device_azimuth: LatestValueChannel::new(0.0),
            attitude: LatestValueChannel::new(AircraftAttitude::default()),
            aircraft_state: LatestValueChannel::new(AircraftState::default()),
            current_location: LatestValueChannel::new(CurrentLocationState::default()),
            compass_state: LatestValueChannel::new(CompassWidgetState::default()),
        }
    }

    pub fn gimbal_index(&self) -> GimbalIndex {
        self.gimbal_index.get()
    }

    /// Follows another gimbal. Restarts the model if it is active.
    pub fn set_gimbal_index(&self, index: GimbalIndex) {
        self.gimbal_index.set(index);
        self.restart_if_active();
    }

    pub fn attitude(&self) -> &LatestValueChannel<AircraftAttitude> {
        &self.attitude
    }

    pub fn aircraft_state(&self) -> &LatestValueChannel<AircraftState> {
        &self.aircraft_state
    }

    pub fn current_location_state(&self) -> &LatestValueChannel<CurrentLocationState> {
        &self.current_location
    }

    pub fn center_type(&self) -> &LatestValueChannel<CenterType> {
        &self.center_type
    }

    pub fn device_azimuth(&self) -> &LatestValueChannel<f32> {
        &self.device_azimuth
    }

    pub fn gimbal_heading(&self) -> &LatestValueChannel<f32> {
        &self.gimbal_yaw
    }

    pub fn compass_state(&self) -> &LatestValueChannel<CompassWidgetState> {
        &self.compass_state
    }

    /// Feeds a heading reading of the device showing the compass.
    ///
    /// Readings within [`SENSOR_SENSITIVITY_DEG`] of the last accepted one are
    /// dropped. `rotated_upside_down` flips the heading for displays rotated
    /// by 270 degrees.
    ///
    /// # Returns
    /// `true` if the device azimuth was updated.
    pub fn on_device_heading(&self, heading_deg: f32, rotated_upside_down: bool) -> bool {
        if self.state() != LifecycleState::Active {
            return false;
        }
        if fabsf(heading_deg - self.latest_sensor_value.get()) <= SENSOR_SENSITIVITY_DEG {
            return false;
        }
        self.latest_sensor_value.set(heading_deg);

        let heading = if rotated_upside_down {
            heading_deg + HALF_TURN
        } else {
            heading_deg
        };
        self.device_azimuth.on_next(heading + QUARTER_TURN);
        self.update_compass_state();
        true
    }

    /// Feeds a location of the mobile device showing the compass.
    ///
    /// Ignored once the remote controller has reported a valid GPS fix.
    pub fn on_mobile_location(&self, latitude: f64, longitude: f64) {
        if self.state() != LifecycleState::Active || self.rc_gps_received.get() {
            return;
        }
        self.center_type.on_next(CenterType::RcMobileGps);
        self.second_position.set((latitude, longitude));
        self.update_calculations();
        self.update_compass_state();
    }

    fn home_position(&self) -> (f64, f64) {
        (self.home_latitude.get_value(), self.home_longitude.get_value())
    }

    fn on_rc_gps(&self, data: &GpsData) {
        if !data.is_valid {
            return;
        }
        self.rc_gps_received.set(true);
        self.center_type.on_next(CenterType::RcMobileGps);
        self.second_position.set((data.latitude, data.longitude));
        self.update_calculations();
    }

    fn on_aircraft_latitude(&self, latitude: f64) {
        if geo::check_latitude(latitude) {
            let (_, longitude) = self.aircraft_position.get();
            self.aircraft_position.set((latitude, longitude));
            self.calculate_aircraft_state();
        }
    }

    fn on_aircraft_longitude(&self, longitude: f64) {
        if geo::check_longitude(longitude) {
            let (latitude, _) = self.aircraft_position.get();
            self.aircraft_position.set((latitude, longitude));
            self.calculate_aircraft_state();
        }
    }

    fn update_calculations(&self) {
        self.calculate_aircraft_state();
        self.calculate_second_to_home();
    }

    fn calculate_aircraft_state(&self) {
        let aircraft = self.aircraft_position.get();
        if !is_valid_position(aircraft) {
            return;
        }
        let center = match self.center_type.get_value() {
            CenterType::HomeGps => self.home_position(),
            CenterType::RcMobileGps => self.second_position.get(),
        };
        if !is_valid_position(center) {
            return;
        }
        let (angle, distance) = geo::angle_and_distance(center, aircraft);
        self.aircraft_state.on_next(AircraftState { angle, distance });
    }

    fn calculate_second_to_home(&self) {
        if self.center_type.get_value() == CenterType::HomeGps {
            return;
        }
        let second = self.second_position.get();
        let home = self.home_position();
        if !is_valid_position(second) || !is_valid_position(home) {
            return;
        }
        let (angle, distance) = geo::angle_and_distance(second, home);
        self.current_location.on_next(CurrentLocationState { angle, distance });
    }

    fn update_compass_state(&self) {
        self.compass_state.on_next(CompassWidgetState {
            attitude: self.attitude.get_value(),
            aircraft_state: self.aircraft_state.get_value(),
            current_location: self.current_location.get_value(),
            center_type: self.center_type.get_value(),
            gimbal_heading: self.gimbal_yaw.get_value(),
            device_azimuth: self.device_azimuth.get_value(),
        });
    }
}

impl WidgetModel for CompassWidgetModel<'_> {
    fn core(&self) -> &ModelCore<'_> {
        &self.core
    }

    fn bind_keys(&self, binder: &mut Binder<'_>) {
        binder
            .bind(TelemetryKey::flight_controller(param::ATTITUDE_PITCH), &self.attitude_pitch)
            .bind(TelemetryKey::flight_controller(param::ATTITUDE_ROLL), &self.attitude_roll)
            .bind(TelemetryKey::flight_controller(param::ATTITUDE_YAW), &self.attitude_yaw)
            .bind_with(
                TelemetryKey::flight_controller(param::HOME_LOCATION_LATITUDE),
                &self.home_latitude,
                |_| self.update_calculations(),
            )
            .bind_with(
                TelemetryKey::flight_controller(param::HOME_LOCATION_LONGITUDE),
                &self.home_longitude,
                |_| self.update_calculations(),
            )
            .bind_with(
                TelemetryKey::flight_controller(param::AIRCRAFT_LOCATION_LATITUDE),
                &self.aircraft_latitude,
                |latitude| self.on_aircraft_latitude(*latitude),
            )
            .bind_with(
                TelemetryKey::flight_controller(param::AIRCRAFT_LOCATION_LONGITUDE),
                &self.aircraft_longitude,
                |longitude| self.on_aircraft_longitude(*longitude),
            )
            .bind_with(
                TelemetryKey::remote_controller(param::GPS_DATA),
                &self.rc_gps_data,
                |data| self.on_rc_gps(data),
            )
            .bind(
                TelemetryKey::gimbal(param::YAW_ANGLE_WITH_AIRCRAFT_IN_DEGREE, self.gimbal_index()),
                &self.gimbal_yaw,
            );
    }

    fn in_cleanup(&self) {
        self.aircraft_position.set((0.0, 0.0));
        self.second_position.set((0.0, 0.0));
        self.rc_gps_received.set(false);
        self.latest_sensor_value.set(0.0);
        self.device_azimuth.reset();
        self.center_type.reset();
        self.attitude.reset();
        self.aircraft_state.reset();
        self.current_location.reset();
        self.compass_state.reset();
    }

    fn update_states(&self) {
        self.attitude.on_next(AircraftAttitude {
            roll: f64::from(self.attitude_roll.get_value()),
            pitch: f64::from(self.attitude_pitch.get_value()),
            yaw: f64::from(self.attitude_yaw.get_value()),
        });
        self.update_compass_state();
    }
}
