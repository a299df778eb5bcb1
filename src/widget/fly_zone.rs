//! Fly-zone overlay resolution.
//!
//! Turns fly-zone reports into map overlay primitives: shapes with their
//! stroke and fill colors, and markers showing whether a zone is unlocked.
//! The resolver holds only display configuration; it is fed whole zone lists
//! and returns fresh overlays each time.

use core::fmt::Write;

use heapless::Vec;
use palette::{Srgb, Srgba};

use crate::colors::{self, DEFAULT_ALPHA, with_alpha};
use crate::value::Text;

/// Maximum number of sub-zones per zone.
pub const MAX_SUB_ZONES: usize = 8;

/// Maximum number of polygon vertices.
pub const MAX_VERTICES: usize = 16;

/// Maximum number of shapes a single zone resolves to.
pub const MAX_SHAPES_PER_ZONE: usize = MAX_SUB_ZONES + 1;

/// Border width of every overlay shape, in pixels.
pub const DEFAULT_BORDER_WIDTH: f32 = 5.0;

const CATEGORY_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlyZoneCategory {
    Warning = 0,
    EnhancedWarning = 1,
    /// Flight requires unlocking; the user may unlock these zones.
    Authorization = 2,
    Restricted = 3,
    Unknown = 4,
}

impl FlyZoneCategory {
    pub const ALL: [FlyZoneCategory; CATEGORY_COUNT] = [
        FlyZoneCategory::Warning,
        FlyZoneCategory::EnhancedWarning,
        FlyZoneCategory::Authorization,
        FlyZoneCategory::Restricted,
        FlyZoneCategory::Unknown,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

pub type Vertices = Vec<Coordinate, MAX_VERTICES>;

/// Outline of a zone or sub-zone.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Radius in meters.
    Circle { center: Coordinate, radius: f64 },
    Polygon { vertices: Vertices },
}

/// Part of a zone with its own outline and height limit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubFlyZone {
    pub area_id: u32,
    pub geometry: Geometry,
    /// Maximum flight height in meters, 0 for none.
    pub max_flight_height: u32,
}

/// One fly zone as reported by the aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyZone {
    pub id: u32,
    pub category: FlyZoneCategory,
    pub center: Coordinate,
    /// Outline radius for circular zones. `None` for zones described only by
    /// their sub-zones.
    pub radius: Option<f64>,
    /// End of the user's unlock, seconds since the epoch.
    pub unlock_end_time: Option<u64>,
    pub sub_zones: Vec<SubFlyZone, MAX_SUB_ZONES>,
}

impl FlyZone {
    pub fn is_unlocked(&self) -> bool {
        self.unlock_end_time.is_some()
    }
}

/// Zone unlocked in advance through a custom unlock license.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomUnlockZone {
    pub id: u32,
    pub center: Coordinate,
    pub radius: f64,
    pub is_enabled: bool,
}

/// Map shape ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayShape {
    /// `"<zone>"` for a zone outline, `"<zone>_<area>"` for a sub-zone.
    pub id: Text,
    pub geometry: Geometry,
    pub stroke: Srgb<u8>,
    pub fill: Srgba<u8>,
    pub stroke_width: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarkerIcon {
    Locked,
    Unlocked,
    CustomUnlockSent,
    CustomUnlockEnabled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayMarker {
    pub zone_id: u32,
    pub position: Coordinate,
    pub icon: MarkerIcon,
    pub visible: bool,
}

/// Everything drawn for one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneOverlay {
    pub shapes: Vec<OverlayShape, MAX_SHAPES_PER_ZONE>,
    pub marker: Option<OverlayMarker>,
}

/// Stroke color plus fill alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneStyle {
    pub color: Srgb<u8>,
    pub alpha: u8,
}

impl ZoneStyle {
    pub const fn new(color: Srgb<u8>, alpha: u8) -> Self {
        Self { color, alpha }
    }

    pub const fn fill(&self) -> Srgba<u8> {
        with_alpha(self.color, self.alpha)
    }
}

/// Colors of every overlay kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPalette {
    categories: [ZoneStyle; CATEGORY_COUNT],
    pub max_height: ZoneStyle,
    pub self_unlock: ZoneStyle,
    pub custom_unlock_not_sent: ZoneStyle,
    pub custom_unlock_sent: ZoneStyle,
    pub custom_unlock_enabled: ZoneStyle,
    pub border_width: f32,
}

impl OverlayPalette {
    pub fn category(&self, category: FlyZoneCategory) -> ZoneStyle {
        self.categories[category.index()]
    }

    pub fn set_category(&mut self, category: FlyZoneCategory, style: ZoneStyle) {
        self.categories[category.index()] = style;
    }
}

impl Default for OverlayPalette {
    fn default() -> Self {
        Self {
            categories: [
                ZoneStyle::new(colors::ZONE_WARNING, DEFAULT_ALPHA),
                ZoneStyle::new(colors::ZONE_ENHANCED_WARNING, DEFAULT_ALPHA),
                ZoneStyle::new(colors::ZONE_AUTHORIZATION, DEFAULT_ALPHA),
                ZoneStyle::new(colors::ZONE_RESTRICTED, DEFAULT_ALPHA),
                ZoneStyle::new(colors::ZONE_UNKNOWN, DEFAULT_ALPHA),
            ],
            max_height: ZoneStyle::new(colors::ZONE_ALTITUDE, DEFAULT_ALPHA),
            self_unlock: ZoneStyle::new(colors::ZONE_SELF_UNLOCKED, DEFAULT_ALPHA),
            custom_unlock_not_sent: ZoneStyle::new(colors::CUSTOM_UNLOCK_NOT_SENT, DEFAULT_ALPHA),
            custom_unlock_sent: ZoneStyle::new(colors::CUSTOM_UNLOCK_SENT, DEFAULT_ALPHA),
            custom_unlock_enabled: ZoneStyle::new(colors::CUSTOM_UNLOCK_ENABLED, DEFAULT_ALPHA),
            border_width: DEFAULT_BORDER_WIDTH,
        }
    }
}

/// Resolves fly zones into overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyZoneOverlay {
    palette: OverlayPalette,
    visible: [bool; CATEGORY_COUNT],
    unlocking_enabled: bool,
    custom_unlock_visible: bool,
}

impl FlyZoneOverlay {
    /// Creates a resolver showing every category except `Unknown`.
    pub fn new() -> Self {
        Self {
            palette: OverlayPalette::default(),
            visible: [true, true, true, true, false],
            unlocking_enabled: true,
            custom_unlock_visible: false,
        }
    }

    pub fn palette(&self) -> &OverlayPalette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut OverlayPalette {
        &mut self.palette
    }

    pub fn is_category_visible(&self, category: FlyZoneCategory) -> bool {
        self.visible[category.index()]
    }

    pub fn set_category_visible(&mut self, category: FlyZoneCategory, visible: bool) {
        self.visible[category.index()] = visible;
    }

    /// Shows or hides lock markers.
    pub fn set_unlocking_enabled(&mut self, enabled: bool) {
        self.unlocking_enabled = enabled;
    }

    pub fn set_custom_unlock_zones_visible(&mut self, visible: bool) {
        self.custom_unlock_visible = visible;
    }

    /// Resolves one zone.
    ///
    /// Unlocked zones and their sub-zones use the self-unlock style. Other
    /// sub-zones with a height limit use the max-height style. Everything
    /// else uses the category style.
    pub fn resolve(&self, zone: &FlyZone) -> ZoneOverlay {
        let visible = self.is_category_visible(zone.category);
        let unlocked = zone.is_unlocked();
        let zone_style = if unlocked {
            self.palette.self_unlock
        } else {
            self.palette.category(zone.category)
        };

        let mut shapes = Vec::new();
        if let Some(radius) = zone.radius {
            let mut id = Text::new();
            let _ = write!(id, "{}", zone.id);
            let shape = self.shape(id, Geometry::Circle { center: zone.center, radius }, zone_style, visible);
            let _ = shapes.push(shape);
        }

        for sub_zone in &zone.sub_zones {
            let mut id = Text::new();
            let _ = write!(id, "{}_{}", zone.id, sub_zone.area_id);
            let style = if !unlocked && sub_zone.max_flight_height != 0 {
                self.palette.max_height
            } else {
                zone_style
            };
            if shapes
                .push(self.shape(id, sub_zone.geometry.clone(), style, visible))
                .is_err()
            {
                warn!("fly zone {} has too many shapes", zone.id);
                break;
            }
        }

        let icon = if unlocked {
            Some(MarkerIcon::Unlocked)
        } else if zone.category == FlyZoneCategory::Authorization {
            Some(MarkerIcon::Locked)
        } else {
            None
        };
        let marker = icon.map(|icon| OverlayMarker {
            zone_id: zone.id,
            position: zone.center,
            icon,
            visible: self.unlocking_enabled && visible,
        });

        ZoneOverlay { shapes, marker }
    }

    /// Resolves every zone of a fly-zone report, in order.
    pub fn resolve_all<'z>(&'z self, zones: &'z [FlyZone]) -> impl Iterator<Item = ZoneOverlay> + 'z {
        zones.iter().map(|zone| self.resolve(zone))
    }

    /// Resolves a custom unlock zone.
    ///
    /// Zones not yet sent to the aircraft get no marker.
    pub fn resolve_custom_unlock(
        &self,
        zone: &CustomUnlockZone,
        sent_to_aircraft: bool,
    ) -> (OverlayShape, Option<OverlayMarker>) {
        let (style, icon) = match (sent_to_aircraft, zone.is_enabled) {
            (true, true) => (self.palette.custom_unlock_enabled, Some(MarkerIcon::CustomUnlockEnabled)),
            (true, false) => (self.palette.custom_unlock_sent, Some(MarkerIcon::CustomUnlockSent)),
            (false, _) => (self.palette.custom_unlock_not_sent, None),
        };

        let mut id = Text::new();
        let _ = write!(id, "{}", zone.id);
        let geometry = Geometry::Circle {
            center: zone.center,
            radius: zone.radius,
        };
        let shape = self.shape(id, geometry, style, self.custom_unlock_visible);
        let marker = icon.map(|icon| OverlayMarker {
            zone_id: zone.id,
            position: zone.center,
            icon,
            visible: self.custom_unlock_visible,
        });
        (shape, marker)
    }

    fn shape(&self, id: Text, geometry: Geometry, style: ZoneStyle, visible: bool) -> OverlayShape {
        OverlayShape {
            id,
            geometry,
            stroke: style.color,
            fill: style.fill(),
            stroke_width: self.palette.border_width,
            visible,
        }
    }
}

impl Default for FlyZoneOverlay {
    fn default() -> Self {
        Self::new()
    }
}
