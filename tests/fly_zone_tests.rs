use heapless::Vec;
use telemetry_widgets::colors::{self, DEFAULT_ALPHA};
use telemetry_widgets::widget::fly_zone::{
    Coordinate, CustomUnlockZone, FlyZone, FlyZoneCategory, Geometry, MarkerIcon, SubFlyZone,
    ZoneStyle,
};
use telemetry_widgets::widget::FlyZoneOverlay;

const CENTER: Coordinate = Coordinate::new(22.54, 113.95);

fn zone(category: FlyZoneCategory) -> FlyZone {
    FlyZone {
        id: 7,
        category,
        center: CENTER,
        radius: Some(500.0),
        unlock_end_time: None,
        sub_zones: Vec::new(),
    }
}

fn sub_zone(area_id: u32, max_flight_height: u32) -> SubFlyZone {
    SubFlyZone {
        area_id,
        geometry: Geometry::Circle {
            center: CENTER,
            radius: 120.0,
        },
        max_flight_height,
    }
}

fn with_sub_zones(mut zone: FlyZone, sub_zones: &[SubFlyZone]) -> FlyZone {
    for sub in sub_zones {
        zone.sub_zones.push(sub.clone()).unwrap();
    }
    zone
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn category_selects_stroke_and_fill() {
    let overlay = FlyZoneOverlay::new();

    let resolved = overlay.resolve(&zone(FlyZoneCategory::Restricted));

    assert_eq!(resolved.shapes.len(), 1);
    let shape = &resolved.shapes[0];
    assert_eq!(shape.id.as_str(), "7");
    assert_eq!(shape.stroke, colors::ZONE_RESTRICTED);
    assert_eq!(shape.fill.alpha, DEFAULT_ALPHA);
    assert_eq!(shape.stroke_width, 5.0);
    assert!(shape.visible);
}

#[test]
fn sub_zone_ids_combine_zone_and_area() {
    let overlay = FlyZoneOverlay::new();
    let mut polygon = zone(FlyZoneCategory::Warning);
    polygon.radius = None;
    let polygon = with_sub_zones(polygon, &[sub_zone(1, 0), sub_zone(2, 0)]);

    let resolved = overlay.resolve(&polygon);

    let ids: std::vec::Vec<&str> = resolved.shapes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["7_1", "7_2"]);
}

#[test]
fn height_limited_sub_zone_uses_altitude_style() {
    let overlay = FlyZoneOverlay::new();
    let zone = with_sub_zones(zone(FlyZoneCategory::Authorization), &[sub_zone(1, 120), sub_zone(2, 0)]);

    let resolved = overlay.resolve(&zone);

    assert_eq!(resolved.shapes[0].stroke, colors::ZONE_AUTHORIZATION);
    assert_eq!(resolved.shapes[1].stroke, colors::ZONE_ALTITUDE);
    assert_eq!(resolved.shapes[2].stroke, colors::ZONE_AUTHORIZATION);
}

#[test]
fn self_unlock_takes_precedence_over_height_limit() {
    let overlay = FlyZoneOverlay::new();
    let mut zone = with_sub_zones(zone(FlyZoneCategory::Authorization), &[sub_zone(1, 120)]);
    zone.unlock_end_time = Some(1_700_000_000);

    let resolved = overlay.resolve(&zone);

    assert!(resolved
        .shapes
        .iter()
        .all(|shape| shape.stroke == colors::ZONE_SELF_UNLOCKED));
}

#[test]
fn hidden_category_hides_shapes_and_marker() {
    let mut overlay = FlyZoneOverlay::new();
    overlay.set_category_visible(FlyZoneCategory::Authorization, false);

    let resolved = overlay.resolve(&zone(FlyZoneCategory::Authorization));

    assert!(!resolved.shapes[0].visible);
    assert!(!resolved.marker.unwrap().visible);
}

#[test]
fn unknown_category_hidden_by_default() {
    let overlay = FlyZoneOverlay::new();

    assert!(!overlay.is_category_visible(FlyZoneCategory::Unknown));
    assert!(overlay.is_category_visible(FlyZoneCategory::Warning));
    assert!(!overlay.resolve(&zone(FlyZoneCategory::Unknown)).shapes[0].visible);
}

#[test]
fn palette_override_applies_to_category() {
    let mut overlay = FlyZoneOverlay::new();
    let style = ZoneStyle::new(colors::rgb(0x123456), 80);
    overlay.palette_mut().set_category(FlyZoneCategory::Warning, style);

    let shape = &overlay.resolve(&zone(FlyZoneCategory::Warning)).shapes[0];

    assert_eq!(shape.stroke, colors::rgb(0x123456));
    assert_eq!(shape.fill.alpha, 80);
}

// ============================================================================
// Markers
// ============================================================================

#[test]
fn authorization_zone_gets_locked_marker() {
    let overlay = FlyZoneOverlay::new();

    let marker = overlay.resolve(&zone(FlyZoneCategory::Authorization)).marker.unwrap();

    assert_eq!(marker.icon, MarkerIcon::Locked);
    assert_eq!(marker.zone_id, 7);
    assert_eq!(marker.position, CENTER);
    assert!(marker.visible);
}

#[test]
fn unlocked_zone_gets_unlocked_marker() {
    let overlay = FlyZoneOverlay::new();
    let mut zone = zone(FlyZoneCategory::Restricted);
    zone.unlock_end_time = Some(1_700_000_000);

    let marker = overlay.resolve(&zone).marker.unwrap();

    assert_eq!(marker.icon, MarkerIcon::Unlocked);
}

#[test]
fn other_locked_zones_have_no_marker() {
    let overlay = FlyZoneOverlay::new();

    assert!(overlay.resolve(&zone(FlyZoneCategory::Warning)).marker.is_none());
    assert!(overlay.resolve(&zone(FlyZoneCategory::Restricted)).marker.is_none());
}

#[test]
fn disabling_unlocking_hides_markers() {
    let mut overlay = FlyZoneOverlay::new();
    overlay.set_unlocking_enabled(false);

    let marker = overlay.resolve(&zone(FlyZoneCategory::Authorization)).marker.unwrap();

    assert!(!marker.visible);
}

// ============================================================================
// Custom unlock zones
// ============================================================================

fn custom_zone(is_enabled: bool) -> CustomUnlockZone {
    CustomUnlockZone {
        id: 42,
        center: CENTER,
        radius: 300.0,
        is_enabled,
    }
}

#[test]
fn custom_unlock_zone_styles_follow_license_state() {
    let mut overlay = FlyZoneOverlay::new();
    overlay.set_custom_unlock_zones_visible(true);

    let (shape, marker) = overlay.resolve_custom_unlock(&custom_zone(false), false);
    assert_eq!(shape.stroke, colors::CUSTOM_UNLOCK_NOT_SENT);
    assert!(marker.is_none());

    let (shape, marker) = overlay.resolve_custom_unlock(&custom_zone(false), true);
    assert_eq!(shape.stroke, colors::CUSTOM_UNLOCK_SENT);
    assert_eq!(marker.unwrap().icon, MarkerIcon::CustomUnlockSent);

    let (shape, marker) = overlay.resolve_custom_unlock(&custom_zone(true), true);
    assert_eq!(shape.stroke, colors::CUSTOM_UNLOCK_ENABLED);
    assert_eq!(shape.id.as_str(), "42");
    assert_eq!(marker.unwrap().icon, MarkerIcon::CustomUnlockEnabled);
    assert!(shape.visible);
}

#[test]
fn custom_unlock_zones_hidden_by_default() {
    let overlay = FlyZoneOverlay::new();

    let (shape, marker) = overlay.resolve_custom_unlock(&custom_zone(true), true);

    assert!(!shape.visible);
    assert!(!marker.unwrap().visible);
}

#[test]
fn report_resolves_in_order() {
    let overlay = FlyZoneOverlay::new();
    let mut second = zone(FlyZoneCategory::Warning);
    second.id = 8;
    let report = [zone(FlyZoneCategory::Authorization), second];

    let ids: std::vec::Vec<u32> = overlay
        .resolve_all(&report)
        .map(|resolved| resolved.shapes[0].id.as_str().parse().unwrap())
        .collect();

    assert_eq!(ids, [7, 8]);
}
