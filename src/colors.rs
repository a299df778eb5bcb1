//! Overlay colors.
//!
//! Map overlays use 8-bit sRGB: an opaque stroke color plus a translucent fill
//! built from the same color and an alpha.

use palette::{Alpha, Srgb, Srgba};

/// Builds an 8-bit color from `0xRRGGBB`.
#[inline]
pub const fn rgb(hex: u32) -> Srgb<u8> {
    Srgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Combines `color` with `alpha` into a fill color.
#[inline]
pub const fn with_alpha(color: Srgb<u8>, alpha: u8) -> Srgba<u8> {
    Alpha { color, alpha }
}

/// Default fill alpha of fly-zone shapes.
pub const DEFAULT_ALPHA: u8 = 26;

pub const ZONE_WARNING: Srgb<u8> = rgb(0xFFCC00);
pub const ZONE_ENHANCED_WARNING: Srgb<u8> = rgb(0xFF8800);
pub const ZONE_AUTHORIZATION: Srgb<u8> = rgb(0x1088F2);
pub const ZONE_RESTRICTED: Srgb<u8> = rgb(0xDE4329);
pub const ZONE_UNKNOWN: Srgb<u8> = rgb(0x808080);
/// Sub-zones with a maximum flight height.
pub const ZONE_ALTITUDE: Srgb<u8> = rgb(0x979797);
/// Zones the user has unlocked.
pub const ZONE_SELF_UNLOCKED: Srgb<u8> = rgb(0x1FCF4E);

pub const CUSTOM_UNLOCK_NOT_SENT: Srgb<u8> = rgb(0xE0E0E0);
pub const CUSTOM_UNLOCK_SENT: Srgb<u8> = rgb(0xFFA500);
pub const CUSTOM_UNLOCK_ENABLED: Srgb<u8> = rgb(0x00CC66);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels() {
        let c = rgb(0x1088F2);
        assert_eq!((c.red, c.green, c.blue), (0x10, 0x88, 0xF2));
    }

    #[test]
    fn fill_keeps_color() {
        let fill = with_alpha(ZONE_RESTRICTED, DEFAULT_ALPHA);
        assert_eq!(fill.color, ZONE_RESTRICTED);
        assert_eq!(fill.alpha, 26);
    }
}
