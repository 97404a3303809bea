use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Drop zone colours
// ---------------------------------------------------------------------------

pub const ZONE_BORDER: Srgb<u8> = Srgb::new(0x99, 0x99, 0x99);
pub const ZONE_BORDER_ACTIVE: Srgb<u8> = Srgb::new(0x33, 0xaa, 0xff);
pub const ZONE_FILL: Srgb<u8> = Srgb::new(0xfa, 0xfa, 0xfa);
pub const ZONE_FILL_ACTIVE: Srgb<u8> = Srgb::new(0xe6, 0xf4, 0xff);

/// Grey used for placeholder and loading text.
pub const HINT_TEXT: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);

/// Blend two sRGB colours in linear light. `t` is clamped to `0..=1`.
pub fn mix(from: Srgb<u8>, to: Srgb<u8>, t: f32) -> Color32 {
    let a: LinSrgb = from.into_format::<f32>().into_linear();
    let b: LinSrgb = to.into_format::<f32>().into_linear();
    let mixed: Srgb<u8> = Srgb::<f32>::from_linear(a.mix(b, t.clamp(0.0, 1.0))).into_format();
    Color32::from_rgb(mixed.red, mixed.green, mixed.blue)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneColors {
    pub border: Color32,
    pub fill: Color32,
}

/// Colours for a drop zone `highlight` of the way towards its drag-over look.
pub fn zone_colors(highlight: f32) -> ZoneColors {
    ZoneColors {
        border: mix(ZONE_BORDER, ZONE_BORDER_ACTIVE, highlight),
        fill: mix(ZONE_FILL, ZONE_FILL_ACTIVE, highlight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color32, b: Srgb<u8>) -> bool {
        a.r().abs_diff(b.red) <= 1 && a.g().abs_diff(b.green) <= 1 && a.b().abs_diff(b.blue) <= 1
    }

    #[test]
    fn endpoints_match_idle_and_active_colours() {
        let idle = zone_colors(0.0);
        assert!(close(idle.border, ZONE_BORDER));
        assert!(close(idle.fill, ZONE_FILL));

        let active = zone_colors(1.0);
        assert!(close(active.border, ZONE_BORDER_ACTIVE));
        assert!(close(active.fill, ZONE_FILL_ACTIVE));
    }

    #[test]
    fn halfway_lies_between() {
        let half = zone_colors(0.5).border;
        assert!(half.b() > ZONE_BORDER.blue && half.b() < ZONE_BORDER_ACTIVE.blue);
        assert!(half.r() < ZONE_BORDER.red && half.r() > ZONE_BORDER_ACTIVE.red);
    }

    #[test]
    fn out_of_range_factor_is_clamped() {
        assert_eq!(zone_colors(-3.0), zone_colors(0.0));
        assert_eq!(zone_colors(7.0), zone_colors(1.0));
    }
}
