//! Color helpers.

use crate::Vec3;

/// Color type alias (linear RGB, unbounded above for emitters).
pub type Color = Vec3;

/// Convert a `0xRRGGBB` sRGB-ish hex value to linear color (gamma 2.2).
pub fn hex_color(hex: u32) -> Color {
    let r = ((hex >> 16) & 0xff) as f64 / 255.0;
    let g = ((hex >> 8) & 0xff) as f64 / 255.0;
    let b = (hex & 0xff) as f64 / 255.0;
    Color::new(r, g, b).powf(2.2)
}

/// Approximate RGB of a black body at `k` kelvin, each channel in [0, 1].
pub fn kelvin(k: f64) -> Color {
    let red = if k >= 6600.0 {
        let x = k / 100.0 - 55.0;
        351.976_905_668_056_93 + 0.114_206_453_784_165 * x - 40.253_663_093_271_27 * x.ln()
    } else {
        255.0
    };

    let green = if k >= 6600.0 {
        let x = k / 100.0 - 50.0;
        325.449_412_571_197_4 + 0.079_434_565_366_623_42 * x - 28.085_296_350_795_7 * x.ln()
    } else if k >= 1000.0 {
        let x = k / 100.0 - 2.0;
        -155.254_855_627_091_79 - 0.445_969_504_695_791_33 * x + 104.492_161_993_938_88 * x.ln()
    } else {
        0.0
    };

    let blue = if k >= 6600.0 {
        255.0
    } else if k >= 2000.0 {
        let x = k / 100.0 - 10.0;
        -254.769_351_841_209_02 + 0.827_409_606_400_739_5 * x + 115.679_944_010_661_47 * x.ln()
    } else {
        0.0
    };

    Color::new(
        (red / 255.0).min(1.0),
        (green / 255.0).min(1.0),
        (blue / 255.0).min(1.0),
    )
}
