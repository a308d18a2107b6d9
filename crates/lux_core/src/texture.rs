//! Textures driving material albedo and light emission.

use lux_math::{Color, Vec3};

/// A spatially varying color.
#[derive(Clone, Debug, PartialEq)]
pub enum Texture {
    /// The same color everywhere.
    Solid(Color),
    /// 3-D checkerboard alternating between two colors every `1 / frequency` units.
    Checker {
        frequency: f64,
        even: Color,
        odd: Color,
    },
}

impl Texture {
    /// Sample the texture at UV `(u, v)` and world position `p`.
    ///
    /// Both variants are procedural in `p`; the UV pair is accepted so that
    /// surface lookups and emission lookups share one call shape.
    pub fn value(&self, _u: f64, _v: f64, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker {
                frequency,
                even,
                odd,
            } => {
                let cell = (p * *frequency).floor();
                if (cell.x + cell.y + cell.z).rem_euclid(2.0) < 1.0 {
                    *even
                } else {
                    *odd
                }
            }
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}
