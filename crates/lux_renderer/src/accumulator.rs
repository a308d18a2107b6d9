//! Per-pixel running statistics and tone-mapped export.
//!
//! Every pixel keeps Welford's online mean and sum of squared deviations, so
//! the scheduler can ask for its variance after any number of samples.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lux_math::Color;

use crate::error::RenderResult;

/// Online mean/variance accumulator for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pixel {
    count: u32,
    mean: Color,
    m2: Color,
}

impl Pixel {
    /// Add one radiance sample.
    pub fn add_sample(&mut self, sample: Color) {
        self.count += 1;
        if self.count == 1 {
            self.mean = sample;
            self.m2 = Color::ZERO;
            return;
        }
        let previous = self.mean;
        self.mean += (sample - previous) / self.count as f64;
        self.m2 += (sample - previous) * (sample - self.mean);
    }

    /// Number of samples taken.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Mean radiance.
    pub fn color(&self) -> Color {
        self.mean
    }

    /// Unbiased sample variance; zero below two samples.
    pub fn variance(&self) -> Color {
        if self.count < 2 {
            return Color::ZERO;
        }
        self.m2 / (self.count - 1) as f64
    }

    pub fn standard_deviation(&self) -> Color {
        // m2 can dip below zero by rounding
        let v = self.variance().max(Color::ZERO);
        Color::new(v.x.sqrt(), v.y.sqrt(), v.z.sqrt())
    }
}

/// Fixed-size grid of pixels, row-major with the top row first.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Create a new image with no samples.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> &Pixel {
        &self.pixels[self.index(x, y)]
    }

    /// Add a sample to the pixel at (x, y).
    pub fn add_sample(&mut self, x: u32, y: u32, sample: Color) {
        let i = self.index(x, y);
        self.pixels[i].add_sample(sample);
    }

    pub fn color(&self, x: u32, y: u32) -> Color {
        self.pixel(x, y).color()
    }

    pub fn variance(&self, x: u32, y: u32) -> Color {
        self.pixel(x, y).variance()
    }

    pub fn standard_deviation(&self, x: u32, y: u32) -> Color {
        self.pixel(x, y).standard_deviation()
    }

    /// Rows as disjoint mutable slices.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Pixel> {
        self.pixels.chunks_mut(self.width.max(1) as usize)
    }

    /// Total samples over all pixels.
    pub fn total_samples(&self) -> u64 {
        self.pixels.iter().map(|p| p.count() as u64).sum()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Convert every pixel to 8-bit RGB, row-major.
    pub fn to_rgb8(&self, exposure: f64, gamma: f64) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(pixel.color(), exposure, gamma));
        }
        bytes
    }

    /// Build an [`image::RgbImage`] of the current means.
    pub fn to_rgb_image(&self, exposure: f64, gamma: f64) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb(self.color(x, y), exposure, gamma))
        })
    }

    /// Save as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>, exposure: f64, gamma: f64) -> RenderResult<()> {
        let path = path.as_ref();
        self.to_rgb_image(exposure, gamma).save(path)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Save as plain-text PPM (P3).
    pub fn save_ppm(&self, path: impl AsRef<Path>, exposure: f64, gamma: f64) -> RenderResult<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out, exposure, gamma)?;
        out.flush()?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Write plain-text PPM (P3) to any writer.
    pub fn write_ppm(&self, out: &mut impl Write, exposure: f64, gamma: f64) -> std::io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;
        for pixel in &self.pixels {
            let [r, g, b] = color_to_rgb(pixel.color(), exposure, gamma);
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        Ok(())
    }
}

/// Quantize one channel: `clamp(255 * (value * exposure)^(1 / gamma), 0, 255)`.
#[inline]
pub fn tone_map(value: f64, exposure: f64, gamma: f64) -> u8 {
    let v = (value * exposure).max(0.0).powf(1.0 / gamma) * 255.0;
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color, exposure: f64, gamma: f64) -> [u8; 3] {
    [
        tone_map(color.x, exposure, gamma),
        tone_map(color.y, exposure, gamma),
        tone_map(color.z, exposure, gamma),
    ]
}
