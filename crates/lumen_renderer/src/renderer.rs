//! Core path tracing integrator and pixel output.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - An [`ImageSink`] seam for finished pixels

use std::io;

use crate::{Color, Hittable, Ray};
use lumen_math::Interval;
use rand::RngCore;

/// Radiance returned by rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// The same color in every direction
    Solid(Color),
    /// Vertical blend from `bottom` (looking down) to `top` (looking up)
    Gradient { bottom: Color, top: Color },
}

impl Background {
    /// The classic white-to-sky-blue gradient.
    pub fn sky() -> Self {
        Background::Gradient {
            bottom: Color::new(1.0, 1.0, 1.0),
            top: Color::new(0.5, 0.7, 1.0),
        }
    }

    /// Radiance seen along a ray that hit nothing.
    pub fn color(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Gradient { bottom, top } => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                bottom * (1.0 - a) + top * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

impl From<Color> for Background {
    fn from(color: Color) -> Self {
        Background::Solid(color)
    }
}

/// Self-intersection guard for secondary rays.
const T_MIN: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces for at most
/// `depth` segments and accumulating emitted light along the way.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // Path budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f64::INFINITY)) else {
        return background.color(ray);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, depth - 1, world, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize a display color (already gamma corrected) to 8 bits per channel.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 0.999);
    let r = (256.0 * INTENSITY.clamp(color.x)) as u8;
    let g = (256.0 * INTENSITY.clamp(color.y)) as u8;
    let b = (256.0 * INTENSITY.clamp(color.z)) as u8;
    [r, g, b]
}

/// Destination for finished pixels.
///
/// `begin` is called once with the image size, then `write_pixel` once per
/// pixel in row-major order (top to bottom, left to right), then `finish`.
/// Each pixel is gamma corrected with every channel in `[0, 1]`.
pub trait ImageSink {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()>;

    fn write_pixel(&mut self, rgb: [f64; 3]) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory image that collects a render.
#[derive(Debug, Clone, Default)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create an empty buffer; its size is set by [`ImageSink::begin`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Convert to packed 8-bit RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

impl ImageSink for ImageBuffer {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.reserve(width as usize * height as usize);
        Ok(())
    }

    fn write_pixel(&mut self, rgb: [f64; 3]) -> io::Result<()> {
        if self.pixels.len() >= self.width as usize * self.height as usize {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "more pixels than the image holds"));
        }
        self.pixels.push(Color::from_array(rgb));
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("image has {} of {} pixels", self.pixels.len(), expected),
            ));
        }
        Ok(())
    }
}
