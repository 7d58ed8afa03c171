//! Camera for ray generation and the render loop.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::renderer::{linear_to_gamma, ray_color, Background, ImageSink};
use crate::sampling::{gen_f64, random_in_unit_disk, sample_square};
use crate::{Hittable, Ray, RenderError, RenderResult};
use lumen_math::{Color, Point3, Vec3};

/// Camera for generating rays into the scene and rendering it.
///
/// Configure through the public fields or the `with_*` builders, then call
/// [`Camera::render`]. Derived state is recomputed at the start of each render.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Count of random samples for each pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray segments per path
    pub max_depth: u32,

    // Camera positioning
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Point the camera is looking from
    pub look_from: Point3,
    /// Point the camera is looking at
    pub look_at: Point3,
    /// Camera-relative "up" direction
    pub vup: Vec3,

    // Lens settings
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,

    /// Radiance of rays that escape the scene
    pub background: Background,
    /// Base seed for the per-row random streams
    pub seed: u64,

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f64,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Background::default(),
            seed: 0,
            image_height: 1,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 0.1,
        }
    }

    /// Set image width and aspect ratio; the height is derived from them.
    pub fn with_resolution(mut self, width: u32, aspect_ratio: f64) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the background seen by escaping rays.
    pub fn with_background(mut self, background: impl Into<Background>) -> Self {
        self.background = background.into();
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Image height derived from width and aspect ratio, at least 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    fn validate(&self) -> RenderResult<()> {
        if self.image_width < 1 {
            return Err(RenderError::InvalidConfig("image_width must be at least 1".into()));
        }
        if self.samples_per_pixel < 1 {
            return Err(RenderError::InvalidConfig("samples_per_pixel must be at least 1".into()));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if (self.look_from - self.look_at).length_squared() == 0.0 {
            return Err(RenderError::InvalidConfig("look_from and look_at coincide".into()));
        }
        Ok(())
    }

    /// Initialize derived state (called by [`Camera::render`]).
    pub fn initialize(&mut self) -> RenderResult<()> {
        self.validate()?;

        self.image_height = self.image_height();
        self.samples_scale = 1.0 / self.samples_per_pixel as f64;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        // Calculate upper left pixel location
        let viewport_upper_left = self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera basis u={:?} v={:?} w={:?}, pixel00={:?}",
            self.u,
            self.v,
            self.w,
            self.pixel00_loc
        );

        Ok(())
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray aims at a jittered point within the pixel's footprint, starts
    /// on the defocus disk when defocus is enabled, and carries a uniform
    /// random time in `[0, 1)`.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Render a single pixel with multi-sampling.
    ///
    /// Returns the gamma-corrected color, clamped to `[0, 1]` per channel.
    pub fn render_pixel(&self, world: &dyn Hittable, i: u32, j: u32, rng: &mut dyn RngCore) -> Color {
        let mut pixel_color = Color::ZERO;

        for _ in 0..self.samples_per_pixel {
            let ray = self.get_ray(i, j, rng);
            pixel_color += ray_color(&ray, self.max_depth, world, &self.background, rng);
        }

        let average = pixel_color * self.samples_scale;
        Color::new(
            linear_to_gamma(average.x),
            linear_to_gamma(average.y),
            linear_to_gamma(average.z),
        )
        .clamp(Color::ZERO, Color::ONE)
    }

    /// Render the scene and deliver every pixel to `sink`.
    ///
    /// Rows are traced in parallel, each with its own generator seeded from
    /// [`Camera::seed`] and the row index, so the output depends only on the
    /// seed. Pixels reach the sink in row-major order.
    pub fn render(&mut self, world: &dyn Hittable, sink: &mut dyn ImageSink) -> RenderResult<()> {
        self.initialize()?;

        let width = self.image_width;
        let height = self.image_height;

        if self.max_depth == 0 {
            log::warn!("max_depth is 0, every pixel will be black");
        }
        log::info!(
            "Rendering {}x{} at {} spp, max depth {}",
            width,
            height,
            self.samples_per_pixel,
            self.max_depth
        );
        let start = Instant::now();

        let camera = &*self;
        let rows: Vec<Vec<Color>> = (0..height)
            .into_par_iter()
            .map(|j| {
                let mut rng = StdRng::seed_from_u64(row_seed(camera.seed, j));
                (0..width)
                    .map(|i| camera.render_pixel(world, i, j, &mut rng))
                    .collect()
            })
            .collect();

        log::info!("Traced {} pixels in {:.2?}", width as u64 * height as u64, start.elapsed());

        sink.begin(width, height)?;
        for color in rows.iter().flatten() {
            sink.write_pixel(color.to_array())?;
        }
        sink.finish()?;

        Ok(())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for one row's generator, spreading rows far apart in seed space.
fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
