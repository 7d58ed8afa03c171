//! Lumen renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering.
//!
//! Scenes are assembled from [`Hittable`] primitives ([`Sphere`], [`Quad`])
//! in a [`HittableList`], optionally accelerated by a [`BvhNode`]. A
//! [`Camera`] traces paths through the scene and hands finished pixels to an
//! [`ImageSink`].

mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod quad;
mod renderer;
mod sampling;
mod sphere;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use quad::{make_box, Quad};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, Background, ImageBuffer, ImageSink,
};
pub use sampling::{gen_f64, gen_range, random_in_unit_disk, random_unit_vector};
pub use sphere::Sphere;

/// Re-export the math types the core is written against.
pub use lumen_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
