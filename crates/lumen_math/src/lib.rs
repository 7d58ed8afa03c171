//! Lumen math types: vectors, rays, intervals and bounding boxes.
//!
//! Everything is double precision. `Vec3`, `Point3` and `Color` are the same
//! `glam::DVec3` type under different names.

pub use glam::DVec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// A 3D vector.
pub type Vec3 = DVec3;
/// A position in world space.
pub type Point3 = DVec3;
/// A linear RGB color.
pub type Color = DVec3;

/// Returns true if every component of `v` is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const EPS: f64 = 1e-8;
    v.x.abs() < EPS && v.y.abs() < EPS && v.z.abs() < EPS
}

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices (incident / transmitted).
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::new(1e-9, -1e-9, 0.0)));
        assert!(!near_zero(Vec3::new(1e-9, 1e-3, 0.0)));
    }

    #[test]
    fn test_reflect_is_mirror() {
        let n = Vec3::Y;
        let d = Vec3::new(1.0, -2.0, 0.5);
        let r = reflect(d, n);

        assert!((r.dot(n) + d.dot(n)).abs() < 1e-12);
        assert!((r.length() - d.length()).abs() < 1e-12);
        assert_eq!(r, Vec3::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn test_refract_normal_incidence() {
        // Head-on rays pass straight through regardless of the index ratio
        let uv = Vec3::new(0.0, 0.0, -1.0);
        let n = Vec3::Z;
        let out = refract(uv, n, 1.0 / 1.5);
        assert!((out - uv).length() < 1e-12);
    }

    #[test]
    fn test_refract_matching_index() {
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(uv, Vec3::Y, 1.0);
        assert!((out - uv).length() < 1e-12);
    }
}
