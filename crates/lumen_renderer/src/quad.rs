//! Planar parallelogram primitive.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Point3, Vec3};

/// Rays closer to parallel with the plane than this are treated as misses.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Slack on each side of the unit square when testing planar coordinates.
const EDGE_TOLERANCE: f64 = 1e-9;

/// A parallelogram spanned by corner `q` and edges `u` and `v`.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// Maps a planar offset to (alpha, beta): n / (n . n) with n = u x v
    w: Vec3,
    normal: Vec3,
    /// Plane constant: normal . q
    d: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    /// Create a quad. `u` and `v` must not be parallel.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // Both diagonals, so the box holds all four corners
        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);
        let bbox = Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox,
        }
    }

    /// Planar coordinates inside the closed unit square, if any.
    ///
    /// The square is widened by `EDGE_TOLERANCE` so rays aimed exactly at an
    /// edge or corner are not lost to rounding in `w`.
    fn is_interior(alpha: f64, beta: f64) -> Option<(f64, f64)> {
        const UNIT: Interval = Interval::new(0.0, 1.0);
        let widened = UNIT.expand(2.0 * EDGE_TOLERANCE);
        if widened.contains(alpha) && widened.contains(beta) {
            Some((UNIT.clamp(alpha), UNIT.clamp(beta)))
        } else {
            None
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        let planar_hitpt = p - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));
        let (u, v) = Self::is_interior(alpha, beta)?;

        let mut rec = HitRecord {
            p,
            normal: self.normal,
            material: self.material.as_ref(),
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, self.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six quads enclosing the axis-aligned box with opposite corners `a` and `b`.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Point3::new(min.x, min.y, max.z), dx, dy),  // front
        (Point3::new(max.x, min.y, max.z), -dz, dy), // right
        (Point3::new(max.x, min.y, min.z), -dx, dy), // back
        (Point3::new(min.x, min.y, min.z), dz, dy),  // left
        (Point3::new(min.x, max.y, max.z), dx, -dz), // top
        (Point3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];
    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, material.clone())));
    }

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::sampling::{gen_f64, gen_range, random_unit_vector};
    use lumen_math::Color;
    use rand::{rngs::StdRng, SeedableRng};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn unit_range() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn test_quad_hit_every_interior_point() {
        let q = Vec3::new(-1.0, 0.5, -3.0);
        let u = Vec3::new(2.0, 0.0, 0.5);
        let v = Vec3::new(0.3, 1.5, 0.0);
        let quad = Quad::new(q, u, v, grey());
        let normal = u.cross(v).normalize();
        let origin = Vec3::new(0.2, 0.4, 5.0);

        let steps = 10;
        for i in 0..steps {
            for j in 0..steps {
                let alpha = (i as f64 + 0.5) / steps as f64;
                let beta = (j as f64 + 0.5) / steps as f64;
                let target = q + alpha * u + beta * v;
                let dir = target - origin;
                let ray = Ray::new_simple(origin, dir);

                let rec = quad.hit(&ray, unit_range()).unwrap_or_else(|| {
                    panic!("missed interior point alpha={alpha} beta={beta}")
                });

                let expected_t = normal.dot(q - origin) / normal.dot(dir);
                assert!((rec.t - expected_t).abs() <= 1e-6 * expected_t.abs());
                assert!((rec.u - alpha).abs() < 1e-6);
                assert!((rec.v - beta).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_quad_hit_edges_and_corners() {
        let targets = [
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (0.5, 1.0),
            (1.0, 0.3),
            (0.0, 0.7),
            (0.4, 0.0),
        ];
        let mut rng = StdRng::seed_from_u64(42);

        let mut quads = 0;
        while quads < 500 {
            let q = Vec3::new(gen_range(&mut rng, -5.0, 5.0), gen_range(&mut rng, -5.0, 5.0), gen_range(&mut rng, -5.0, 5.0));
            let u = random_unit_vector(&mut rng) * gen_range(&mut rng, 0.5, 3.0);
            let v = random_unit_vector(&mut rng) * gen_range(&mut rng, 0.5, 3.0);
            // Nearly parallel edges make a sliver, not a quad
            if u.cross(v).length() < 0.2 * u.length() * v.length() {
                continue;
            }
            quads += 1;

            let quad = Quad::new(q, u, v, grey());
            let normal = u.cross(v).normalize();

            for (alpha, beta) in targets {
                let target = q + alpha * u + beta * v;
                let side = if gen_f64(&mut rng) < 0.5 { 1.0 } else { -1.0 };
                let offset = side * gen_range(&mut rng, 1.0, 5.0) * normal + 0.5 * random_unit_vector(&mut rng);
                let origin = target + offset;
                let ray = Ray::new_simple(origin, target - origin);

                let rec = quad.hit(&ray, unit_range()).unwrap_or_else(|| {
                    panic!("missed boundary point alpha={alpha} beta={beta} on quad q={q} u={u} v={v}")
                });
                assert!((rec.t - 1.0).abs() < 1e-9);
                assert!((rec.u - alpha).abs() < 1e-6 && (0.0..=1.0).contains(&rec.u));
                assert!((rec.v - beta).abs() < 1e-6 && (0.0..=1.0).contains(&rec.v));
            }
        }
    }

    #[test]
    fn test_quad_misses_just_past_edge() {
        let quad = Quad::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), grey());

        // alpha = 1.0005, well beyond rounding slack
        let ray = Ray::new_simple(Vec3::new(1.001, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&ray, unit_range()).is_none());

        let on_edge = Ray::new_simple(Vec3::new(1.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = quad.hit(&on_edge, unit_range()).unwrap();
        assert_eq!((rec.u, rec.v), (1.0, 1.0));
    }

    #[test]
    fn test_quad_miss_outside() {
        let quad = Quad::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), grey());

        // Hits the plane at (1.5, 0, 0), outside the square
        let ray = Ray::new_simple(Vec3::new(1.5, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&ray, unit_range()).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let quad = Quad::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), grey());
        let ray = Ray::new_simple(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(quad.hit(&ray, unit_range()).is_none());
    }

    #[test]
    fn test_quad_face_orientation() {
        // u x v points toward +Z
        let quad = Quad::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), grey());

        let from_front = Ray::new_simple(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = quad.hit(&from_front, unit_range()).unwrap();
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);

        let from_back = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        let rec = quad.hit(&from_back, unit_range()).unwrap();
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_quad_bounding_box_is_padded() {
        let quad = Quad::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), grey());
        let bbox = quad.bounding_box();

        assert!(bbox.z.size() > 0.0);
        assert!(bbox.z.contains(2.0));
        assert_eq!(bbox.x, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_make_box() {
        let cube = make_box(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, -1.0, -1.0), grey());
        assert_eq!(cube.len(), 6);

        // Faces are padded along their normal, so allow a sliver of slack
        let bbox = cube.bounding_box();
        for axis in 0..3 {
            let extent = bbox.axis_interval(axis);
            assert!((extent.min + 1.0).abs() < 1e-3);
            assert!((extent.max - 1.0).abs() < 1e-3);
        }

        // Every axis-aligned ray from outside hits the box at distance 4
        for dir in [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z] {
            let ray = Ray::new_simple(-5.0 * dir, dir);
            let rec = cube.hit(&ray, unit_range()).unwrap();
            assert!((rec.t - 4.0).abs() < 1e-9);
            assert!(rec.front_face);
        }
    }
}
