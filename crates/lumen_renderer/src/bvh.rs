//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes over the scene's primitives. Rays that
//! miss a node's box skip its whole subtree.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Ray, RenderError, RenderResult};
use lumen_math::{Aabb, Interval};

/// BVH node with two children, each a primitive or another node.
///
/// A node built over a single object stores that object in both slots.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> RenderResult<Self> {
        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let count = objects.len();
        let mut nodes = 0;
        let root = Self::build(&mut objects, &mut nodes);
        log::debug!("Built BVH: {} primitives, {} nodes", count, nodes);

        Ok(root)
    }

    /// Create a BVH over the objects of a list. The list is left untouched.
    pub fn from_list(list: &HittableList) -> RenderResult<Self> {
        Self::new(list.objects().to_vec())
    }

    /// Recursive BVH construction.
    ///
    /// Median split: sort objects by centroid on the longest axis of their
    /// combined bounds, split in half, recurse.
    fn build(objects: &mut [Arc<dyn Hittable>], nodes: &mut usize) -> Self {
        *nodes += 1;

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            n => {
                let bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
                    Aabb::surrounding(&acc, &obj.bounding_box())
                });
                let axis = bounds.longest_axis();

                objects.sort_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

                let (left_objects, right_objects) = objects.split_at_mut(n / 2);
                let left = Self::build(left_objects, nodes);
                let right = Self::build(right_objects, nodes);
                (Arc::new(left) as Arc<dyn Hittable>, Arc::new(right) as Arc<dyn Hittable>)
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        Self { left, right, bbox }
    }
}

/// Order two objects by their bounding-box centroid along `axis`.
fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_val = a.bounding_box().centroid()[axis];
    let b_val = b.bounding_box().centroid()[axis];
    a_val.partial_cmp(&b_val).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t);

        // Only check right up to closest hit
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = self.right.hit(ray, ray_t.closer_than(right_max));

        hit_right.or(hit_left)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
