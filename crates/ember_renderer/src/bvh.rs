//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over the scene primitives. Construction sorts an arena of
//! `(index, cached box)` entries instead of the primitives themselves, then
//! builds nodes that share the primitives through `Arc`.

use crate::{
    hittable::{HitRecord, Hittable},
    scene::SceneError,
    Ray,
};
use ember_math::{Aabb, Interval};
use rand::RngCore;
use std::sync::Arc;

/// BVH node.
///
/// Using an enum lets traversal match on node kinds directly; only the
/// primitives themselves go through dynamic dispatch.
pub enum BvhNode {
    /// A single primitive (both children of the node would be the same object).
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Two primitives, one per child.
    Pair {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Internal node with two subtrees.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
}

/// Arena entry used during construction.
#[derive(Debug, Clone, Copy)]
struct BuildItem {
    index: usize,
    bbox: Aabb,
}

impl BvhNode {
    /// Create a BVH over `objects` valid for the shutter interval `[time0, time1]`.
    ///
    /// Fails if the list is empty, or if any object cannot report a bounding box
    /// or reports one that is infinite or NaN.
    pub fn new(
        objects: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
    ) -> Result<Self, SceneError> {
        if objects.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        let mut items = Vec::with_capacity(objects.len());
        for (index, object) in objects.iter().enumerate() {
            let bbox = object.bounding_box(time0, time1).ok_or_else(|| {
                SceneError::MissingBoundingBox {
                    index,
                    kind: object.kind(),
                }
            })?;
            if !(bbox.min().is_finite() && bbox.max().is_finite()) {
                return Err(SceneError::UnboundedPrimitive {
                    index,
                    kind: object.kind(),
                });
            }
            items.push(BuildItem { index, bbox });
        }

        let root = Self::build(&objects, &mut items);
        log::info!(
            "Built BVH: {} primitives, depth {}, bounds {:?} .. {:?}",
            objects.len(),
            root.depth(),
            root.bbox().min(),
            root.bbox().max()
        );

        Ok(root)
    }

    /// Recursive construction: sort by box minimum on the longest axis, split in half.
    fn build(objects: &[Arc<dyn Hittable>], items: &mut [BuildItem]) -> Self {
        match items {
            [only] => BvhNode::Leaf {
                object: objects[only.index].clone(),
                bbox: only.bbox,
            },
            [a, b] => BvhNode::Pair {
                left: objects[a.index].clone(),
                right: objects[b.index].clone(),
                bbox: Aabb::surrounding(&a.bbox, &b.bbox),
            },
            _ => {
                let bounds = items
                    .iter()
                    .fold(Aabb::EMPTY, |acc, item| Aabb::surrounding(&acc, &item.bbox));
                let axis = bounds.longest_axis();

                items.sort_unstable_by(|a, b| {
                    let a_min = a.bbox.axis_interval(axis).min;
                    let b_min = b.bbox.axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let mid = items.len() / 2;
                let (left_items, right_items) = items.split_at_mut(mid);
                let left = Self::build(objects, left_items);
                let right = Self::build(objects, right_items);

                BvhNode::Branch {
                    left: Box::new(left),
                    right: Box::new(right),
                    bbox: bounds,
                }
            }
        }
    }

    /// Box enclosing everything under this node.
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Pair { bbox, .. } | BvhNode::Branch { bbox, .. } => {
                *bbox
            }
        }
    }

    /// Number of levels, counting this node.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } | BvhNode::Pair { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of primitives referenced by the tree.
    pub fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Pair { .. } => 2,
            BvhNode::Branch { left, right, .. } => {
                left.primitive_count() + right.primitive_count()
            }
        }
    }

}

/// The hit with the smaller `t`, if any.
#[inline]
fn closer<'a>(a: Option<HitRecord<'a>>, b: Option<HitRecord<'a>>) -> Option<HitRecord<'a>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox().hit(ray, ray_t) {
            return None;
        }

        // Both children see the full interval; the closer result wins.
        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t, rng),
            BvhNode::Pair { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t, rng);
                let hit_right = right.hit(ray, ray_t, rng);
                closer(hit_left, hit_right)
            }
            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t, rng);
                let hit_right = right.hit(ray, ray_t, rng);
                closer(hit_left, hit_right)
            }
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox())
    }
}
