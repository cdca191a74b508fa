//! Renderable scene: an acceleration structure plus an optional light set.

use crate::{bvh::BvhNode, hittable::Hittable, HittableList};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Scene contains no primitives")]
    EmptyScene,

    #[error("Primitive #{index} ({kind}) has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox { index: usize, kind: &'static str },

    #[error("Primitive #{index} ({kind}) has an infinite or NaN bounding box")]
    UnboundedPrimitive { index: usize, kind: &'static str },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A scene ready for rendering.
///
/// Lights are shared with the world: the same `Arc` may appear in both.
pub struct Scene {
    world: BvhNode,
    lights: Option<HittableList>,
}

impl Scene {
    /// Build the BVH over `objects` for the shutter interval `[time0, time1]`.
    ///
    /// An empty `lights` list is treated as "no light sampling".
    pub fn build(
        objects: Vec<Arc<dyn Hittable>>,
        lights: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
    ) -> SceneResult<Self> {
        let primitive_count = objects.len();
        let world = BvhNode::new(objects, time0, time1)?;
        let lights = if lights.is_empty() {
            None
        } else {
            Some(HittableList::from(lights))
        };

        log::info!(
            "Scene ready: {} primitives, {} importance-sampled lights",
            primitive_count,
            lights.as_ref().map_or(0, HittableList::len)
        );

        Ok(Self { world, lights })
    }

    pub fn world(&self) -> &dyn Hittable {
        &self.world
    }

    pub fn bvh(&self) -> &BvhNode {
        &self.world
    }

    pub fn lights(&self) -> Option<&dyn Hittable> {
        self.lights.as_ref().map(|lights| lights as &dyn Hittable)
    }
}
