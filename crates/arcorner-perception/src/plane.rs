//! The [`Plane`] data model consumed by the corner classifier.

use arcorner_types::PlaneId;
use serde::{Deserialize, Serialize};

use crate::geometry::{Pose, Vec3};

/// One tracked flat surface.
///
/// `normal` is the surface's "up" direction in world space.  It is kept
/// exactly as supplied; nothing in this crate normalises it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub id: PlaneId,
    /// Center of the surface in world space.  Not used for classification.
    pub position: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Create a plane with a fresh id.
    pub fn new(normal: Vec3, position: Vec3) -> Self {
        Self::with_id(PlaneId::new(), normal, position)
    }

    pub fn with_id(id: PlaneId, normal: Vec3, position: Vec3) -> Self {
        Self {
            id,
            position,
            normal,
        }
    }

    /// Build a plane from the tracking engine's center pose: the normal is
    /// the pose's Y axis and the position is its translation.
    pub fn from_pose(id: PlaneId, pose: Pose) -> Self {
        Self::with_id(id, pose.y_axis(), pose.translation)
    }
}
