//! Corner classification over a snapshot of tracked planes.
//!
//! A corner is three mutually perpendicular planes: one *reference* plane
//! whose normal points mostly along world Z, and two further planes `x` and
//! `y` that are perpendicular to the reference and to each other.
//!
//! Selection is strictly first-match in slice order:
//!
//! 1. `reference` is the first plane with `|normal.z| > 0.9`.
//! 2. `x` is the first plane perpendicular to the reference.
//! 3. `y` is the first plane, other than the one chosen as `x`, that is
//!    perpendicular to the reference.
//! 4. `x` and `y` must be perpendicular to each other.
//!
//! Two normals are perpendicular when `|a · b| < 0.1`, computed on the
//! vectors as supplied.  No candidate triple other than the first match is
//! ever considered, so reordering the input can change the outcome.
//!
//! # Example
//!
//! ```rust
//! use arcorner_perception::corner::detect_corner;
//! use arcorner_perception::geometry::Vec3;
//! use arcorner_perception::plane::Plane;
//!
//! let planes = [
//!     Plane::new(Vec3::new(0.0, 0.0, 1.0), Vec3::zero()),
//!     Plane::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zero()),
//!     Plane::new(Vec3::new(0.0, 1.0, 0.0), Vec3::zero()),
//! ];
//! assert!(detect_corner(&planes));
//! assert!(!detect_corner(&planes[..2]));
//! ```

use arcorner_types::CornerPlanes;
use tracing::debug;

use crate::geometry::Vec3;
use crate::plane::Plane;

/// Upper bound (exclusive) on `|a · b|` for two normals to count as
/// perpendicular.
pub const PERPENDICULAR_TOLERANCE: f32 = 0.1;

/// Lower bound (exclusive) on `|normal.z|` for a plane to be chosen as the
/// reference plane.
pub const VERTICAL_THRESHOLD: f32 = 0.9;

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

/// The three planes that formed a corner, borrowed from the classified slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner<'a> {
    pub reference: &'a Plane,
    pub x: &'a Plane,
    pub y: &'a Plane,
}

impl Corner<'_> {
    /// Detach the corner from the input slice by keeping only plane ids.
    pub fn ids(&self) -> CornerPlanes {
        CornerPlanes {
            reference: self.reference.id,
            x: self.x.id,
            y: self.y.id,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CornerClassifier
// ────────────────────────────────────────────────────────────────────────────

/// Stateless corner classifier.
///
/// [`CornerClassifier::default`] uses [`PERPENDICULAR_TOLERANCE`] and
/// [`VERTICAL_THRESHOLD`].  The comparisons stay strict (`<` and `>`)
/// whatever tolerances are configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerClassifier {
    pub perpendicular_tolerance: f32,
    pub vertical_threshold: f32,
}

impl Default for CornerClassifier {
    fn default() -> Self {
        Self::new(PERPENDICULAR_TOLERANCE, VERTICAL_THRESHOLD)
    }
}

impl CornerClassifier {
    pub fn new(perpendicular_tolerance: f32, vertical_threshold: f32) -> Self {
        Self {
            perpendicular_tolerance,
            vertical_threshold,
        }
    }

    /// `|a · b| < perpendicular_tolerance`, without normalising either side.
    pub fn is_perpendicular(&self, a: Vec3, b: Vec3) -> bool {
        a.dot(b).abs() < self.perpendicular_tolerance
    }

    /// `|n.z| > vertical_threshold`.
    pub fn is_vertical(&self, normal: Vec3) -> bool {
        normal.z.abs() > self.vertical_threshold
    }

    /// Find the first-match corner in `planes`, if any.
    pub fn find_corner<'a>(&self, planes: &'a [Plane]) -> Option<Corner<'a>> {
        let Some(reference) = planes.iter().find(|p| self.is_vertical(p.normal)) else {
            debug!(planes = planes.len(), "no reference plane");
            return None;
        };

        let perpendicular_to_reference =
            |p: &&Plane| self.is_perpendicular(p.normal, reference.normal);

        let Some((x_slot, x)) = planes
            .iter()
            .enumerate()
            .find(|(_, p)| perpendicular_to_reference(p))
        else {
            debug!(reference = %reference.id, "no plane perpendicular to reference");
            return None;
        };

        // Identity is the slot in the slice, not the plane's value.
        let Some(y) = planes
            .iter()
            .enumerate()
            .filter(|(slot, _)| *slot != x_slot)
            .map(|(_, p)| p)
            .find(perpendicular_to_reference)
        else {
            debug!(reference = %reference.id, x = %x.id, "no second plane perpendicular to reference");
            return None;
        };

        if !self.is_perpendicular(x.normal, y.normal) {
            debug!(x = %x.id, y = %y.id, "x and y are not perpendicular");
            return None;
        }

        Some(Corner { reference, x, y })
    }

    /// Whether `planes` contains a corner.
    pub fn is_corner(&self, planes: &[Plane]) -> bool {
        self.find_corner(planes).is_some()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Default-tolerance shorthands
// ────────────────────────────────────────────────────────────────────────────

/// `|a · b| < 0.1`.
pub fn is_perpendicular(a: Vec3, b: Vec3) -> bool {
    CornerClassifier::default().is_perpendicular(a, b)
}

/// `|n.z| > 0.9`.
pub fn is_vertical(normal: Vec3) -> bool {
    CornerClassifier::default().is_vertical(normal)
}

/// [`CornerClassifier::find_corner`] with the default tolerances.
pub fn find_corner(planes: &[Plane]) -> Option<Corner<'_>> {
    CornerClassifier::default().find_corner(planes)
}

/// Whether `planes` contains a corner under the default tolerances.
pub fn detect_corner(planes: &[Plane]) -> bool {
    CornerClassifier::default().is_corner(planes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
