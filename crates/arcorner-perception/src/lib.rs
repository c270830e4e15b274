//! `arcorner-perception` – geometry and corner classification.
//!
//! Turns the tracking engine's plane snapshot into a yes/no answer: do three
//! of these surfaces meet at a mutually perpendicular corner?
//!
//! # Modules
//!
//! - [`geometry`] – [`Vec3`][geometry::Vec3], [`Quaternion`][geometry::Quaternion]
//!   and [`Pose`][geometry::Pose]; a plane's normal is its pose's Y axis.
//! - [`plane`] – [`Plane`][plane::Plane]: id, center position and normal of
//!   one tracked surface.
//! - [`corner`] – [`CornerClassifier`][corner::CornerClassifier]: first-match
//!   reference/X/Y selection with the perpendicularity and verticality
//!   predicates.  Pure and allocation-free; safe to call from any thread.

pub mod corner;
pub mod geometry;
pub mod plane;

pub use corner::{Corner, CornerClassifier, detect_corner, find_corner};
pub use geometry::{Pose, Quaternion, Vec3};
pub use plane::Plane;
