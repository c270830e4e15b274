//! The `PlaneProvider` seam between tracking and classification.

use arcorner_perception::Plane;
use arcorner_types::TrackingError;

/// Supplies the current snapshot of tracked planes on demand.
///
/// Implementors are responsible for freshness filtering; whatever they
/// return is classified as-is, in the returned order.
pub trait PlaneProvider {
    /// Return the planes to classify right now.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackingError`] when no snapshot can be produced (session
    /// missing, paused, or failing).  An empty `Vec` is a valid snapshot.
    fn current_planes(&mut self) -> Result<Vec<Plane>, TrackingError>;
}

/// A fixed plane list, handy for replaying a recorded snapshot.
impl PlaneProvider for Vec<Plane> {
    fn current_planes(&mut self) -> Result<Vec<Plane>, TrackingError> {
        Ok(self.clone())
    }
}
