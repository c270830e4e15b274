//! Generic `TrackingEngine` trait and the frame types it produces.

use arcorner_perception::Plane;
use arcorner_types::TrackingError;
use chrono::{DateTime, Utc};

/// Tracking state of a single plane trackable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// The plane is being actively tracked.
    #[default]
    Tracking,
    /// Tracking is temporarily lost; the plane may recover.
    Paused,
    /// The plane will never be tracked again (e.g. merged into another).
    Stopped,
}

/// A plane as reported by one engine update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPlane {
    pub plane: Plane,
    pub state: TrackingState,
    /// Whether the engine changed this plane during the update that
    /// produced the enclosing [`Frame`].
    pub updated: bool,
}

impl TrackedPlane {
    /// A plane that is tracking and was updated in this frame.
    pub fn fresh(plane: Plane) -> Self {
        Self {
            plane,
            state: TrackingState::Tracking,
            updated: true,
        }
    }
}

/// One update of the tracking engine.
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp: DateTime<Utc>,
    pub planes: Vec<TrackedPlane>,
}

impl Frame {
    pub fn new(planes: Vec<TrackedPlane>) -> Self {
        Self {
            timestamp: Utc::now(),
            planes,
        }
    }

    /// Planes updated in this frame whose tracking has not stopped, in the
    /// order the engine reported them.
    pub fn updated_planes(&self) -> Vec<Plane> {
        self.planes
            .iter()
            .filter(|t| t.updated && t.state != TrackingState::Stopped)
            .map(|t| t.plane)
            .collect()
    }
}

/// A camera-driven world tracking engine.
///
/// Engines start paused.  Drivers implement this trait and are owned by a
/// [`TrackingSession`][crate::session::TrackingSession].
pub trait TrackingEngine: Send {
    fn is_paused(&self) -> bool;

    /// Start (or restart) producing frames.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::ResumeFailed`] if the camera cannot be
    /// acquired.
    fn resume(&mut self) -> Result<(), TrackingError>;

    fn pause(&mut self) -> Result<(), TrackingError>;

    /// Advance the engine and return the latest frame.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::SessionPaused`] when called while paused, or
    /// [`TrackingError::UpdateFailed`] for any other engine failure.
    fn update(&mut self) -> Result<Frame, TrackingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcorner_perception::Vec3;

    fn plane() -> Plane {
        Plane::new(Vec3::new(0.0, 0.0, 1.0), Vec3::zero())
    }

    #[test]
    fn updated_planes_keeps_order_and_skips_stale() {
        let a = plane();
        let b = plane();
        let c = plane();
        let frame = Frame::new(vec![
            TrackedPlane::fresh(a),
            TrackedPlane {
                plane: b,
                state: TrackingState::Tracking,
                updated: false,
            },
            TrackedPlane::fresh(c),
        ]);
        let ids: Vec<_> = frame.updated_planes().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn updated_planes_skips_stopped() {
        let paused = plane();
        let frame = Frame::new(vec![
            TrackedPlane {
                plane: paused,
                state: TrackingState::Paused,
                updated: true,
            },
            TrackedPlane {
                plane: plane(),
                state: TrackingState::Stopped,
                updated: true,
            },
        ]);
        let planes = frame.updated_planes();
        assert_eq!(planes.len(), 1);
        assert_eq!(planes[0].id, paused.id);
    }

    #[test]
    fn empty_frame_has_no_planes() {
        assert!(Frame::new(Vec::new()).updated_planes().is_empty());
    }
}
