use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identity of a tracked plane.
///
/// Two planes with the same orientation are still distinct trackables; the
/// tracking engine assigns each one its own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaneId(pub Uuid);

impl PlaneId {
    /// Allocate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlaneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why the tracking engine could not be brought up on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The tracking engine runtime is not installed.
    EngineNotInstalled,
    /// The device hardware is not supported by the engine.
    DeviceNotCompatible,
    /// The application was built against an SDK older than the engine requires.
    SdkTooOld,
    /// The installed engine runtime is older than the SDK requires.
    EngineTooOld,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::EngineNotInstalled => write!(f, "tracking engine not installed"),
            UnavailableReason::DeviceNotCompatible => {
                write!(f, "device not compatible with tracking engine")
            }
            UnavailableReason::SdkTooOld => write!(f, "tracking SDK too old"),
            UnavailableReason::EngineTooOld => write!(f, "tracking engine too old"),
        }
    }
}

/// Lifecycle state of a tracking session as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No engine has been created (permission denied or engine unavailable).
    Uninitialized,
    /// An engine exists but is not producing frames.
    Paused,
    /// The engine is producing frames.
    Running,
}

/// Errors raised at the boundary with the tracking engine.
///
/// The corner classifier itself never fails; these only describe why a
/// plane snapshot could not be obtained.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackingError {
    #[error("Camera permission is required for tracking")]
    PermissionDenied,

    #[error("Tracking unavailable: {0}")]
    Unavailable(UnavailableReason),

    #[error("Tracking session not initialized")]
    NotInitialized,

    #[error("Failed to resume tracking session: {0}")]
    ResumeFailed(String),

    #[error("Tracking session is paused; cannot update frame")]
    SessionPaused,

    #[error("Error updating tracking session: {0}")]
    UpdateFailed(String),
}

/// Ids of the three planes that formed a detected corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerPlanes {
    /// The vertical reference plane.
    pub reference: PlaneId,
    /// First plane perpendicular to the reference.
    pub x: PlaneId,
    /// Second plane perpendicular to the reference and to `x`.
    pub y: PlaneId,
}

/// Outcome of one corner classification over a plane snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Number of planes handed to the classifier.
    pub plane_count: usize,
    /// Present only when a corner was found.
    pub corner: Option<CornerPlanes>,
}

impl DetectionReport {
    /// Whether this report describes a detected corner.
    pub fn corner_found(&self) -> bool {
        self.corner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_ids_are_distinct() {
        assert_ne!(PlaneId::new(), PlaneId::new());
    }

    #[test]
    fn plane_id_serializes_as_bare_uuid() {
        let id = PlaneId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn detection_report_roundtrip() {
        let corner = CornerPlanes {
            reference: PlaneId::new(),
            x: PlaneId::new(),
            y: PlaneId::new(),
        };
        let report = DetectionReport {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            plane_count: 3,
            corner: Some(corner),
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: DetectionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, report.id);
        assert_eq!(back.plane_count, 3);
        assert_eq!(back.corner, Some(corner));
        assert!(back.corner_found());
    }

    #[test]
    fn report_without_corner_is_not_found() {
        let report = DetectionReport {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            plane_count: 0,
            corner: None,
        };
        assert!(!report.corner_found());
    }

    #[test]
    fn tracking_error_display() {
        let err = TrackingError::Unavailable(UnavailableReason::SdkTooOld);
        assert!(err.to_string().contains("SDK too old"));

        let err = TrackingError::ResumeFailed("camera busy".to_string());
        assert!(err.to_string().contains("camera busy"));
    }
}
