//! Recorded plane scenes replayed through the simulated tracking engine.
//!
//! A scene is a list of frames, each a list of planes.  JSON and TOML are
//! both accepted; the format is picked from the file extension.
//!
//! ```toml
//! [[frames]]
//! [[frames.planes]]
//! normal = [0.0, 0.0, 1.0]
//!
//! [[frames.planes]]
//! rotation = [0.7071068, 0.0, 0.0, -0.7071068]  # w, x, y, z
//! position = [-1.0, 0.0, 0.0]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use arcorner_hal::{SimEngine, TrackedPlane, TrackingState};
use arcorner_perception::{Plane, Pose, Quaternion, Vec3};
use arcorner_types::PlaneId;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to read scene at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML scene: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub frames: Vec<SceneFrame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneFrame {
    #[serde(default)]
    pub planes: Vec<ScenePlane>,
}

/// How a scene plane states its orientation.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum Orientation {
    /// Normal given directly; used as-is.
    Normal { normal: [f32; 3] },
    /// Center-pose rotation `[w, x, y, z]`; the normal is its Y axis.
    Rotation { rotation: [f32; 4] },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenePlane {
    #[serde(default)]
    pub id: Option<PlaneId>,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(flatten)]
    pub orientation: Orientation,
    #[serde(default = "default_updated")]
    pub updated: bool,
    #[serde(default)]
    pub tracking: SceneTracking,
}

fn default_updated() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneTracking {
    #[default]
    Tracking,
    Paused,
    Stopped,
}

impl From<SceneTracking> for TrackingState {
    fn from(t: SceneTracking) -> Self {
        match t {
            SceneTracking::Tracking => TrackingState::Tracking,
            SceneTracking::Paused => TrackingState::Paused,
            SceneTracking::Stopped => TrackingState::Stopped,
        }
    }
}

impl ScenePlane {
    pub fn to_tracked(&self) -> TrackedPlane {
        let id = self.id.unwrap_or_default();
        let position = Vec3::from(self.position);
        let plane = match self.orientation {
            Orientation::Normal { normal } => Plane::with_id(id, Vec3::from(normal), position),
            Orientation::Rotation { rotation } => {
                Plane::from_pose(id, Pose::new(position, Quaternion::from(rotation)))
            }
        };
        TrackedPlane {
            plane,
            state: self.tracking.into(),
            updated: self.updated,
        }
    }
}

impl Scene {
    /// Read a scene file.  `.toml` files are parsed as TOML, anything else
    /// as JSON.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let raw = fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&raw)
        } else {
            Self::from_json(&raw)
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_toml(raw: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(raw)?)
    }

    /// Build a paused [`SimEngine`] that plays this scene's frames in order.
    ///
    /// Plane ids missing from the file are assigned here, once, so the same
    /// plane keeps its id across frames only if the file names it.
    pub fn into_engine(self) -> SimEngine {
        self.frames
            .iter()
            .fold(SimEngine::builder(), |builder, frame| {
                builder.tracked_frame(frame.planes.iter().map(ScenePlane::to_tracked).collect())
            })
            .build()
    }
}
