//! In-process simulated tracking engine for tests and scene replay.
//!
//! [`SimEngine`] plays back a script of [`Frame`]s, one per
//! [`update`][TrackingEngine::update].  Once the script runs out, the last
//! frame's planes keep being reported with `updated = false`, which is what
//! a real engine does when nothing in view changes.
//!
//! # Example
//!
//! ```rust
//! use arcorner_hal::sim::SimEngine;
//! use arcorner_hal::engine::TrackingEngine;
//! use arcorner_perception::{Plane, Vec3};
//!
//! let mut engine = SimEngine::builder()
//!     .frame(vec![Plane::new(Vec3::new(0.0, 0.0, 1.0), Vec3::zero())])
//!     .build();
//!
//! engine.resume().expect("sim resume must succeed");
//! let frame = engine.update().expect("sim update must succeed");
//! assert_eq!(frame.updated_planes().len(), 1);
//! ```

use std::collections::VecDeque;

use arcorner_perception::Plane;
use arcorner_types::{TrackingError, UnavailableReason};

use crate::engine::{Frame, TrackedPlane, TrackingEngine};

// ────────────────────────────────────────────────────────────────────────────
// SimEngine
// ────────────────────────────────────────────────────────────────────────────

/// A scripted [`TrackingEngine`].  Starts paused.
#[derive(Debug, Default)]
pub struct SimEngine {
    script: VecDeque<Frame>,
    last: Option<Frame>,
    paused: bool,
    pending_failure: Option<String>,
    updates: u64,
}

impl SimEngine {
    pub fn builder() -> SimEngineBuilder {
        SimEngineBuilder::default()
    }

    /// Make the next [`update`][TrackingEngine::update] fail with
    /// [`TrackingError::UpdateFailed`].
    pub fn fail_next_update(&mut self, details: impl Into<String>) {
        self.pending_failure = Some(details.into());
    }

    /// Frames still waiting to be played.
    pub fn remaining_frames(&self) -> usize {
        self.script.len()
    }

    /// Number of successful updates so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// The most recently reported frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }
}

impl TrackingEngine for SimEngine {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn resume(&mut self) -> Result<(), TrackingError> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), TrackingError> {
        self.paused = true;
        Ok(())
    }

    fn update(&mut self) -> Result<Frame, TrackingError> {
        if self.paused {
            return Err(TrackingError::SessionPaused);
        }
        if let Some(details) = self.pending_failure.take() {
            return Err(TrackingError::UpdateFailed(details));
        }

        let frame = match self.script.pop_front() {
            Some(next) => next,
            None => {
                let planes = self
                    .last
                    .as_ref()
                    .map(|f| {
                        f.planes
                            .iter()
                            .map(|t| TrackedPlane {
                                updated: false,
                                ..*t
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Frame::new(planes)
            }
        };

        self.updates += 1;
        self.last = Some(frame.clone());
        Ok(frame)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for [`SimEngine`].
///
/// Call the `frame*` methods to script what each update reports, then
/// [`build`][Self::build] (or [`build_checked`][Self::build_checked] to
/// simulate an engine that cannot start on this device).
#[derive(Debug, Default)]
pub struct SimEngineBuilder {
    frames: Vec<Frame>,
    unavailable: Option<UnavailableReason>,
}

impl SimEngineBuilder {
    /// Script a frame in which every plane is tracking and updated.
    pub fn frame(mut self, planes: Vec<Plane>) -> Self {
        self.frames
            .push(Frame::new(planes.into_iter().map(TrackedPlane::fresh).collect()));
        self
    }

    /// Script a frame with explicit per-plane state.
    pub fn tracked_frame(mut self, planes: Vec<TrackedPlane>) -> Self {
        self.frames.push(Frame::new(planes));
        self
    }

    /// Make [`build_checked`][Self::build_checked] fail with `reason`.
    pub fn unavailable(mut self, reason: UnavailableReason) -> Self {
        self.unavailable = Some(reason);
        self
    }

    /// Consume the builder and return a paused engine.
    pub fn build(self) -> SimEngine {
        SimEngine {
            script: self.frames.into(),
            last: None,
            paused: true,
            pending_failure: None,
            updates: 0,
        }
    }

    /// Like [`build`][Self::build], but honours
    /// [`unavailable`][Self::unavailable].  Suitable as a
    /// [`TrackingSession::initialize`][crate::session::TrackingSession::initialize]
    /// factory.
    pub fn build_checked(self) -> Result<SimEngine, TrackingError> {
        match self.unavailable {
            Some(reason) => Err(TrackingError::Unavailable(reason)),
            None => Ok(self.build()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
