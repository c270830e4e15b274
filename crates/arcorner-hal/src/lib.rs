//! `arcorner-hal` – boundary with the world tracking engine.
//!
//! # Modules
//!
//! - [`engine`] – [`TrackingEngine`][engine::TrackingEngine] trait and the
//!   [`Frame`][engine::Frame] / [`TrackedPlane`][engine::TrackedPlane] it
//!   produces.
//! - [`provider`] – [`PlaneProvider`][provider::PlaneProvider]: the seam the
//!   corner detector pulls plane snapshots through.
//! - [`session`] – [`TrackingSession`][session::TrackingSession]: permission
//!   gating, pause/resume lifecycle, and error translation around an engine.
//! - [`sim`] – [`SimEngine`][sim::SimEngine]: scripted engine for headless
//!   tests and scene replay.

pub mod engine;
pub mod provider;
pub mod session;
pub mod sim;

pub use engine::{Frame, TrackedPlane, TrackingEngine, TrackingState};
pub use provider::PlaneProvider;
pub use session::{CameraPermission, TrackingSession};
pub use sim::{SimEngine, SimEngineBuilder};
