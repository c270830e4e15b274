//! [`TrackingSession`] – lifecycle wrapper around a [`TrackingEngine`].
//!
//! The host drives the session through three entry points:
//!
//! - [`TrackingSession::initialize`] once camera permission is known,
//! - [`TrackingSession::on_resume`] / [`TrackingSession::on_pause`] from its
//!   foreground/background callbacks,
//! - [`PlaneProvider::current_planes`] whenever a corner check is requested.
//!
//! Every engine failure surfaces as a [`TrackingError`]; a session whose
//! initialisation failed simply stays [`SessionState::Uninitialized`].

use arcorner_perception::Plane;
use arcorner_types::{SessionState, TrackingError};
use tracing::{debug, error, info, warn};

use crate::engine::TrackingEngine;
use crate::provider::PlaneProvider;

/// Outcome of the host's camera permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPermission {
    Granted,
    Denied,
}

/// Owns an optional tracking engine and exposes it as a [`PlaneProvider`].
pub struct TrackingSession<E> {
    engine: Option<E>,
}

impl<E: TrackingEngine> TrackingSession<E> {
    /// A session with no engine.  Every plane request fails with
    /// [`TrackingError::NotInitialized`].
    pub fn uninitialized() -> Self {
        Self { engine: None }
    }

    /// Wrap an engine that is already constructed.
    pub fn new(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Create the engine through `factory` if `permission` allows it.
    ///
    /// Returns the session together with the initialisation error, if any.
    /// On error the session is uninitialised.
    pub fn initialize<F>(permission: CameraPermission, factory: F) -> (Self, Option<TrackingError>)
    where
        F: FnOnce() -> Result<E, TrackingError>,
    {
        if permission == CameraPermission::Denied {
            warn!("camera permission denied; tracking session not created");
            return (Self::uninitialized(), Some(TrackingError::PermissionDenied));
        }
        match factory() {
            Ok(engine) => {
                info!("tracking session initialized");
                (Self::new(engine), None)
            }
            Err(e) => {
                error!(error = %e, "tracking session initialization failed");
                (Self::uninitialized(), Some(e))
            }
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.engine {
            None => SessionState::Uninitialized,
            Some(e) if e.is_paused() => SessionState::Paused,
            Some(_) => SessionState::Running,
        }
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Host came to the foreground: resume a paused engine.
    ///
    /// No-op for an uninitialised session or an engine that is already
    /// running.
    pub fn on_resume(&mut self) -> Result<(), TrackingError> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };
        if !engine.is_paused() {
            return Ok(());
        }
        debug!("resuming tracking session");
        engine.resume().inspect_err(|e| {
            error!(error = %e, "error resuming tracking session");
        })
    }

    /// Host went to the background: pause the engine.
    pub fn on_pause(&mut self) -> Result<(), TrackingError> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };
        engine.pause().inspect_err(|e| {
            error!(error = %e, "error pausing tracking session");
        })?;
        debug!("tracking session paused");
        Ok(())
    }
}

impl<E: TrackingEngine> PlaneProvider for TrackingSession<E> {
    fn current_planes(&mut self) -> Result<Vec<Plane>, TrackingError> {
        let Some(engine) = self.engine.as_mut() else {
            error!("tracking session not initialized");
            return Err(TrackingError::NotInitialized);
        };

        if engine.is_paused() {
            debug!("resuming paused tracking session before update");
            engine.resume().map_err(|e| {
                error!(error = %e, "failed to resume tracking session");
                match e {
                    TrackingError::ResumeFailed(_) => e,
                    other => TrackingError::ResumeFailed(other.to_string()),
                }
            })?;
        }

        let frame = engine.update().inspect_err(|e| {
            error!(error = %e, "error updating tracking session");
        })?;
        Ok(frame.updated_planes())
    }
}
