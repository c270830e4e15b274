//! [`CornerDetector`] – pulls a plane snapshot and classifies it.
//!
//! The detector is the host-facing entry point.  It owns a
//! [`PlaneProvider`] (usually a [`TrackingSession`][arcorner_hal::TrackingSession])
//! and a [`CornerClassifier`], and turns each request into a
//! [`DetectionReport`].

use arcorner_hal::PlaneProvider;
use arcorner_perception::CornerClassifier;
use arcorner_types::{DetectionReport, TrackingError};
use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

pub struct CornerDetector<P> {
    provider: P,
    classifier: CornerClassifier,
}

impl<P: PlaneProvider> CornerDetector<P> {
    pub fn new(provider: P, classifier: CornerClassifier) -> Self {
        Self {
            provider,
            classifier,
        }
    }

    /// Detector using the default tolerances.
    pub fn with_defaults(provider: P) -> Self {
        Self::new(provider, CornerClassifier::default())
    }

    pub fn classifier(&self) -> CornerClassifier {
        self.classifier
    }

    pub fn set_classifier(&mut self, classifier: CornerClassifier) {
        self.classifier = classifier;
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Fetch the current planes and classify them.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`TrackingError`].  Finding no corner is
    /// not an error; the report's `corner` is `None`.
    pub fn detect(&mut self) -> Result<DetectionReport, TrackingError> {
        let planes = self.provider.current_planes()?;
        debug!(planes = planes.len(), "classifying plane snapshot");

        let corner = self.classifier.find_corner(&planes).map(|c| c.ids());
        match &corner {
            Some(c) => info!(reference = %c.reference, x = %c.x, y = %c.y, "corner detected"),
            None => info!("no corner detected"),
        }

        Ok(DetectionReport {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            plane_count: planes.len(),
            corner,
        })
    }

    /// `true` iff a corner is visible right now.  Provider failures are
    /// logged and answered with `false`.
    pub fn detect_corner(&mut self) -> bool {
        match self.detect() {
            Ok(report) => report.corner_found(),
            Err(e) => {
                error!(error = %e, "corner detection unavailable");
                false
            }
        }
    }
}
