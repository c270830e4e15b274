//! `arcorner-runtime` – wiring between tracking and classification.
//!
//! # Modules
//!
//! - [`detector`] – [`CornerDetector`][detector::CornerDetector]: asks a
//!   [`PlaneProvider`][arcorner_hal::PlaneProvider] for the current planes,
//!   runs the [`CornerClassifier`][arcorner_perception::CornerClassifier]
//!   and returns a [`DetectionReport`][arcorner_types::DetectionReport].
//!   [`detect_corner`][detector::CornerDetector::detect_corner] is the plain
//!   boolean answer handed back to a host UI.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]:
//!   installs the global `tracing` subscriber with an optional OTLP span
//!   exporter.  Set `OTEL_EXPORTER_OTLP_ENDPOINT` to enable export.

pub mod detector;
pub mod telemetry;

pub use detector::CornerDetector;
pub use telemetry::{LogFormat, TracerProviderGuard, init_tracing};
