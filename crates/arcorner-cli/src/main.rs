//! `arcorner-cli` – command line front end for the corner detector.
//!
//! ```text
//! arcorner               # interactive REPL
//! arcorner room.json     # replay every frame once, one JSON report per line
//! ```
//!
//! On startup the binary:
//!
//! 1. Installs tracing (`RUST_LOG`, `ARCORNER_LOG_FORMAT`,
//!    `OTEL_EXPORTER_OTLP_ENDPOINT`).
//! 2. Loads `~/.arcorner/config.toml` (defaults when absent).
//! 3. Either replays the scene given on the command line, or drops into the
//!    REPL with the configured scene (if any) already loaded.

mod config;
mod repl;
mod scene;

use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use arcorner_hal::{CameraPermission, TrackingSession};
use arcorner_runtime::CornerDetector;

use crate::scene::Scene;

fn main() -> ExitCode {
    let _guard = arcorner_runtime::init_tracing("arcorner");

    let cfg = match config::load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => config::Config::from_env(),
        Err(e) => {
            warn!(error = %e, "config unusable; using defaults");
            config::Config::from_env()
        }
    };

    if let Some(path) = std::env::args().nth(1) {
        return replay(Path::new(&path), &cfg);
    }

    print_banner();

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – exiting …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    let mut shell = repl::Shell::new(cfg.clone());
    if let Some(path) = &cfg.scene_path {
        match shell.load_scene(path) {
            Ok(frames) => println!(
                "  Scene {} loaded ({} frame(s))",
                path.display().to_string().bold(),
                frames
            ),
            Err(e) => println!("{}: {}", "Scene error".red(), e),
        }
    }

    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());
    repl::run(shell, shutdown);
    ExitCode::SUCCESS
}

/// Classify every frame of `path` once and print each report as JSON.
fn replay(path: &Path, cfg: &config::Config) -> ExitCode {
    let scene = match Scene::load(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", "Scene error".red(), e);
            return ExitCode::FAILURE;
        }
    };
    let frames = scene.frames.len();
    let (session, err) =
        TrackingSession::initialize(CameraPermission::Granted, || Ok(scene.into_engine()));
    if let Some(e) = err {
        eprintln!("{}: {}", "Tracking error".red(), e);
        return ExitCode::FAILURE;
    }

    let mut detector = CornerDetector::new(session, cfg.classifier());
    for _ in 0..frames {
        match detector.detect() {
            Ok(report) => match serde_json::to_string(&report) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    eprintln!("{}: {}", "Serialization error".red(), e);
                    return ExitCode::FAILURE;
                }
            },
            Err(e) => eprintln!("{}: {}", "Detection unavailable".red(), e),
        }
    }
    ExitCode::SUCCESS
}

fn print_banner() {
    println!();
    println!(
        "  {} {}",
        "arcorner".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Three-plane corner detection over tracked surfaces");
    println!();
}
