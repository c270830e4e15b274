//! REPL – interactive shell for replaying scenes and asking for corners.
//!
//! Supported slash-commands:
//!   /help          – show this list
//!   /load <path>   – load a JSON or TOML scene into a fresh session
//!   /detect        – advance one frame and classify it
//!   /planes        – list the planes of the last frame
//!   /pause         – pause the tracking session
//!   /resume        – resume the tracking session
//!   /status        – session state and active tolerances
//!   /settings      – edit tolerances in `~/.arcorner/config.toml`
//!   /quit | /exit  – exit the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arcorner_hal::{CameraPermission, SimEngine, TrackingSession};
use arcorner_runtime::CornerDetector;
use arcorner_types::SessionState;

use crate::config::{self, Config};
use crate::scene::Scene;

type SimDetector = CornerDetector<TrackingSession<SimEngine>>;

/// Mutable state shared by the command handlers.
pub struct Shell {
    config: Config,
    detector: SimDetector,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        let classifier = config.classifier();
        Self {
            config,
            detector: CornerDetector::new(TrackingSession::uninitialized(), classifier),
        }
    }

    /// Replace the current session with one replaying `path`.
    pub fn load_scene(&mut self, path: &Path) -> Result<usize, String> {
        let scene = Scene::load(path).map_err(|e| e.to_string())?;
        let frames = scene.frames.len();
        let (session, err) =
            TrackingSession::initialize(CameraPermission::Granted, || Ok(scene.into_engine()));
        if let Some(e) = err {
            return Err(e.to_string());
        }
        self.detector = CornerDetector::new(session, self.config.classifier());
        Ok(frames)
    }

    /// Apply edited tolerances to the running detector.
    fn set_tolerances(&mut self, perpendicular_tolerance: f32, vertical_threshold: f32) {
        self.config.perpendicular_tolerance = perpendicular_tolerance;
        self.config.vertical_threshold = vertical_threshold;
        self.detector.set_classifier(self.config.classifier());
    }
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(mut shell: Shell, shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "arcorner>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };

        match cmd {
            "/help" => cmd_help(),
            "/load" => match words.next() {
                Some(path) => cmd_load(&mut shell, Path::new(path)),
                None => println!("{} /load <path>", "Usage:".yellow()),
            },
            "/detect" => cmd_detect(&mut shell),
            "/planes" => cmd_planes(&shell),
            "/pause" => cmd_pause(&mut shell),
            "/resume" => cmd_resume(&mut shell),
            "/status" => cmd_status(&shell),
            "/settings" => cmd_settings(&mut shell),
            "/quit" | "/exit" => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            other => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "arcorner Commands".bold().underline());
    println!("  {}  – load a JSON/TOML plane scene", "/load <path>".bold().cyan());
    println!("  {}        – advance one frame and look for a corner", "/detect".bold().cyan());
    println!("  {}        – list planes of the last frame", "/planes".bold().cyan());
    println!("  {} – pause / resume tracking", "/pause  /resume".bold().cyan());
    println!("  {}        – session state and tolerances", "/status".bold().cyan());
    println!("  {}      – edit tolerances", "/settings".bold().cyan());
    println!("  {}   – exit the CLI", "/quit  /exit".bold().cyan());
    println!();
}

fn cmd_load(shell: &mut Shell, path: &Path) {
    match shell.load_scene(path) {
        Ok(frames) => println!(
            "{} {} ({} frame(s))",
            "✓ Scene loaded from".green(),
            path.display().to_string().bold(),
            frames
        ),
        Err(e) => println!("{}: {}", "Scene error".red(), e),
    }
}

fn cmd_detect(shell: &mut Shell) {
    match shell.detector.detect() {
        Ok(report) => match report.corner {
            Some(c) => {
                println!("{} ({} plane(s))", "Corner detected".green().bold(), report.plane_count);
                println!("  reference : {}", c.reference.to_string().dimmed());
                println!("  x         : {}", c.x.to_string().dimmed());
                println!("  y         : {}", c.y.to_string().dimmed());
            }
            None => println!("{} ({} plane(s))", "No corner detected".yellow(), report.plane_count),
        },
        Err(e) => println!("{}: {}", "Detection unavailable".red(), e),
    }
}

fn cmd_planes(shell: &Shell) {
    let Some(frame) = shell
        .detector
        .provider()
        .engine()
        .and_then(SimEngine::last_frame)
    else {
        println!("  No frame yet. Use {} first.", "/detect".bold());
        return;
    };
    println!("{}", "Last frame".bold().underline());
    for t in &frame.planes {
        let n = t.plane.normal;
        let marker = if t.updated { "•".green() } else { "·".dimmed() };
        println!(
            "  {} {}  normal=({:.3}, {:.3}, {:.3})  {:?}",
            marker,
            t.plane.id.to_string().dimmed(),
            n.x,
            n.y,
            n.z,
            t.state
        );
    }
}

fn cmd_pause(shell: &mut Shell) {
    match shell.detector.provider_mut().on_pause() {
        Ok(()) => println!("{}", "Session paused.".green()),
        Err(e) => println!("{}: {}", "Pause failed".red(), e),
    }
}

fn cmd_resume(shell: &mut Shell) {
    match shell.detector.provider_mut().on_resume() {
        Ok(()) => println!("{}", "Session resumed.".green()),
        Err(e) => println!("{}: {}", "Resume failed".red(), e),
    }
}

fn cmd_status(shell: &Shell) {
    let session = shell.detector.provider();
    let state = match session.state() {
        SessionState::Uninitialized => "uninitialized".red(),
        SessionState::Paused => "paused".yellow(),
        SessionState::Running => "running".green(),
    };
    println!("  Session               : {}", state);
    if let Some(engine) = session.engine() {
        println!("  Frames remaining      : {}", engine.remaining_frames());
    }
    let c = shell.detector.classifier();
    println!("  Perpendicular |a·b| < : {}", c.perpendicular_tolerance);
    println!("  Vertical |n.z| >      : {}", c.vertical_threshold);
}

fn cmd_settings(shell: &mut Shell) {
    let current = &shell.config;

    println!("{}", "Settings Editor".bold().underline());
    let tolerance = prompt_f32(
        &format!("  Perpendicular tolerance [{}]: ", current.perpendicular_tolerance),
        current.perpendicular_tolerance,
        config::valid_tolerance,
    );
    let threshold = prompt_f32(
        &format!("  Vertical threshold      [{}]: ", current.vertical_threshold),
        current.vertical_threshold,
        config::valid_threshold,
    );

    match config::save_tolerances(tolerance, threshold) {
        Ok(_) => println!(
            "{} {}",
            "✓ Settings saved to".green(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    shell.set_tolerances(tolerance, threshold);
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn prompt_f32(msg: &str, default: f32, valid: fn(f32) -> bool) -> f32 {
    print!("{}", msg);
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => parse_setting(&line, default, valid),
        Err(_) => default,
    }
}

/// Parse a prompted value; blank, unparsable or out-of-range input keeps
/// `default`.
fn parse_setting(input: &str, default: f32, valid: fn(f32) -> bool) -> f32 {
    match input.trim().parse::<f32>() {
        Ok(v) if valid(v) => v,
        Ok(v) => {
            println!("  {} {}; keeping {}", "Out of range:".yellow(), v, default);
            default
        }
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_shell_has_uninitialized_session() {
        let mut shell = Shell::new(Config::default());
        assert_eq!(shell.detector.provider().state(), SessionState::Uninitialized);
        assert!(!shell.detector.detect_corner());
    }

    #[test]
    fn load_scene_replaces_session() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("room.json");
        std::fs::write(
            &path,
            r#"{"frames":[{"planes":[
                {"normal":[0,0,1]},{"normal":[1,0,0]},{"normal":[0,1,0]}
            ]}]}"#,
        )
        .unwrap();

        let mut shell = Shell::new(Config::default());
        assert_eq!(shell.load_scene(&path), Ok(1));
        assert_eq!(shell.detector.provider().state(), SessionState::Paused);
        assert!(shell.detector.detect_corner());
    }

    #[test]
    fn load_scene_reports_missing_file() {
        let mut shell = Shell::new(Config::default());
        let err = shell.load_scene(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.contains("Failed to read scene"));
    }

    #[test]
    fn shell_uses_configured_tolerances() {
        let cfg = Config {
            perpendicular_tolerance: 0.3,
            ..Config::default()
        };
        let shell = Shell::new(cfg);
        assert!((shell.detector.classifier().perpendicular_tolerance - 0.3).abs() < 1e-6);
    }

    #[test]
    fn parse_setting_keeps_default_for_bad_input() {
        for input in ["nan", "NaN", "-0.1", "inf", "-inf", "", "wide"] {
            assert_eq!(parse_setting(input, 0.1, config::valid_tolerance), 0.1, "{input:?}");
        }
        for input in ["nan", "-0.5", "inf", "1.0", "1.5"] {
            assert_eq!(parse_setting(input, 0.9, config::valid_threshold), 0.9, "{input:?}");
        }
    }

    #[test]
    fn parse_setting_accepts_in_range_values() {
        assert_eq!(parse_setting(" 0.25\n", 0.1, config::valid_tolerance), 0.25);
        assert_eq!(parse_setting("0.8", 0.9, config::valid_threshold), 0.8);
    }

    #[test]
    fn set_tolerances_keeps_scene_and_updates_detector() {
        let cfg = Config {
            scene_path: Some(std::path::PathBuf::from("scenes/room.json")),
            ..Config::default()
        };
        let mut shell = Shell::new(cfg);
        shell.set_tolerances(0.2, 0.8);
        assert_eq!(shell.config.scene_path, Some(std::path::PathBuf::from("scenes/room.json")));
        let c = shell.detector.classifier();
        assert!((c.perpendicular_tolerance - 0.2).abs() < 1e-6);
        assert!((c.vertical_threshold - 0.8).abs() < 1e-6);
    }
}
