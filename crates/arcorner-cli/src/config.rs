//! Configuration vault – reads/writes `~/.arcorner/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use arcorner_perception::CornerClassifier;
use arcorner_perception::corner::{PERPENDICULAR_TOLERANCE, VERTICAL_THRESHOLD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config value for {field}: {value}")]
    Invalid { field: &'static str, value: f32 },
}

/// A perpendicular tolerance must be finite and positive; anything else
/// makes `|a · b| < tolerance` unsatisfiable.
pub fn valid_tolerance(t: f32) -> bool {
    t.is_finite() && t > 0.0
}

/// A vertical threshold must lie in `[0, 1)`; a unit normal never has
/// `|n.z|` above 1.
pub fn valid_threshold(t: f32) -> bool {
    t.is_finite() && (0.0..1.0).contains(&t)
}

/// Persisted user configuration stored in `~/.arcorner/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Two normals are perpendicular when `|a · b|` is below this.
    #[serde(default = "default_perpendicular_tolerance")]
    pub perpendicular_tolerance: f32,

    /// A plane is the reference plane when `|normal.z|` is above this.
    #[serde(default = "default_vertical_threshold")]
    pub vertical_threshold: f32,

    /// Scene replayed by the REPL at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_path: Option<PathBuf>,
}

fn default_perpendicular_tolerance() -> f32 {
    PERPENDICULAR_TOLERANCE
}
fn default_vertical_threshold() -> f32 {
    VERTICAL_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            perpendicular_tolerance: default_perpendicular_tolerance(),
            vertical_threshold: default_vertical_threshold(),
            scene_path: None,
        }
    }
}

impl Config {
    /// Defaults with `ARCORNER_*` overrides applied; used when no config
    /// file exists.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        apply_env_overrides(&mut cfg);
        cfg
    }

    /// Reject tolerances that would silently disable detection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !valid_tolerance(self.perpendicular_tolerance) {
            return Err(ConfigError::Invalid {
                field: "perpendicular_tolerance",
                value: self.perpendicular_tolerance,
            });
        }
        if !valid_threshold(self.vertical_threshold) {
            return Err(ConfigError::Invalid {
                field: "vertical_threshold",
                value: self.vertical_threshold,
            });
        }
        Ok(())
    }

    pub fn classifier(&self) -> CornerClassifier {
        CornerClassifier::new(self.perpendicular_tolerance, self.vertical_threshold)
    }
}

/// Return the path to `~/.arcorner/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".arcorner").join("config.toml")
}

/// Load the config from disk and apply env overrides.  Returns `None` if
/// the file does not exist.
pub fn load() -> Result<Option<Config>, ConfigError> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = toml::from_str(&raw)?;
    cfg.validate()?;
    Ok(Some(cfg))
}

/// Apply `ARCORNER_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `ARCORNER_PERPENDICULAR_TOLERANCE` | `perpendicular_tolerance` |
/// | `ARCORNER_VERTICAL_THRESHOLD` | `vertical_threshold` |
/// | `ARCORNER_SCENE` | `scene_path` |
///
/// Values that do not parse, or parse to an out-of-range tolerance, are
/// ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("ARCORNER_PERPENDICULAR_TOLERANCE")
        && let Ok(t) = v.parse::<f32>()
        && valid_tolerance(t)
    {
        cfg.perpendicular_tolerance = t;
    }
    if let Ok(v) = std::env::var("ARCORNER_VERTICAL_THRESHOLD")
        && let Ok(t) = v.parse::<f32>()
        && valid_threshold(t)
    {
        cfg.vertical_threshold = t;
    }
    if let Ok(v) = std::env::var("ARCORNER_SCENE")
        && !v.is_empty()
    {
        cfg.scene_path = Some(PathBuf::from(v));
    }
}

/// Persist new tolerances to `~/.arcorner/config.toml`.
///
/// Starts from what is on disk (not the running config) so environment
/// overrides are never written back.
pub fn save_tolerances(
    perpendicular_tolerance: f32,
    vertical_threshold: f32,
) -> Result<Config, ConfigError> {
    save_tolerances_to(&config_path(), perpendicular_tolerance, vertical_threshold)
}

pub(crate) fn save_tolerances_to(
    path: &Path,
    perpendicular_tolerance: f32,
    vertical_threshold: f32,
) -> Result<Config, ConfigError> {
    let mut cfg = load_from(path)?.unwrap_or_default();
    cfg.perpendicular_tolerance = perpendicular_tolerance;
    cfg.vertical_threshold = vertical_threshold;
    cfg.validate()?;
    save_to(&cfg, path)?;
    Ok(cfg)
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(write_err)?;
        }
    }
    let raw = toml::to_string_pretty(cfg)?;
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(write_err)?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classifier_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.classifier(), CornerClassifier::default());
        assert!(cfg.scene_path.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let file_mode = std::fs::metadata(&path).expect("file metadata").permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = std::fs::metadata(path.parent().unwrap())
            .expect("dir metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn roundtrip_config_with_scene() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config {
            perpendicular_tolerance: 0.05,
            vertical_threshold: 0.95,
            scene_path: Some(PathBuf::from("/tmp/room.toml")),
        };
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert!((loaded.perpendicular_tolerance - 0.05).abs() < 1e-6);
        assert!((loaded.vertical_threshold - 0.95).abs() < 1e-6);
        assert_eq!(loaded.scene_path, cfg.scene_path);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "perpendicular_tolerance = \"wide\"").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_rejects_out_of_range_tolerances() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        for raw in [
            "perpendicular_tolerance = nan",
            "perpendicular_tolerance = -0.1",
            "perpendicular_tolerance = inf",
            "perpendicular_tolerance = 0.0",
            "vertical_threshold = nan",
            "vertical_threshold = -0.5",
            "vertical_threshold = inf",
            "vertical_threshold = 1.0",
        ] {
            std::fs::write(&path, raw).unwrap();
            assert!(
                matches!(load_from(&path), Err(ConfigError::Invalid { .. })),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn validate_accepts_defaults_and_edge_values() {
        assert!(Config::default().validate().is_ok());
        let cfg = Config {
            perpendicular_tolerance: 2.0,
            vertical_threshold: 0.0,
            scene_path: None,
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn save_tolerances_keeps_other_on_disk_fields() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let on_disk = Config {
            scene_path: Some(PathBuf::from("/srv/room.toml")),
            ..Config::default()
        };
        save_to(&on_disk, &path).expect("save");

        let saved = save_tolerances_to(&path, 0.2, 0.8).expect("save tolerances");
        assert_eq!(saved.scene_path, on_disk.scene_path);

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded, saved);
        assert!((loaded.perpendicular_tolerance - 0.2).abs() < 1e-6);
        assert!((loaded.vertical_threshold - 0.8).abs() < 1e-6);
    }

    #[test]
    fn save_tolerances_without_file_writes_no_scene() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let saved = save_tolerances_to(&path, 0.05, 0.95).expect("save tolerances");
        assert!(saved.scene_path.is_none());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("scene_path"));
    }

    #[test]
    fn save_tolerances_refuses_invalid_values() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(matches!(
            save_tolerances_to(&path, f32::NAN, 0.9),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn config_path_points_to_arcorner_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".arcorner"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    // All env-var cases live in one test so parallel tests never race on
    // the same variables.
    #[test]
    fn apply_env_overrides_behaviour() {
        // SAFETY: only this test reads or writes ARCORNER_* variables.
        unsafe {
            std::env::set_var("ARCORNER_PERPENDICULAR_TOLERANCE", "0.2");
            std::env::set_var("ARCORNER_VERTICAL_THRESHOLD", "not-a-number");
            std::env::set_var("ARCORNER_SCENE", "scenes/room.json");
        }
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert!((cfg.perpendicular_tolerance - 0.2).abs() < 1e-6);
        assert_eq!(cfg.vertical_threshold, VERTICAL_THRESHOLD);
        assert_eq!(cfg.scene_path, Some(PathBuf::from("scenes/room.json")));

        for (tolerance, threshold) in [("nan", "nan"), ("-0.1", "-0.5"), ("inf", "inf")] {
            unsafe {
                std::env::set_var("ARCORNER_PERPENDICULAR_TOLERANCE", tolerance);
                std::env::set_var("ARCORNER_VERTICAL_THRESHOLD", threshold);
            }
            let mut cfg = Config::default();
            apply_env_overrides(&mut cfg);
            assert_eq!(cfg.perpendicular_tolerance, PERPENDICULAR_TOLERANCE);
            assert_eq!(cfg.vertical_threshold, VERTICAL_THRESHOLD);
        }
        unsafe {
            std::env::remove_var("ARCORNER_PERPENDICULAR_TOLERANCE");
            std::env::remove_var("ARCORNER_VERTICAL_THRESHOLD");
            std::env::remove_var("ARCORNER_SCENE");
        }
    }
}
