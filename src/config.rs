use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::VisualizationKind;

const CONFIG_ENV: &str = "PHYSVIZ_CONFIG";
const CONFIG_FILE: &str = "physviz.json";

/// Pixel size used for the canvas before the terminal layout is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width_px: 160,
            height_px: 96,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between animation ticks.
    pub tick_rate_ms: u64,
    /// Start animating as soon as a concept opens.
    pub autoplay: bool,
    pub initial_speed: f64,
    pub fallback_surface: SurfaceSize,
    pub log_file: PathBuf,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Concept to open on launch instead of the home screen.
    pub start_concept: Option<VisualizationKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            autoplay: true,
            initial_speed: 1.0,
            fallback_surface: SurfaceSize::default(),
            log_file: PathBuf::from("physviz.log"),
            log_filter: "physviz=info".to_string(),
            start_concept: None,
        }
    }
}

impl Config {
    /// Loads from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let mut config: Config = serde_json::from_str(&text)?;
        config.tick_rate_ms = config.tick_rate_ms.max(1);
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        // Next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(CONFIG_FILE);
            }
        }
        PathBuf::from(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "autoplay": false, "fallback_surface": {{ "width_px": 200 }}, "start_concept": "quantumParticle" }}"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert!(!config.autoplay);
        assert_eq!(config.tick_rate_ms, 16);
        assert_eq!(config.fallback_surface.width_px, 200);
        assert_eq!(config.fallback_surface.height_px, 96);
        assert_eq!(config.start_concept, Some(VisualizationKind::QuantumParticle));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ tick_rate_ms: ").unwrap();
        assert!(matches!(Config::load_from(file.path()), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_unknown_start_concept_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "start_concept": "gravityWell" }}"#).unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_zero_tick_rate_is_raised() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_rate_ms": 0 }}"#).unwrap();
        assert_eq!(Config::load_from(file.path()).unwrap().tick_rate_ms, 1);
    }

    #[test]
    fn test_directory_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(Error::ConfigRead { .. })
        ));
    }
}
