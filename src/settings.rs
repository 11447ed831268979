use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Resolved launcher settings, built once at startup and passed around read-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// File name of the program to launch, looked up inside `work_dir`.
    pub executable: String,
    /// Directory holding the executable and the config directory.
    pub work_dir: PathBuf,
    /// Config directory name, relative to `work_dir`.
    pub config_dir: PathBuf,
    /// Config file name inside `config_dir`.
    pub config_file: String,
    /// Seconds to wait after a successful launch (0 = no pause).
    pub pause_secs: u64,
    /// Block on "press ENTER" after errors.
    pub interactive: bool,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            executable: "ZabbixManager-Console.exe".to_string(),
            work_dir: PathBuf::from("."),
            config_dir: PathBuf::from("config"),
            config_file: "config.json".to_string(),
            pause_secs: 2,
            interactive: true,
        }
    }
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub executable: Option<String>,
    pub pause_secs: Option<u64>,
    pub no_prompt: bool,
}

/// Errors that can occur while loading `launcher.toml`.
#[derive(Debug)]
pub enum SettingsError {
    /// The file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid TOML for `LauncherSettings`.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Read { path, source } => {
                write!(f, "failed to read settings {}: {}", path.display(), source)
            }
            SettingsError::Parse { path, source } => {
                write!(f, "failed to parse settings {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Read { source, .. } => Some(source),
            SettingsError::Parse { source, .. } => Some(source),
        }
    }
}

impl LauncherSettings {
    /// Load settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        toml::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Apply command-line overrides on top of file/default values.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(executable) = overrides.executable {
            self.executable = executable;
        }
        if let Some(pause_secs) = overrides.pause_secs {
            self.pause_secs = pause_secs;
        }
        if overrides.no_prompt {
            self.interactive = false;
        }
        self
    }

    /// Path of the executable to launch (e.g. `./ZabbixManager-Console.exe`).
    pub fn executable_path(&self) -> PathBuf {
        self.work_dir.join(&self.executable)
    }

    /// Path of the config directory (e.g. `./config`).
    pub fn config_dir_path(&self) -> PathBuf {
        self.work_dir.join(&self.config_dir)
    }

    /// Path of the config file (e.g. `./config/config.json`).
    pub fn config_file_path(&self) -> PathBuf {
        self.config_dir_path().join(&self.config_file)
    }
}
