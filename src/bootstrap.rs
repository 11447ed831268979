use crate::console::Console;
use crate::settings::LauncherSettings;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Document written to `config.json` on first run.
///
/// Server entries are owned by the console application; the launcher only
/// ever writes the empty list.
#[derive(Debug, Default, Serialize)]
pub struct ConfigDocument {
    pub servers: Vec<serde_json::Value>,
}

/// What `ensure_config_exists` had to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub dir_created: bool,
    pub file_created: bool,
}

/// Errors that can occur while bootstrapping the config directory.
#[derive(Debug)]
pub enum BootstrapError {
    /// Failed to create the config directory.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize the default document.
    Serialize { source: serde_json::Error },
    /// Failed to write the default config file.
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::CreateDir { path, source } => {
                write!(
                    f,
                    "failed to create config directory {}: {}",
                    path.display(),
                    source
                )
            }
            BootstrapError::Serialize { source } => {
                write!(f, "failed to serialize default config: {}", source)
            }
            BootstrapError::WriteFile { path, source } => {
                write!(
                    f,
                    "failed to write config file {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BootstrapError::CreateDir { source, .. } => Some(source),
            BootstrapError::Serialize { source } => Some(source),
            BootstrapError::WriteFile { source, .. } => Some(source),
        }
    }
}

/// Pretty-printed default document: `{ "servers": [] }` with two-space indent.
pub fn default_config_json() -> Result<String, BootstrapError> {
    serde_json::to_string_pretty(&ConfigDocument::default())
        .map_err(|e| BootstrapError::Serialize { source: e })
}

/// Make sure the config directory and default config file exist.
///
/// Existing files are never touched. Announces each thing it creates on the console.
pub fn ensure_config_exists<R: BufRead, W: Write>(
    settings: &LauncherSettings,
    console: &mut Console<R, W>,
) -> Result<BootstrapReport, BootstrapError> {
    let mut report = BootstrapReport::default();

    let dir = settings.config_dir_path();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| BootstrapError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;
        tracing::info!(path = %dir.display(), "created config directory");
        console.say(&format!(
            "Configuration directory '{}' created.",
            settings.config_dir.display()
        ));
        report.dir_created = true;
    }

    let file = settings.config_file_path();
    if write_if_absent(&file, default_config_json()?.as_bytes())? {
        tracing::info!(path = %file.display(), "wrote default config");
        console.say(&format!(
            "Initial configuration file '{}' created.",
            settings.config_dir.join(&settings.config_file).display()
        ));
        report.file_created = true;
    }

    Ok(report)
}

/// Create `path` with `contents` unless it already exists.
///
/// Returns Ok(false) when the file was already present; it is never truncated.
fn write_if_absent(path: &Path, contents: &[u8]) -> Result<bool, BootstrapError> {
    let write_err = |e: std::io::Error| BootstrapError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_err(e)),
    };
    file.write_all(contents).map_err(write_err)?;
    Ok(true)
}
