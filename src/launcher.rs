//! Start the console application as a detached child process.
//!
//! The child is never waited on: no exit code, no captured output.
use crate::console::Console;
use crate::settings::LauncherSettings;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Windows `CREATE_NEW_CONSOLE` process-creation flag.
#[cfg(windows)]
const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

const ACK_PROMPT: &str = "Press ENTER to exit...";

/// Errors that can occur while launching the application.
#[derive(Debug)]
pub enum LaunchError {
    /// The executable is not present in the working directory.
    NotFound { path: PathBuf },
    /// The OS refused to start the process.
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchError::NotFound { path } => {
                write!(f, "executable not found: {}", path.display())
            }
            LaunchError::Spawn { path, source } => {
                write!(f, "failed to spawn {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::NotFound { .. } => None,
            LaunchError::Spawn { source, .. } => Some(source),
        }
    }
}

/// Build the platform-specific command for `path`.
///
/// Windows: the child gets its own console window.
/// Elsewhere the child is started as-is and shares the launcher's terminal
/// and process group.
fn detached_command(path: &Path) -> Command {
    #[allow(unused_mut)]
    let mut cmd = Command::new(path);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NEW_CONSOLE);
    }
    cmd
}

/// Resolve the executable path, failing if it is not present.
pub fn locate(settings: &LauncherSettings) -> Result<PathBuf, LaunchError> {
    let path = settings.executable_path();
    if !path.exists() {
        return Err(LaunchError::NotFound { path });
    }
    Ok(path)
}

/// Start `path` and return its PID without waiting on it.
pub fn spawn_detached(path: &Path) -> Result<u32, LaunchError> {
    tracing::debug!(path = %path.display(), "spawning detached process");
    // Dropping the handle does not kill or wait for the child.
    let child = detached_command(path)
        .spawn()
        .map_err(|e| LaunchError::Spawn {
            path: path.to_path_buf(),
            source: e,
        })?;

    let pid = child.id();
    tracing::info!(pid, path = %path.display(), "application process started");
    Ok(pid)
}

/// Launch the application, reporting progress and failures on the console.
///
/// On failure the user is asked to acknowledge before this returns `false`.
pub fn launch_application<R: BufRead, W: Write>(
    settings: &LauncherSettings,
    console: &mut Console<R, W>,
) -> bool {
    let path = match locate(settings) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "executable not found");
            console.say(&format!(
                "Error: executable '{}' not found!",
                settings.executable
            ));
            console.say("Make sure the executable is in the same folder as this launcher.");
            console.acknowledge(ACK_PROMPT);
            return false;
        }
    };

    console.say(&format!("Starting {}...", settings.executable));

    match spawn_detached(&path) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "failed to start application");
            let detail = match &e {
                LaunchError::Spawn { source, .. } => source.to_string(),
                LaunchError::NotFound { .. } => e.to_string(),
            };
            console.say(&format!("Error starting the application: {detail}"));
            console.acknowledge(ACK_PROMPT);
            false
        }
    }
}
