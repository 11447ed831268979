mod bootstrap;
mod console;
mod launcher;
mod settings;

use bootstrap::BootstrapError;
use clap::Parser;
use console::Console;
use settings::{LauncherSettings, Overrides};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Launcher for Zabbix Manager: creates the initial configuration if needed,
/// then starts the console application in its own window/process.
#[derive(Parser, Debug)]
#[command(name = "zabbix-launcher", version, about)]
struct Cli {
    /// Launcher settings file (optional; defaults are used when missing)
    #[arg(short, long, default_value = "launcher.toml")]
    settings: PathBuf,

    /// Executable to start (overrides settings)
    #[arg(long)]
    executable: Option<String>,

    /// Seconds to pause after a successful start (overrides settings)
    #[arg(long)]
    pause_secs: Option<u64>,

    /// Never wait for ENTER after an error (non-interactive use)
    #[arg(long)]
    no_prompt: bool,

    /// Debug-level diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            executable: self.executable.clone(),
            pause_secs: self.pause_secs,
            no_prompt: self.no_prompt,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "zabbix_launcher=debug"
    } else {
        "zabbix_launcher=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    let settings = match LauncherSettings::load(&cli.settings) {
        Ok(s) => s.with_overrides(cli.overrides()),
        Err(e) => {
            tracing::error!(error = %e, "invalid launcher settings");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(?settings, "resolved settings");

    let mut console = Console::stdio(settings.interactive);
    if let Err(e) = run(&settings, &mut console) {
        tracing::error!(error = %e, "configuration bootstrap failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Banner, config bootstrap, launch, then a short pause on success.
///
/// Returns whether the application was started. Bootstrap failures are fatal
/// and propagate to the caller.
fn run<R: BufRead, W: Write>(
    settings: &LauncherSettings,
    console: &mut Console<R, W>,
) -> Result<bool, BootstrapError> {
    console.say("=== Zabbix Manager Launcher ===");

    let report = bootstrap::ensure_config_exists(settings, console)?;
    tracing::debug!(
        dir_created = report.dir_created,
        file_created = report.file_created,
        "configuration bootstrap done"
    );

    let started = launcher::launch_application(settings, console);
    if started {
        console.say("Application started successfully!");
        if settings.pause_secs > 0 {
            std::thread::sleep(Duration::from_secs(settings.pause_secs));
        }
    }
    Ok(started)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["zabbix-launcher"]).unwrap();
        assert_eq!(cli.settings, PathBuf::from("launcher.toml"));
        assert!(!cli.no_prompt);

        let settings = LauncherSettings::default().with_overrides(cli.overrides());
        assert_eq!(settings, LauncherSettings::default());
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "zabbix-launcher",
            "--executable",
            "zbx",
            "--pause-secs",
            "0",
            "--no-prompt",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);

        let settings = LauncherSettings::default().with_overrides(cli.overrides());
        assert_eq!(settings.executable, "zbx");
        assert_eq!(settings.pause_secs, 0);
        assert!(!settings.interactive);
    }

    #[test]
    fn test_positional_arguments_rejected() {
        assert!(Cli::try_parse_from(["zabbix-launcher", "extra"]).is_err());
    }

    fn settings_in(dir: &std::path::Path, executable: &str) -> LauncherSettings {
        LauncherSettings {
            work_dir: dir.to_path_buf(),
            executable: executable.to_string(),
            pause_secs: 0,
            interactive: false,
            ..Default::default()
        }
    }

    fn capture_console() -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(Vec::new()), Vec::new(), false)
    }

    fn output_of(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        let (_, out) = console.into_parts();
        String::from_utf8(out).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_run_success_prints_message_after_start() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path().join("quick-app");
        std::fs::write(&app, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&app, std::fs::Permissions::from_mode(0o755)).unwrap();
        let settings = settings_in(tmp.path(), "quick-app");
        let mut console = capture_console();

        assert!(run(&settings, &mut console).unwrap());

        let out = output_of(console);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.first(), Some(&"=== Zabbix Manager Launcher ==="));
        assert_eq!(lines.last(), Some(&"Application started successfully!"));
        let starting = out.find("Starting quick-app...").unwrap();
        let created = out.find("Initial configuration file").unwrap();
        assert!(created < starting);
        assert!(settings.config_file_path().exists());
    }

    #[test]
    fn test_run_missing_executable_reports_no_success() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = LauncherSettings {
            pause_secs: 60,
            ..settings_in(tmp.path(), "absent-app")
        };
        let mut console = capture_console();

        let start = std::time::Instant::now();
        assert!(!run(&settings, &mut console).unwrap());
        assert!(start.elapsed() < Duration::from_secs(5));

        let out = output_of(console);
        assert!(out.starts_with("=== Zabbix Manager Launcher ===\n"));
        assert!(out.contains("Error: executable 'absent-app' not found!"));
        assert!(!out.contains("Application started successfully!"));
        assert!(settings.config_file_path().exists());
    }

    #[test]
    fn test_run_bootstrap_failure_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings_in(tmp.path(), "absent-app");
        // A plain file where the config directory should go.
        std::fs::write(settings.config_dir_path(), "not a dir").unwrap();
        let mut console = capture_console();

        let err = run(&settings, &mut console).unwrap_err();
        assert!(matches!(err, BootstrapError::WriteFile { .. }));

        let out = output_of(console);
        assert!(!out.contains("Starting"));
        assert!(!out.contains("not found"));
    }
}
