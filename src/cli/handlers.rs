//! Subcommand drivers

use super::commands::{BuildArgs, CheckArgs};
use super::output::{CheckReport, ConsoleHandler, OutputFormat};
use crate::config::PipewrightConfig;
use crate::pipeline::orchestrator::PipelineOrchestrator;
use crate::progress::{LoggingHandler, ProgressHandler};
use std::process::Command;
use std::sync::Arc;
use tracing::error;

/// Run the full pipeline. Returns the process exit code.
pub async fn handle_build(args: &BuildArgs, quiet: bool) -> i32 {
    let mut config = PipewrightConfig::default();
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(version) = &args.game_version {
        config.game_version = version.clone();
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return 2;
    }

    let handler: Arc<dyn ProgressHandler> = if args.plain || quiet {
        Arc::new(LoggingHandler)
    } else {
        Arc::new(ConsoleHandler::new())
    };

    let orchestrator = PipelineOrchestrator::new(handler);
    match orchestrator.execute(config).await {
        Ok(()) => 0,
        Err(e) => {
            error!("Build failed: {:#}", e);
            1
        }
    }
}

/// Run the preflight checks only. Returns the process exit code.
pub async fn handle_check(args: &CheckArgs) -> i32 {
    let mut config = PipewrightConfig::default();
    if let Some(root) = &args.root {
        config.root = root.clone();
    }

    let report = run_checks(&config);

    match report.format(OutputFormat::from(args.format)) {
        Ok(out) => print!("{}", out),
        Err(e) => {
            error!("Failed to format check report: {:#}", e);
            return 1;
        }
    }

    if report.ok() {
        0
    } else {
        1
    }
}

fn run_checks(config: &PipewrightConfig) -> CheckReport {
    let mut report = CheckReport::new();

    if cfg!(target_os = "macos") {
        report.push("os", false, "macOS is not supported");
    } else {
        report.push("os", true, std::env::consts::OS);
    }

    match git_version() {
        Some(version) => report.push("git", true, version),
        None => report.push("git", false, "git is not installed or not on PATH"),
    }

    match config.validate() {
        Ok(()) => report.push(
            "config",
            true,
            format!(
                "root {}, game version {}",
                config.root.display(),
                config.game_version
            ),
        ),
        Err(e) => report.push("config", false, e.to_string()),
    }

    report
}

fn git_version() -> Option<String> {
    let output = Command::new("git").arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(all(unix, not(target_os = "macos")))]
    fn test_run_checks_passes_on_supported_host() {
        let config = PipewrightConfig::default();
        let report = run_checks(&config);

        assert!(report.checks.iter().any(|c| c.name == "os" && c.passed));
        assert!(report.checks.iter().any(|c| c.name == "config" && c.passed));
    }

    #[test]
    fn test_run_checks_flags_invalid_config() {
        let config = PipewrightConfig {
            game_version: String::new(),
            ..PipewrightConfig::default()
        };
        let report = run_checks(&config);

        assert!(report
            .checks
            .iter()
            .any(|c| c.name == "config" && !c.passed));
        assert!(!report.ok());
    }
}
