//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root } => {
                info!(root = %root, "Starting build");
            }
            ProgressEvent::StageStarted { stage } => {
                info!(stage = %stage, "Starting stage");
            }
            ProgressEvent::StageComplete {
                stage,
                duration,
                percent,
            } => {
                info!(
                    stage = %stage,
                    duration_ms = duration.as_millis(),
                    percent,
                    "Stage complete"
                );
            }
            ProgressEvent::Detail { message } => {
                info!("{}", message);
            }
            ProgressEvent::ProcessOutput { line } => {
                debug!(target: "pipewright::process", "{}", line);
            }
            ProgressEvent::Completed { total_time } => {
                info!(total_time_ms = total_time.as_millis(), "Build complete");
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Build failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_handler_creation() {
        let handler = LoggingHandler;
        // Should not panic
        handler.on_progress(&ProgressEvent::Started {
            root: "/test".to_string(),
        });
    }

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        // Test all event types to ensure they don't panic
        let events = vec![
            ProgressEvent::Started {
                root: "/test".to_string(),
            },
            ProgressEvent::StageStarted {
                stage: "Preflight".to_string(),
            },
            ProgressEvent::StageComplete {
                stage: "Preflight".to_string(),
                duration: Duration::from_millis(50),
                percent: 9,
            },
            ProgressEvent::Detail {
                message: "Cloning Bukkit".to_string(),
            },
            ProgressEvent::ProcessOutput {
                line: "[INFO] BUILD SUCCESS".to_string(),
            },
            ProgressEvent::Completed {
                total_time: Duration::from_secs(5),
            },
            ProgressEvent::Failed {
                error: "Test error".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
