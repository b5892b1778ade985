//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Build started
    Started { root: String },

    /// A pipeline stage started
    StageStarted { stage: String },

    /// A pipeline stage completed; `percent` is the overall completion
    StageComplete {
        stage: String,
        duration: Duration,
        percent: u8,
    },

    /// A status line from inside a stage ("Cloning ...", "Patching ...")
    Detail { message: String },

    /// A line of stdout/stderr from an external process
    ProcessOutput { line: String },

    /// Build completed successfully
    Completed { total_time: Duration },

    /// Build failed
    Failed { error: String },
}

/// Trait for handling progress events during a build
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {
        // Intentionally empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::Started {
            root: "/test".to_string(),
        });
        // Should not panic or do anything
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            root: "/test".to_string(),
        });
        handler.on_progress(&ProgressEvent::StageStarted {
            stage: "Sync".to_string(),
        });
        handler.on_progress(&ProgressEvent::Completed {
            total_time: Duration::from_secs(5),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::StageComplete {
            stage: "Remap".to_string(),
            duration: Duration::from_millis(10),
            percent: 45,
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("StageComplete"));
        assert!(debug_str.contains("percent: 45"));
    }
}
