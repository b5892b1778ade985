//! External process execution
//!
//! Launches external commands with an explicit argument vector, drains their
//! stdout and stderr concurrently into the progress stream, and maps non-zero
//! exit statuses to errors.

use crate::progress::{ProgressEvent, ProgressHandler};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Process execution errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The binary could not be launched at all (usually: not installed)
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited with a non-zero status
    #[error("{program} exited with status {code}")]
    ExitStatus { program: String, code: i32 },

    /// The process was killed by a signal before exiting
    #[error("{program} was terminated before exiting")]
    Terminated { program: String },

    /// Waiting on the child failed
    #[error("error waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run an external command to completion, streaming its output.
///
/// The command is launched with `dir` as working directory. Both stdout and
/// stderr are drained line by line while the process runs and forwarded to
/// the handler as [`ProgressEvent::ProcessOutput`]; lines that are not valid
/// UTF-8 are replaced lossily rather than failing the build.
pub async fn run<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    dir: &Path,
    handler: Arc<dyn ProgressHandler>,
) -> Result<(), ProcessError> {
    let program_name = program.as_ref().to_string_lossy().into_owned();
    debug!(program = %program_name, dir = %dir.display(), "Starting process");

    let mut child = Command::new(program.as_ref())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program_name.clone(),
            source,
        })?;

    // stdout/stderr are always piped above, so these cannot be None.
    let stdout = child.stdout.take().ok_or_else(|| ProcessError::Spawn {
        program: program_name.clone(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "stdout not captured"),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| ProcessError::Spawn {
        program: program_name.clone(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "stderr not captured"),
    })?;

    let out_task = tokio::spawn(drain_lines(stdout, handler.clone()));
    let err_task = tokio::spawn(drain_lines(stderr, handler.clone()));

    let status = child.wait().await.map_err(|source| ProcessError::Wait {
        program: program_name.clone(),
        source,
    })?;

    // The drain tasks end when the pipes close; ignore join panics from
    // cancelled tasks at shutdown.
    let _ = out_task.await;
    let _ = err_task.await;

    if status.success() {
        debug!(program = %program_name, "Process finished");
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(ProcessError::ExitStatus {
            program: program_name,
            code,
        }),
        None => Err(ProcessError::Terminated {
            program: program_name,
        }),
    }
}

async fn drain_lines(reader: impl AsyncRead + Unpin, handler: Arc<dyn ProgressHandler>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                handler.on_progress(&ProgressEvent::ProcessOutput {
                    line: line.to_string(),
                });
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoOpHandler;
    use std::sync::Mutex;

    struct CollectingHandler {
        lines: Mutex<Vec<String>>,
    }

    impl CollectingHandler {
        fn new() -> Self {
            Self {
                lines: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProgressHandler for CollectingHandler {
        fn on_progress(&self, event: &ProgressEvent) {
            if let ProgressEvent::ProcessOutput { line } = event {
                self.lines.lock().unwrap().push(line.clone());
            }
        }
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_run_streams_stdout_and_stderr() {
        let handler = Arc::new(CollectingHandler::new());

        run(
            "sh",
            &["-c", "echo out; echo err >&2"],
            Path::new("."),
            handler.clone(),
        )
        .await
        .unwrap();

        let lines = handler.lines.lock().unwrap();
        assert!(lines.contains(&"out".to_string()));
        assert!(lines.contains(&"err".to_string()));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_run_maps_nonzero_exit() {
        let result = run("sh", &["-c", "exit 3"], Path::new("."), Arc::new(NoOpHandler)).await;

        match result {
            Err(ProcessError::ExitStatus { program, code }) => {
                assert_eq!(program, "sh");
                assert_eq!(code, 3);
            }
            other => panic!("expected ExitStatus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_missing_binary_is_spawn_error() {
        let result = run(
            "pipewright-no-such-binary",
            &[] as &[&str],
            Path::new("."),
            Arc::new(NoOpHandler),
        )
        .await;

        assert!(matches!(result, Err(ProcessError::Spawn { .. })));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_run_uses_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), b"x").unwrap();

        let handler = Arc::new(CollectingHandler::new());
        run("ls", &[] as &[&str], dir.path(), handler.clone())
            .await
            .unwrap();

        let lines = handler.lines.lock().unwrap();
        assert!(lines.iter().any(|l| l.contains("marker.txt")));
    }
}
