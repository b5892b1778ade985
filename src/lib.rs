//! pipewright - build orchestrator for the patched Spigot game-server stack
//!
//! This library automates the full source-to-artifact pipeline for a patched
//! game server: it synchronizes the upstream repositories, downloads the
//! required tooling, remaps and decompiles the vanilla server jar, reformats
//! the decompiled sources, applies the server patch set, and drives Maven to
//! produce the final artifacts.
//!
//! # Core Concepts
//!
//! - **Pipeline**: a fixed, ordered list of build stages sharing a mutable
//!   [`BuildContext`]. Stages are gated by artifact existence checks, so a
//!   re-run resumes where the previous run left off.
//! - **Progress**: every stage transition and every line of external-process
//!   output is forwarded to a pluggable [`ProgressHandler`] so front ends can
//!   render status text and a coarse percentage.
//! - **External tools**: git, the decompiler, the formatter, and Maven are
//!   invoked as child processes; they are never reimplemented here.
//!
//! # Example Usage
//!
//! ```ignore
//! use pipewright::{PipewrightConfig, PipelineOrchestrator};
//! use pipewright::progress::LoggingHandler;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PipewrightConfig::default();
//! config.validate()?;
//!
//! let orchestrator = PipelineOrchestrator::new(Arc::new(LoggingHandler));
//! orchestrator.execute(config).await?;
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod archive;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod git;
pub mod patch;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod util;

// Re-export key types for convenient access
pub use config::{ConfigError, PipewrightConfig};
pub use patch::{PatchError, UnifiedDiff};
pub use pipeline::context::BuildContext;
pub use pipeline::orchestrator::PipelineOrchestrator;
pub use process::ProcessError;
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_pipewright() {
        assert_eq!(NAME, "pipewright");
    }
}
