use super::context::BuildContext;
use anyhow::Result;
use async_trait::async_trait;

/// A single stage of the build pipeline.
///
/// Stages run strictly in the order the orchestrator lists them and share one
/// mutable [`BuildContext`]. A stage that finds its artifacts already on disk
/// is expected to skip the corresponding work so that an interrupted build
/// resumes where it stopped.
#[async_trait]
pub trait BuildStage: Send + Sync {
    /// Stage name used in progress events and error context
    fn name(&self) -> &'static str;

    async fn run(&self, context: &mut BuildContext) -> Result<()>;
}
